use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::lead::Lead;
use super::user::User;
use crate::error::{CrmError, CrmResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    Sales,
    Service,
    Delivery,
}

impl AppointmentKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AppointmentKind::Sales => "sales",
            AppointmentKind::Service => "service",
            AppointmentKind::Delivery => "delivery",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(AppointmentKind::Sales),
            "service" => Some(AppointmentKind::Service),
            "delivery" => Some(AppointmentKind::Delivery),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Showed,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Showed => "showed",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> CrmResult<Self> {
        let lower = s.trim().to_lowercase().replace('-', "_");
        Self::from_db_str(&lower).ok_or_else(|| CrmError::UnknownStatus(s.to_string()))
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "showed" => Some(AppointmentStatus::Showed),
            "no_show" => Some(AppointmentStatus::NoShow),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Id<Appointment>,
    pub lead_id: Id<Lead>,
    pub lead_name: String,
    pub kind: AppointmentKind,
    pub at: DateTime<Utc>,
    pub duration_min: i64,
    pub status: AppointmentStatus,
    pub notes: String,
    pub assigned_to: Option<Id<User>>,
}

impl Appointment {
    pub fn schedule(lead: &Lead, at: DateTime<Utc>, duration_min: i64) -> Self {
        Self {
            id: Id::generate(),
            lead_id: lead.id.clone(),
            lead_name: lead.name.clone(),
            kind: AppointmentKind::Sales,
            at,
            duration_min,
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
            assigned_to: lead.assigned_to.clone(),
        }
    }

    /// None when the end falls outside the representable calendar.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        Duration::try_minutes(self.duration_min).and_then(|d| self.at.checked_add_signed(d))
    }

    pub fn is_live(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::user::User;
use crate::error::{CrmError, CrmResult};

/// Pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Working,
    ApptSet,
    Showed,
    Sold,
    Lost,
}

impl LeadStatus {
    pub const ALL: &'static [LeadStatus] = &[
        LeadStatus::New,
        LeadStatus::Working,
        LeadStatus::ApptSet,
        LeadStatus::Showed,
        LeadStatus::Sold,
        LeadStatus::Lost,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Working => "Working",
            LeadStatus::ApptSet => "Appt Set",
            LeadStatus::Showed => "Showed",
            LeadStatus::Sold => "Sold",
            LeadStatus::Lost => "Lost",
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Working => "working",
            LeadStatus::ApptSet => "appt_set",
            LeadStatus::Showed => "showed",
            LeadStatus::Sold => "sold",
            LeadStatus::Lost => "lost",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        LeadStatus::ALL.iter().copied().find(|st| st.to_db_str() == s)
    }

    pub fn parse(s: &str) -> CrmResult<Self> {
        Self::from_db_str(&s.trim().to_lowercase())
            .ok_or_else(|| CrmError::UnknownStatus(s.to_string()))
    }
}

/// Kind of follow-up a lead is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Call,
    Sms,
    Email,
    Appt,
    Followup,
}

impl ActionType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::Call => "call",
            ActionType::Sms => "sms",
            ActionType::Email => "email",
            ActionType::Appt => "appt",
            ActionType::Followup => "followup",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "call" => Some(ActionType::Call),
            "sms" => Some(ActionType::Sms),
            "email" => Some(ActionType::Email),
            "appt" => Some(ActionType::Appt),
            "followup" => Some(ActionType::Followup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub kind: ActionType,
    pub due_at: DateTime<Utc>,
}

impl NextAction {
    pub fn new(kind: ActionType, due_at: DateTime<Utc>) -> Self {
        Self { kind, due_at }
    }
}

/// A sales prospect. `assigned_to` is a weak reference to a user id that
/// may or may not sit in any pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Id<Lead>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub source: String,
    pub status: LeadStatus,
    pub assigned_to: Option<Id<User>>,
    pub next_action: Option<NextAction>,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    pub fn create(name: String, source: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            name,
            phone: None,
            email: None,
            source,
            status: LeadStatus::New,
            assigned_to: None,
            next_action: None,
            last_activity_at: now,
            created_at: now,
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_action
            .as_ref()
            .map(|a| a.due_at < now)
            .unwrap_or(false)
    }
}

/// Field patch applied to a lead. `None` leaves a field untouched;
/// `next_action: Some(None)` clears the pending action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub assigned_to: Option<Id<User>>,
    pub status: Option<LeadStatus>,
    pub next_action: Option<Option<NextAction>>,
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        self.assigned_to.is_none() && self.status.is_none() && self.next_action.is_none()
    }

    pub fn apply(&self, lead: &mut Lead) {
        if let Some(id) = &self.assigned_to {
            lead.assigned_to = Some(id.clone());
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(action) = &self.next_action {
            lead.next_action = action.clone();
        }
    }
}

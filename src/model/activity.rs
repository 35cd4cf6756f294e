use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::lead::Lead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Call,
    Sms,
    Email,
    Note,
    Done,
    Snooze,
}

impl ActivityKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActivityKind::Call => "call",
            ActivityKind::Sms => "sms",
            ActivityKind::Email => "email",
            ActivityKind::Note => "note",
            ActivityKind::Done => "done",
            ActivityKind::Snooze => "snooze",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "call" => Some(ActivityKind::Call),
            "sms" => Some(ActivityKind::Sms),
            "email" => Some(ActivityKind::Email),
            "note" => Some(ActivityKind::Note),
            "done" => Some(ActivityKind::Done),
            "snooze" => Some(ActivityKind::Snooze),
            _ => None,
        }
    }
}

/// One entry in a lead's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Id<Activity>,
    pub lead_id: Id<Lead>,
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
    pub note: Option<String>,
}

impl Activity {
    pub fn record(lead_id: Id<Lead>, kind: ActivityKind, note: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            lead_id,
            kind,
            at,
            note,
        }
    }
}

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::lead::LeadStatus;

pub const DEFAULT_FIRST_TOUCH_MIN: i64 = 15;
pub const DEFAULT_OVERDUE_HOURS: i64 = 24;

/// Dealership-wide settings, stored as one JSON document. Missing fields
/// take their default so older documents keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub org_name: String,
    pub phone: String,
    pub timezone: String,
    pub brand: Brand,
    pub hours: WeekHours,
    pub round_robin: RoundRobinSettings,
    pub pipeline: PipelineSettings,
    pub notifications: Notifications,
    pub lead_sources: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            org_name: "Demo Motors".to_string(),
            phone: String::new(),
            timezone: "UTC".to_string(),
            brand: Brand::default(),
            hours: WeekHours::default(),
            round_robin: RoundRobinSettings::default(),
            pipeline: PipelineSettings::default(),
            notifications: Notifications::default(),
            lead_sources: ["Website", "TradePending", "Phone", "Walk-in"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Settings {
    pub fn has_lead_source(&self, source: &str) -> bool {
        self.lead_sources
            .iter()
            .any(|s| s.eq_ignore_ascii_case(source.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    pub primary: String,
    pub logo_url: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            primary: "#5BE6CE".to_string(),
            logo_url: String::new(),
        }
    }
}

/// Opening hours for one day, as `HH:MM` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayHours {
    pub open: bool,
    pub start: String,
    pub end: String,
}

impl DayHours {
    pub fn open(start: &str, end: &str) -> Self {
        Self {
            open: true,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            start: "00:00".to_string(),
            end: "00:00".to_string(),
        }
    }
}

impl Default for DayHours {
    fn default() -> Self {
        Self::closed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekHours {
    pub mon: DayHours,
    pub tue: DayHours,
    pub wed: DayHours,
    pub thu: DayHours,
    pub fri: DayHours,
    pub sat: DayHours,
    pub sun: DayHours,
}

impl Default for WeekHours {
    fn default() -> Self {
        let weekday = || DayHours::open("09:00", "18:00");
        Self {
            mon: weekday(),
            tue: weekday(),
            wed: weekday(),
            thu: weekday(),
            fri: weekday(),
            sat: DayHours::open("10:00", "16:00"),
            sun: DayHours::closed(),
        }
    }
}

impl WeekHours {
    pub fn day(&self, day: Weekday) -> &DayHours {
        match day {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DayHours {
        match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }
}

/// `auto_assign` is stored and shown but nothing routes leads by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundRobinSettings {
    pub auto_assign: bool,
}

impl Default for RoundRobinSettings {
    fn default() -> Self {
        Self { auto_assign: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub statuses: Vec<String>,
    pub sla: Sla,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            statuses: LeadStatus::ALL
                .iter()
                .map(|s| s.to_db_str().to_string())
                .collect(),
            sla: Sla::default(),
        }
    }
}

/// Response-time targets: the first touch on a new lead, and how long an
/// open lead may sit without activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sla {
    pub first_touch_min: i64,
    pub overdue_hours: i64,
}

impl Default for Sla {
    fn default() -> Self {
        Self {
            first_touch_min: DEFAULT_FIRST_TOUCH_MIN,
            overdue_hours: DEFAULT_OVERDUE_HOURS,
        }
    }
}

impl Sla {
    /// Non-positive values are replaced by the defaults.
    pub fn new(first_touch_min: i64, overdue_hours: i64) -> Self {
        Self {
            first_touch_min: if first_touch_min > 0 { first_touch_min } else { DEFAULT_FIRST_TOUCH_MIN },
            overdue_hours: if overdue_hours > 0 { overdue_hours } else { DEFAULT_OVERDUE_HOURS },
        }
    }

    pub fn sanitized(self) -> Self {
        Self::new(self.first_touch_min, self.overdue_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    pub sla_breach: bool,
    pub appt_reminders: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            sla_breach: true,
            appt_reminders: true,
        }
    }
}

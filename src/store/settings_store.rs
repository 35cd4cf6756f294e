use chrono::Weekday;
use tracing::{debug, info, warn};

use super::documents::DocumentStore;
use crate::error::CrmResult;
use crate::model::{DayHours, Settings, Sla};
use crate::validation::{self, non_blank};

/// Document key holding the dealership settings.
pub const SETTINGS_KEY: &str = "dealerpilot.org.settings.v1";

/// Durable home of the org settings. Like the pool store, every change
/// rewrites the whole document.
pub struct SettingsStore<D> {
    docs: D,
}

impl<D: DocumentStore> SettingsStore<D> {
    pub fn new(docs: D) -> Self {
        Self { docs }
    }

    /// Persisted settings, or the defaults when nothing usable is stored.
    pub fn load_settings(&self) -> Settings {
        let raw = match self.docs.load(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                warn!(error = %e, "Settings document unreadable, using defaults");
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(mut settings) => {
                settings.pipeline.sla = settings.pipeline.sla.sanitized();
                settings
            }
            Err(e) => {
                warn!(error = %e, "Malformed settings document, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> CrmResult<()> {
        let json = serde_json::to_string(settings)?;
        self.docs.save(SETTINGS_KEY, &json)?;
        debug!("Saved settings");
        Ok(())
    }

    pub fn set_org_name(&self, name: &str) -> CrmResult<Settings> {
        let name = non_blank(name, "org name")?;
        self.update(|s| s.org_name = name)
    }

    /// Stored as `(555)-201-9933`; blank input clears the number.
    pub fn set_phone(&self, phone: &str) -> CrmResult<Settings> {
        let phone = validation::format_us_phone(phone);
        self.update(|s| s.phone = phone)
    }

    pub fn set_timezone(&self, timezone: &str) -> CrmResult<Settings> {
        let timezone = non_blank(timezone, "timezone")?;
        self.update(|s| s.timezone = timezone)
    }

    /// Opens `day` from `start` to `end` (`HH:MM`), or closes it when
    /// `hours` is None.
    pub fn set_hours(&self, day: Weekday, hours: Option<(&str, &str)>) -> CrmResult<Settings> {
        let day_hours = match hours {
            Some((start, end)) => DayHours::open(
                &validation::clock_time(start, "start")?,
                &validation::clock_time(end, "end")?,
            ),
            None => DayHours::closed(),
        };
        self.update(|s| *s.hours.day_mut(day) = day_hours)
    }

    /// Non-positive values fall back to the defaults (15 minutes, 24 hours).
    pub fn set_sla(&self, first_touch_min: i64, overdue_hours: i64) -> CrmResult<Settings> {
        let sla = Sla::new(first_touch_min, overdue_hours);
        let settings = self.update(|s| s.pipeline.sla = sla)?;
        info!(
            first_touch_min = sla.first_touch_min,
            overdue_hours = sla.overdue_hours,
            "SLA updated"
        );
        Ok(settings)
    }

    pub fn set_auto_assign(&self, on: bool) -> CrmResult<Settings> {
        let settings = self.update(|s| s.round_robin.auto_assign = on)?;
        info!(auto_assign = on, "Auto-assign toggled");
        Ok(settings)
    }

    pub fn set_sla_breach_alerts(&self, on: bool) -> CrmResult<Settings> {
        self.update(|s| s.notifications.sla_breach = on)
    }

    pub fn set_appointment_reminders(&self, on: bool) -> CrmResult<Settings> {
        self.update(|s| s.notifications.appt_reminders = on)
    }

    /// Appends a lead source. A source already listed (ignoring case) is
    /// left as it is.
    pub fn add_lead_source(&self, source: &str) -> CrmResult<Settings> {
        let source = non_blank(source, "lead source")?;
        self.update(|s| {
            if !s.has_lead_source(&source) {
                s.lead_sources.push(source);
            }
        })
    }

    /// Removes a lead source, ignoring case. Unknown sources change nothing.
    pub fn remove_lead_source(&self, source: &str) -> CrmResult<Settings> {
        let source = source.trim().to_string();
        self.update(|s| s.lead_sources.retain(|x| !x.eq_ignore_ascii_case(&source)))
    }

    fn update<F>(&self, f: F) -> CrmResult<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.load_settings();
        f(&mut settings);
        self.save_settings(&settings)?;
        Ok(settings)
    }
}

pub mod ids;
pub mod user;
pub mod pool;
pub mod lead;
pub mod appointment;
pub mod activity;
pub mod settings;

// Re-exports for convenience
pub use ids::Id;
pub use user::{Access, Role, User};
pub use pool::{Member, Pool};
pub use lead::{ActionType, Lead, LeadPatch, LeadStatus, NextAction};
pub use appointment::{Appointment, AppointmentKind, AppointmentStatus};
pub use activity::{Activity, ActivityKind};
pub use settings::{DayHours, Notifications, Settings, Sla, WeekHours};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use crate::db::{activity_repo, appointment_repo, lead_repo};
use crate::error::{CrmError, CrmResult};
use crate::model::{
    ActionType, Activity, ActivityKind, Appointment, AppointmentStatus, Id, Lead, LeadPatch,
    LeadStatus, NextAction, User,
};
use crate::validation::{self, trim_optional};

const DEFAULT_APPOINTMENT_MIN: i64 = 30;
const FIRST_CALL_DELAY_MIN: i64 = 120;

/// Input for the quick-add flow.
#[derive(Debug, Clone, Default)]
pub struct QuickAdd<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub source: Option<&'a str>,
    pub note: Option<&'a str>,
    /// Book a sales appointment right away: start time and optional length.
    pub appointment: Option<(DateTime<Utc>, Option<i64>)>,
}

/// Creates a lead owned by `owner`. Ownership is chosen by the caller; the
/// rotation pointer is never consulted or advanced here.
pub fn quick_add(
    conn: &Connection,
    owner: &Id<User>,
    input: &QuickAdd,
    now: DateTime<Utc>,
) -> CrmResult<Lead> {
    let name = trim_optional(input.name);
    let phone = trim_optional(input.phone).map(|p| validation::format_us_phone(&p));
    let email = trim_optional(input.email);
    if name.is_none() && email.is_none() && phone.as_deref().map_or(true, str::is_empty) {
        return Err(CrmError::MissingContact);
    }

    let appointment = match input.appointment {
        Some((at, duration)) => {
            let duration_min =
                validation::positive_or(duration, DEFAULT_APPOINTMENT_MIN, "duration")?;
            validation::add_minutes(at, duration_min, "duration")?;
            Some((at, duration_min))
        }
        None => None,
    };

    let mut lead = Lead::create(
        name.unwrap_or_else(|| "Unnamed".into()),
        trim_optional(input.source).unwrap_or_else(|| "Manual".into()),
        now,
    );
    lead.phone = phone.filter(|p| !p.is_empty());
    lead.email = email;
    lead.assigned_to = Some(owner.clone());

    match appointment {
        Some((at, _)) => {
            lead.status = LeadStatus::ApptSet;
            lead.next_action = Some(NextAction::new(ActionType::Appt, at));
        }
        None => {
            lead.status = LeadStatus::New;
            lead.next_action = Some(NextAction::new(
                ActionType::Call,
                validation::add_minutes(now, FIRST_CALL_DELAY_MIN, "now")?,
            ));
        }
    }

    let tx = conn.unchecked_transaction()?;
    lead_repo::insert(&tx, &lead)?;

    if let Some(note) = trim_optional(input.note) {
        activity_repo::insert(
            &tx,
            &Activity::record(lead.id.clone(), ActivityKind::Note, Some(note), now),
        )?;
    }

    if let Some((at, duration_min)) = appointment {
        let mut appt = Appointment::schedule(&lead, at, duration_min);
        appt.notes = trim_optional(input.note).unwrap_or_default();
        appointment_repo::insert(&tx, &appt)?;
    }
    tx.commit()?;

    info!(lead = %lead.id, owner = %owner, status = lead.status.to_db_str(), "Lead added");
    Ok(lead)
}

/// Applies a field patch and bumps the lead's activity time. Returns None
/// for an unknown lead; an empty patch writes nothing.
pub fn patch_lead(
    conn: &Connection,
    lead_id: &Id<Lead>,
    patch: &LeadPatch,
    now: DateTime<Utc>,
) -> CrmResult<Option<Lead>> {
    let mut lead = match lead_repo::find_by_id(conn, lead_id)? {
        Some(l) => l,
        None => return Ok(None),
    };

    if patch.is_empty() {
        return Ok(Some(lead));
    }
    patch.apply(&mut lead);
    lead.last_activity_at = now;
    lead_repo::update(conn, &lead)?;
    Ok(Some(lead))
}

/// Points a lead at a user. A plain field write: rotation state is left
/// alone even when the user sits in a pool.
pub fn assign_lead(
    conn: &Connection,
    lead_id: &Id<Lead>,
    user_id: &Id<User>,
    now: DateTime<Utc>,
) -> CrmResult<Option<Lead>> {
    let patch = LeadPatch {
        assigned_to: Some(user_id.clone()),
        ..LeadPatch::default()
    };
    let lead = patch_lead(conn, lead_id, &patch, now)?;
    if lead.is_some() {
        info!(lead = %lead_id, user = %user_id, "Lead assigned");
    }
    Ok(lead)
}

pub fn set_status(
    conn: &Connection,
    lead_id: &Id<Lead>,
    status: LeadStatus,
    now: DateTime<Utc>,
) -> CrmResult<Lead> {
    let patch = LeadPatch {
        status: Some(status),
        ..LeadPatch::default()
    };
    patch_lead(conn, lead_id, &patch, now)?.ok_or_else(|| CrmError::not_found("Lead", lead_id))
}

/// Books or moves the lead's appointment and marks the lead `appt_set`.
/// A new appointment goes to the lead's owner, or to `actor` when the lead
/// is unassigned.
pub fn schedule_appointment(
    conn: &Connection,
    lead_id: &Id<Lead>,
    at: DateTime<Utc>,
    duration_min: Option<i64>,
    actor: &Id<User>,
    now: DateTime<Utc>,
) -> CrmResult<(Lead, Appointment)> {
    let duration_min =
        validation::positive_or(duration_min, DEFAULT_APPOINTMENT_MIN, "duration")?;
    validation::add_minutes(at, duration_min, "duration")?;

    let tx = conn.unchecked_transaction()?;
    let lead = find_lead(&tx, lead_id)?;
    let appt = match appointment_repo::find_live_for_lead(&tx, lead_id)? {
        Some(mut existing) => {
            existing.at = at;
            existing.duration_min = duration_min;
            appointment_repo::update(&tx, &existing)?;
            existing
        }
        None => {
            let mut appt = Appointment::schedule(&lead, at, duration_min);
            if appt.assigned_to.is_none() {
                appt.assigned_to = Some(actor.clone());
            }
            appointment_repo::insert(&tx, &appt)?;
            appt
        }
    };

    let patch = LeadPatch {
        status: Some(LeadStatus::ApptSet),
        next_action: Some(Some(NextAction::new(ActionType::Appt, at))),
        ..LeadPatch::default()
    };
    let lead = patch_lead(&tx, lead_id, &patch, now)?
        .ok_or_else(|| CrmError::not_found("Lead", lead_id))?;
    tx.commit()?;

    info!(lead = %lead_id, appointment = %appt.id, "Appointment scheduled");
    Ok((lead, appt))
}

/// Cancels the live appointment, if any. A lead sitting at `appt_set` goes
/// back to `working` and its pending action is cleared.
pub fn cancel_appointment(
    conn: &Connection,
    lead_id: &Id<Lead>,
    now: DateTime<Utc>,
) -> CrmResult<Lead> {
    let tx = conn.unchecked_transaction()?;
    let lead = find_lead(&tx, lead_id)?;

    let mut cancelled = match appointment_repo::find_live_for_lead(&tx, lead_id)? {
        Some(a) => a,
        None => return Ok(lead),
    };
    cancelled.status = AppointmentStatus::Cancelled;
    appointment_repo::update(&tx, &cancelled)?;

    let status = if lead.status == LeadStatus::ApptSet {
        LeadStatus::Working
    } else {
        lead.status
    };
    let patch = LeadPatch {
        status: Some(status),
        next_action: Some(None),
        ..LeadPatch::default()
    };
    let lead = patch_lead(&tx, lead_id, &patch, now)?
        .ok_or_else(|| CrmError::not_found("Lead", lead_id))?;
    tx.commit()?;

    info!(lead = %lead_id, appointment = %cancelled.id, "Appointment cancelled");
    Ok(lead)
}

/// Pushes the pending action back by `minutes` from whichever is later,
/// its current due time or now.
pub fn snooze_lead(
    conn: &Connection,
    lead_id: &Id<Lead>,
    minutes: i64,
    now: DateTime<Utc>,
) -> CrmResult<Lead> {
    let minutes = validation::positive(minutes, "minutes")?;
    let tx = conn.unchecked_transaction()?;
    let mut lead = find_lead(&tx, lead_id)?;

    let (kind, current_due) = match &lead.next_action {
        Some(a) => (a.kind, a.due_at),
        None => (ActionType::Followup, now),
    };
    let due_at = validation::add_minutes(current_due.max(now), minutes, "minutes")?;
    lead.next_action = Some(NextAction::new(kind, due_at));
    lead_repo::update(&tx, &lead)?;

    add_activity(
        &tx,
        lead_id,
        ActivityKind::Snooze,
        Some(format!("Snoozed {}m", minutes).as_str()),
        now,
    )?;
    let lead = find_lead(&tx, lead_id)?;
    tx.commit()?;
    Ok(lead)
}

/// Completes the pending follow-up. A `new` lead becomes `working`.
pub fn mark_done(conn: &Connection, lead_id: &Id<Lead>, now: DateTime<Utc>) -> CrmResult<Lead> {
    let tx = conn.unchecked_transaction()?;
    let mut lead = find_lead(&tx, lead_id)?;

    lead.next_action = None;
    if lead.status == LeadStatus::New {
        lead.status = LeadStatus::Working;
    }
    lead.last_activity_at = now;
    lead_repo::update(&tx, &lead)?;

    add_activity(&tx, lead_id, ActivityKind::Done, Some("Follow-up completed"), now)?;
    tx.commit()?;
    Ok(lead)
}

/// Records how an appointment went. The lead's own status is left alone.
/// Returns None for an unknown appointment.
pub fn set_appointment_status(
    conn: &Connection,
    appt_id: &Id<Appointment>,
    status: AppointmentStatus,
) -> CrmResult<Option<Appointment>> {
    let mut appt = match appointment_repo::find_by_id(conn, appt_id)? {
        Some(a) => a,
        None => return Ok(None),
    };
    appt.status = status;
    appointment_repo::update(conn, &appt)?;
    info!(appointment = %appt_id, status = status.to_db_str(), "Appointment status set");
    Ok(Some(appt))
}

/// Moves an appointment by `minutes`; negative values move it earlier.
/// A lead whose pending `appt` action pointed at the old time follows it.
pub fn shift_appointment(
    conn: &Connection,
    appt_id: &Id<Appointment>,
    minutes: i64,
    now: DateTime<Utc>,
) -> CrmResult<Option<Appointment>> {
    let tx = conn.unchecked_transaction()?;
    let mut appt = match appointment_repo::find_by_id(&tx, appt_id)? {
        Some(a) => a,
        None => return Ok(None),
    };

    let old_at = appt.at;
    appt.at = validation::add_minutes(old_at, minutes, "minutes")?;
    validation::add_minutes(appt.at, appt.duration_min, "minutes")?;
    appointment_repo::update(&tx, &appt)?;

    if let Some(mut lead) = lead_repo::find_by_id(&tx, &appt.lead_id)? {
        let follows = matches!(
            &lead.next_action,
            Some(a) if a.kind == ActionType::Appt && a.due_at == old_at
        );
        if follows {
            lead.next_action = Some(NextAction::new(ActionType::Appt, appt.at));
            lead.last_activity_at = now;
            lead_repo::update(&tx, &lead)?;
        }
    }
    tx.commit()?;

    info!(appointment = %appt_id, minutes, "Appointment shifted");
    Ok(Some(appt))
}

/// Records a timeline entry and bumps the lead's activity time.
pub fn add_activity(
    conn: &Connection,
    lead_id: &Id<Lead>,
    kind: ActivityKind,
    note: Option<&str>,
    now: DateTime<Utc>,
) -> CrmResult<Activity> {
    let mut lead = find_lead(conn, lead_id)?;

    let activity = Activity::record(lead_id.clone(), kind, trim_optional(note), now);
    activity_repo::insert(conn, &activity)?;

    lead.last_activity_at = activity.at;
    lead_repo::update(conn, &lead)?;
    Ok(activity)
}

pub fn delete_lead(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<()> {
    find_lead(conn, lead_id)?;
    lead_repo::delete(conn, lead_id)
}

fn find_lead(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Lead> {
    lead_repo::find_by_id(conn, lead_id)?.ok_or_else(|| CrmError::not_found("Lead", lead_id))
}

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use crate::db::{activity_repo, appointment_repo, lead_repo};
use crate::error::CrmResult;
use crate::model::{Activity, Appointment, Id, Lead, LeadStatus, Pool, Sla, User};

/// Leads the viewer may see: everything for managers, BDC and admins,
/// otherwise only leads assigned to them. Most recent activity first.
pub fn visible_leads(conn: &Connection, viewer: &User) -> CrmResult<Vec<Lead>> {
    if viewer.role.can_see_all_leads() {
        lead_repo::find_all(conn)
    } else {
        lead_repo::find_by_assignee(conn, &viewer.id)
    }
}

pub fn leads_for(conn: &Connection, user_id: &Id<User>) -> CrmResult<Vec<Lead>> {
    lead_repo::find_by_assignee(conn, user_id)
}

pub fn leads_by_status(conn: &Connection, status: LeadStatus) -> CrmResult<Vec<Lead>> {
    lead_repo::find_by_status(conn, status)
}

/// Leads whose pending action was due before `now`, oldest due first.
pub fn overdue_leads(conn: &Connection, now: DateTime<Utc>) -> CrmResult<Vec<Lead>> {
    let mut leads: Vec<Lead> = lead_repo::find_all(conn)?
        .into_iter()
        .filter(|l| l.is_overdue(now))
        .collect();
    leads.sort_by_key(|l| l.next_action.as_ref().map(|a| a.due_at));
    Ok(leads)
}

/// New leads with no activity since `sla.first_touch_min` minutes ago,
/// oldest first.
pub fn untouched_leads(conn: &Connection, sla: &Sla, now: DateTime<Utc>) -> CrmResult<Vec<Lead>> {
    let cutoff = match Duration::try_minutes(sla.first_touch_min).and_then(|d| now.checked_sub_signed(d)) {
        Some(c) => c,
        None => return Ok(Vec::new()),
    };
    let mut leads: Vec<Lead> = lead_repo::find_by_status(conn, LeadStatus::New)?
        .into_iter()
        .filter(|l| l.last_activity_at <= cutoff)
        .collect();
    leads.sort_by_key(|l| l.last_activity_at);
    Ok(leads)
}

/// Open leads (not sold or lost) idle for at least `sla.overdue_hours`,
/// oldest first.
pub fn stale_leads(conn: &Connection, sla: &Sla, now: DateTime<Utc>) -> CrmResult<Vec<Lead>> {
    let cutoff = match Duration::try_hours(sla.overdue_hours).and_then(|d| now.checked_sub_signed(d)) {
        Some(c) => c,
        None => return Ok(Vec::new()),
    };
    let mut leads: Vec<Lead> = lead_repo::find_all(conn)?
        .into_iter()
        .filter(|l| !matches!(l.status, LeadStatus::Sold | LeadStatus::Lost))
        .filter(|l| l.last_activity_at <= cutoff)
        .collect();
    leads.sort_by_key(|l| l.last_activity_at);
    Ok(leads)
}

pub fn timeline(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Vec<Activity>> {
    activity_repo::find_by_lead(conn, lead_id)
}

pub fn live_appointment(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Option<Appointment>> {
    appointment_repo::find_live_for_lead(conn, lead_id)
}

/// Display name behind a lead's weak `assigned_to` reference: user accounts
/// first, then pool seats. None when the id resolves to neither.
pub fn assignee_name(users: &[User], pools: &[Pool], user_id: &Id<User>) -> Option<String> {
    users
        .iter()
        .find(|u| &u.id == user_id)
        .map(|u| u.name.clone())
        .or_else(|| {
            pools
                .iter()
                .find_map(|p| p.find_member(user_id))
                .map(|m| m.name.clone())
        })
}

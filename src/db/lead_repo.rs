use rusqlite::{params, Connection};

use super::{from_db_time, to_db_time};
use crate::error::{CrmError, CrmResult};
use crate::model::{ActionType, Id, Lead, LeadStatus, NextAction, User};

const LEAD_COLUMNS: &str = "id, name, phone, email, source, status, assigned_to, next_action_type,
     next_action_due_at, last_activity_at, created_at";

pub fn insert(conn: &Connection, lead: &Lead) -> CrmResult<()> {
    let (action_type, action_due) = split_action(lead.next_action.as_ref());
    conn.execute(
        "INSERT INTO leads (id, name, phone, email, source, status, assigned_to, next_action_type,
         next_action_due_at, last_activity_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            lead.id.as_str(),
            lead.name,
            lead.phone,
            lead.email,
            lead.source,
            lead.status.to_db_str(),
            lead.assigned_to.as_ref().map(|id| id.as_str()),
            action_type,
            action_due,
            to_db_time(&lead.last_activity_at),
            to_db_time(&lead.created_at),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, lead: &Lead) -> CrmResult<()> {
    let (action_type, action_due) = split_action(lead.next_action.as_ref());
    conn.execute(
        "UPDATE leads SET name = ?1, phone = ?2, email = ?3, source = ?4, status = ?5,
         assigned_to = ?6, next_action_type = ?7, next_action_due_at = ?8, last_activity_at = ?9
         WHERE id = ?10",
        params![
            lead.name,
            lead.phone,
            lead.email,
            lead.source,
            lead.status.to_db_str(),
            lead.assigned_to.as_ref().map(|id| id.as_str()),
            action_type,
            action_due,
            to_db_time(&lead.last_activity_at),
            lead.id.as_str(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<()> {
    conn.execute("DELETE FROM leads WHERE id = ?1", params![lead_id.as_str()])?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &Id<Lead>) -> CrmResult<Option<Lead>> {
    let sql = format!("SELECT {} FROM leads WHERE id = ?1", LEAD_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;

    let result = stmt.query_row(params![id.as_str()], |row| Ok(row_to_lead(row)));

    match result {
        Ok(lead) => Ok(Some(lead?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All leads, most recent activity first.
pub fn find_all(conn: &Connection) -> CrmResult<Vec<Lead>> {
    let sql = format!(
        "SELECT {} FROM leads ORDER BY last_activity_at DESC",
        LEAD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let leads = stmt
        .query_map([], |row| Ok(row_to_lead(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(leads)
}

pub fn find_by_assignee(conn: &Connection, user_id: &Id<User>) -> CrmResult<Vec<Lead>> {
    let sql = format!(
        "SELECT {} FROM leads WHERE assigned_to = ?1 ORDER BY last_activity_at DESC",
        LEAD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let leads = stmt
        .query_map(params![user_id.as_str()], |row| Ok(row_to_lead(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(leads)
}

pub fn find_by_status(conn: &Connection, status: LeadStatus) -> CrmResult<Vec<Lead>> {
    let sql = format!(
        "SELECT {} FROM leads WHERE status = ?1 ORDER BY last_activity_at DESC",
        LEAD_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let leads = stmt
        .query_map(params![status.to_db_str()], |row| Ok(row_to_lead(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(leads)
}

fn split_action(action: Option<&NextAction>) -> (Option<&'static str>, Option<String>) {
    match action {
        Some(a) => (Some(a.kind.to_db_str()), Some(to_db_time(&a.due_at))),
        None => (None, None),
    }
}

fn row_to_lead(row: &rusqlite::Row) -> CrmResult<Lead> {
    let id_str: String = row.get(0)?;
    let status_str: String = row.get(5)?;
    let assigned: Option<String> = row.get(6)?;
    let action_type: Option<String> = row.get(7)?;
    let action_due: Option<String> = row.get(8)?;
    let last_activity: String = row.get(9)?;
    let created: String = row.get(10)?;

    let next_action = match (action_type, action_due) {
        (Some(kind), Some(due)) => {
            let kind = ActionType::from_db_str(&kind)
                .ok_or_else(|| CrmError::Other(format!("Unknown action type: {}", kind)))?;
            Some(NextAction::new(kind, from_db_time(&due)?))
        }
        _ => None,
    };

    Ok(Lead {
        id: Id::new(id_str),
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        source: row.get(4)?,
        status: LeadStatus::from_db_str(&status_str)
            .ok_or(CrmError::UnknownStatus(status_str))?,
        assigned_to: assigned.map(Id::new),
        next_action,
        last_activity_at: from_db_time(&last_activity)?,
        created_at: from_db_time(&created)?,
    })
}

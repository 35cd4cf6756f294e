use rusqlite::{params, Connection};

use super::{from_db_time, to_db_time};
use crate::error::{CrmError, CrmResult};
use crate::model::{Appointment, AppointmentKind, AppointmentStatus, Id, Lead};

pub fn insert(conn: &Connection, appt: &Appointment) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO appointments (id, lead_id, lead_name, kind, at, duration_min, status, notes, assigned_to)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            appt.id.as_str(),
            appt.lead_id.as_str(),
            appt.lead_name,
            appt.kind.to_db_str(),
            to_db_time(&appt.at),
            appt.duration_min,
            appt.status.to_db_str(),
            appt.notes,
            appt.assigned_to.as_ref().map(|id| id.as_str()),
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, appt: &Appointment) -> CrmResult<()> {
    conn.execute(
        "UPDATE appointments SET lead_name = ?1, kind = ?2, at = ?3, duration_min = ?4, status = ?5,
         notes = ?6, assigned_to = ?7 WHERE id = ?8",
        params![
            appt.lead_name,
            appt.kind.to_db_str(),
            to_db_time(&appt.at),
            appt.duration_min,
            appt.status.to_db_str(),
            appt.notes,
            appt.assigned_to.as_ref().map(|id| id.as_str()),
            appt.id.as_str(),
        ],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &Id<Appointment>) -> CrmResult<Option<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, lead_id, lead_name, kind, at, duration_min, status, notes, assigned_to
         FROM appointments WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.as_str()], |row| Ok(row_to_appointment(row)));

    match result {
        Ok(appt) => Ok(Some(appt?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_lead(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, lead_id, lead_name, kind, at, duration_min, status, notes, assigned_to
         FROM appointments WHERE lead_id = ?1 ORDER BY at",
    )?;

    let appts = stmt
        .query_map(params![lead_id.as_str()], |row| Ok(row_to_appointment(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(appts)
}

/// The lead's appointment that has not been cancelled, if any.
pub fn find_live_for_lead(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Option<Appointment>> {
    Ok(find_by_lead(conn, lead_id)?
        .into_iter()
        .find(|a| a.is_live()))
}

pub fn find_all(conn: &Connection) -> CrmResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, lead_id, lead_name, kind, at, duration_min, status, notes, assigned_to
         FROM appointments ORDER BY at",
    )?;

    let appts = stmt
        .query_map([], |row| Ok(row_to_appointment(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(appts)
}

fn row_to_appointment(row: &rusqlite::Row) -> CrmResult<Appointment> {
    let id_str: String = row.get(0)?;
    let lead_id: String = row.get(1)?;
    let kind_str: String = row.get(3)?;
    let at_str: String = row.get(4)?;
    let status_str: String = row.get(6)?;
    let assigned: Option<String> = row.get(8)?;

    Ok(Appointment {
        id: Id::new(id_str),
        lead_id: Id::new(lead_id),
        lead_name: row.get(2)?,
        kind: AppointmentKind::from_db_str(&kind_str)
            .ok_or_else(|| CrmError::Other(format!("Unknown appointment kind: {}", kind_str)))?,
        at: from_db_time(&at_str)?,
        duration_min: row.get(5)?,
        status: AppointmentStatus::from_db_str(&status_str)
            .ok_or_else(|| CrmError::Other(format!("Unknown appointment status: {}", status_str)))?,
        notes: row.get(7)?,
        assigned_to: assigned.map(Id::new),
    })
}

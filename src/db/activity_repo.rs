use rusqlite::{params, Connection};

use super::{from_db_time, to_db_time};
use crate::error::{CrmError, CrmResult};
use crate::model::{Activity, ActivityKind, Id, Lead};

pub fn insert(conn: &Connection, activity: &Activity) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO activities (id, lead_id, kind, at, note) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            activity.id.as_str(),
            activity.lead_id.as_str(),
            activity.kind.to_db_str(),
            to_db_time(&activity.at),
            activity.note,
        ],
    )?;
    Ok(())
}

/// A lead's timeline, newest first.
pub fn find_by_lead(conn: &Connection, lead_id: &Id<Lead>) -> CrmResult<Vec<Activity>> {
    let mut stmt = conn.prepare(
        "SELECT id, lead_id, kind, at, note FROM activities WHERE lead_id = ?1 ORDER BY at DESC",
    )?;

    let rows: Vec<(String, String, String, String, Option<String>)> = stmt
        .query_map(params![lead_id.as_str()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, lead_id, kind, at, note)| -> CrmResult<Activity> {
            Ok(Activity {
                id: Id::new(id),
                lead_id: Id::new(lead_id),
                kind: ActivityKind::from_db_str(&kind)
                    .ok_or_else(|| CrmError::Other(format!("Unknown activity kind: {}", kind)))?,
                at: from_db_time(&at)?,
                note,
            })
        })
        .collect()
}

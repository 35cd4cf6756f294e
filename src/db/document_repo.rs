use rusqlite::{params, Connection};

use crate::error::CrmResult;
use crate::store::DocumentStore;

pub fn load(conn: &Connection, key: &str) -> CrmResult<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM documents WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save(conn: &Connection, key: &str, value: &str) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, key: &str) -> CrmResult<()> {
    conn.execute("DELETE FROM documents WHERE key = ?1", params![key])?;
    Ok(())
}

impl DocumentStore for Connection {
    fn load(&self, key: &str) -> CrmResult<Option<String>> {
        load(self, key)
    }

    fn save(&self, key: &str, value: &str) -> CrmResult<()> {
        save(self, key, value)
    }
}

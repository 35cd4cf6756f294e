use rusqlite::Connection;

use crate::error::CrmResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> CrmResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'sales',
            dept TEXT NOT NULL DEFAULT 'Sales',
            active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            phone TEXT,
            email TEXT,
            source TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'new',
            assigned_to TEXT,
            next_action_type TEXT,
            next_action_due_at TEXT,
            last_activity_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS leads_assigned_to ON leads(assigned_to, last_activity_at);
        CREATE INDEX IF NOT EXISTS leads_status ON leads(status, last_activity_at);

        CREATE TABLE IF NOT EXISTS appointments (
            id TEXT PRIMARY KEY NOT NULL,
            lead_id TEXT NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
            lead_name TEXT NOT NULL,
            kind TEXT NOT NULL,
            at TEXT NOT NULL,
            duration_min INTEGER NOT NULL,
            status TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            assigned_to TEXT
        );

        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY NOT NULL,
            lead_id TEXT NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            at TEXT NOT NULL,
            note TEXT
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

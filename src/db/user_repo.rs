use rusqlite::{params, Connection};

use crate::error::CrmResult;
use crate::model::{Id, Role, User};

pub fn insert(conn: &Connection, user: &User) -> CrmResult<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, role, dept, active) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id.as_str(),
            user.name,
            user.email,
            user.role.as_str(),
            user.dept,
            user.active as i32,
        ],
    )?;
    Ok(())
}

pub fn update(conn: &Connection, user: &User) -> CrmResult<()> {
    conn.execute(
        "UPDATE users SET name = ?1, email = ?2, role = ?3, dept = ?4, active = ?5 WHERE id = ?6",
        params![
            user.name,
            user.email,
            user.role.as_str(),
            user.dept,
            user.active as i32,
            user.id.as_str(),
        ],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, user_id: &Id<User>) -> CrmResult<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", params![user_id.as_str()])?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &Id<User>) -> CrmResult<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, dept, active FROM users WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.as_str()], |row| Ok(row_to_user(row)));

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_by_email(conn: &Connection, email: &str) -> CrmResult<Option<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, dept, active FROM users WHERE LOWER(email) = LOWER(?1)",
    )?;

    let result = stmt.query_row(params![email], |row| Ok(row_to_user(row)));

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> CrmResult<Vec<User>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, role, dept, active FROM users ORDER BY name",
    )?;

    let users = stmt
        .query_map([], |row| Ok(row_to_user(row)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(users)
}

pub fn count(conn: &Connection) -> CrmResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(n)
}

fn row_to_user(row: &rusqlite::Row) -> CrmResult<User> {
    let id_str: String = row.get(0)?;
    let role_str: String = row.get(3)?;

    Ok(User {
        id: Id::new(id_str),
        name: row.get(1)?,
        email: row.get(2)?,
        role: Role::from_db_str(&role_str),
        dept: row.get(4)?,
        active: row.get::<_, i32>(5)? != 0,
    })
}

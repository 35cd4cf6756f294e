use rusqlite::Connection;
use tracing::info;

use crate::db::user_repo;
use crate::error::{CrmError, CrmResult};
use crate::model::{Id, Role, User};
use crate::validation;

pub fn add_user(
    conn: &Connection,
    name: &str,
    email: &str,
    role: Role,
    dept: Option<&str>,
) -> CrmResult<User> {
    let name = validation::non_blank(name, "name")?;
    let email = validation::non_blank(email, "email")?;

    if user_repo::find_by_email(conn, &email)?.is_some() {
        return Err(CrmError::AlreadyExists {
            entity_type: "User".into(),
            identifier: email,
        });
    }

    let dept = validation::trim_optional(dept).unwrap_or_else(|| "Sales".into());
    let user = User::create(name, email, role, dept);
    user_repo::insert(conn, &user)?;
    info!(user = %user.id, role = user.role.as_str(), "User added");
    Ok(user)
}

pub fn set_active(conn: &Connection, user_id: &Id<User>, active: bool) -> CrmResult<User> {
    update_user(conn, user_id, |u| u.active = active)
}

pub fn set_role(conn: &Connection, user_id: &Id<User>, role: Role) -> CrmResult<User> {
    let user = update_user(conn, user_id, |u| u.role = role)?;
    info!(user = %user_id, role = role.as_str(), "Role changed");
    Ok(user)
}

pub fn set_dept(conn: &Connection, user_id: &Id<User>, dept: &str) -> CrmResult<User> {
    let dept = validation::non_blank(dept, "dept")?;
    update_user(conn, user_id, |u| u.dept = dept)
}

/// Removes the account. Leads and pool seats that reference the id are left
/// as they are.
pub fn remove_user(conn: &Connection, user_id: &Id<User>) -> CrmResult<()> {
    find_user(conn, user_id)?;
    user_repo::delete(conn, user_id)?;
    info!(user = %user_id, "User removed");
    Ok(())
}

/// Inserts the demo team when no users exist yet. Returns how many were added.
pub fn seed_defaults(conn: &Connection) -> CrmResult<usize> {
    if user_repo::count(conn)? > 0 {
        return Ok(0);
    }
    let defaults = User::defaults();
    for user in &defaults {
        user_repo::insert(conn, user)?;
    }
    info!(users = defaults.len(), "Seeded demo team");
    Ok(defaults.len())
}

fn update_user<F>(conn: &Connection, user_id: &Id<User>, f: F) -> CrmResult<User>
where
    F: FnOnce(&mut User),
{
    let mut user = find_user(conn, user_id)?;
    f(&mut user);
    user_repo::update(conn, &user)?;
    Ok(user)
}

fn find_user(conn: &Connection, user_id: &Id<User>) -> CrmResult<User> {
    user_repo::find_by_id(conn, user_id)?.ok_or_else(|| CrmError::not_found("User", user_id))
}

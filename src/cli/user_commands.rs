use crate::cli::context::CLIContext;
use crate::db::user_repo;
use crate::model::*;
use crate::ops::user_ops;
use crate::queries::pool_queries;

pub fn list(ctx: &CLIContext) {
    let users = user_repo::find_all(&ctx.conn).unwrap_or_default();
    let pools = ctx.pools().load_pools();
    println!("Team ({}):", users.len());
    for user in &users {
        let seats: Vec<&str> = pool_queries::pools_for_user(&pools, &user.id)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let seat_str = if seats.is_empty() {
            String::new()
        } else {
            format!(" - pools: {}", seats.join(", "))
        };
        println!(
            "  {}  {} <{}> {} / {}{}{}",
            user.id,
            user.name,
            user.email,
            user.role.as_str(),
            user.dept,
            if user.active { "" } else { " (inactive)" },
            seat_str
        );
    }
}

pub fn whoami(ctx: &CLIContext) {
    println!(
        "{} ({}) - role: {}, board access: {}",
        ctx.user.name,
        ctx.user.id,
        ctx.user.role.as_str(),
        if ctx.access().can_edit() { "edit" } else { "view only" }
    );
}

pub fn add(ctx: &CLIContext) {
    if !is_admin(ctx) {
        return;
    }
    let name = ctx.prompt("Name: ").unwrap_or_default();
    let email = ctx.prompt("Email: ").unwrap_or_default();
    let role = match ctx.prompt("Role [sales]: ") {
        Some(s) if !s.is_empty() => match Role::parse(&s) {
            Ok(r) => r,
            Err(e) => {
                ctx.print_error(&e);
                return;
            }
        },
        _ => Role::Sales,
    };
    let dept = ctx.prompt("Department [Sales]: ").unwrap_or_default();

    match user_ops::add_user(&ctx.conn, &name, &email, role, Some(dept.as_str())) {
        Ok(user) => println!("Added {} ({}).", user.name, user.id),
        Err(e) => ctx.print_error(&e),
    }
}

/// set-role <user> <role>
pub fn set_role(ctx: &CLIContext, args: &str) {
    if !is_admin(ctx) {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        println!("Usage: set-role <user_id> <role>");
        return;
    }
    let role = match Role::parse(parts[1]) {
        Ok(r) => r,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    let user = match ctx.find_user(parts[0]) {
        Some(u) => u,
        None => return,
    };
    match user_ops::set_role(&ctx.conn, &user.id, role) {
        Ok(u) => println!("{} is now {}.", u.name, u.role.as_str()),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn set_active(ctx: &CLIContext, args: &str, active: bool) {
    if !is_admin(ctx) {
        return;
    }
    let user = match ctx.find_user(args) {
        Some(u) => u,
        None => {
            if args.is_empty() {
                println!("Usage: {} <user>", if active { "enable-user" } else { "disable-user" });
            }
            return;
        }
    };
    match user_ops::set_active(&ctx.conn, &user.id, active) {
        Ok(u) => println!("{} is now {}.", u.name, if u.active { "active" } else { "inactive" }),
        Err(e) => ctx.print_error(&e),
    }
}

/// set-dept <user> <dept>
pub fn set_dept(ctx: &CLIContext, args: &str) {
    if !is_admin(ctx) {
        return;
    }
    let mut parts = args.splitn(2, char::is_whitespace);
    let (user_arg, dept) = match (parts.next(), parts.next()) {
        (Some(u), Some(d)) if !u.is_empty() => (u, d),
        _ => {
            println!("Usage: set-dept <user_id> <department>");
            return;
        }
    };
    let user = match ctx.find_user(user_arg) {
        Some(u) => u,
        None => return,
    };
    match user_ops::set_dept(&ctx.conn, &user.id, dept) {
        Ok(u) => println!("{} is now in {}.", u.name, u.dept),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn remove(ctx: &CLIContext, args: &str) {
    if !is_admin(ctx) {
        return;
    }
    let user = match ctx.find_user(args) {
        Some(u) => u,
        None => {
            if args.is_empty() {
                println!("Usage: remove-user <user>");
            }
            return;
        }
    };
    if &user.id == ctx.user_id() {
        println!("You cannot remove yourself.");
        return;
    }
    match user_ops::remove_user(&ctx.conn, &user.id) {
        Ok(()) => println!("Removed {}. Their leads and pool seats are unchanged.", user.name),
        Err(e) => ctx.print_error(&e),
    }
}

fn is_admin(ctx: &CLIContext) -> bool {
    if matches!(ctx.user.role, Role::Manager | Role::Admin) {
        true
    } else {
        println!("Only managers and admins can manage users.");
        false
    }
}

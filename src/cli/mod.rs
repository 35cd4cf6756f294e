pub mod context;
pub mod pool_commands;
pub mod lead_commands;
pub mod user_commands;
pub mod settings_commands;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{schema, user_repo};
use crate::model::*;
use crate::ops::board_ops::Direction;
use crate::ops::user_ops;
use context::CLIContext;

/// Run the interactive REPL.
pub fn run(config: &Config) {
    println!("DealerPilot - round-robin lead routing");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    if let Some(dir) = config.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error creating {}: {}", dir.display(), e);
            return;
        }
    }

    let conn = match Connection::open(&config.db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        return;
    }
    info!(db = %config.db_path.display(), "Database ready");

    let ctx = match load_session(conn, config.acting_user.as_deref()) {
        Some(ctx) => ctx,
        None => return,
    };

    println!(
        "Signed in as {} ({}).",
        ctx.user.name,
        ctx.user.role.as_str()
    );
    repl_loop(&ctx);
}

fn load_session(conn: Connection, acting_user: Option<&str>) -> Option<CLIContext> {
    if let Err(e) = user_ops::seed_defaults(&conn) {
        eprintln!("Error seeding users: {}", e);
        return None;
    }

    let user = match acting_user {
        Some(id) => match user_repo::find_by_id(&conn, &Id::new(id)) {
            Ok(Some(u)) => u,
            Ok(None) => {
                eprintln!("No user with id '{}'.", id);
                return None;
            }
            Err(e) => {
                eprintln!("Error loading user: {}", e);
                return None;
            }
        },
        None => {
            let users = user_repo::find_all(&conn).unwrap_or_default();
            match users
                .iter()
                .find(|u| u.role == Role::Manager && u.active)
                .or_else(|| users.first())
            {
                Some(u) => u.clone(),
                None => {
                    eprintln!("No users available.");
                    return None;
                }
            }
        }
    };

    if !user.active {
        warn!(user = %user.id, "Signed in as an inactive user");
    }
    Some(CLIContext::new(conn, user))
}

fn repl_loop(ctx: &CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            // Round robin
            "pools" | "board" => pool_commands::list(ctx),
            "show-pool" | "pool" => pool_commands::show(ctx, args),
            "next" => pool_commands::next(ctx, args),
            "advance" => pool_commands::advance(ctx, args),
            "reset" => pool_commands::reset(ctx, args),
            "pause" => pool_commands::set_active(ctx, args, false),
            "resume" => pool_commands::set_active(ctx, args, true),
            "move" => pool_commands::move_member(ctx, args),
            "up" => pool_commands::bump(ctx, args, Direction::Up),
            "down" => pool_commands::bump(ctx, args, Direction::Down),

            // Leads
            "leads" | "ls" => lead_commands::list(ctx, args),
            "overdue" => lead_commands::overdue(ctx),
            "appts" => lead_commands::appointments(ctx),
            "show-lead" | "show" => lead_commands::show(ctx, args),
            "add-lead" | "add" => lead_commands::add(ctx),
            "assign" => lead_commands::assign(ctx, args),
            "appt" => lead_commands::schedule(ctx, args),
            "cancel-appt" => lead_commands::cancel_appointment(ctx, args),
            "appt-status" => lead_commands::appointment_status(ctx, args),
            "appt-shift" => lead_commands::shift_appointment(ctx, args),
            "snooze" => lead_commands::snooze(ctx, args),
            "done" => lead_commands::done(ctx, args),
            "status" => lead_commands::set_status(ctx, args),
            "log" => lead_commands::log_activity(ctx, args),
            "delete-lead" => lead_commands::delete(ctx, args),

            // Team
            "users" | "team" => user_commands::list(ctx),
            "add-user" => user_commands::add(ctx),
            "set-role" => user_commands::set_role(ctx, args),
            "set-dept" => user_commands::set_dept(ctx, args),
            "remove-user" => user_commands::remove(ctx, args),
            "enable-user" => user_commands::set_active(ctx, args, true),
            "disable-user" => user_commands::set_active(ctx, args, false),
            "whoami" => user_commands::whoami(ctx),

            // Settings
            "settings" => settings_commands::show(ctx),
            "set-org" => settings_commands::set_org(ctx, args),
            "set-hours" => settings_commands::set_hours(ctx, args),
            "set-sla" => settings_commands::set_sla(ctx, args),
            "auto-assign" => settings_commands::auto_assign(ctx, args),
            "notify" => settings_commands::notify(ctx, args),
            "add-source" => settings_commands::add_source(ctx, args),
            "remove-source" => settings_commands::remove_source(ctx, args),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Split input into command and the rest of the line.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(r#"
COMMANDS:

  Round Robin:
    pools                          Show every pool and who is next
    show-pool <pool>               Show members in rotation order
    next <pool>                    Who gets the next lead
    advance <pool>                 Move the rotation to the next active rep
    reset <pool>                   Restart the rotation from the top
    pause <pool> <user_id>         Skip a rep in rotation
    resume <pool> <user_id>        Put a rep back in rotation
    move <from> <user_id> <to> [n] Move a rep to another pool (position n)
    up <pool> <user_id>            Move a rep one place up
    down <pool> <user_id>          Move a rep one place down

  Leads:
    leads [status|mine]            List leads you can see
    overdue                        Past-due follow-ups and SLA misses
    appts                          Upcoming appointments
    show-lead <lead>               Show lead details and activity
    add-lead                       Quick add a lead assigned to you
    assign <lead> <user>           Hand a lead to someone
    appt <lead> <time> [minutes]   Book or move an appointment (RFC 3339)
    cancel-appt <lead>             Cancel the lead's appointment
    appt-status <appt> <status>    Record showed, no_show, cancelled or scheduled
    appt-shift <appt> [minutes]    Move an appointment (default 60, negative is earlier)
    snooze <lead> <minutes>        Push back the next follow-up
    done <lead>                    Complete the next follow-up
    status <lead> <status>         Set pipeline status
    log <lead> <kind> [text]       Log a call, sms, email or note
    delete-lead <lead>             Delete a lead and its history

  Team:
    users                          List the team and their pools
    add-user                       Add a user (managers, admins)
    set-role <user_id> <role>      Change a role (managers, admins)
    set-dept <user_id> <dept>      Change a department (managers, admins)
    remove-user <user_id>          Delete an account (managers, admins)
    enable-user / disable-user     Toggle an account (managers, admins)
    whoami                         Show the signed-in user

  Settings:
    settings                       Show dealership settings
    set-org <name|phone|timezone> <value>
    set-hours <day> <HH:MM> <HH:MM> | <day> closed
    set-sla <first_touch_min> <overdue_hours>
    auto-assign on|off             Stored only; leads are never auto-routed
    notify <sla|appts> on|off      Toggle alert preferences
    add-source / remove-source <name>
    (changes are limited to managers and admins)

  Other:
    help                           Show this help
    exit / quit / q                Exit

TIPS:
  - Pools can be named by id (pool_sales) or full name
  - Leads and appointments can be named by the first characters of their id"#);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_splits_first_word() {
        assert_eq!(parse_command("move pool_bdc u1 pool_sales"), ("move", "pool_bdc u1 pool_sales"));
        assert_eq!(parse_command("  pools  "), ("pools", ""));
    }

    #[test]
    fn session_defaults_to_first_manager() {
        let conn = schema::test_connection();
        let ctx = load_session(conn, None).unwrap();
        assert_eq!(ctx.user.id.as_str(), "m1");
        assert!(ctx.access().can_edit());
    }

    #[test]
    fn session_for_sales_rep_is_view_only() {
        let conn = schema::test_connection();
        let ctx = load_session(conn, Some("u4")).unwrap();
        assert_eq!(ctx.user.role, Role::Sales);
        assert!(!ctx.access().can_edit());
    }

    #[test]
    fn session_for_unknown_user_fails() {
        let conn = schema::test_connection();
        assert!(load_session(conn, Some("ghost")).is_none());
    }
}

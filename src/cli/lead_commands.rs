use chrono::{DateTime, Utc};

use crate::cli::context::CLIContext;
use crate::db::{appointment_repo, user_repo};
use crate::error::CrmResult;
use crate::model::*;
use crate::ops::lead_ops::{self, QuickAdd};
use crate::queries::*;

const DEFAULT_SHIFT_MIN: i64 = 60;

/// leads [status|mine]
pub fn list(ctx: &CLIContext, args: &str) {
    let result = match args.trim() {
        "" => lead_queries::visible_leads(&ctx.conn, &ctx.user),
        "mine" => lead_queries::leads_for(&ctx.conn, ctx.user_id()),
        other => match LeadStatus::parse(other) {
            Ok(status) => lead_queries::leads_by_status(&ctx.conn, status).map(|leads| {
                leads
                    .into_iter()
                    .filter(|l| can_view(ctx, l))
                    .collect()
            }),
            Err(e) => {
                ctx.print_error(&e);
                return;
            }
        },
    };
    let leads = match result {
        Ok(l) => l,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    if leads.is_empty() {
        println!("No leads to show. Use 'add-lead' to create one.");
        return;
    }
    print_leads(ctx, &leads);
}

pub fn overdue(ctx: &CLIContext) {
    let now = CLIContext::now();
    let sla = ctx.settings().load_settings().pipeline.sla;

    print_section(ctx, "Follow-ups past due", lead_queries::overdue_leads(&ctx.conn, now));
    print_section(
        ctx,
        &format!("New leads untouched after {} min", sla.first_touch_min),
        lead_queries::untouched_leads(&ctx.conn, &sla, now),
    );
    print_section(
        ctx,
        &format!("Open leads idle for {} h", sla.overdue_hours),
        lead_queries::stale_leads(&ctx.conn, &sla, now),
    );
}

fn print_section(ctx: &CLIContext, title: &str, result: CrmResult<Vec<Lead>>) {
    let leads: Vec<Lead> = match result {
        Ok(all) => all.into_iter().filter(|l| can_view(ctx, l)).collect(),
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    println!("{}:", title);
    if leads.is_empty() {
        println!("  Nothing.");
    } else {
        print_leads(ctx, &leads);
    }
    println!();
}

fn print_leads(ctx: &CLIContext, leads: &[Lead]) {
    let users = user_repo::find_all(&ctx.conn).unwrap_or_default();
    let pools = ctx.pools().load_pools();
    let now = CLIContext::now();

    println!("Leads ({}):", leads.len());
    for lead in leads {
        let owner = lead
            .assigned_to
            .as_ref()
            .map(|id| lead_queries::assignee_name(&users, &pools, id).unwrap_or_else(|| id.to_string()))
            .unwrap_or_else(|| "unassigned".into());
        let action = lead
            .next_action
            .as_ref()
            .map(|a| {
                let flag = if lead.is_overdue(now) { " OVERDUE" } else { "" };
                format!(" - {} due {}{}", a.kind.to_db_str(), a.due_at.format("%b %d %H:%M"), flag)
            })
            .unwrap_or_default();
        println!(
            "  {}  {} [{}] owner: {}{}",
            short_id(&lead.id),
            lead.name,
            lead.status.display_name(),
            owner,
            action
        );
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    let lead = match find_arg_lead(ctx, args, "show-lead <lead>") {
        Some(l) => l,
        None => return,
    };

    println!();
    println!("{} ({})", lead.name, lead.id);
    println!("Status: {}", lead.status.display_name());
    println!("Source: {}", lead.source);
    if let Some(phone) = &lead.phone {
        println!("Phone: {}", phone);
    }
    if let Some(email) = &lead.email {
        println!("Email: {}", email);
    }
    println!(
        "Assigned to: {}",
        lead.assigned_to.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "(nobody)".into())
    );
    if let Ok(Some(appt)) = lead_queries::live_appointment(&ctx.conn, &lead.id) {
        println!("Appointment: {} ({} min)", appt.at.format("%Y-%m-%d %H:%M"), appt.duration_min);
    }

    let timeline = lead_queries::timeline(&ctx.conn, &lead.id).unwrap_or_default();
    if !timeline.is_empty() {
        println!("Activity:");
        for act in &timeline {
            println!(
                "  {} {} {}",
                act.at.format("%Y-%m-%d %H:%M"),
                act.kind.to_db_str(),
                act.note.as_deref().unwrap_or("")
            );
        }
    }
    println!();
}

pub fn add(ctx: &CLIContext) {
    println!("Quick add lead (press Enter to skip a field)");
    let name = ctx.prompt("Name: ").unwrap_or_default();
    let phone = ctx.prompt("Phone: ").unwrap_or_default();
    let email = ctx.prompt("Email: ").unwrap_or_default();
    let sources = ctx.settings().load_settings().lead_sources;
    if !sources.is_empty() {
        println!("Sources: {}", sources.join(", "));
    }
    let source = ctx.prompt("Source [Manual]: ").unwrap_or_default();
    let note = ctx.prompt("Note: ").unwrap_or_default();

    let appointment = match ctx.prompt("Appointment time (RFC 3339, Enter to skip): ") {
        Some(s) if !s.is_empty() => match parse_time(&s) {
            Some(at) => {
                let minutes = ctx
                    .prompt("Duration in minutes [30]: ")
                    .and_then(|m| m.parse::<i64>().ok());
                Some((at, minutes))
            }
            None => {
                println!("Could not read '{}' as a time.", s);
                return;
            }
        },
        _ => None,
    };

    let input = QuickAdd {
        name: Some(name.as_str()),
        phone: Some(phone.as_str()),
        email: Some(email.as_str()),
        source: Some(source.as_str()),
        note: Some(note.as_str()),
        appointment,
    };

    match lead_ops::quick_add(&ctx.conn, ctx.user_id(), &input, CLIContext::now()) {
        Ok(lead) => println!("Added {} ({}) assigned to you.", lead.name, short_id(&lead.id)),
        Err(e) => ctx.print_error(&e),
    }
}

/// assign <lead> <user>
pub fn assign(ctx: &CLIContext, args: &str) {
    let mut parts = args.splitn(2, char::is_whitespace);
    let (lead_arg, user_arg) = match (parts.next(), parts.next()) {
        (Some(l), Some(u)) if !l.is_empty() && !u.trim().is_empty() => (l, u.trim()),
        _ => {
            println!("Usage: assign <lead> <user>");
            return;
        }
    };
    let lead = match ctx.find_lead(lead_arg) {
        Some(l) => l,
        None => return,
    };
    let user = match ctx.find_user(user_arg) {
        Some(u) => u,
        None => return,
    };

    match lead_ops::assign_lead(&ctx.conn, &lead.id, &user.id, CLIContext::now()) {
        Ok(Some(l)) => println!("{} is now assigned to {}.", l.name, user.name),
        Ok(None) => println!("Lead no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

/// appt <lead> <time> [minutes]
pub fn schedule(ctx: &CLIContext, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 2 || parts.len() > 3 {
        println!("Usage: appt <lead> <time> [minutes]");
        return;
    }
    let lead = match ctx.find_lead(parts[0]) {
        Some(l) => l,
        None => return,
    };
    let at = match parse_time(parts[1]) {
        Some(t) => t,
        None => {
            println!("Could not read '{}' as a time (use RFC 3339).", parts[1]);
            return;
        }
    };
    let minutes = match parts.get(2).map(|s| s.parse::<i64>()) {
        Some(Ok(n)) => Some(n),
        Some(Err(_)) => {
            println!("Minutes must be a number.");
            return;
        }
        None => None,
    };

    match lead_ops::schedule_appointment(&ctx.conn, &lead.id, at, minutes, ctx.user_id(), CLIContext::now()) {
        Ok((lead, appt)) => println!(
            "{} booked for {} ({} min).",
            lead.name,
            appt.at.format("%Y-%m-%d %H:%M"),
            appt.duration_min
        ),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn cancel_appointment(ctx: &CLIContext, args: &str) {
    let lead = match find_arg_lead(ctx, args, "cancel-appt <lead>") {
        Some(l) => l,
        None => return,
    };
    match lead_ops::cancel_appointment(&ctx.conn, &lead.id, CLIContext::now()) {
        Ok(l) => println!("Appointment cancelled; {} is {}.", l.name, l.status.display_name()),
        Err(e) => ctx.print_error(&e),
    }
}

/// snooze <lead> <minutes>
pub fn snooze(ctx: &CLIContext, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let minutes = match parts.as_slice() {
        [_, m] => m.parse::<i64>().ok(),
        _ => None,
    };
    let minutes = match minutes {
        Some(m) => m,
        None => {
            println!("Usage: snooze <lead> <minutes>");
            return;
        }
    };
    let lead = match ctx.find_lead(parts[0]) {
        Some(l) => l,
        None => return,
    };
    match lead_ops::snooze_lead(&ctx.conn, &lead.id, minutes, CLIContext::now()) {
        Ok(l) => {
            if let Some(a) = &l.next_action {
                println!("{} snoozed until {}.", l.name, a.due_at.format("%b %d %H:%M"));
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn done(ctx: &CLIContext, args: &str) {
    let lead = match find_arg_lead(ctx, args, "done <lead>") {
        Some(l) => l,
        None => return,
    };
    match lead_ops::mark_done(&ctx.conn, &lead.id, CLIContext::now()) {
        Ok(l) => println!("Follow-up completed for {}.", l.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// status <lead> <status>
pub fn set_status(ctx: &CLIContext, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        println!("Usage: status <lead> <new|working|appt_set|showed|sold|lost>");
        return;
    }
    let status = match LeadStatus::parse(parts[1]) {
        Ok(s) => s,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    let lead = match ctx.find_lead(parts[0]) {
        Some(l) => l,
        None => return,
    };
    match lead_ops::set_status(&ctx.conn, &lead.id, status, CLIContext::now()) {
        Ok(l) => println!("{} is now {}.", l.name, l.status.display_name()),
        Err(e) => ctx.print_error(&e),
    }
}

/// log <lead> <call|sms|email|note> [text]
pub fn log_activity(ctx: &CLIContext, args: &str) {
    let mut parts = args.splitn(3, char::is_whitespace);
    let (lead_arg, kind_arg, note) = match (parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(k), note) if !l.is_empty() => (l, k, note),
        _ => {
            println!("Usage: log <lead> <call|sms|email|note> [text]");
            return;
        }
    };
    let kind = match ActivityKind::from_db_str(&kind_arg.to_lowercase()) {
        Some(k @ (ActivityKind::Call | ActivityKind::Sms | ActivityKind::Email | ActivityKind::Note)) => k,
        _ => {
            println!("Activity must be one of: call, sms, email, note.");
            return;
        }
    };
    let lead = match ctx.find_lead(lead_arg) {
        Some(l) => l,
        None => return,
    };
    match lead_ops::add_activity(&ctx.conn, &lead.id, kind, note, CLIContext::now()) {
        Ok(act) => println!("Logged {} on {}.", act.kind.to_db_str(), lead.name),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let lead = match find_arg_lead(ctx, args, "delete-lead <lead>") {
        Some(l) => l,
        None => return,
    };
    let confirm = ctx
        .prompt(&format!("Delete {} and its history? [y/N]: ", lead.name))
        .unwrap_or_default();
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Kept.");
        return;
    }
    match lead_ops::delete_lead(&ctx.conn, &lead.id) {
        Ok(()) => println!("Deleted {}.", lead.name),
        Err(e) => ctx.print_error(&e),
    }
}

/// Upcoming appointments the session can see, soonest first.
pub fn appointments(ctx: &CLIContext) {
    let appts = match appointment_repo::find_all(&ctx.conn) {
        Ok(a) => a,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    let now = CLIContext::now();
    let visible: Vec<&Appointment> = appts
        .iter()
        .filter(|a| a.is_live() && a.ends_at().map_or(true, |end| end >= now))
        .filter(|a| ctx.user.role.can_see_all_leads() || a.assigned_to.as_ref() == Some(ctx.user_id()))
        .collect();
    if visible.is_empty() {
        println!("No upcoming appointments.");
        return;
    }
    println!("Appointments ({}):", visible.len());
    for appt in visible {
        println!(
            "  {}  {}  {} ({} min) - {} [{}]",
            short_id(&appt.id),
            appt.at.format("%b %d %H:%M"),
            appt.lead_name,
            appt.duration_min,
            appt.kind.to_db_str(),
            appt.status.to_db_str()
        );
    }
}

/// appt-status <appt> <status>
pub fn appointment_status(ctx: &CLIContext, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        println!("Usage: appt-status <appt> <scheduled|showed|no_show|cancelled>");
        return;
    }
    let status = match AppointmentStatus::parse(parts[1]) {
        Ok(s) => s,
        Err(e) => {
            ctx.print_error(&e);
            return;
        }
    };
    let appt = match find_own_appointment(ctx, parts[0]) {
        Some(a) => a,
        None => return,
    };

    match lead_ops::set_appointment_status(&ctx.conn, &appt.id, status) {
        Ok(Some(a)) => println!("{} marked {}.", a.lead_name, a.status.to_db_str()),
        Ok(None) => println!("Appointment no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

/// appt-shift <appt> [minutes]
pub fn shift_appointment(ctx: &CLIContext, args: &str) {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let minutes = match parts.as_slice() {
        [_] => Some(DEFAULT_SHIFT_MIN),
        [_, m] => m.parse::<i64>().ok(),
        _ => None,
    };
    let minutes = match minutes {
        Some(m) => m,
        None => {
            println!("Usage: appt-shift <appt> [minutes]");
            return;
        }
    };
    let appt = match find_own_appointment(ctx, parts[0]) {
        Some(a) => a,
        None => return,
    };

    match lead_ops::shift_appointment(&ctx.conn, &appt.id, minutes, CLIContext::now()) {
        Ok(Some(a)) => println!("{} moved to {}.", a.lead_name, a.at.format("%Y-%m-%d %H:%M")),
        Ok(None) => println!("Appointment no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

fn find_own_appointment(ctx: &CLIContext, query: &str) -> Option<Appointment> {
    let appt = ctx.find_appointment(query)?;
    if ctx.user.role.can_see_all_leads() || appt.assigned_to.as_ref() == Some(ctx.user_id()) {
        Some(appt)
    } else {
        println!("That appointment belongs to someone else.");
        None
    }
}

fn can_view(ctx: &CLIContext, lead: &Lead) -> bool {
    ctx.user.role.can_see_all_leads() || lead.assigned_to.as_ref() == Some(ctx.user_id())
}

fn find_arg_lead(ctx: &CLIContext, args: &str, usage: &str) -> Option<Lead> {
    if args.is_empty() {
        println!("Usage: {}", usage);
        return None;
    }
    ctx.find_lead(args)
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn short_id<T>(id: &Id<T>) -> &str {
    let s = id.as_str();
    s.get(..8).unwrap_or(s)
}

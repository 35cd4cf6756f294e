use chrono::Weekday;

use crate::cli::context::CLIContext;
use crate::error::CrmResult;
use crate::model::*;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn show(ctx: &CLIContext) {
    let s = ctx.settings().load_settings();
    println!();
    println!("=== {} ===", s.org_name);
    if !s.phone.is_empty() {
        println!("Phone: {}", s.phone);
    }
    println!("Timezone: {}", s.timezone);

    println!();
    println!("Hours:");
    for day in WEEK {
        let h = s.hours.day(day);
        if h.open {
            println!("  {}  {}-{}", day, h.start, h.end);
        } else {
            println!("  {}  closed", day);
        }
    }

    println!();
    println!("Auto-assign: {}", on_off(s.round_robin.auto_assign));
    println!(
        "SLA: first touch within {} min, overdue after {} h",
        s.pipeline.sla.first_touch_min, s.pipeline.sla.overdue_hours
    );
    println!(
        "Alerts: SLA breach {}, appointment reminders {}",
        on_off(s.notifications.sla_breach),
        on_off(s.notifications.appt_reminders)
    );
    println!("Lead sources: {}", s.lead_sources.join(", "));
    println!();
}

/// set-org <name|phone|timezone> <value>
pub fn set_org(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    let (field, value) = match args.split_once(char::is_whitespace) {
        Some((f, v)) => (f, v.trim()),
        None => (args, ""),
    };
    let store = ctx.settings();
    let result = match field {
        "name" => store.set_org_name(value),
        "phone" => store.set_phone(value),
        "timezone" | "tz" => store.set_timezone(value),
        _ => {
            println!("Usage: set-org <name|phone|timezone> <value>");
            return;
        }
    };
    report(ctx, result, |s| format!("Saved. {} ({}).", s.org_name, s.timezone));
}

/// set-hours <day> <start> <end> | set-hours <day> closed
pub fn set_hours(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    let day = match parts.first().map(|d| d.parse::<Weekday>()) {
        Some(Ok(d)) => d,
        _ => {
            println!("Usage: set-hours <mon..sun> <HH:MM> <HH:MM> | set-hours <day> closed");
            return;
        }
    };
    let hours = match parts.as_slice() {
        [_, "closed"] => None,
        [_, start, end] => Some((*start, *end)),
        _ => {
            println!("Usage: set-hours <mon..sun> <HH:MM> <HH:MM> | set-hours <day> closed");
            return;
        }
    };
    report(ctx, ctx.settings().set_hours(day, hours), |s| {
        let h = s.hours.day(day);
        if h.open {
            format!("{} now {}-{}.", day, h.start, h.end)
        } else {
            format!("{} now closed.", day)
        }
    });
}

/// set-sla <first_touch_min> <overdue_hours>
pub fn set_sla(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    let parsed = match parts.as_slice() {
        [f, o] => f.parse::<i64>().ok().zip(o.parse::<i64>().ok()),
        _ => None,
    };
    let (first_touch, overdue) = match parsed {
        Some(pair) => pair,
        None => {
            println!("Usage: set-sla <first_touch_min> <overdue_hours>");
            return;
        }
    };
    report(ctx, ctx.settings().set_sla(first_touch, overdue), |s| {
        format!(
            "SLA: first touch within {} min, overdue after {} h.",
            s.pipeline.sla.first_touch_min, s.pipeline.sla.overdue_hours
        )
    });
}

/// auto-assign on|off
pub fn auto_assign(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    let on = match parse_switch(args) {
        Some(on) => on,
        None => {
            println!("Usage: auto-assign on|off");
            return;
        }
    };
    report(ctx, ctx.settings().set_auto_assign(on), |s| {
        format!("Auto-assign {}.", on_off(s.round_robin.auto_assign))
    });
}

/// notify <sla|appts> on|off
pub fn notify(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    let store = ctx.settings();
    let result = match parts.as_slice() {
        ["sla", switch] => parse_switch(switch).map(|on| store.set_sla_breach_alerts(on)),
        ["appts", switch] => parse_switch(switch).map(|on| store.set_appointment_reminders(on)),
        _ => None,
    };
    let result = match result {
        Some(r) => r,
        None => {
            println!("Usage: notify <sla|appts> on|off");
            return;
        }
    };
    report(ctx, result, |s| {
        format!(
            "Alerts: SLA breach {}, appointment reminders {}.",
            on_off(s.notifications.sla_breach),
            on_off(s.notifications.appt_reminders)
        )
    });
}

/// add-source <name>
pub fn add_source(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    report(ctx, ctx.settings().add_lead_source(args), |s| {
        format!("Lead sources: {}", s.lead_sources.join(", "))
    });
}

/// remove-source <name>
pub fn remove_source(ctx: &CLIContext, args: &str) {
    if !can_change(ctx) {
        return;
    }
    if args.trim().is_empty() {
        println!("Usage: remove-source <name>");
        return;
    }
    report(ctx, ctx.settings().remove_lead_source(args), |s| {
        format!("Lead sources: {}", s.lead_sources.join(", "))
    });
}

fn report<F>(ctx: &CLIContext, result: CrmResult<Settings>, describe: F)
where
    F: FnOnce(&Settings) -> String,
{
    match result {
        Ok(s) => println!("{}", describe(&s)),
        Err(e) => ctx.print_error(&e),
    }
}

fn can_change(ctx: &CLIContext) -> bool {
    if matches!(ctx.user.role, Role::Manager | Role::Admin) {
        true
    } else {
        println!("Only managers and admins can change settings.");
        false
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "on" | "yes" | "true" => Some(true),
        "off" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_switch_accepts_common_words() {
        assert_eq!(parse_switch("ON"), Some(true));
        assert_eq!(parse_switch(" no "), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }
}

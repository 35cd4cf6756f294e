use crate::cli::context::CLIContext;
use crate::model::*;
use crate::ops::board_ops::{self, Direction};
use crate::queries::pool_queries;
use crate::rotation;

pub fn list(ctx: &CLIContext) {
    let pools = ctx.pools().load_pools();
    let totals = pool_queries::board_totals(&pools);
    println!("Round robin ({}/{} active reps in rotation):", totals.active, totals.all);
    for pool in &pools {
        let next = rotation::next_member(pool)
            .map(|m| m.name.as_str())
            .unwrap_or("(nobody active)");
        println!(
            "  {} [{}] - {} reps, next up: {}",
            pool.name,
            pool.id,
            pool.users.len(),
            next
        );
    }
    if !ctx.access().can_edit() {
        println!("Managers and BDC can modify the order and membership.");
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    if args.is_empty() {
        println!("Usage: show-pool <pool>");
        return;
    }
    let pool = match ctx.find_pool(args) {
        Some(p) => p,
        None => return,
    };

    let next_id = rotation::next_member(&pool).map(|m| m.id.clone());
    println!();
    println!("{} [{}]", pool.name, pool.id);
    if pool.users.is_empty() {
        println!("  No reps in this pool");
    }
    for (i, member) in pool.users.iter().enumerate() {
        let marker = if Some(&member.id) == next_id.as_ref() { "->" } else { "  " };
        let state = if member.active { "active" } else { "paused" };
        println!("  {} {}. {} ({}) [{}]", marker, i + 1, member.name, member.id, state);
    }

    let order: Vec<String> = pool_queries::rotation_preview(&pool)
        .into_iter()
        .map(|m| m.name)
        .collect();
    if !order.is_empty() {
        println!("  Serving order: {}", order.join(" > "));
    }
    println!();
}

pub fn next(ctx: &CLIContext, args: &str) {
    let pool = match find_arg_pool(ctx, args, "next <pool>") {
        Some(p) => p,
        None => return,
    };
    match ctx.pools().get_next_user(&pool.id) {
        Some(member) => println!("Next up in {}: {} ({})", pool.name, member.name, member.id),
        None => println!("Nobody is active in {}.", pool.name),
    }
}

pub fn advance(ctx: &CLIContext, args: &str) {
    if !ctx.require_edit() {
        return;
    }
    let pool = match find_arg_pool(ctx, args, "advance <pool>") {
        Some(p) => p,
        None => return,
    };
    let store = ctx.pools();
    match store.advance_next_index(&pool.id) {
        Ok(Some(_)) => match store.get_next_user(&pool.id) {
            Some(m) => println!("Rotation advanced. Next up: {}", m.name),
            None => println!("Rotation advanced. Nobody is active."),
        },
        Ok(None) => println!("Pool no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn reset(ctx: &CLIContext, args: &str) {
    if !ctx.require_edit() {
        return;
    }
    let pool = match find_arg_pool(ctx, args, "reset <pool>") {
        Some(p) => p,
        None => return,
    };
    match ctx.pools().reset_next_index(&pool.id) {
        Ok(Some(p)) => println!("Rotation for {} starts from the top.", p.name),
        Ok(None) => println!("Pool no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn set_active(ctx: &CLIContext, args: &str, active: bool) {
    if !ctx.require_edit() {
        return;
    }
    let verb = if active { "resume" } else { "pause" };
    let (pool_arg, user_arg) = match split_two(args) {
        Some(parts) => parts,
        None => {
            println!("Usage: {} <pool> <user_id>", verb);
            return;
        }
    };
    let pool = match ctx.find_pool(pool_arg) {
        Some(p) => p,
        None => return,
    };
    let user_id: Id<User> = Id::new(user_arg);
    if pool.find_member(&user_id).is_none() {
        println!("{} has no member '{}'.", pool.name, user_arg);
        return;
    }

    match ctx.pools().set_user_active(&pool.id, &user_id, active) {
        Ok(Some(_)) => println!(
            "{} is now {} in {}.",
            user_arg,
            if active { "active" } else { "paused" },
            pool.name
        ),
        Ok(None) => println!("Pool no longer exists."),
        Err(e) => ctx.print_error(&e),
    }
}

/// move <from> <user_id> <to> [index]
pub fn move_member(ctx: &CLIContext, args: &str) {
    if !ctx.require_edit() {
        return;
    }
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 3 || parts.len() > 4 {
        println!("Usage: move <from_pool> <user_id> <to_pool> [position]");
        return;
    }
    let from = match ctx.find_pool(parts[0]) {
        Some(p) => p,
        None => return,
    };
    let to = match ctx.find_pool(parts[2]) {
        Some(p) => p,
        None => return,
    };
    let to_index = match parts.get(3) {
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n > 0 => Some(n - 1),
            _ => {
                println!("Position must be a number starting at 1.");
                return;
            }
        },
        None => None,
    };

    let store = ctx.pools();
    let pools = store.load_pools();
    let next = board_ops::move_member(
        &pools,
        ctx.access(),
        &from.id,
        &Id::new(parts[1]),
        &to.id,
        to_index,
    );
    commit(ctx, &pools, &next, &format!("Moved {} to {}.", parts[1], to.name));
}

pub fn bump(ctx: &CLIContext, args: &str, direction: Direction) {
    if !ctx.require_edit() {
        return;
    }
    let (pool_arg, user_arg) = match split_two(args) {
        Some(parts) => parts,
        None => {
            let verb = if direction == Direction::Up { "up" } else { "down" };
            println!("Usage: {} <pool> <user_id>", verb);
            return;
        }
    };
    let pool = match ctx.find_pool(pool_arg) {
        Some(p) => p,
        None => return,
    };

    let store = ctx.pools();
    let pools = store.load_pools();
    let next = board_ops::swap_adjacent(&pools, ctx.access(), &pool.id, &Id::new(user_arg), direction);
    commit(ctx, &pools, &next, &format!("Reordered {}.", pool.name));
}

/// Persists a board edit when it changed anything.
fn commit(ctx: &CLIContext, before: &[Pool], after: &[Pool], message: &str) {
    if before == after {
        println!("Nothing changed.");
        return;
    }
    match ctx.pools().save_pools(after) {
        Ok(()) => println!("{}", message),
        Err(e) => ctx.print_error(&e),
    }
}

fn find_arg_pool(ctx: &CLIContext, args: &str, usage: &str) -> Option<Pool> {
    if args.is_empty() {
        println!("Usage: {}", usage);
        return None;
    }
    ctx.find_pool(args)
}

fn split_two(args: &str) -> Option<(&str, &str)> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

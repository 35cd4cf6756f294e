//! Structural edits to the rotation board. These are pure transforms over
//! the pool collection: the caller persists the result with
//! `PoolStore::save_pools` when it differs from the input.

use tracing::{debug, info};

use crate::model::{Access, Id, Pool, User};
use crate::rotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Index after moving one step from `idx`, None when that leaves `[0, len)`.
    fn step(&self, idx: usize, len: usize) -> Option<usize> {
        match self {
            Direction::Up => idx.checked_sub(1),
            Direction::Down => Some(idx + 1).filter(|t| *t < len),
        }
    }
}

/// Moves a member out of one pool and into another (or the same) pool.
///
/// The member is inserted at `to_index` in the destination list as it
/// stands after removal, or appended when no index is given or it is past
/// the end. Unknown pools or members, and view-only access, return the
/// input unchanged.
pub fn move_member(
    pools: &[Pool],
    access: Access,
    from_pool_id: &Id<Pool>,
    user_id: &Id<User>,
    to_pool_id: &Id<Pool>,
    to_index: Option<usize>,
) -> Vec<Pool> {
    if !access.can_edit() {
        debug!(user = %user_id, "Move refused: view-only access");
        return pools.to_vec();
    }

    let from_pos = pools.iter().position(|p| &p.id == from_pool_id);
    let to_pos = pools.iter().position(|p| &p.id == to_pool_id);
    let (from_pos, to_pos) = match (from_pos, to_pos) {
        (Some(f), Some(t)) => (f, t),
        _ => {
            debug!(from = %from_pool_id, to = %to_pool_id, "Move ignored: unknown pool");
            return pools.to_vec();
        }
    };

    let user_pos = match pools[from_pos].position_of(user_id) {
        Some(i) => i,
        None => {
            debug!(pool = %from_pool_id, user = %user_id, "Move ignored: member not in pool");
            return pools.to_vec();
        }
    };

    let mut next = pools.to_vec();
    let member = next[from_pos].users.remove(user_pos);

    let dest = &mut next[to_pos].users;
    match to_index {
        Some(i) if i <= dest.len() => dest.insert(i, member),
        _ => dest.push(member),
    }

    rotation::normalize(&mut next[from_pos]);
    rotation::normalize(&mut next[to_pos]);

    info!(
        from = %from_pool_id,
        to = %to_pool_id,
        user = %user_id,
        "Member moved"
    );
    next
}

/// Swaps a member with its neighbour above or below. Moving the first
/// member up or the last member down changes nothing.
pub fn swap_adjacent(
    pools: &[Pool],
    access: Access,
    pool_id: &Id<Pool>,
    user_id: &Id<User>,
    direction: Direction,
) -> Vec<Pool> {
    if !access.can_edit() {
        debug!(user = %user_id, "Reorder refused: view-only access");
        return pools.to_vec();
    }

    let pool_pos = match pools.iter().position(|p| &p.id == pool_id) {
        Some(p) => p,
        None => return pools.to_vec(),
    };
    let pool = &pools[pool_pos];
    let idx = match pool.position_of(user_id) {
        Some(i) => i,
        None => return pools.to_vec(),
    };
    let target = match direction.step(idx, pool.users.len()) {
        Some(t) => t,
        None => return pools.to_vec(),
    };

    let mut next = pools.to_vec();
    next[pool_pos].users.swap(idx, target);
    info!(pool = %pool_id, user = %user_id, ?direction, "Member reordered");
    next
}

//! Round-robin rotation over a single pool.
//!
//! The pointer indexes into the *active* members at lookup time, so pausing
//! or resuming someone can change who a given index refers to without the
//! pointer itself moving.

use crate::model::{Member, Pool};

/// Active members in rotation order.
pub fn active_members(pool: &Pool) -> Vec<&Member> {
    pool.users.iter().filter(|u| u.active).collect()
}

/// The member whose turn it is, or None when nobody is active.
pub fn next_member(pool: &Pool) -> Option<&Member> {
    let actives = active_members(pool);
    if actives.is_empty() {
        return None;
    }
    Some(actives[pool.next_index % actives.len()])
}

/// Pointer value after one advance. With no active members the pointer
/// cycles modulo 1 and stays at 0.
pub fn advanced_index(pool: &Pool) -> usize {
    let count = pool.active_count().max(1);
    (pool.next_index + 1) % count
}

/// Reduces the pointer into `[0, max(1, active))`. Lookups already take the
/// pointer modulo the active count, so this never changes `next_member`.
pub fn normalize(pool: &mut Pool) {
    pool.next_index %= pool.active_count().max(1);
}

/// Active members in the order they will be served, starting from the pointer.
pub fn upcoming(pool: &Pool) -> Vec<&Member> {
    let actives = active_members(pool);
    if actives.is_empty() {
        return actives;
    }
    let start = pool.next_index % actives.len();
    actives[start..]
        .iter()
        .chain(actives[..start].iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pool {
        Pool::new("p1", "Floor").with_members(vec![
            Member::new("a", "Ann"),
            Member::new("b", "Ben"),
            Member::new("c", "Cal").inactive(),
        ])
    }

    #[test]
    fn next_member_skips_inactive() {
        let mut pool = sample();
        assert_eq!(next_member(&pool).unwrap().id.as_str(), "a");
        pool.next_index = 1;
        assert_eq!(next_member(&pool).unwrap().id.as_str(), "b");
        pool.next_index = 2;
        assert_eq!(next_member(&pool).unwrap().id.as_str(), "a");
    }

    #[test]
    fn advance_wraps_over_active_count() {
        let mut pool = sample();
        pool.next_index = advanced_index(&pool);
        assert_eq!(pool.next_index, 1);
        pool.next_index = advanced_index(&pool);
        assert_eq!(pool.next_index, 0);
    }

    #[test]
    fn advance_with_no_active_members_stays_at_zero() {
        let mut pool = Pool::new("p", "Empty").with_members(vec![Member::new("a", "Ann").inactive()]);
        assert!(next_member(&pool).is_none());
        pool.next_index = advanced_index(&pool);
        assert_eq!(pool.next_index, 0);
    }

    #[test]
    fn deactivating_shifts_referent_not_pointer() {
        let mut pool = sample();
        pool.users[0].active = false;
        assert_eq!(pool.next_index, 0);
        assert_eq!(next_member(&pool).unwrap().id.as_str(), "b");
    }

    #[test]
    fn normalize_preserves_next_member() {
        let mut pool = sample();
        pool.next_index = 7;
        let before = next_member(&pool).cloned();
        normalize(&mut pool);
        assert_eq!(pool.next_index, 1);
        assert_eq!(next_member(&pool).cloned(), before);
    }

    #[test]
    fn upcoming_starts_at_pointer() {
        let mut pool = sample();
        pool.next_index = 1;
        let order: Vec<&str> = upcoming(&pool).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}

use crate::model::{Id, Member, Pool, User};
use crate::rotation;

/// Active and total seat counts across the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardTotals {
    pub active: usize,
    pub all: usize,
}

pub fn board_totals(pools: &[Pool]) -> BoardTotals {
    BoardTotals {
        active: pools.iter().map(Pool::active_count).sum(),
        all: pools.iter().map(|p| p.users.len()).sum(),
    }
}

/// Active members in serving order, starting with whoever is next.
pub fn rotation_preview(pool: &Pool) -> Vec<Member> {
    rotation::upcoming(pool).into_iter().cloned().collect()
}

/// Pools in which the user holds a seat.
pub fn pools_for_user<'a>(pools: &'a [Pool], user_id: &Id<User>) -> Vec<&'a Pool> {
    pools
        .iter()
        .filter(|p| p.find_member(user_id).is_some())
        .collect()
}

/// Finds a pool by exact id, then by case-insensitive name.
pub fn find_pool<'a>(pools: &'a [Pool], query: &str) -> Option<&'a Pool> {
    let query = query.trim();
    pools
        .iter()
        .find(|p| p.id.as_str() == query)
        .or_else(|| pools.iter().find(|p| p.name.eq_ignore_ascii_case(query)))
}

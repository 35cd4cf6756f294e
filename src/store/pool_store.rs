use tracing::{debug, info, warn};

use super::documents::DocumentStore;
use crate::error::CrmResult;
use crate::model::{Id, Member, Pool, User};
use crate::rotation;

/// Document key holding the whole pool collection.
pub const POOLS_KEY: &str = "dealerpilot.pools.v1";

/// Durable home of the rotation pools. Every mutation reads the full
/// collection, changes one pool, and writes the full collection back
/// (last writer wins).
pub struct PoolStore<D> {
    docs: D,
}

impl<D: DocumentStore> PoolStore<D> {
    pub fn new(docs: D) -> Self {
        Self { docs }
    }

    /// Persisted pools, or the demo seed when nothing usable is stored.
    pub fn load_pools(&self) -> Vec<Pool> {
        let raw = match self.docs.load(POOLS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Pool::defaults(),
            Err(e) => {
                warn!(error = %e, "Pool document unreadable, using seed pools");
                return Pool::defaults();
            }
        };

        match serde_json::from_str::<Vec<Pool>>(&raw) {
            Ok(mut pools) => {
                pools.iter_mut().for_each(rotation::normalize);
                pools
            }
            Err(e) => {
                warn!(error = %e, "Malformed pool document, using seed pools");
                Pool::defaults()
            }
        }
    }

    /// Replaces the persisted collection wholesale.
    pub fn save_pools(&self, pools: &[Pool]) -> CrmResult<()> {
        let json = serde_json::to_string(pools)?;
        self.docs.save(POOLS_KEY, &json)?;
        debug!(pools = pools.len(), "Saved pools");
        Ok(())
    }

    pub fn get_pool(&self, pool_id: &Id<Pool>) -> Option<Pool> {
        self.load_pools().into_iter().find(|p| &p.id == pool_id)
    }

    pub fn reset_next_index(&self, pool_id: &Id<Pool>) -> CrmResult<Option<Pool>> {
        let updated = self.update_pool(pool_id, |pool| pool.next_index = 0)?;
        if updated.is_some() {
            info!(pool = %pool_id, "Rotation pointer reset");
        }
        Ok(updated)
    }

    /// Sets one member's active flag. An unknown member leaves the pool as
    /// it was but still counts as found.
    pub fn set_user_active(
        &self,
        pool_id: &Id<Pool>,
        user_id: &Id<User>,
        active: bool,
    ) -> CrmResult<Option<Pool>> {
        let updated = self.update_pool(pool_id, |pool| {
            if let Some(member) = pool.users.iter_mut().find(|u| &u.id == user_id) {
                member.active = active;
            }
            rotation::normalize(pool);
        })?;
        if updated.is_some() {
            info!(pool = %pool_id, user = %user_id, active, "Member activity changed");
        }
        Ok(updated)
    }

    /// Stored pointer, 0 when the pool is unknown.
    pub fn get_next_index(&self, pool_id: &Id<Pool>) -> usize {
        self.get_pool(pool_id).map(|p| p.next_index).unwrap_or(0)
    }

    pub fn get_next_user(&self, pool_id: &Id<Pool>) -> Option<Member> {
        let pool = self.get_pool(pool_id)?;
        rotation::next_member(&pool).cloned()
    }

    /// Moves the pointer one step along the active members. Leads are not
    /// touched.
    pub fn advance_next_index(&self, pool_id: &Id<Pool>) -> CrmResult<Option<Pool>> {
        let updated = self.update_pool(pool_id, |pool| {
            pool.next_index = rotation::advanced_index(pool);
        })?;
        if let Some(pool) = &updated {
            info!(pool = %pool_id, next_index = pool.next_index, "Rotation advanced");
        }
        Ok(updated)
    }

    fn update_pool<F>(&self, pool_id: &Id<Pool>, f: F) -> CrmResult<Option<Pool>>
    where
        F: FnOnce(&mut Pool),
    {
        let mut pools = self.load_pools();
        let pool = match pools.iter_mut().find(|p| &p.id == pool_id) {
            Some(p) => p,
            None => {
                debug!(pool = %pool_id, "Pool not found");
                return Ok(None);
            }
        };

        f(pool);
        let updated = pool.clone();
        self.save_pools(&pools)?;
        Ok(Some(updated))
    }
}

use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::user::User;

fn default_active() -> bool {
    true
}

/// A person's seat in a rotation pool. The id refers to a user; the same
/// person may sit in several pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Id<User>,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Member {
    pub fn new(id: impl Into<Id<User>>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A named lead-routing rotation. `users` is in rotation order and
/// `next_index` points into the active members of that list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: Id<Pool>,
    pub name: String,
    #[serde(default)]
    pub next_index: usize,
    #[serde(default)]
    pub users: Vec<Member>,
}

impl Pool {
    pub fn new(id: impl Into<Id<Pool>>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            next_index: 0,
            users: Vec::new(),
        }
    }

    pub fn with_members(mut self, users: Vec<Member>) -> Self {
        self.users = users;
        self
    }

    pub fn active_count(&self) -> usize {
        self.users.iter().filter(|u| u.active).count()
    }

    pub fn find_member(&self, user_id: &Id<User>) -> Option<&Member> {
        self.users.iter().find(|u| &u.id == user_id)
    }

    pub fn position_of(&self, user_id: &Id<User>) -> Option<usize> {
        self.users.iter().position(|u| &u.id == user_id)
    }

    /// Seed pools used when nothing has been persisted yet.
    pub fn defaults() -> Vec<Pool> {
        vec![
            Pool::new("pool_bdc", "Internet BDC").with_members(vec![
                Member::new("u1", "Tony W."),
                Member::new("u2", "David G."),
                Member::new("u3", "Jimmy W.."),
            ]),
            Pool::new("pool_sales", "Floor Sales").with_members(vec![
                Member::new("u4", "Jimmy W."),
                Member::new("u5", "David G."),
                Member::new("u6", "Tony W."),
            ]),
            Pool::new("pool_service_bdc", "Service BDC").with_members(vec![
                Member::new("u7", "Hank J."),
                Member::new("u8", "Gina P."),
            ]),
        ]
    }
}

use serde::{Deserialize, Serialize};

/// Numeric identity of a forum user.
pub type UserId = i64;

/// The party issuing a vote request.
///
/// Anonymous actors can read vote state but never mutate it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// A request without an authenticated user.
    Anonymous,
    /// An authenticated user.
    User(UserId),
}

impl Actor {
    /// Returns the user id for authenticated actors.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::User(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }
}

impl From<Option<UserId>> for Actor {
    fn from(user_id: Option<UserId>) -> Self {
        user_id.map_or(Actor::Anonymous, Actor::User)
    }
}

impl From<UserId> for Actor {
    fn from(user_id: UserId) -> Self {
        Actor::User(user_id)
    }
}

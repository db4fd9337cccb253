use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{TargetRef, UserId};

/// Represents the polarity of a vote cast by a user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Up => "up",
            VoteValue::Down => "down",
        }
    }

    /// The other polarity.
    pub fn opposite(&self) -> VoteValue {
        match self {
            VoteValue::Up => VoteValue::Down,
            VoteValue::Down => VoteValue::Up,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a polarity string is neither `up` nor `down`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid vote type: {0}")]
pub struct ParseVoteValueError(pub String);

impl FromStr for VoteValue {
    type Err = ParseVoteValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteValue::Up),
            "down" => Ok(VoteValue::Down),
            other => Err(ParseVoteValueError(other.to_string())),
        }
    }
}

/// Represents a user's vote on a target.
///
/// At most one `Vote` exists per (user, target) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub user_id: UserId,
    pub target: TargetRef,
    pub vote_type: VoteValue,
    /// Unix timestamp (seconds) of the vote's creation.
    pub voted_at: u64,
}

impl Vote {
    pub fn is_up(&self) -> bool {
        self.vote_type == VoteValue::Up
    }

    pub fn is_down(&self) -> bool {
        self.vote_type == VoteValue::Down
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {} {}voted {}", self.user_id, self.vote_type, self.target)
    }
}

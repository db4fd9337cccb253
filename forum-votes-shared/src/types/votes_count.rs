use serde::{Deserialize, Serialize};
use crate::types::{TargetRef, Vote};

/// Represents the aggregated vote counts for a target.
///
/// This struct is intended to store the total number of upvotes and
/// downvotes for a particular target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesCount {
    pub target: TargetRef,
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VotesCount {
    /// Tallies a set of votes recorded for `target`.
    pub fn from_votes(target: TargetRef, votes: &[Vote]) -> Self {
        let upvotes = votes.iter().filter(|v| v.is_up()).count() as i64;
        let downvotes = votes.iter().filter(|v| v.is_down()).count() as i64;
        Self { target, upvotes, downvotes }
    }

    /// Net score: upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn total(&self) -> i64 {
        self.upvotes + self.downvotes
    }
}

//! Ledger-level services that operate on any target.
//!
//! `VoteManager` reports per-target statistics; `StatisticsService` derives
//! popularity and profile reputation breakdowns from the ledger.
mod statistics;

use std::sync::Arc;

use forum_votes_repository::VoteLedger;
use forum_votes_shared::types::TargetRef;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

pub use statistics::{ReputationBreakdown, StatisticsService};

/// Vote statistics for a single target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteStats {
    /// Number of vote records listed for the target.
    pub total: i64,
    /// Aggregate vote count reported by the ledger.
    pub count: i64,
    /// Upvotes minus downvotes.
    pub score: i64,
}

pub struct VoteManager {
    ledger: Arc<dyn VoteLedger>,
}

impl VoteManager {
    pub fn new(ledger: Arc<dyn VoteLedger>) -> Self {
        Self { ledger }
    }

    pub async fn stats(&self, target: &TargetRef) -> Result<VoteStats, EngineError> {
        let total = self.ledger.votes_for(target).await?.len() as i64;
        let counts = self.ledger.votes_count(target).await?;
        Ok(VoteStats {
            total,
            count: counts.total(),
            score: counts.score(),
        })
    }
}

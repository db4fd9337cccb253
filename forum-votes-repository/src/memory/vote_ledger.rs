use async_trait::async_trait;
use forum_votes_shared::types::{TargetRef, TransitionKind, UserId, Vote, VoteValue};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::VoteLedgerError;
use crate::interfaces::VoteLedger;
use crate::memory::now_unix;

/// Process-local vote ledger.
///
/// Votes are kept in insertion order; a polarity change updates the record in
/// place. The write lock is held for the whole read-modify-write of a toggle,
/// which is what enforces one vote per (user, target) here.
#[derive(Default)]
pub struct InMemoryVoteLedger {
    votes: RwLock<Vec<Vote>>,
}

impl InMemoryVoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every recorded vote.
    pub async fn reset(&self) {
        self.votes.write().await.clear();
    }

    /// Total number of votes across all targets.
    pub async fn len(&self) -> usize {
        self.votes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.votes.read().await.is_empty()
    }
}

fn is_vote_of(vote: &Vote, target: &TargetRef, user_id: UserId) -> bool {
    vote.user_id == user_id && &vote.target == target
}

#[async_trait]
impl VoteLedger for InMemoryVoteLedger {
    async fn votes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
        let votes = self.votes.read().await;
        Ok(votes.iter().filter(|v| &v.target == target).cloned().collect())
    }

    async fn user_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<Option<VoteValue>, VoteLedgerError> {
        let votes = self.votes.read().await;
        Ok(votes
            .iter()
            .find(|v| is_vote_of(v, target, user_id))
            .map(|v| v.vote_type))
    }

    async fn record_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError> {
        let mut votes = self.votes.write().await;
        let kind = match votes.iter().position(|v| is_vote_of(v, target, user_id)) {
            Some(idx) if votes[idx].vote_type == vote_type => {
                votes.remove(idx);
                TransitionKind::Removed
            }
            Some(idx) => {
                votes[idx].vote_type = vote_type;
                TransitionKind::Updated
            }
            None => {
                votes.push(Vote {
                    user_id,
                    target: target.clone(),
                    vote_type,
                    voted_at: now_unix(),
                });
                TransitionKind::Added
            }
        };
        debug!(
            vote_target = %target,
            user_id,
            vote_type = %vote_type,
            kind = %kind,
            "recorded vote in memory"
        );
        Ok(kind)
    }

    async fn delete_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<(), VoteLedgerError> {
        self.votes.write().await.retain(|v| !is_vote_of(v, target, user_id));
        Ok(())
    }
}

//! This module defines the `VoteLedger` trait, the capability interface every
//! vote storage backend implements. It owns the (user, target) vote records,
//! enforces one vote per user per target and computes aggregate counts.
use forum_votes_shared::types::{
    Actor, Target, TargetRef, TransitionKind, UserId, Vote, VoteValue, VotesCount,
};
use crate::errors::VoteLedgerError;

/// A trait that defines the interface for interacting with a vote ledger.
///
/// Implementors provide the raw record operations (`votes_for`, `user_vote`,
/// `record_vote`); aggregates and the guarded `cast_vote` are derived from
/// them. Backends are expected to be observably identical for identical
/// operation sequences.
#[async_trait::async_trait]
pub trait VoteLedger: Send + Sync {
    /// Returns every vote currently recorded for `target`.
    async fn votes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError>;

    /// Returns the vote `user_id` holds on `target`, if any.
    async fn user_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<Option<VoteValue>, VoteLedgerError>;

    /// Toggles the vote of `user_id` on `target`.
    ///
    /// This is the unguarded transition: no vote inserts one (`Added`), the
    /// same polarity deletes it (`Removed`), the other polarity flips it
    /// (`Updated`). Callers normally go through `cast_vote`.
    async fn record_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError>;

    async fn upvotes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
        let votes = self.votes_for(target).await?;
        Ok(votes.into_iter().filter(|v| v.is_up()).collect())
    }

    async fn downvotes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
        let votes = self.votes_for(target).await?;
        Ok(votes.into_iter().filter(|v| v.is_down()).collect())
    }

    /// Returns the upvote and downvote tallies for `target`.
    async fn votes_count(&self, target: &TargetRef) -> Result<VotesCount, VoteLedgerError> {
        let votes = self.votes_for(target).await?;
        Ok(VotesCount::from_votes(target.clone(), &votes))
    }

    /// Number of votes recorded for `target`, regardless of polarity.
    async fn vote_count(&self, target: &TargetRef) -> Result<i64, VoteLedgerError> {
        Ok(self.votes_count(target).await?.total())
    }

    /// Upvotes minus downvotes.
    async fn score_for(&self, target: &TargetRef) -> Result<i64, VoteLedgerError> {
        Ok(self.votes_count(target).await?.score())
    }

    /// Returns the actor's current vote. Anonymous actors never hold one.
    async fn vote_of(
        &self,
        target: &TargetRef,
        actor: &Actor,
    ) -> Result<Option<VoteValue>, VoteLedgerError> {
        match actor.user_id() {
            Some(user_id) => self.user_vote(target, user_id).await,
            None => Ok(None),
        }
    }

    /// Casts or toggles a vote, the sole mutator exposed to callers.
    ///
    /// Anonymous actors get `Unauthorized` and authors voting on their own
    /// target get `SelfVote`; neither touches the record set.
    async fn cast_vote(
        &self,
        target: &Target,
        actor: &Actor,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError> {
        let Some(user_id) = actor.user_id() else {
            return Ok(TransitionKind::Unauthorized);
        };
        if target.is_authored_by(user_id) {
            return Ok(TransitionKind::SelfVote);
        }
        self.record_vote(&target.reference, user_id, vote_type).await
    }

    /// Administratively removes the vote of `user_id` on `target`.
    ///
    /// Backends that cannot delete directly keep this default and report
    /// `Unsupported`.
    async fn delete_vote(
        &self,
        _target: &TargetRef,
        _user_id: UserId,
    ) -> Result<(), VoteLedgerError> {
        Err(VoteLedgerError::Unsupported("vote deletion is not supported"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ledger that only implements the required operations.
    struct ReadOnlyLedger;

    #[async_trait::async_trait]
    impl VoteLedger for ReadOnlyLedger {
        async fn votes_for(&self, _target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
            Ok(vec![])
        }

        async fn user_vote(
            &self,
            _target: &TargetRef,
            _user_id: UserId,
        ) -> Result<Option<VoteValue>, VoteLedgerError> {
            Ok(None)
        }

        async fn record_vote(
            &self,
            _target: &TargetRef,
            _user_id: UserId,
            _vote_type: VoteValue,
        ) -> Result<TransitionKind, VoteLedgerError> {
            Err(VoteLedgerError::Unsupported("read-only ledger"))
        }
    }

    #[tokio::test]
    async fn test_default_delete_vote_is_unsupported() {
        let result = ReadOnlyLedger.delete_vote(&TargetRef::new("question", 1), 2).await;
        assert!(matches!(result, Err(VoteLedgerError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_guards_short_circuit_before_record_vote() {
        let target = Target::new("question", 1).with_author(1);

        let anonymous = ReadOnlyLedger
            .cast_vote(&target, &Actor::Anonymous, VoteValue::Up)
            .await
            .unwrap();
        let own = ReadOnlyLedger
            .cast_vote(&target, &Actor::User(1), VoteValue::Up)
            .await
            .unwrap();

        assert_eq!(anonymous, TransitionKind::Unauthorized);
        assert_eq!(own, TransitionKind::SelfVote);
    }

    #[tokio::test]
    async fn test_unauthored_target_accepts_any_actor() {
        let target = Target::new("question", 1);
        let result = ReadOnlyLedger.cast_vote(&target, &Actor::User(1), VoteValue::Up).await;
        assert!(matches!(result, Err(VoteLedgerError::Unsupported(_))));
    }
}

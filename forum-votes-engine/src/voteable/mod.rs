//! A voteable target bound to its ledger and reputation adjuster.
//!
//! `Voteable::vote` is the full cast: the ledger applies the transition and,
//! for every mutation, the target's author is credited or debited.
use std::sync::Arc;

use forum_votes_repository::VoteLedger;
use forum_votes_shared::types::{Actor, Target, TransitionKind, Vote, VoteValue, VotesCount};
use tracing::{info, instrument};

use crate::errors::EngineError;
use crate::reputation::ReputationAdjuster;

#[derive(Clone)]
pub struct Voteable {
    target: Target,
    ledger: Arc<dyn VoteLedger>,
    reputation: Arc<ReputationAdjuster>,
}

impl Voteable {
    pub fn new(
        target: Target,
        ledger: Arc<dyn VoteLedger>,
        reputation: Arc<ReputationAdjuster>,
    ) -> Self {
        Self {
            target,
            ledger,
            reputation,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub async fn votes(&self) -> Result<Vec<Vote>, EngineError> {
        Ok(self.ledger.votes_for(&self.target.reference).await?)
    }

    pub async fn upvotes(&self) -> Result<Vec<Vote>, EngineError> {
        Ok(self.ledger.upvotes_for(&self.target.reference).await?)
    }

    pub async fn downvotes(&self) -> Result<Vec<Vote>, EngineError> {
        Ok(self.ledger.downvotes_for(&self.target.reference).await?)
    }

    pub async fn counts(&self) -> Result<VotesCount, EngineError> {
        Ok(self.ledger.votes_count(&self.target.reference).await?)
    }

    /// Total number of votes.
    pub async fn vote_count(&self) -> Result<i64, EngineError> {
        Ok(self.ledger.vote_count(&self.target.reference).await?)
    }

    pub async fn score(&self) -> Result<i64, EngineError> {
        Ok(self.ledger.score_for(&self.target.reference).await?)
    }

    pub async fn user_vote(&self, actor: &Actor) -> Result<Option<VoteValue>, EngineError> {
        Ok(self.ledger.vote_of(&self.target.reference, actor).await?)
    }

    /// Casts a vote and settles the author's reputation.
    #[instrument(skip(self), fields(vote_target = %self.target))]
    pub async fn vote(
        &self,
        actor: &Actor,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, EngineError> {
        let kind = self.ledger.cast_vote(&self.target, actor, vote_type).await?;

        if let Some(voter) = actor.user_id() {
            if kind.is_mutation() {
                self.reputation
                    .adjust_for_transition(&self.target, voter, kind, vote_type)
                    .await?;
                info!(voter, kind = %kind, "vote cast");
            }
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_votes_repository::{InMemoryReputationStore, InMemoryVoteLedger};

    const AUTHOR: i64 = 1;
    const VOTER: i64 = 2;
    const OTHER_VOTER: i64 = 3;

    struct Fixture {
        ledger: Arc<InMemoryVoteLedger>,
        reputation: Arc<ReputationAdjuster>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ledger: Arc::new(InMemoryVoteLedger::new()),
                reputation: Arc::new(ReputationAdjuster::with_default_rules(Arc::new(
                    InMemoryReputationStore::new(),
                ))),
            }
        }

        fn voteable(&self, target: Target) -> Voteable {
            Voteable::new(target, self.ledger.clone(), self.reputation.clone())
        }
    }

    #[tokio::test]
    async fn test_vote_sequence_settles_author_balance() {
        let fixture = Fixture::new();
        let question = fixture.voteable(Target::new("question", 7).with_author(AUTHOR));
        let voter = Actor::User(VOTER);

        assert_eq!(question.vote(&voter, VoteValue::Up).await.unwrap(), TransitionKind::Added);
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 10);

        assert_eq!(question.vote(&voter, VoteValue::Up).await.unwrap(), TransitionKind::Removed);
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 0);

        assert_eq!(question.vote(&voter, VoteValue::Down).await.unwrap(), TransitionKind::Added);
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), -2);
        assert_eq!(question.score().await.unwrap(), -1);

        let other = Actor::User(OTHER_VOTER);
        assert_eq!(question.vote(&other, VoteValue::Up).await.unwrap(), TransitionKind::Added);
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 8);
        assert_eq!(question.score().await.unwrap(), 0);
        assert_eq!(question.vote_count().await.unwrap(), 2);
        assert_eq!(question.user_vote(&voter).await.unwrap(), Some(VoteValue::Down));
        assert_eq!(question.user_vote(&other).await.unwrap(), Some(VoteValue::Up));
    }

    /// Votes each user casts, in order. Users 2, 3 and 5 finish holding a
    /// vote; user 4 toggles back to none.
    fn steps_of(user_id: i64) -> &'static [VoteValue] {
        match user_id {
            2 => &[VoteValue::Up, VoteValue::Down],
            3 => &[VoteValue::Down, VoteValue::Down, VoteValue::Up],
            4 => &[VoteValue::Up, VoteValue::Up],
            _ => &[VoteValue::Down],
        }
    }

    #[tokio::test]
    async fn test_interleavings_with_same_end_states_agree() {
        let schedules: [[i64; 8]; 4] = [
            [2, 2, 3, 3, 3, 4, 4, 5],
            [5, 4, 4, 3, 3, 3, 2, 2],
            [2, 3, 4, 5, 2, 3, 4, 3],
            [3, 2, 3, 4, 5, 4, 2, 3],
        ];

        for schedule in schedules {
            let fixture = Fixture::new();
            let question = fixture.voteable(Target::new("question", 7).with_author(AUTHOR));
            let mut cursor = std::collections::HashMap::<i64, usize>::new();

            for user_id in schedule {
                let step = cursor.entry(user_id).or_default();
                let vote_type = steps_of(user_id)[*step];
                *step += 1;
                question.vote(&Actor::User(user_id), vote_type).await.unwrap();
            }

            // Down from 2, up from 3, down from 5.
            assert_eq!(question.score().await.unwrap(), -1, "schedule {schedule:?}");
            assert_eq!(
                fixture.reputation.balance(AUTHOR).await.unwrap(),
                -2 + 10 - 2,
                "schedule {schedule:?}"
            );
            assert_eq!(question.user_vote(&Actor::User(4)).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_update_applies_difference() {
        let fixture = Fixture::new();
        let answer = fixture.voteable(Target::new("answer", 3).with_author(AUTHOR));
        let voter = Actor::User(VOTER);

        answer.vote(&voter, VoteValue::Up).await.unwrap();
        let kind = answer.vote(&voter, VoteValue::Down).await.unwrap();

        assert_eq!(kind, TransitionKind::Updated);
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), -2);

        answer.vote(&voter, VoteValue::Up).await.unwrap();
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_self_and_anonymous_votes_change_nothing() {
        let fixture = Fixture::new();
        let question = fixture.voteable(Target::new("question", 7).with_author(AUTHOR));

        assert_eq!(
            question.vote(&Actor::User(AUTHOR), VoteValue::Up).await.unwrap(),
            TransitionKind::SelfVote
        );
        assert_eq!(
            question.vote(&Actor::Anonymous, VoteValue::Up).await.unwrap(),
            TransitionKind::Unauthorized
        );

        assert!(question.votes().await.unwrap().is_empty());
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 0);
        assert_eq!(question.user_vote(&Actor::Anonymous).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unauthored_target_records_without_reputation() {
        let fixture = Fixture::new();
        let orphan = fixture.voteable(Target::new("question", 8));

        assert_eq!(
            orphan.vote(&Actor::User(VOTER), VoteValue::Up).await.unwrap(),
            TransitionKind::Added
        );
        assert_eq!(orphan.upvotes().await.unwrap().len(), 1);
        assert!(orphan.downvotes().await.unwrap().is_empty());
        assert_eq!(fixture.reputation.balance(VOTER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reputation_returns_to_zero_when_votes_withdrawn() {
        let fixture = Fixture::new();
        let review = fixture.voteable(Target::new("coursereview", 4).with_author(AUTHOR));

        for user in [VOTER, OTHER_VOTER, 4, 5] {
            let actor = Actor::User(user);
            review.vote(&actor, VoteValue::Up).await.unwrap();
            review.vote(&actor, VoteValue::Down).await.unwrap();
        }
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), -8);

        for user in [VOTER, OTHER_VOTER, 4, 5] {
            review.vote(&Actor::User(user), VoteValue::Down).await.unwrap();
        }
        assert_eq!(fixture.reputation.balance(AUTHOR).await.unwrap(), 0);
        assert_eq!(review.vote_count().await.unwrap(), 0);
    }
}

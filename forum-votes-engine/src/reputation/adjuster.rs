use std::sync::Arc;

use forum_votes_repository::ReputationStore;
use forum_votes_shared::types::{Target, TransitionKind, UserId, VoteValue};
use tracing::{debug, info, instrument};

use crate::errors::EngineError;
use crate::reputation::{
    BasicReputationCalculator, Direction, PointsContext, ReputationCalculator,
};

/// Applies reputation deltas for vote transitions and answer acceptance.
pub struct ReputationAdjuster {
    calculator: Arc<dyn ReputationCalculator>,
    store: Arc<dyn ReputationStore>,
}

impl ReputationAdjuster {
    pub fn new(calculator: Arc<dyn ReputationCalculator>, store: Arc<dyn ReputationStore>) -> Self {
        Self { calculator, store }
    }

    /// Adjuster using the default rule table.
    pub fn with_default_rules(store: Arc<dyn ReputationStore>) -> Self {
        Self::new(Arc::new(BasicReputationCalculator::default()), store)
    }

    pub fn calculator(&self) -> &dyn ReputationCalculator {
        self.calculator.as_ref()
    }

    pub fn points_for(&self, category: &str, direction: Direction, context: PointsContext) -> i64 {
        self.calculator.calculate(category, direction, context)
    }

    /// Points the author gains or loses for a transition of `requested` polarity.
    ///
    /// The old polarity is implied by the transition: a removal withdrew a
    /// vote of the requested polarity, an update replaced the opposite one.
    pub fn points_for_transition(
        &self,
        category: &str,
        kind: TransitionKind,
        requested: VoteValue,
    ) -> i64 {
        match kind {
            TransitionKind::Added => {
                self.points_for(category, requested.into(), PointsContext::default())
            }
            TransitionKind::Removed => {
                self.points_for(category, requested.into(), PointsContext::removed())
            }
            TransitionKind::Updated => self.points_for(
                category,
                requested.opposite().into(),
                PointsContext::changed_to(requested.into()),
            ),
            TransitionKind::Unauthorized | TransitionKind::SelfVote => 0,
        }
    }

    /// Adds `points` to the balance of `owner`. Zero changes skip the store.
    pub async fn apply_change(&self, owner: UserId, points: i64) -> Result<(), EngineError> {
        if points == 0 {
            return Ok(());
        }
        self.store.apply_change(owner, points).await?;
        Ok(())
    }

    pub async fn balance(&self, user_id: UserId) -> Result<i64, EngineError> {
        Ok(self.store.balance(user_id).await?)
    }

    /// Credits the author of `target` for a vote transition by `voter`.
    ///
    /// Targets without an author, and authors voting on their own content,
    /// are left untouched. Returns the points applied.
    #[instrument(skip(self, target), fields(vote_target = %target))]
    pub async fn adjust_for_transition(
        &self,
        target: &Target,
        voter: UserId,
        kind: TransitionKind,
        requested: VoteValue,
    ) -> Result<i64, EngineError> {
        let Some(author) = target.author_id else {
            debug!("target has no author, skipping reputation");
            return Ok(0);
        };
        if author == voter {
            return Ok(0);
        }

        let points = self.points_for_transition(target.reference.category(), kind, requested);
        self.apply_change(author, points).await?;
        if points != 0 {
            info!(author, points, kind = %kind, "adjusted reputation");
        }
        Ok(points)
    }

    /// Credits the author of `answer` when `accepted_by` accepts it.
    pub async fn award_acceptance(
        &self,
        answer: &Target,
        accepted_by: UserId,
    ) -> Result<i64, EngineError> {
        self.acceptance(answer, accepted_by, PointsContext::default()).await
    }

    /// Reverses `award_acceptance`.
    pub async fn revoke_acceptance(
        &self,
        answer: &Target,
        accepted_by: UserId,
    ) -> Result<i64, EngineError> {
        self.acceptance(answer, accepted_by, PointsContext::removed()).await
    }

    async fn acceptance(
        &self,
        answer: &Target,
        accepted_by: UserId,
        context: PointsContext,
    ) -> Result<i64, EngineError> {
        let Some(author) = answer.author_id else {
            return Ok(0);
        };
        if author == accepted_by {
            return Ok(0);
        }

        let points = self.points_for(answer.reference.category(), Direction::Accepted, context);
        self.apply_change(author, points).await?;
        info!(author, points, answer = %answer, "applied acceptance reputation");
        Ok(points)
    }
}

use std::sync::Arc;

use forum_votes_repository::VoteLedger;
use forum_votes_shared::types::TargetRef;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::reputation::{Direction, RuleTable, normalize_category};

/// Reputation earned by a user, split by source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReputationBreakdown {
    pub question_upvotes: i64,
    pub answer_upvotes: i64,
    pub review_upvotes: i64,
    pub accepted_answers: i64,
    /// Points from each of the above under the rule table.
    pub question_points: i64,
    pub answer_points: i64,
    pub review_points: i64,
    pub accepted_points: i64,
}

impl ReputationBreakdown {
    pub fn total(&self) -> i64 {
        self.question_points + self.answer_points + self.review_points + self.accepted_points
    }
}

pub struct StatisticsService {
    ledger: Arc<dyn VoteLedger>,
    rules: RuleTable,
}

impl StatisticsService {
    pub fn new(ledger: Arc<dyn VoteLedger>, rules: RuleTable) -> Self {
        Self { ledger, rules }
    }

    /// Share of upvotes among all votes on `target`, as a percentage.
    pub async fn popularity(&self, target: &TargetRef) -> Result<f64, EngineError> {
        let counts = self.ledger.votes_count(target).await?;
        if counts.total() == 0 {
            return Ok(0.0);
        }
        Ok(counts.upvotes as f64 / counts.total() as f64 * 100.0)
    }

    /// Tallies upvotes on `authored` content plus `accepted_answers` into a
    /// breakdown. Categories without a breakdown column are ignored.
    pub async fn reputation_breakdown(
        &self,
        authored: &[TargetRef],
        accepted_answers: i64,
    ) -> Result<ReputationBreakdown, EngineError> {
        let mut breakdown = ReputationBreakdown {
            accepted_answers,
            ..Default::default()
        };

        for target in authored {
            let upvotes = self.ledger.votes_count(target).await?.upvotes;
            match normalize_category(target.category()) {
                "question" => breakdown.question_upvotes += upvotes,
                "answer" => breakdown.answer_upvotes += upvotes,
                "review" => breakdown.review_upvotes += upvotes,
                _ => {}
            }
        }

        breakdown.question_points =
            breakdown.question_upvotes * self.rules.points("question", Direction::Upvote);
        breakdown.answer_points =
            breakdown.answer_upvotes * self.rules.points("answer", Direction::Upvote);
        breakdown.review_points =
            breakdown.review_upvotes * self.rules.points("review", Direction::Upvote);
        breakdown.accepted_points =
            accepted_answers * self.rules.points("answer", Direction::Accepted);
        Ok(breakdown)
    }
}

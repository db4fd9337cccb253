use std::fmt::Debug;

use tracing::debug;

use crate::reputation::{Direction, RuleTable};

/// Describes what happened to the vote whose points are being calculated.
///
/// `removed` takes precedence over `new_direction`. With neither set the
/// vote is a fresh one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointsContext {
    pub removed: bool,
    pub new_direction: Option<Direction>,
}

impl PointsContext {
    /// A vote of the given direction was withdrawn.
    pub fn removed() -> Self {
        Self {
            removed: true,
            new_direction: None,
        }
    }

    /// A vote changed from the given direction to `new_direction`.
    pub fn changed_to(new_direction: Direction) -> Self {
        Self {
            removed: false,
            new_direction: Some(new_direction),
        }
    }
}

/// Computes the reputation delta for a vote event on a category.
pub trait ReputationCalculator: Send + Sync + Debug {
    fn calculate(&self, category: &str, direction: Direction, context: PointsContext) -> i64;
}

/// Rule-table backed calculator.
///
/// * fresh vote: the rule's points
/// * removal: the negated points
/// * polarity change: new points minus old points
#[derive(Debug, Clone, Default)]
pub struct BasicReputationCalculator {
    rules: RuleTable,
}

impl BasicReputationCalculator {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

impl ReputationCalculator for BasicReputationCalculator {
    fn calculate(&self, category: &str, direction: Direction, context: PointsContext) -> i64 {
        let points = self.rules.points(category, direction);
        if context.removed {
            return -points;
        }
        match context.new_direction {
            Some(new_direction) => self.rules.points(category, new_direction) - points,
            None => points,
        }
    }
}

/// Calculator that records every request and awards nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugReputationCalculator;

impl ReputationCalculator for DebugReputationCalculator {
    fn calculate(&self, category: &str, direction: Direction, context: PointsContext) -> i64 {
        debug!(category, %direction, ?context, "reputation calculation requested");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRESH: PointsContext = PointsContext {
        removed: false,
        new_direction: None,
    };
    const REMOVED: PointsContext = PointsContext {
        removed: true,
        new_direction: None,
    };

    #[test]
    fn test_fresh_vote_points() {
        let calculator = BasicReputationCalculator::default();

        assert_eq!(calculator.calculate("question", Direction::Upvote, FRESH), 10);
        assert_eq!(calculator.calculate("answer", Direction::Downvote, FRESH), -2);
        assert_eq!(calculator.calculate("coursereview", Direction::Upvote, FRESH), 5);
    }

    #[test]
    fn test_removed_vote_negates_points() {
        let calculator = BasicReputationCalculator::default();

        assert_eq!(calculator.calculate("question", Direction::Upvote, REMOVED), -10);
        assert_eq!(calculator.calculate("question", Direction::Downvote, REMOVED), 2);
    }

    #[test]
    fn test_changed_vote_is_difference() {
        let calculator = BasicReputationCalculator::default();

        let to_down = PointsContext::changed_to(Direction::Downvote);
        let to_up = PointsContext::changed_to(Direction::Upvote);

        assert_eq!(calculator.calculate("question", Direction::Upvote, to_down), -12);
        assert_eq!(calculator.calculate("review", Direction::Downvote, to_up), 7);
    }

    #[test]
    fn test_removed_takes_precedence() {
        let calculator = BasicReputationCalculator::default();
        let context = PointsContext {
            removed: true,
            new_direction: Some(Direction::Downvote),
        };

        assert_eq!(calculator.calculate("question", Direction::Upvote, context), -10);
    }

    #[test]
    fn test_unknown_category_is_zero() {
        let calculator = BasicReputationCalculator::default();

        assert_eq!(calculator.calculate("comment", Direction::Upvote, FRESH), 0);
        assert_eq!(calculator.calculate("comment", Direction::Upvote, REMOVED), 0);
    }

    #[test]
    fn test_debug_calculator_awards_nothing() {
        let calculator = DebugReputationCalculator;

        assert_eq!(calculator.calculate("question", Direction::Upvote, FRESH), 0);
        assert_eq!(calculator.calculate("answer", Direction::Accepted, REMOVED), 0);
    }
}

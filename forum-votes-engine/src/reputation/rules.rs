use std::collections::HashMap;
use std::fmt;

use forum_votes_shared::types::VoteValue;
use serde::{Deserialize, Serialize};

/// The event a reputation rule applies to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upvote,
    Downvote,
    /// An answer was accepted by the question's author.
    Accepted,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upvote => "upvote",
            Direction::Downvote => "downvote",
            Direction::Accepted => "accepted",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VoteValue> for Direction {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => Direction::Upvote,
            VoteValue::Down => Direction::Downvote,
        }
    }
}

/// Maps content type names onto the category their rules are keyed by.
///
/// Course reviews share the `review` rules.
pub fn normalize_category(category: &str) -> &str {
    match category {
        "coursereview" => "review",
        other => other,
    }
}

/// Points awarded per (category, direction).
///
/// The table is fixed once built. Lookups normalize the category and fall
/// back to zero for pairs without a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: HashMap<(String, Direction), i64>,
}

impl RuleTable {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, Direction, i64)>,
        S: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(category, direction, points)| ((category.into(), direction), points))
                .collect(),
        }
    }

    /// Returns the points for `direction` on `category`, 0 when no rule exists.
    pub fn points(&self, category: &str, direction: Direction) -> i64 {
        let category = normalize_category(&category.to_lowercase()).to_string();
        self.rules.get(&(category, direction)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new([
            ("question", Direction::Upvote, 10),
            ("question", Direction::Downvote, -2),
            ("answer", Direction::Upvote, 10),
            ("answer", Direction::Downvote, -2),
            ("answer", Direction::Accepted, 15),
            ("review", Direction::Upvote, 5),
            ("review", Direction::Downvote, -2),
        ])
    }
}

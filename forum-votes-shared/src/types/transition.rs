use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome of a single cast-vote call.
///
/// `Unauthorized` and `SelfVote` are ordinary outcomes signaling that no
/// mutation occurred; they are not errors.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// A new vote was recorded.
    Added,
    /// An existing vote changed polarity.
    Updated,
    /// An existing vote was toggled off.
    Removed,
    /// The actor was not authenticated.
    Unauthorized,
    /// The actor authored the target.
    SelfVote,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Added => "added",
            TransitionKind::Updated => "updated",
            TransitionKind::Removed => "removed",
            TransitionKind::Unauthorized => "unauthorized",
            TransitionKind::SelfVote => "self_vote",
        }
    }

    /// Returns true if the ledger's record set changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            TransitionKind::Added | TransitionKind::Updated | TransitionKind::Removed
        )
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_kinds() {
        assert!(TransitionKind::Added.is_mutation());
        assert!(TransitionKind::Updated.is_mutation());
        assert!(TransitionKind::Removed.is_mutation());
        assert!(!TransitionKind::Unauthorized.is_mutation());
        assert!(!TransitionKind::SelfVote.is_mutation());
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransitionKind::SelfVote).unwrap(),
            "\"self_vote\""
        );
        assert_eq!(TransitionKind::SelfVote.to_string(), "self_vote");
    }
}

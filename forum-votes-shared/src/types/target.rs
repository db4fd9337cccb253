use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Numeric identity of a content object within its content type.
pub type ObjectId = i64;

/// Stable identity of a voteable content object.
///
/// The content type doubles as the reputation category of the target
/// (for example `question`, `answer` or `coursereview`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetRef {
    pub content_type: String,
    pub object_id: ObjectId,
}

impl TargetRef {
    /// Creates a reference, normalizing the content type to lowercase.
    pub fn new(content_type: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            content_type: content_type.into().to_lowercase(),
            object_id,
        }
    }

    /// The category used for reputation rule lookups.
    pub fn category(&self) -> &str {
        &self.content_type
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.object_id)
    }
}

/// A voteable content object as seen by the vote ledger.
///
/// The ledger never inspects the content itself; it only needs the identity
/// and, when present, the author to reject self votes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    #[serde(flatten)]
    pub reference: TargetRef,
    pub author_id: Option<UserId>,
    /// The content this target answers, e.g. the question of an answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<TargetRef>,
}

impl Target {
    pub fn new(content_type: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            reference: TargetRef::new(content_type, object_id),
            author_id: None,
            parent: None,
        }
    }

    pub fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_parent(mut self, parent: TargetRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Returns true when `user_id` authored this target.
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == Some(user_id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reference.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ref_lowercases_content_type() {
        let target = TargetRef::new("CourseReview", 3);
        assert_eq!(target.content_type, "coursereview");
        assert_eq!(target.to_string(), "coursereview:3");
    }

    #[test]
    fn test_target_authorship() {
        let target = Target::new("question", 1).with_author(7);
        assert!(target.is_authored_by(7));
        assert!(!target.is_authored_by(8));
        assert!(!Target::new("question", 1).is_authored_by(7));
    }

    #[test]
    fn test_target_serializes_flat() {
        let target = Target::new("answer", 12).with_author(4);
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content_type": "answer", "object_id": 12, "author_id": 4})
        );
    }

    #[test]
    fn test_target_parent_round_trips() {
        let answer = Target::new("answer", 12)
            .with_author(4)
            .with_parent(TargetRef::new("question", 3));
        let json = serde_json::json!({
            "content_type": "answer",
            "object_id": 12,
            "author_id": 4,
            "parent": {"content_type": "question", "object_id": 3}
        });

        assert_eq!(serde_json::to_value(&answer).unwrap(), json);
        assert_eq!(serde_json::from_value::<Target>(json).unwrap(), answer);
    }
}

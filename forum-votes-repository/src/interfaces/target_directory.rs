use forum_votes_shared::types::{ObjectId, Target, TargetRef, UserId};
use crate::errors::TargetDirectoryError;

/// A registered target together with its acceptance state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    pub target: Target,
    pub accepted: bool,
}

/// Result of changing the accepted state of an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptanceChange {
    /// True when the answer's own state flipped.
    pub changed: bool,
    /// Answers to the same parent that lost their accepted state.
    pub unaccepted: Vec<Target>,
}

/// Trait for resolving a (content type, object id) pair to a voteable target.
///
/// This is the lookup the request layer performs before it ever reaches the
/// ledger; an unresolvable pair is a not-found condition. The directory also
/// owns the accepted flag of answers: at most one answer per parent is
/// accepted at any time.
#[async_trait::async_trait]
pub trait TargetDirectory: Send + Sync {
    async fn resolve(
        &self,
        content_type: &str,
        object_id: ObjectId,
    ) -> Result<Option<Target>, TargetDirectoryError>;

    /// Registers a target, replacing the author and parent of an existing
    /// registration. The accepted flag survives re-registration.
    async fn register(&self, target: &Target) -> Result<(), TargetDirectoryError>;

    /// Every target authored by `author_id`.
    async fn authored_by(
        &self,
        author_id: UserId,
    ) -> Result<Vec<TargetRecord>, TargetDirectoryError>;

    /// Whether `target` is currently accepted. Unknown targets are not.
    async fn is_accepted(&self, target: &TargetRef) -> Result<bool, TargetDirectoryError>;

    /// Sets the accepted flag of `answer`.
    ///
    /// Accepting clears the flag on every other answer with the same parent.
    /// Returns `None` when `answer` is not registered.
    async fn set_accepted(
        &self,
        answer: &TargetRef,
        accepted: bool,
    ) -> Result<Option<AcceptanceChange>, TargetDirectoryError>;
}

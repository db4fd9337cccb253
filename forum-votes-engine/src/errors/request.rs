//! Error types for the request layer.
//! Every variant maps to the status code of the rejected request.
use forum_votes_shared::types::{ObjectId, ParseVoteValueError};
use thiserror::Error;

use crate::errors::EngineError;

/// Represents the reasons a vote request is rejected.
#[derive(Debug, Error)]
pub enum VoteRequestError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Invalid vote type")]
    InvalidVoteType(#[from] ParseVoteValueError),
    #[error("Target not found: {content_type}:{object_id}")]
    NotFound {
        content_type: String,
        object_id: ObjectId,
    },
    #[error("Cannot vote on your own content")]
    SelfVote,
    #[error("Answer is not linked to a question")]
    Unlinked,
    #[error("Only question author can accept answers")]
    Forbidden,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl VoteRequestError {
    /// HTTP-style status code for the rejection.
    pub fn status(&self) -> u16 {
        match self {
            VoteRequestError::Unauthorized => 401,
            VoteRequestError::InvalidVoteType(_)
            | VoteRequestError::SelfVote
            | VoteRequestError::Unlinked => 400,
            VoteRequestError::Forbidden => 403,
            VoteRequestError::NotFound { .. } => 404,
            VoteRequestError::Engine(e) if e.is_retryable() => 409,
            VoteRequestError::Engine(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_votes_repository::VoteLedgerError;
    use forum_votes_shared::types::TargetRef;

    #[test]
    fn test_status_codes() {
        assert_eq!(VoteRequestError::Unauthorized.status(), 401);
        assert_eq!(
            VoteRequestError::InvalidVoteType(ParseVoteValueError("sideways".into())).status(),
            400
        );
        assert_eq!(
            VoteRequestError::NotFound {
                content_type: "question".into(),
                object_id: 7
            }
            .status(),
            404
        );
        assert_eq!(VoteRequestError::SelfVote.status(), 400);
        assert_eq!(VoteRequestError::Unlinked.status(), 400);
        assert_eq!(VoteRequestError::Forbidden.status(), 403);

        let conflict = EngineError::from(VoteLedgerError::Conflict {
            target: TargetRef::new("question", 7),
            user_id: 2,
        });
        assert_eq!(VoteRequestError::from(conflict).status(), 409);

        let unsupported = EngineError::from(VoteLedgerError::Unsupported("nope"));
        assert_eq!(VoteRequestError::from(unsupported).status(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(VoteRequestError::SelfVote.to_string(), "Cannot vote on your own content");
        assert_eq!(
            VoteRequestError::InvalidVoteType(ParseVoteValueError("x".into())).to_string(),
            "Invalid vote type"
        );
    }
}

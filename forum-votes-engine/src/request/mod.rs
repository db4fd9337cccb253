//! Inbound vote requests and their responses.
//!
//! A request is validated in a fixed order: authentication, vote type,
//! target lookup, then authorship. Only a request that passes every check
//! reaches the ledger.
mod acceptance;

use std::sync::Arc;

use forum_votes_repository::{Storage, TargetDirectory, VoteLedger};
use forum_votes_shared::types::{Actor, ObjectId, Target, TransitionKind, UserId, VoteValue};

pub use acceptance::{AcceptanceRequest, AcceptanceResponse};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::errors::{EngineError, VoteRequestError};
use crate::reputation::{ReputationAdjuster, ReputationCalculator};
use crate::voteable::Voteable;

/// A vote as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteRequest {
    pub content_type: String,
    pub object_id: ObjectId,
    /// Raw polarity; anything but `up` or `down` is rejected.
    pub vote_type: String,
    /// Authenticated user, absent for anonymous requests.
    #[serde(default)]
    pub actor: Option<UserId>,
}

/// Result of an accepted vote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteResponse {
    pub success: bool,
    pub result: TransitionKind,
    /// Net score after the vote.
    pub vote_count: i64,
    pub user_vote: Option<VoteValue>,
    pub upvotes: i64,
    pub downvotes: i64,
}

/// Body returned for a rejected request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub status: u16,
}

impl From<&VoteRequestError> for ErrorResponse {
    fn from(error: &VoteRequestError) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            status: error.status(),
        }
    }
}

pub struct VoteRequestHandler {
    targets: Arc<dyn TargetDirectory>,
    ledger: Arc<dyn VoteLedger>,
    reputation: Arc<ReputationAdjuster>,
}

impl VoteRequestHandler {
    pub fn new(
        targets: Arc<dyn TargetDirectory>,
        ledger: Arc<dyn VoteLedger>,
        reputation: Arc<ReputationAdjuster>,
    ) -> Self {
        Self {
            targets,
            ledger,
            reputation,
        }
    }

    /// Wires a handler over `storage` with the given calculator.
    pub fn from_storage(storage: &Storage, calculator: Arc<dyn ReputationCalculator>) -> Self {
        Self::new(
            storage.targets.clone(),
            storage.ledger.clone(),
            Arc::new(ReputationAdjuster::new(calculator, storage.reputation.clone())),
        )
    }

    pub fn reputation(&self) -> &ReputationAdjuster {
        &self.reputation
    }

    pub fn targets(&self) -> &dyn TargetDirectory {
        self.targets.as_ref()
    }

    #[instrument(
        skip(self),
        fields(content_type = %request.content_type, object_id = request.object_id)
    )]
    pub async fn handle(&self, request: &VoteRequest) -> Result<VoteResponse, VoteRequestError> {
        let result = self.handle_inner(request).await;
        if let Err(e) = &result {
            warn!(status = e.status(), error = %e, "vote request rejected");
        }
        result
    }

    async fn handle_inner(&self, request: &VoteRequest) -> Result<VoteResponse, VoteRequestError> {
        let Some(user_id) = request.actor else {
            return Err(VoteRequestError::Unauthorized);
        };
        let vote_type: VoteValue = request.vote_type.parse()?;

        let target = self.resolve_target(&request.content_type, request.object_id).await?;
        if target.is_authored_by(user_id) {
            return Err(VoteRequestError::SelfVote);
        }

        let actor = Actor::User(user_id);
        let voteable = Voteable::new(target, self.ledger.clone(), self.reputation.clone());
        let result = voteable.vote(&actor, vote_type).await?;
        let counts = voteable.counts().await?;
        let user_vote = voteable.user_vote(&actor).await?;

        Ok(VoteResponse {
            success: true,
            result,
            vote_count: counts.score(),
            user_vote,
            upvotes: counts.upvotes,
            downvotes: counts.downvotes,
        })
    }

    async fn resolve_target(
        &self,
        content_type: &str,
        object_id: ObjectId,
    ) -> Result<Target, VoteRequestError> {
        self.targets
            .resolve(content_type, object_id)
            .await
            .map_err(EngineError::from)?
            .ok_or_else(|| VoteRequestError::NotFound {
                content_type: content_type.to_string(),
                object_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::BasicReputationCalculator;
    use serde_json::json;

    const AUTHOR: UserId = 1;
    const VOTER: UserId = 2;

    async fn handler() -> VoteRequestHandler {
        let storage = Storage::in_memory();
        storage
            .targets
            .register(&Target::new("question", 7).with_author(AUTHOR))
            .await
            .unwrap();
        VoteRequestHandler::from_storage(&storage, Arc::new(BasicReputationCalculator::default()))
    }

    fn request(vote_type: &str, actor: Option<UserId>) -> VoteRequest {
        VoteRequest {
            content_type: "question".to_string(),
            object_id: 7,
            vote_type: vote_type.to_string(),
            actor,
        }
    }

    #[tokio::test]
    async fn test_accepted_vote_response() {
        let handler = handler().await;

        let response = handler.handle(&request("up", Some(VOTER))).await.unwrap();

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "result": "added",
                "vote_count": 1,
                "user_vote": "up",
                "upvotes": 1,
                "downvotes": 0
            })
        );
        assert_eq!(handler.reputation().balance(AUTHOR).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_toggle_off_reports_no_user_vote() {
        let handler = handler().await;

        handler.handle(&request("down", Some(VOTER))).await.unwrap();
        let response = handler.handle(&request("down", Some(VOTER))).await.unwrap();

        assert_eq!(response.result, TransitionKind::Removed);
        assert_eq!(response.user_vote, None);
        assert_eq!(response.vote_count, 0);
        assert_eq!(handler.reputation().balance(AUTHOR).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_order() {
        let handler = handler().await;

        // Anonymous wins over every other problem.
        let anonymous = VoteRequest {
            content_type: "missing".to_string(),
            ..request("sideways", None)
        };
        assert!(matches!(
            handler.handle(&anonymous).await,
            Err(VoteRequestError::Unauthorized)
        ));

        let bad_type = VoteRequest {
            content_type: "missing".to_string(),
            ..request("sideways", Some(AUTHOR))
        };
        assert!(matches!(
            handler.handle(&bad_type).await,
            Err(VoteRequestError::InvalidVoteType(_))
        ));

        let missing = VoteRequest {
            object_id: 8,
            ..request("up", Some(AUTHOR))
        };
        let err = handler.handle(&missing).await.unwrap_err();
        assert_eq!(err.status(), 404);

        let err = handler.handle(&request("up", Some(AUTHOR))).await.unwrap_err();
        assert!(matches!(err, VoteRequestError::SelfVote));
        assert_eq!(ErrorResponse::from(&err).error, "Cannot vote on your own content");
    }

    #[tokio::test]
    async fn test_content_type_lookup_ignores_case() {
        let handler = handler().await;
        let shouting = VoteRequest {
            content_type: "Question".to_string(),
            ..request("up", Some(VOTER))
        };

        let response = handler.handle(&shouting).await.unwrap();
        assert_eq!(response.result, TransitionKind::Added);
    }

    #[test]
    fn test_request_actor_defaults_to_anonymous() {
        let body = r#"{"content_type":"answer","object_id":3,"vote_type":"up"}"#;
        let request: VoteRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.actor, None);
    }
}

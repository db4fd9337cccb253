//! Answer acceptance requests.
//!
//! Only the author of the question an answer belongs to may accept or
//! unaccept it. Reputation moves only when the stored flag flips, and
//! accepting one answer withdraws acceptance from the question's other
//! answers.
use forum_votes_shared::types::{ObjectId, TargetRef, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::VoteRequestHandler;
use crate::errors::{EngineError, VoteRequestError};

/// An accept or unaccept action as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptanceRequest {
    pub content_type: String,
    pub object_id: ObjectId,
    /// `false` withdraws acceptance.
    pub accept: bool,
    #[serde(default)]
    pub actor: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcceptanceResponse {
    pub success: bool,
    pub target: TargetRef,
    pub is_accepted: bool,
    /// False when the answer was already in the requested state.
    pub changed: bool,
    /// Points applied to the answer's author.
    pub points: i64,
    /// Other answers that lost their acceptance.
    pub unaccepted: Vec<TargetRef>,
}

impl VoteRequestHandler {
    #[instrument(
        skip(self),
        fields(
            content_type = %request.content_type,
            object_id = request.object_id,
            accept = request.accept
        )
    )]
    pub async fn handle_acceptance(
        &self,
        request: &AcceptanceRequest,
    ) -> Result<AcceptanceResponse, VoteRequestError> {
        let result = self.handle_acceptance_inner(request).await;
        if let Err(e) = &result {
            warn!(status = e.status(), error = %e, "acceptance request rejected");
        }
        result
    }

    async fn handle_acceptance_inner(
        &self,
        request: &AcceptanceRequest,
    ) -> Result<AcceptanceResponse, VoteRequestError> {
        let Some(user_id) = request.actor else {
            return Err(VoteRequestError::Unauthorized);
        };
        let answer = self.resolve_target(&request.content_type, request.object_id).await?;
        let Some(parent) = &answer.parent else {
            return Err(VoteRequestError::Unlinked);
        };
        let question = self.resolve_target(&parent.content_type, parent.object_id).await?;
        if !question.is_authored_by(user_id) {
            return Err(VoteRequestError::Forbidden);
        }

        let change = self
            .targets
            .set_accepted(&answer.reference, request.accept)
            .await
            .map_err(EngineError::from)?
            .ok_or_else(|| VoteRequestError::NotFound {
                content_type: answer.reference.content_type.clone(),
                object_id: answer.reference.object_id,
            })?;

        let points = match (change.changed, request.accept) {
            (false, _) => 0,
            (true, true) => self.reputation.award_acceptance(&answer, user_id).await?,
            (true, false) => self.reputation.revoke_acceptance(&answer, user_id).await?,
        };
        for sibling in &change.unaccepted {
            self.reputation.revoke_acceptance(sibling, user_id).await?;
        }
        if change.changed {
            info!(
                answer = %answer,
                accepted = request.accept,
                points,
                unaccepted = change.unaccepted.len(),
                "answer acceptance changed"
            );
        }

        Ok(AcceptanceResponse {
            success: true,
            target: answer.reference,
            is_accepted: request.accept,
            changed: change.changed,
            points,
            unaccepted: change
                .unaccepted
                .into_iter()
                .map(|target| target.reference)
                .collect(),
        })
    }
}

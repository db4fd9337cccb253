//! Line-oriented command handling for the service binary.
//!
//! Each input line is one JSON command tagged by `op`; each produces exactly
//! one JSON line in reply. Rejections are replies too, carrying a status.
use std::sync::Arc;

use forum_votes_engine::{
    AcceptanceRequest, EngineError, ErrorResponse, ReputationCalculator, StatisticsService,
    VoteManager, VoteRequest, VoteRequestError, VoteRequestHandler,
};
use forum_votes_repository::{Storage, TargetDirectory};
use forum_votes_shared::types::{ObjectId, Target, TargetRef, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::errors::AppError;

/// A command accepted on stdin.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Makes a target voteable.
    Register(Target),
    Vote(VoteRequest),
    Stats {
        content_type: String,
        object_id: ObjectId,
    },
    Balance {
        user_id: UserId,
    },
    /// Marks an answer accepted on behalf of the question author.
    Accept {
        content_type: String,
        object_id: ObjectId,
        #[serde(default)]
        actor: Option<UserId>,
    },
    Unaccept {
        content_type: String,
        object_id: ObjectId,
        #[serde(default)]
        actor: Option<UserId>,
    },
    /// Profile reputation of a user, split by source.
    Breakdown {
        user_id: UserId,
    },
}

pub struct CommandHandler {
    votes: VoteRequestHandler,
    manager: VoteManager,
    statistics: StatisticsService,
}

impl CommandHandler {
    pub fn new(storage: &Storage, calculator: Arc<dyn ReputationCalculator>) -> Self {
        Self {
            votes: VoteRequestHandler::from_storage(storage, calculator),
            manager: VoteManager::new(storage.ledger.clone()),
            statistics: StatisticsService::new(storage.ledger.clone(), Default::default()),
        }
    }

    /// Parses and executes one input line, returning the serialized reply.
    pub async fn handle_line(&self, line: &str) -> Result<String, AppError> {
        let reply = match serde_json::from_str::<Command>(line) {
            Ok(command) => self.execute(command).await?,
            Err(e) => {
                debug!(error = %e, "malformed command");
                json!({
                    "success": false,
                    "error": format!("Malformed command: {e}"),
                    "status": 400,
                })
            }
        };
        Ok(serde_json::to_string(&reply)?)
    }

    pub async fn execute(&self, command: Command) -> Result<Value, AppError> {
        match command {
            Command::Register(target) => {
                let target = normalize(target);
                self.votes
                    .targets()
                    .register(&target)
                    .await
                    .map_err(EngineError::from)?;
                info!(target_ref = %target, author_id = ?target.author_id, "registered target");
                Ok(json!({ "success": true, "registered": target }))
            }
            Command::Vote(request) => reply(self.votes.handle(&request).await),
            Command::Stats {
                content_type,
                object_id,
            } => {
                let target = TargetRef::new(content_type, object_id);
                let stats = self.manager.stats(&target).await?;
                let popularity = self.statistics.popularity(&target).await?;
                Ok(json!({
                    "success": true,
                    "target": target,
                    "stats": stats,
                    "popularity": popularity,
                }))
            }
            Command::Balance { user_id } => {
                let balance = self.votes.reputation().balance(user_id).await?;
                Ok(json!({ "success": true, "user_id": user_id, "reputation": balance }))
            }
            Command::Accept {
                content_type,
                object_id,
                actor,
            } => self.acceptance(content_type, object_id, actor, true).await,
            Command::Unaccept {
                content_type,
                object_id,
                actor,
            } => self.acceptance(content_type, object_id, actor, false).await,
            Command::Breakdown { user_id } => {
                let authored = self
                    .votes
                    .targets()
                    .authored_by(user_id)
                    .await
                    .map_err(EngineError::from)?;
                let accepted = authored.iter().filter(|record| record.accepted).count() as i64;
                let references: Vec<TargetRef> = authored
                    .into_iter()
                    .map(|record| record.target.reference)
                    .collect();
                let breakdown = self
                    .statistics
                    .reputation_breakdown(&references, accepted)
                    .await?;
                Ok(json!({
                    "success": true,
                    "user_id": user_id,
                    "breakdown": breakdown,
                    "total_earned": breakdown.total(),
                }))
            }
        }
    }

    async fn acceptance(
        &self,
        content_type: String,
        object_id: ObjectId,
        actor: Option<UserId>,
        accept: bool,
    ) -> Result<Value, AppError> {
        let request = AcceptanceRequest {
            content_type,
            object_id,
            accept,
            actor,
        };
        reply(self.votes.handle_acceptance(&request).await)
    }
}

/// Lowercases the content types of a target and its parent.
fn normalize(target: Target) -> Target {
    let lower = |reference: TargetRef| TargetRef::new(reference.content_type, reference.object_id);
    Target {
        reference: lower(target.reference),
        parent: target.parent.map(lower),
        ..target
    }
}

/// Serializes a request outcome. Rejections become replies; non-retryable
/// engine failures are returned as errors.
fn reply<T: Serialize>(result: Result<T, VoteRequestError>) -> Result<Value, AppError> {
    match result {
        Ok(response) => Ok(serde_json::to_value(response)?),
        Err(VoteRequestError::Engine(e)) if !e.is_retryable() => Err(e.into()),
        Err(e) => Ok(serde_json::to_value(ErrorResponse::from(&e))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_votes_engine::BasicReputationCalculator;

    fn handler() -> CommandHandler {
        CommandHandler::new(
            &Storage::in_memory(),
            Arc::new(BasicReputationCalculator::default()),
        )
    }

    async fn run(handler: &CommandHandler, line: &str) -> Value {
        let reply = handler.handle_line(line).await.unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_register_vote_and_balance() {
        let handler = handler();

        let registered = run(
            &handler,
            r#"{"op":"register","content_type":"question","object_id":7,"author_id":1}"#,
        )
        .await;
        assert_eq!(registered["success"], true);

        let voted = run(
            &handler,
            r#"{"op":"vote","content_type":"question","object_id":7,"vote_type":"up","actor":2}"#,
        )
        .await;
        assert_eq!(voted["result"], "added");
        assert_eq!(voted["vote_count"], 1);

        let balance = run(&handler, r#"{"op":"balance","user_id":1}"#).await;
        assert_eq!(balance["reputation"], 10);

        let stats = run(&handler, r#"{"op":"stats","content_type":"question","object_id":7}"#).await;
        assert_eq!(stats["stats"], json!({ "total": 1, "count": 1, "score": 1 }));
        assert_eq!(stats["popularity"], 100.0);
    }

    #[tokio::test]
    async fn test_rejections_are_replies() {
        let handler = handler();
        run(
            &handler,
            r#"{"op":"register","content_type":"question","object_id":7,"author_id":1}"#,
        )
        .await;

        let anonymous = run(
            &handler,
            r#"{"op":"vote","content_type":"question","object_id":7,"vote_type":"up"}"#,
        )
        .await;
        assert_eq!(anonymous["status"], 401);

        let missing = run(
            &handler,
            r#"{"op":"vote","content_type":"poll","object_id":7,"vote_type":"up","actor":2}"#,
        )
        .await;
        assert_eq!(missing["status"], 404);

        let own = run(
            &handler,
            r#"{"op":"vote","content_type":"question","object_id":7,"vote_type":"down","actor":1}"#,
        )
        .await;
        assert_eq!(own["status"], 400);
        assert_eq!(own["error"], "Cannot vote on your own content");

        let malformed = run(&handler, "not json").await;
        assert_eq!(malformed["status"], 400);
        assert_eq!(malformed["success"], false);
    }

    async fn register_thread(handler: &CommandHandler) {
        for line in [
            r#"{"op":"register","content_type":"question","object_id":7,"author_id":1}"#,
            r#"{"op":"register","content_type":"Answer","object_id":3,"author_id":5,
                "parent":{"content_type":"Question","object_id":7}}"#,
            r#"{"op":"register","content_type":"answer","object_id":4,"author_id":6,
                "parent":{"content_type":"question","object_id":7}}"#,
        ] {
            assert_eq!(run(handler, line).await["success"], true);
        }
    }

    #[tokio::test]
    async fn test_accept_and_unaccept_answer() {
        let handler = handler();
        register_thread(&handler).await;

        let accepted = run(
            &handler,
            r#"{"op":"accept","content_type":"answer","object_id":3,"actor":1}"#,
        )
        .await;
        assert_eq!(accepted["points"], 15);
        assert_eq!(accepted["is_accepted"], true);

        let again = run(
            &handler,
            r#"{"op":"accept","content_type":"answer","object_id":3,"actor":1}"#,
        )
        .await;
        assert_eq!(again["changed"], false);
        assert_eq!(run(&handler, r#"{"op":"balance","user_id":5}"#).await["reputation"], 15);

        run(
            &handler,
            r#"{"op":"unaccept","content_type":"answer","object_id":3,"actor":1}"#,
        )
        .await;
        assert_eq!(run(&handler, r#"{"op":"balance","user_id":5}"#).await["reputation"], 0);
    }

    #[tokio::test]
    async fn test_unaccept_without_accept_keeps_balance() {
        let handler = handler();
        register_thread(&handler).await;

        let reply = run(
            &handler,
            r#"{"op":"unaccept","content_type":"answer","object_id":4,"actor":1}"#,
        )
        .await;

        assert_eq!(reply["changed"], false);
        assert_eq!(reply["points"], 0);
        assert_eq!(run(&handler, r#"{"op":"balance","user_id":6}"#).await["reputation"], 0);
    }

    #[tokio::test]
    async fn test_accept_rejections() {
        let handler = handler();
        register_thread(&handler).await;

        let stranger = run(
            &handler,
            r#"{"op":"accept","content_type":"answer","object_id":3,"actor":6}"#,
        )
        .await;
        assert_eq!(stranger["status"], 403);
        assert_eq!(stranger["error"], "Only question author can accept answers");

        let anonymous = run(
            &handler,
            r#"{"op":"accept","content_type":"answer","object_id":3}"#,
        )
        .await;
        assert_eq!(anonymous["status"], 401);

        let missing = run(
            &handler,
            r#"{"op":"accept","content_type":"answer","object_id":8,"actor":1}"#,
        )
        .await;
        assert_eq!(missing["status"], 404);
    }

    #[tokio::test]
    async fn test_breakdown() {
        let handler = handler();
        register_thread(&handler).await;
        run(
            &handler,
            r#"{"op":"register","content_type":"question","object_id":8,"author_id":5}"#,
        )
        .await;
        for line in [
            r#"{"op":"vote","content_type":"answer","object_id":3,"vote_type":"up","actor":1}"#,
            r#"{"op":"vote","content_type":"answer","object_id":3,"vote_type":"up","actor":6}"#,
            r#"{"op":"vote","content_type":"question","object_id":8,"vote_type":"up","actor":1}"#,
            r#"{"op":"accept","content_type":"answer","object_id":3,"actor":1}"#,
        ] {
            run(&handler, line).await;
        }

        let reply = run(&handler, r#"{"op":"breakdown","user_id":5}"#).await;

        assert_eq!(reply["breakdown"]["question_upvotes"], 1);
        assert_eq!(reply["breakdown"]["answer_upvotes"], 2);
        assert_eq!(reply["breakdown"]["accepted_answers"], 1);
        assert_eq!(reply["total_earned"], 10 + 20 + 15);
        let balance = run(&handler, r#"{"op":"balance","user_id":5}"#).await;
        assert_eq!(balance["reputation"], reply["total_earned"]);
    }

    #[tokio::test]
    async fn test_register_normalizes_content_type() {
        let handler = handler();
        run(
            &handler,
            r#"{"op":"register","content_type":"CourseReview","object_id":4,"author_id":1}"#,
        )
        .await;

        let voted = run(
            &handler,
            r#"{"op":"vote","content_type":"coursereview","object_id":4,"vote_type":"up","actor":2}"#,
        )
        .await;
        assert_eq!(voted["result"], "added");

        let balance = run(&handler, r#"{"op":"balance","user_id":1}"#).await;
        assert_eq!(balance["reputation"], 5);
    }

    #[test]
    fn test_parse_register_without_author() {
        let line = r#"{"op":"register","content_type":"answer","object_id":3}"#;
        let command: Command = serde_json::from_str(line).unwrap();
        assert_eq!(command, Command::Register(Target::new("answer", 3)));
    }
}

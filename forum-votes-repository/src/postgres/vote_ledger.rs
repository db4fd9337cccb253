//! PostgreSQL implementation of the vote ledger.
//!
//! Every toggle runs in its own transaction: the existing row is locked with
//! `SELECT ... FOR UPDATE`, then inserted, updated or deleted. The UNIQUE
//! constraint on (content_type, object_id, user_id) is the final arbiter when
//! two requests race to insert the first vote of a user on a target; the
//! loser is retried once, at which point it observes the winner's row.
use async_trait::async_trait;
use forum_votes_shared::types::{TargetRef, TransitionKind, UserId, Vote, VoteValue, VotesCount};
use time::OffsetDateTime;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, instrument, warn};

use crate::errors::VoteLedgerError;
use crate::interfaces::VoteLedger;
use crate::postgres::{decode_vote_type, encode_vote_type};

/// Delay before re-running a toggle that lost an insert race.
const CONFLICT_RETRY_DELAY_MS: u64 = 10;

/// Number of additional attempts after a conflict.
const CONFLICT_RETRIES: usize = 1;

type VoteRow = (i64, String, i64, i16, OffsetDateTime);

/// PostgreSQL implementation of the vote ledger.
pub struct PostgresVoteLedger {
    pool: sqlx::PgPool,
}

impl PostgresVoteLedger {
    /// Creates a new ledger on a pool whose schema has been migrated.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the `votes` table
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVoteLedger)` - Ready-to-use ledger instance
    /// * `Err(VoteLedgerError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, VoteLedgerError> {
        Ok(Self { pool })
    }

    /// Performs one toggle attempt inside a transaction.
    ///
    /// Returns `VoteLedgerError::Conflict` when the INSERT hits the unique
    /// constraint; the transaction is rolled back on drop.
    async fn record_vote_tx(
        &self,
        target: &TargetRef,
        user_id: UserId,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i16> = sqlx::query_scalar(
            r#"
            SELECT vote_type FROM votes
            WHERE content_type = $1 AND object_id = $2 AND user_id = $3
            FOR UPDATE
            "#,
        )
        .bind(&target.content_type)
        .bind(target.object_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let kind = match existing.map(decode_vote_type).transpose()? {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (user_id, content_type, object_id, vote_type, voted_at)
                    VALUES ($1, $2, $3, $4, now())
                    "#,
                )
                .bind(user_id)
                .bind(&target.content_type)
                .bind(target.object_id)
                .bind(encode_vote_type(vote_type))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        VoteLedgerError::Conflict {
                            target: target.clone(),
                            user_id,
                        }
                    } else {
                        VoteLedgerError::DatabaseError(e)
                    }
                })?;
                TransitionKind::Added
            }
            Some(old) if old == vote_type => {
                sqlx::query(
                    "DELETE FROM votes WHERE content_type = $1 AND object_id = $2 AND user_id = $3",
                )
                .bind(&target.content_type)
                .bind(target.object_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
                TransitionKind::Removed
            }
            Some(_) => {
                sqlx::query(
                    "UPDATE votes SET vote_type = $4 WHERE content_type = $1 AND object_id = $2 AND user_id = $3",
                )
                .bind(&target.content_type)
                .bind(target.object_id)
                .bind(user_id)
                .bind(encode_vote_type(vote_type))
                .execute(&mut *tx)
                .await?;
                TransitionKind::Updated
            }
        };

        tx.commit().await?;
        Ok(kind)
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn row_to_vote(
    (user_id, content_type, object_id, vote_type, voted_at): VoteRow,
) -> Result<Vote, VoteLedgerError> {
    let timestamp = voted_at.unix_timestamp();
    let voted_at =
        u64::try_from(timestamp).map_err(|_| VoteLedgerError::InvalidTimestamp(timestamp))?;
    Ok(Vote {
        user_id,
        target: TargetRef {
            content_type,
            object_id,
        },
        vote_type: decode_vote_type(vote_type)?,
        voted_at,
    })
}

#[async_trait]
impl VoteLedger for PostgresVoteLedger {
    async fn votes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
        let rows: Vec<VoteRow> = sqlx::query_as(
            r#"
            SELECT user_id, content_type, object_id, vote_type, voted_at
            FROM votes
            WHERE content_type = $1 AND object_id = $2
            ORDER BY id
            "#,
        )
        .bind(&target.content_type)
        .bind(target.object_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_vote).collect()
    }

    async fn user_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<Option<VoteValue>, VoteLedgerError> {
        let vote_type: Option<i16> = sqlx::query_scalar(
            "SELECT vote_type FROM votes WHERE content_type = $1 AND object_id = $2 AND user_id = $3",
        )
        .bind(&target.content_type)
        .bind(target.object_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        vote_type.map(decode_vote_type).transpose()
    }

    /// Toggles a vote, retrying once when a concurrent insert wins the race.
    #[instrument(skip(self, target), fields(vote_target = %target))]
    async fn record_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError> {
        let strategy = FixedInterval::from_millis(CONFLICT_RETRY_DELAY_MS).take(CONFLICT_RETRIES);
        let kind = RetryIf::spawn(
            strategy,
            || self.record_vote_tx(target, user_id, vote_type),
            |e: &VoteLedgerError| {
                let retry = e.is_retryable();
                if retry {
                    warn!(error = %e, "vote insert lost a race, retrying");
                }
                retry
            },
        )
        .await?;

        debug!(kind = %kind, "recorded vote");
        Ok(kind)
    }

    async fn votes_count(&self, target: &TargetRef) -> Result<VotesCount, VoteLedgerError> {
        let (upvotes, downvotes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE vote_type = 0),
                COUNT(*) FILTER (WHERE vote_type = 1)
            FROM votes
            WHERE content_type = $1 AND object_id = $2
            "#,
        )
        .bind(&target.content_type)
        .bind(target.object_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(VotesCount {
            target: target.clone(),
            upvotes,
            downvotes,
        })
    }

    async fn delete_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<(), VoteLedgerError> {
        sqlx::query("DELETE FROM votes WHERE content_type = $1 AND object_id = $2 AND user_id = $3")
            .bind(&target.content_type)
            .bind(target.object_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

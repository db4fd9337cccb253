//! PostgreSQL implementation of the reputation store.
//!
//! Balances live in the `profiles` table. Changes are applied with a single
//! upsert that increments in SQL, so concurrent adjustments never overwrite
//! each other.
use async_trait::async_trait;
use forum_votes_shared::types::UserId;
use tracing::debug;

use crate::errors::ReputationStoreError;
use crate::interfaces::ReputationStore;

/// PostgreSQL-backed reputation balances.
pub struct PostgresReputationStore {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresReputationStore {
    /// Creates a new reputation store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with required schema (profiles table)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, ReputationStoreError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl ReputationStore for PostgresReputationStore {
    async fn balance(&self, user_id: UserId) -> Result<i64, ReputationStoreError> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT reputation_points FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance.unwrap_or(0))
    }

    async fn apply_change(&self, user_id: UserId, points: i64) -> Result<(), ReputationStoreError> {
        if points == 0 {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, reputation_points)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET reputation_points = profiles.reputation_points + EXCLUDED.reputation_points
            "#,
        )
        .bind(user_id)
        .bind(points)
        .execute(&self.pool)
        .await?;

        debug!(user_id, points, "applied reputation change");
        Ok(())
    }
}

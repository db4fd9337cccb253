//! PostgreSQL implementation of the target directory, backed by the
//! `voteable_targets` table.
//!
//! Acceptance changes lock the parent's row first, so two answers to the same
//! question can never be accepted concurrently.
use async_trait::async_trait;
use forum_votes_shared::types::{ObjectId, Target, TargetRef, UserId};
use tracing::debug;

use crate::errors::TargetDirectoryError;
use crate::interfaces::{AcceptanceChange, TargetDirectory, TargetRecord};

type TargetRow = (String, i64, Option<i64>, Option<String>, Option<i64>, bool);

pub struct PostgresTargetDirectory {
    pool: sqlx::PgPool,
}

impl PostgresTargetDirectory {
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, TargetDirectoryError> {
        Ok(Self { pool })
    }
}

fn row_to_record(row: TargetRow) -> TargetRecord {
    let (content_type, object_id, author_id, parent_content_type, parent_object_id, accepted) = row;
    let parent = match (parent_content_type, parent_object_id) {
        (Some(content_type), Some(object_id)) => Some(TargetRef {
            content_type,
            object_id,
        }),
        _ => None,
    };
    TargetRecord {
        target: Target {
            reference: TargetRef {
                content_type,
                object_id,
            },
            author_id,
            parent,
        },
        accepted,
    }
}

#[async_trait]
impl TargetDirectory for PostgresTargetDirectory {
    async fn resolve(
        &self,
        content_type: &str,
        object_id: ObjectId,
    ) -> Result<Option<Target>, TargetDirectoryError> {
        let reference = TargetRef::new(content_type, object_id);
        let row: Option<TargetRow> = sqlx::query_as(
            r#"
            SELECT content_type, object_id, author_id, parent_content_type, parent_object_id, is_accepted
            FROM voteable_targets
            WHERE content_type = $1 AND object_id = $2
            "#,
        )
        .bind(&reference.content_type)
        .bind(reference.object_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row_to_record(row).target))
    }

    async fn register(&self, target: &Target) -> Result<(), TargetDirectoryError> {
        let parent = target.parent.as_ref();
        sqlx::query(
            r#"
            INSERT INTO voteable_targets
                (content_type, object_id, author_id, parent_content_type, parent_object_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (content_type, object_id)
            DO UPDATE SET
                author_id = EXCLUDED.author_id,
                parent_content_type = EXCLUDED.parent_content_type,
                parent_object_id = EXCLUDED.parent_object_id
            "#,
        )
        .bind(&target.reference.content_type)
        .bind(target.reference.object_id)
        .bind(target.author_id)
        .bind(parent.map(|p| p.content_type.as_str()))
        .bind(parent.map(|p| p.object_id))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn authored_by(
        &self,
        author_id: UserId,
    ) -> Result<Vec<TargetRecord>, TargetDirectoryError> {
        let rows: Vec<TargetRow> = sqlx::query_as(
            r#"
            SELECT content_type, object_id, author_id, parent_content_type, parent_object_id, is_accepted
            FROM voteable_targets
            WHERE author_id = $1
            ORDER BY content_type, object_id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn is_accepted(&self, target: &TargetRef) -> Result<bool, TargetDirectoryError> {
        let accepted: Option<bool> = sqlx::query_scalar(
            "SELECT is_accepted FROM voteable_targets WHERE content_type = $1 AND object_id = $2",
        )
        .bind(&target.content_type)
        .bind(target.object_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(accepted.unwrap_or(false))
    }

    async fn set_accepted(
        &self,
        answer: &TargetRef,
        accepted: bool,
    ) -> Result<Option<AcceptanceChange>, TargetDirectoryError> {
        let mut tx = self.pool.begin().await?;

        let parent: Option<(Option<String>, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT parent_content_type, parent_object_id FROM voteable_targets
            WHERE content_type = $1 AND object_id = $2
            "#,
        )
        .bind(&answer.content_type)
        .bind(answer.object_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(parent) = parent else {
            return Ok(None);
        };
        let parent = match parent {
            (Some(content_type), Some(object_id)) => Some(TargetRef {
                content_type,
                object_id,
            }),
            _ => None,
        };

        if let Some(parent) = &parent {
            sqlx::query(
                "SELECT 1 FROM voteable_targets WHERE content_type = $1 AND object_id = $2 FOR UPDATE",
            )
            .bind(&parent.content_type)
            .bind(parent.object_id)
            .fetch_optional(&mut *tx)
            .await?;
        }

        let current: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT is_accepted FROM voteable_targets
            WHERE content_type = $1 AND object_id = $2
            FOR UPDATE
            "#,
        )
        .bind(&answer.content_type)
        .bind(answer.object_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            return Ok(None);
        };
        if current == accepted {
            return Ok(Some(AcceptanceChange::default()));
        }

        let mut unaccepted = Vec::new();
        if let (true, Some(parent)) = (accepted, &parent) {
            let rows: Vec<TargetRow> = sqlx::query_as(
                r#"
                UPDATE voteable_targets SET is_accepted = FALSE
                WHERE parent_content_type = $1 AND parent_object_id = $2
                  AND is_accepted
                  AND NOT (content_type = $3 AND object_id = $4)
                RETURNING content_type, object_id, author_id, parent_content_type, parent_object_id, is_accepted
                "#,
            )
            .bind(&parent.content_type)
            .bind(parent.object_id)
            .bind(&answer.content_type)
            .bind(answer.object_id)
            .fetch_all(&mut *tx)
            .await?;
            unaccepted = rows.into_iter().map(|row| row_to_record(row).target).collect();
        }

        sqlx::query(
            "UPDATE voteable_targets SET is_accepted = $3 WHERE content_type = $1 AND object_id = $2",
        )
        .bind(&answer.content_type)
        .bind(answer.object_id)
        .bind(accepted)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(answer = %answer, accepted, unaccepted = unaccepted.len(), "changed acceptance");
        Ok(Some(AcceptanceChange {
            changed: true,
            unaccepted,
        }))
    }
}

use forum_votes_shared::types::UserId;
use crate::errors::ReputationStoreError;

/// Trait for the store holding each user's reputation balance.
///
/// Balances only change through `apply_change`, which must be an atomic
/// increment so concurrent votes on the same author never lose updates.
#[async_trait::async_trait]
pub trait ReputationStore: Send + Sync {
    /// Current balance of `user_id`; users without a profile row have 0.
    async fn balance(&self, user_id: UserId) -> Result<i64, ReputationStoreError>;

    /// Adds `points` (possibly negative) to the balance of `user_id`.
    async fn apply_change(&self, user_id: UserId, points: i64) -> Result<(), ReputationStoreError>;
}

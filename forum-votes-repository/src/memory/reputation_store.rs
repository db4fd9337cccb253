use std::collections::HashMap;

use async_trait::async_trait;
use forum_votes_shared::types::UserId;
use tokio::sync::RwLock;

use crate::errors::ReputationStoreError;
use crate::interfaces::ReputationStore;

/// Process-local reputation balances.
#[derive(Default)]
pub struct InMemoryReputationStore {
    balances: RwLock<HashMap<UserId, i64>>,
}

impl InMemoryReputationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reset(&self) {
        self.balances.write().await.clear();
    }
}

#[async_trait]
impl ReputationStore for InMemoryReputationStore {
    async fn balance(&self, user_id: UserId) -> Result<i64, ReputationStoreError> {
        Ok(self.balances.read().await.get(&user_id).copied().unwrap_or(0))
    }

    async fn apply_change(&self, user_id: UserId, points: i64) -> Result<(), ReputationStoreError> {
        if points == 0 {
            return Ok(());
        }
        *self.balances.write().await.entry(user_id).or_insert(0) += points;
        Ok(())
    }
}

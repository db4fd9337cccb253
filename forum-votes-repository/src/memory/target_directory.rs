use std::collections::HashMap;

use async_trait::async_trait;
use forum_votes_shared::types::{ObjectId, Target, TargetRef, UserId};
use tokio::sync::RwLock;

use crate::errors::TargetDirectoryError;
use crate::interfaces::{AcceptanceChange, TargetDirectory, TargetRecord};

/// Process-local registry of voteable targets.
#[derive(Default)]
pub struct InMemoryTargetDirectory {
    targets: RwLock<HashMap<TargetRef, TargetRecord>>,
}

impl InMemoryTargetDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TargetDirectory for InMemoryTargetDirectory {
    async fn resolve(
        &self,
        content_type: &str,
        object_id: ObjectId,
    ) -> Result<Option<Target>, TargetDirectoryError> {
        let key = TargetRef::new(content_type, object_id);
        Ok(self.targets.read().await.get(&key).map(|record| record.target.clone()))
    }

    async fn register(&self, target: &Target) -> Result<(), TargetDirectoryError> {
        let mut targets = self.targets.write().await;
        let accepted = targets
            .get(&target.reference)
            .is_some_and(|record| record.accepted);
        targets.insert(
            target.reference.clone(),
            TargetRecord {
                target: target.clone(),
                accepted,
            },
        );
        Ok(())
    }

    async fn authored_by(
        &self,
        author_id: UserId,
    ) -> Result<Vec<TargetRecord>, TargetDirectoryError> {
        let targets = self.targets.read().await;
        let mut authored: Vec<TargetRecord> = targets
            .values()
            .filter(|record| record.target.is_authored_by(author_id))
            .cloned()
            .collect();
        authored.sort_by(|a, b| a.target.reference.cmp(&b.target.reference));
        Ok(authored)
    }

    async fn is_accepted(&self, target: &TargetRef) -> Result<bool, TargetDirectoryError> {
        Ok(self
            .targets
            .read()
            .await
            .get(target)
            .is_some_and(|record| record.accepted))
    }

    async fn set_accepted(
        &self,
        answer: &TargetRef,
        accepted: bool,
    ) -> Result<Option<AcceptanceChange>, TargetDirectoryError> {
        let mut targets = self.targets.write().await;
        let Some(record) = targets.get(answer) else {
            return Ok(None);
        };
        if record.accepted == accepted {
            return Ok(Some(AcceptanceChange::default()));
        }
        let parent = record.target.parent.clone();

        let mut unaccepted = Vec::new();
        if accepted {
            if let Some(parent) = &parent {
                for (reference, sibling) in targets.iter_mut() {
                    if reference != answer
                        && sibling.accepted
                        && sibling.target.parent.as_ref() == Some(parent)
                    {
                        sibling.accepted = false;
                        unaccepted.push(sibling.target.clone());
                    }
                }
            }
        }

        if let Some(record) = targets.get_mut(answer) {
            record.accepted = accepted;
        }
        Ok(Some(AcceptanceChange {
            changed: true,
            unaccepted,
        }))
    }
}

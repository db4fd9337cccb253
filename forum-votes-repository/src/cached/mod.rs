//! Read-through caching decorator for any `VoteLedger`.
//!
//! Two kinds of entries are cached per target:
//!
//! - `votes:{content_type}:{object_id}:all` - every vote on the target
//! - `votes:{content_type}:{object_id}:user:{user_id}` - one user's vote
//!
//! Entries expire after a fixed TTL. Every mutation invalidates both entries
//! for the affected (target, user) pair before returning, so readers never
//! observe a stale value for a key they just changed.
//!
//! Invalidation also bumps an epoch. A miss records the epoch before reading
//! the inner ledger and only stores its result if the epoch is unchanged, so
//! a read that raced a mutation cannot put the old value back.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forum_votes_shared::types::{TargetRef, TransitionKind, UserId, Vote, VoteValue};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::VoteLedgerError;
use crate::interfaces::VoteLedger;

/// Default lifetime of a cache entry.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 5);

const CACHE_PREFIX: &str = "votes";

#[derive(Clone)]
enum CachedValue {
    Votes(Vec<Vote>),
    UserVote(Option<VoteValue>),
}

struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped by every invalidation.
    epoch: u64,
}

/// Caching vote ledger that wraps another ledger.
///
/// A zero TTL disables caching: every read goes to the inner ledger and
/// nothing is retained.
pub struct CachedVoteLedger<L> {
    /// The ledger consulted on cache misses and for every mutation
    inner: L,
    cache: RwLock<CacheState>,
    ttl: Duration,
}

impl<L: VoteLedger> CachedVoteLedger<L> {
    pub fn new(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RwLock::new(CacheState::default()),
            ttl,
        }
    }

    pub fn with_default_ttl(inner: L) -> Self {
        Self::new(inner, DEFAULT_CACHE_TTL)
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn cache_key(target: &TargetRef, suffix: &str) -> String {
        format!(
            "{CACHE_PREFIX}:{}:{}:{suffix}",
            target.content_type, target.object_id
        )
    }

    fn all_key(target: &TargetRef) -> String {
        Self::cache_key(target, "all")
    }

    fn user_key(target: &TargetRef, user_id: UserId) -> String {
        Self::cache_key(target, &format!("user:{user_id}"))
    }

    /// Returns the live entry for `key` together with the current epoch.
    async fn lookup(&self, key: &str) -> (Option<CachedValue>, u64) {
        let cache = self.cache.read().await;
        let value = match cache.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!(key, "vote cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!(key, "vote cache entry expired");
                None
            }
            None => None,
        };
        (value, cache.epoch)
    }

    /// Stores `value` unless caching is disabled or an invalidation happened
    /// since `epoch` was observed.
    async fn store(&self, key: String, value: CachedValue, epoch: u64) {
        if self.ttl.is_zero() {
            return;
        }
        let mut cache = self.cache.write().await;
        if cache.epoch != epoch {
            debug!(key, "vote cache fill skipped after concurrent mutation");
            return;
        }
        cache.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    async fn invalidate(&self, target: &TargetRef, user_id: UserId) {
        let mut cache = self.cache.write().await;
        cache.entries.remove(&Self::all_key(target));
        cache.entries.remove(&Self::user_key(target, user_id));
        cache.epoch = cache.epoch.wrapping_add(1);
    }

    /// Removes expired entries and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut cache = self.cache.write().await;
        let before = cache.entries.len();
        cache.entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        before - cache.entries.len()
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.cache.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.entries.is_empty()
    }
}

#[async_trait]
impl<L: VoteLedger> VoteLedger for CachedVoteLedger<L> {
    async fn votes_for(&self, target: &TargetRef) -> Result<Vec<Vote>, VoteLedgerError> {
        let key = Self::all_key(target);
        let (cached, epoch) = self.lookup(&key).await;
        if let Some(CachedValue::Votes(votes)) = cached {
            return Ok(votes);
        }

        let votes = self.inner.votes_for(target).await?;
        self.store(key, CachedValue::Votes(votes.clone()), epoch).await;
        Ok(votes)
    }

    async fn user_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<Option<VoteValue>, VoteLedgerError> {
        let key = Self::user_key(target, user_id);
        let (cached, epoch) = self.lookup(&key).await;
        if let Some(CachedValue::UserVote(vote_type)) = cached {
            return Ok(vote_type);
        }

        let vote_type = self.inner.user_vote(target, user_id).await?;
        self.store(key, CachedValue::UserVote(vote_type), epoch).await;
        Ok(vote_type)
    }

    async fn record_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
        vote_type: VoteValue,
    ) -> Result<TransitionKind, VoteLedgerError> {
        let result = self.inner.record_vote(target, user_id, vote_type).await;
        self.invalidate(target, user_id).await;
        result
    }

    async fn delete_vote(
        &self,
        target: &TargetRef,
        user_id: UserId,
    ) -> Result<(), VoteLedgerError> {
        let result = self.inner.delete_vote(target, user_id).await;
        self.invalidate(target, user_id).await;
        result
    }
}

/// Spawns a task that periodically purges expired entries from `cache`.
///
/// Returns `None` without spawning when `every` is zero.
pub fn spawn_cache_cleanup_task<L>(
    cache: Arc<CachedVoteLedger<L>>,
    every: Duration,
) -> Option<JoinHandle<()>>
where
    L: VoteLedger + 'static,
{
    if every.is_zero() {
        warn!("vote cache cleanup period is zero, not spawning cleanup task");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let purged = cache.purge_expired().await;
            debug!(purged, "purged expired vote cache entries");
        }
    }))
}

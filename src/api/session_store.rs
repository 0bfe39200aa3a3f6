//! 页面会话存储 - 每次打开页面对应一个视图实例
//!
//! A page view owns its view state for as long as the page is open. Opening
//! the page without a session id starts from scratch; idle sessions expire.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

struct Entry<V> {
    view: Arc<V>,
    last_seen: Instant,
}

/// In-memory map from page session id to view.
pub struct ViewStore<V> {
    entries: RwLock<HashMap<Uuid, Entry<V>>>,
    idle_ttl: Duration,
    capacity: usize,
}

impl<V> ViewStore<V> {
    pub fn new(idle_ttl: Duration, capacity: usize) -> Self {
        Self { entries: RwLock::new(HashMap::new()), idle_ttl, capacity: capacity.max(1) }
    }

    /// Reuses the session `id` when it is still live, otherwise creates a new
    /// view with `make`.
    pub async fn open(&self, id: Option<Uuid>, make: impl FnOnce() -> V) -> (Uuid, Arc<V>) {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        if let Some(entry) = id.and_then(|id| entries.get_mut(&id).map(|e| (id, e))) {
            let (id, entry) = entry;
            if now.duration_since(entry.last_seen) <= self.idle_ttl {
                entry.last_seen = now;
                return (id, entry.view.clone());
            }
        }

        if entries.len() >= self.capacity {
            Self::evict_oldest(&mut entries);
        }

        let id = Uuid::new_v4();
        let view = Arc::new(make());
        entries.insert(id, Entry { view: view.clone(), last_seen: now });
        tracing::debug!("page session opened: {}", id);
        (id, view)
    }

    /// Looks up a live session and marks it as seen.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<V>> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let entry = entries.get_mut(id)?;
        if now.duration_since(entry.last_seen) > self.idle_ttl {
            entries.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.view.clone())
    }

    /// 清理过期会话（定期任务）
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let initial_count = entries.len();

        entries.retain(|_, e| now.duration_since(e.last_seen) <= self.idle_ttl);

        let removed = initial_count - entries.len();
        if removed > 0 {
            tracing::info!("removed {} idle page sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn evict_oldest(entries: &mut HashMap<Uuid, Entry<V>>) {
        let oldest = entries.iter().min_by_key(|(_, e)| e.last_seen).map(|(id, _)| *id);
        if let Some(id) = oldest {
            entries.remove(&id);
            tracing::warn!("page session store full, evicted {}", id);
        }
    }
}

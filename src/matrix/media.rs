//! Recently seen media.
//!
//! Image events seen during sync are remembered here by event ID, up to a fixed
//! capacity, so `/sticker` rarely needs to fetch the event again. Older images are
//! forgotten first and are then fetched from the homeserver.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

/// Number of images remembered by the Matrix client.
pub const MEDIA_CACHE_CAPACITY: usize = 256;

/// Bounded map from event ID to media, evicting the oldest insertions.
#[derive(Debug)]
pub struct MediaCache<T> {
    capacity: usize,
    inner: Mutex<Entries<T>>,
}

#[derive(Debug)]
struct Entries<T> {
    items: HashMap<String, T>,
    order: VecDeque<String>,
}

impl<T: Clone> MediaCache<T> {
    pub fn new(capacity: usize) -> Self {
        MediaCache {
            capacity,
            inner: Mutex::new(Entries {
                items: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Remembers `media` for `event_id`.
    pub fn insert(&self, event_id: &str, media: T) {
        let mut entries = self.lock();

        if entries.items.insert(event_id.to_owned(), media).is_none() {
            entries.order.push_back(event_id.to_owned());
        }

        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.items.remove(&oldest);
            }
        }
    }

    /// Returns the media of `event_id`, if still remembered.
    pub fn get(&self, event_id: &str) -> Option<T> {
        self.lock().items.get(event_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries<T>> {
        // The entries stay consistent even if a holder panicked
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_inserted() {
        let cache = MediaCache::new(4);
        cache.insert("$a", 1);

        assert_eq!(cache.get("$a"), Some(1));
        assert_eq!(cache.get("$b"), None);
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let cache = MediaCache::new(2);
        cache.insert("$a", 1);
        cache.insert("$b", 2);
        cache.insert("$c", 3);

        assert_eq!(cache.get("$a"), None);
        assert_eq!(cache.get("$b"), Some(2));
        assert_eq!(cache.get("$c"), Some(3));
    }

    #[test]
    fn test_reinsert_replaces_without_growing() {
        let cache = MediaCache::new(2);
        cache.insert("$a", 1);
        cache.insert("$a", 10);
        cache.insert("$b", 2);

        assert_eq!(cache.get("$a"), Some(10));
        assert_eq!(cache.get("$b"), Some(2));
    }
}

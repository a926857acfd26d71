//! State blob handed to the host by `getChunk`.
//!
//! The host receives a raw pointer into memory the plugin still owns, with
//! no call telling the plugin when the host is done with it. The blob is kept
//! until the next `getChunk`/`setChunk`, or until it is older than
//! [`CHUNK_LIFETIME`] when housekeeping runs.

use std::time::{Duration, Instant};

/// How long a returned chunk stays alive without being replaced.
pub const CHUNK_LIFETIME: Duration = Duration::from_millis(2000);

#[derive(Debug, Default)]
pub struct ChunkCache {
    data: Option<Vec<u8>>,
    stored_at: Option<Instant>,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `data` alive and return a pointer to it along with its length.
    pub fn store(&mut self, data: Vec<u8>, now: Instant) -> (*const u8, usize) {
        let len = data.len();
        let data = self.data.insert(data);
        self.stored_at = Some(now);
        (data.as_ptr(), len)
    }

    pub fn clear(&mut self) {
        self.data = None;
        self.stored_at = None;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Free the blob once it is older than [`CHUNK_LIFETIME`].
    ///
    /// Returns `true` when something was freed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.stored_at {
            Some(stored_at) if now.saturating_duration_since(stored_at) > CHUNK_LIFETIME => {
                log::debug!("Releasing state chunk after {:?}", CHUNK_LIFETIME);
                self.clear();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_expires_after_lifetime() {
        let start = Instant::now();
        let mut cache = ChunkCache::new();
        let (ptr, len) = cache.store(vec![1, 2, 3], start);
        assert!(!ptr.is_null());
        assert_eq!(len, 3);

        assert!(!cache.tick(start + Duration::from_millis(1500)));
        assert!(!cache.is_empty());
        assert!(cache.tick(start + Duration::from_millis(2500)));
        assert!(cache.is_empty());
        assert!(!cache.tick(start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_store_replaces_previous_chunk() {
        let start = Instant::now();
        let mut cache = ChunkCache::new();
        cache.store(vec![0; 16], start);
        let (_, len) = cache.store(vec![7; 4], start + Duration::from_millis(1900));

        assert_eq!(len, 4);
        // Timestamp was refreshed by the second store.
        assert!(!cache.tick(start + Duration::from_millis(2500)));
    }
}

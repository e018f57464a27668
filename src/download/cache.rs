use std::{num::NonZeroUsize, sync::Arc};

use lru::LruCache;

use crate::types::AlbumMetadata;

/// Bounded album cache with least-recently-used eviction.
///
/// Entries carry their cover art once it has been fetched, so a hit also
/// saves the image download. The cache is owned by a single
/// [`Downloader`](super::Downloader) and is never shared between tasks.
pub struct AlbumCache {
    entries: LruCache<String, Arc<AlbumMetadata>>,
}

impl AlbumCache {
    /// Creates a cache holding at most `capacity` albums. Zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks for an album without changing its recency.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }

    /// Looks up an album and marks it as most recently used.
    pub fn get(&mut self, id: &str) -> Option<Arc<AlbumMetadata>> {
        self.entries.get(id).cloned()
    }

    /// Inserts or replaces an album, evicting the least recently used entry when full.
    pub fn insert(&mut self, album: AlbumMetadata) -> Arc<AlbumMetadata> {
        let album = Arc::new(album);
        self.entries.put(album.id.clone(), Arc::clone(&album));
        album
    }
}

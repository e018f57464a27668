//! # Download Pipeline Module
//!
//! This module turns catalog entries into tagged FLAC files on disk. It owns
//! the per-track materialization state machine and the orchestration of whole
//! albums and arbitrary track lists (playlists, favourites, single tracks).
//!
//! ## Track lifecycle
//!
//! ```text
//! Pending → Downloading → Downloaded → Tagging → Finalized
//!    │            └─────────────┴──────────┴──→ Aborted
//!    └──→ Skipped(AlreadyExists | Unavailable)
//! ```
//!
//! Every transition is reported to a caller-supplied callback, which is how
//! the CLI drives its progress bars. The library itself never prints.
//!
//! ## Files
//!
//! For a track `<artist> - <title>` inside `<root>/<album artist>/<album>/`:
//!
//! - `<stem>.part` receives the raw stream
//! - `<stem>.flac.tmp` receives the tagged container
//! - `<stem>.flac` appears only through an atomic rename of the staging file
//!
//! After an abort neither temporary file is left behind.
//!
//! ## Albums
//!
//! Albums are processed sequentially in catalog order. Skipped tracks do not
//! stop the album; the first aborted track halts it with
//! [`TidlError::AlbumHalted`]. Tracks finalized before the halt stay on disk
//! and are skipped by the next run.
//!
//! Album metadata, cover art included, is kept in a bounded LRU
//! [`AlbumCache`] so that the art of an album is fetched once per run no
//! matter how many of its tracks are downloaded.
//!
//! ## Submodules
//!
//! - [`cache`] - bounded album cache
//! - [`track`] - single-track materialization

pub mod cache;
pub mod track;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;

use crate::{
    Res, TidlError, config,
    types::{Album, AlbumMetadata, AudioQuality, Track, TrackMetadata},
    utils,
};

pub use cache::AlbumCache;
pub use track::{SkipReason, TrackOutcome, TrackState, materialize_track};

/// Catalog operations the pipeline depends on.
///
/// [`TidalClient`](crate::tidal::TidalClient) is the production
/// implementation; anything that can resolve albums, stream locations and
/// bytes can drive the pipeline.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn album(&self, id: &str) -> Res<Album>;

    /// Tracks of an album in catalog order.
    async fn album_tracks(&self, id: &str) -> Res<Vec<Track>>;

    /// Stream location of a track; empty when nothing is offered at `quality`.
    async fn stream_url(&self, track_id: &str, quality: AudioQuality) -> Res<String>;

    async fn cover_art(&self, album: &AlbumMetadata) -> Res<Vec<u8>>;

    /// Writes the body at `url` to `dest` and returns the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Res<u64>;
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub root: PathBuf,
    pub quality: AudioQuality,
    /// Write `meta.json` and `album.jpg` next to album downloads.
    pub sidecars: bool,
    pub cache_size: usize,
}

impl DownloadOptions {
    pub fn from_config() -> Self {
        Self {
            root: config::download_dir(),
            quality: config::audio_quality(),
            sidecars: config::write_sidecars(),
            cache_size: config::album_cache_size(),
        }
    }
}

/// Tally of track outcomes for one album or track list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub finalized: usize,
    pub already_present: usize,
    pub unavailable: usize,
    pub bytes: u64,
}

impl DownloadSummary {
    fn record(&mut self, outcome: &TrackOutcome) {
        match outcome {
            TrackOutcome::Finalized { bytes, .. } => {
                self.finalized += 1;
                self.bytes += bytes;
            }
            TrackOutcome::Skipped(SkipReason::AlreadyExists) => self.already_present += 1,
            TrackOutcome::Skipped(SkipReason::Unavailable) => self.unavailable += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.finalized + self.already_present + self.unavailable
    }
}

/// Sequential downloader over a [`Catalog`].
pub struct Downloader<C> {
    catalog: C,
    cache: AlbumCache,
    options: DownloadOptions,
}

impl<C: Catalog> Downloader<C> {
    pub fn new(catalog: C, options: DownloadOptions) -> Self {
        Self {
            cache: AlbumCache::new(options.cache_size),
            catalog,
            options,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolves an album through the cache.
    ///
    /// On a miss the album is fetched and, when it is available, its cover
    /// art too. Unavailable albums are cached without art.
    pub async fn resolve_album(&mut self, id: &str) -> Res<Arc<AlbumMetadata>> {
        if let Some(album) = self.cache.get(id) {
            return Ok(album);
        }

        let album = self.catalog.album(id).await?;
        let mut metadata = AlbumMetadata::from(&album);
        if metadata.is_available() {
            metadata.art = Some(self.catalog.cover_art(&metadata).await?);
        }

        Ok(self.cache.insert(metadata))
    }

    /// Downloads every track of an album.
    ///
    /// # Errors
    ///
    /// - [`TidlError::Unavailable`] if the album has nothing to stream;
    ///   no directory is created in that case
    /// - [`TidlError::AlbumHalted`] wrapping the first track failure
    /// - any error resolving the album, its tracks or its art
    pub async fn download_album(
        &mut self,
        id: &str,
        progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
    ) -> Res<DownloadSummary> {
        let album = self.resolve_album(id).await?;
        if !album.is_available() {
            return Err(TidlError::Unavailable(format!(
                "album '{}' by {}",
                album.title, album.artist
            )));
        }

        let tracks = self.catalog.album_tracks(id).await?;

        let dir = utils::album_dir(&self.options.root, &album);
        async_fs::create_dir_all(&dir)
            .await
            .map_err(|e| TidlError::filesystem(&dir, e))?;
        if self.options.sidecars {
            write_sidecars(&dir, &album).await?;
        }

        let mut summary = DownloadSummary::default();
        for (index, track) in tracks.iter().enumerate() {
            let metadata = TrackMetadata::new(track, &album);
            let outcome = materialize_track(
                &self.catalog,
                &metadata,
                &dir,
                self.options.quality,
                progress,
            )
            .await
            .map_err(|e| TidlError::AlbumHalted {
                album: album.title.clone(),
                track: metadata.title.clone(),
                position: index + 1,
                source: Box::new(e),
            })?;
            summary.record(&outcome);
        }

        Ok(summary)
    }

    /// Downloads tracks that may belong to different albums.
    ///
    /// Each track lands in its own album's directory. Tracks of unavailable
    /// albums, including albums without cover art, are skipped as unavailable.
    /// Any other failure stops the list.
    pub async fn download_tracks(
        &mut self,
        tracks: &[Track],
        progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
    ) -> Res<DownloadSummary> {
        let mut summary = DownloadSummary::default();

        for track in tracks {
            // an album without streams or cover art skips its tracks, not the list
            let album = match self.resolve_album(&track.album.id.to_string()).await {
                Ok(album) if album.is_available() => album,
                Ok(album) => {
                    skip_unavailable(&TrackMetadata::new(track, &album), &mut summary, progress);
                    continue;
                }
                Err(e) if e.is_unavailable() => {
                    let album = AlbumMetadata::from(&track.album);
                    skip_unavailable(&TrackMetadata::new(track, &album), &mut summary, progress);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let metadata = TrackMetadata::new(track, &album);

            let dir = utils::album_dir(&self.options.root, &album);
            async_fs::create_dir_all(&dir)
                .await
                .map_err(|e| TidlError::filesystem(&dir, e))?;

            let outcome = materialize_track(
                &self.catalog,
                &metadata,
                &dir,
                self.options.quality,
                progress,
            )
            .await?;
            summary.record(&outcome);
        }

        Ok(summary)
    }
}

fn skip_unavailable(
    track: &TrackMetadata<'_>,
    summary: &mut DownloadSummary,
    progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
) {
    progress(track, TrackState::Skipped(SkipReason::Unavailable));
    summary.record(&TrackOutcome::Skipped(SkipReason::Unavailable));
}

async fn write_sidecars(dir: &Path, album: &AlbumMetadata) -> Res<()> {
    let meta_path = dir.join("meta.json");
    let json = serde_json::to_string_pretty(album)?;
    async_fs::write(&meta_path, json)
        .await
        .map_err(|e| TidlError::filesystem(&meta_path, e))?;

    if let Some(art) = &album.art {
        let art_path = dir.join("album.jpg");
        async_fs::write(&art_path, art)
            .await
            .map_err(|e| TidlError::filesystem(&art_path, e))?;
    }

    Ok(())
}

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tidl::{
    Res, TidlError,
    download::{Catalog, DownloadOptions, TrackState},
    flac::{
        Container, MetadataBlock,
        container::{PADDING, STREAMINFO},
    },
    types::{Album, AlbumMetadata, Artist, AudioQuality, Track, TrackMetadata},
};

pub const ARTIST: &str = "Test Artist";
pub const COVER_ART: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
pub const FRAMES: &[u8] = &[0xFF, 0xF8, 0x69, 0x98, 0x00, 0x10, 0xAB, 0xCD, 0xEF, 0x01];

/// A valid FLAC stream without comments: STREAMINFO, PADDING and fake frames.
pub fn raw_flac() -> Vec<u8> {
    Container {
        blocks: vec![
            MetadataBlock::Opaque {
                kind: STREAMINFO,
                data: (1..=34).collect(),
            },
            MetadataBlock::Opaque {
                kind: PADDING,
                data: vec![0; 32],
            },
        ],
        frames: FRAMES.to_vec(),
    }
    .to_bytes()
    .unwrap()
}

pub fn artist() -> Artist {
    Artist {
        id: 1,
        name: ARTIST.to_string(),
        kind: Some("MAIN".to_string()),
    }
}

pub fn album(id: u64, title: &str, tracks: u32, duration: u64) -> Album {
    Album {
        id,
        title: title.to_string(),
        artist: Some(artist()),
        artists: vec![artist()],
        number_of_tracks: tracks,
        copyright: Some("(P) 2017 Test Records".to_string()),
        release_date: Some("2017-05-12".to_string()),
        duration,
        cover: Some("0a1b2c3d-4e5f".to_string()),
        ..Default::default()
    }
}

pub fn track(id: u64, number: u32, title: &str, album: &Album) -> Track {
    Track {
        id,
        title: title.to_string(),
        artist: Some(artist()),
        artists: vec![artist()],
        album: album.clone(),
        track_number: number,
        volume_number: 1,
        duration: 200,
        ..Default::default()
    }
}

pub fn album_metadata(album: &Album) -> AlbumMetadata {
    let mut metadata = AlbumMetadata::from(album);
    metadata.art = Some(COVER_ART.to_vec());
    metadata
}

pub fn options(root: &Path) -> DownloadOptions {
    DownloadOptions {
        root: root.to_path_buf(),
        quality: AudioQuality::Lossless,
        sidecars: true,
        cache_size: 8,
    }
}

pub fn quiet() -> impl FnMut(&TrackMetadata<'_>, TrackState) + Send {
    |_: &TrackMetadata<'_>, _: TrackState| {}
}

/// In-memory catalog that counts every call.
#[derive(Default)]
pub struct FakeCatalog {
    pub albums: HashMap<String, Album>,
    pub album_tracks: HashMap<String, Vec<Track>>,
    /// Stream bytes per track id; tracks without an entry have no stream.
    pub streams: HashMap<String, Vec<u8>>,
    /// Track ids whose download breaks off after writing a few bytes.
    pub broken_downloads: HashSet<String>,
    /// Album ids whose cover art the catalog reports as unavailable.
    pub coverless: HashSet<String>,

    pub album_calls: AtomicUsize,
    pub stream_url_calls: AtomicUsize,
    pub cover_art_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_album(mut self, album: Album, tracks: Vec<Track>) -> Self {
        for track in &tracks {
            self.streams.insert(track.id.to_string(), raw_flac());
        }
        self.album_tracks.insert(album.id.to_string(), tracks);
        self.albums.insert(album.id.to_string(), album);
        self
    }

    pub fn without_stream(mut self, track_id: u64) -> Self {
        self.streams.remove(&track_id.to_string());
        self
    }

    pub fn with_stream(mut self, track_id: u64, bytes: Vec<u8>) -> Self {
        self.streams.insert(track_id.to_string(), bytes);
        self
    }

    pub fn with_broken_download(mut self, track_id: u64) -> Self {
        self.broken_downloads.insert(track_id.to_string());
        self
    }

    pub fn with_coverless_album(mut self, album_id: u64) -> Self {
        self.coverless.insert(album_id.to_string());
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn album(&self, id: &str) -> Res<Album> {
        self.album_calls.fetch_add(1, Ordering::SeqCst);
        self.albums.get(id).cloned().ok_or(TidlError::Service {
            status: 404,
            sub_status: 2001,
            message: format!("Album {} not found", id),
        })
    }

    async fn album_tracks(&self, id: &str) -> Res<Vec<Track>> {
        Ok(self.album_tracks.get(id).cloned().unwrap_or_default())
    }

    async fn stream_url(&self, track_id: &str, _quality: AudioQuality) -> Res<String> {
        self.stream_url_calls.fetch_add(1, Ordering::SeqCst);
        if self.streams.contains_key(track_id) {
            Ok(format!("fake://{}", track_id))
        } else {
            Ok(String::new())
        }
    }

    async fn cover_art(&self, album: &AlbumMetadata) -> Res<Vec<u8>> {
        self.cover_art_calls.fetch_add(1, Ordering::SeqCst);
        if self.coverless.contains(&album.id) {
            return Err(TidlError::Unavailable(format!(
                "album '{}' has no cover art",
                album.title
            )));
        }
        Ok(COVER_ART.to_vec())
    }

    async fn download(&self, url: &str, dest: &Path) -> Res<u64> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let track_id = url.trim_start_matches("fake://");
        let bytes = self.streams.get(track_id).cloned().unwrap_or_default();

        if self.broken_downloads.contains(track_id) {
            std::fs::write(dest, &bytes[..bytes.len().min(8)])
                .map_err(|e| TidlError::filesystem(dest, e))?;
            return Err(TidlError::Service {
                status: 503,
                sub_status: 0,
                message: "connection reset".to_string(),
            });
        }

        std::fs::write(dest, &bytes).map_err(|e| TidlError::filesystem(dest, e))?;
        Ok(bytes.len() as u64)
    }
}

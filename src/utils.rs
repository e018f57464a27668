use std::path::{Path, PathBuf};

use crate::types::{AlbumMetadata, AudioQuality, TrackMetadata};

/// Extension of finished downloads.
pub const FLAC_EXTENSION: &str = "flac";
/// Suffix of the raw stream while it is being downloaded.
pub const PART_EXTENSION: &str = "part";
/// Suffix of the tagged file before it is renamed into place.
pub const STAGING_EXTENSION: &str = "flac.tmp";

/// Random 16 bytes as 32 lowercase hex characters, with version 4 / variant bits set.
pub fn generate_client_unique_key() -> String {
    let mut bytes: [u8; 16] = rand::random();
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] | 0x40) & 0x7F;
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Replace path separators so catalog names can be used as file names.
pub fn clean(name: &str) -> String {
    name.replace('/', "\u{2215}")
}

/// `<root>/<album artist>/<album title>`
pub fn album_dir(root: &Path, album: &AlbumMetadata) -> PathBuf {
    root.join(clean(&album.artist)).join(clean(&album.title))
}

/// `<track artist> - <title>`, without extension.
pub fn track_file_stem(track: &TrackMetadata<'_>) -> String {
    format!("{} - {}", clean(&track.artist), clean(&track.title))
}

pub fn track_path(dir: &Path, track: &TrackMetadata<'_>, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", track_file_stem(track), extension))
}

/// Cover ids look like `aaaa-bbbb-...`; the image path uses `/` instead of `-`.
pub fn cover_url(resources_url: &str, cover: &str) -> String {
    format!(
        "{base}/{path}/1280x1280.jpg",
        base = resources_url.trim_end_matches('/'),
        path = cover.replace('-', "/")
    )
}

pub fn parse_audio_quality(s: &str) -> Result<AudioQuality, String> {
    let norm = s.trim().to_ascii_lowercase().replace('-', "_");
    if norm.is_empty() {
        return Err("quality cannot be empty".to_string());
    }

    match norm.as_str() {
        "lossless" => Ok(AudioQuality::Lossless),
        "hi_res" | "hires" => Ok(AudioQuality::HiRes),
        other => Err(format!(
            "invalid value '{}'; expected one of: {}",
            other,
            AudioQuality::ALL
                .iter()
                .map(|q| q.to_string().to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

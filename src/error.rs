//! Error taxonomy shared by the API client, the download pipeline and the CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::flac::{EncodeError, ParseError};

#[derive(Debug, Error)]
pub enum TidlError {
    /// Network failure or an unreadable response body.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// TIDAL answered with an error document.
    #[error("TIDAL error ({status}/{sub_status}): {message}")]
    Service {
        status: u16,
        sub_status: i64,
        message: String,
    },

    /// The resource exists but has nothing playable at the requested quality.
    #[error("{0} is unavailable")]
    Unavailable(String),

    #[error("malformed FLAC data: {0}")]
    Parse(#[from] ParseError),

    #[error("cannot encode FLAC data: {0}")]
    Encode(#[from] EncodeError),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("session error: {0}")]
    Session(String),

    /// A track aborted and the remaining tracks of the album were not attempted.
    #[error("album '{album}' halted at track {position} '{track}': {source}")]
    AlbumHalted {
        album: String,
        track: String,
        position: usize,
        #[source]
        source: Box<TidlError>,
    },
}

impl TidlError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TidlError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, TidlError::Unavailable(_))
    }
}

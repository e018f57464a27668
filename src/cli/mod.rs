//! # CLI Module
//!
//! This module provides the command-line interface layer for tidl, a TIDAL
//! client that downloads albums, playlists and tracks as tagged FLAC files. It
//! implements all user-facing commands and coordinates between the TIDAL API
//! client, the download pipeline, session storage and user interaction.
//!
//! ## Overview
//!
//! The CLI module is the only layer that talks to the terminal. Library code
//! reports progress through callbacks and returns errors; the functions in
//! here turn those into progress bars, tables and colored messages, and decide
//! when a failure ends the program.
//!
//! ## Command Categories
//!
//! ### Session
//!
//! - [`login`] - Username/password login, stores the session
//! - [`session`] - Shows and validates the stored session, or removes it
//!
//! ### Search
//!
//! - [`search_albums`], [`search_artists`], [`search_tracks`] - Catalog search
//!   printed as tables
//!
//! ### Downloads
//!
//! - [`download_albums`] - Albums by id
//! - [`download_artist`] - All albums of an artist, optionally EPs and singles
//! - [`download_playlist`] - Every track of a playlist
//! - [`download_tracks`] - Single tracks by id
//! - [`download_favorites`] - The user's favourite albums
//!
//! ### Files
//!
//! - [`inspect`] - Prints the metadata blocks and cover art of a FLAC file
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Download Pipeline / Session Management
//!     ↓
//! TIDAL API Layer
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! ## Error Handling
//!
//! - Unavailable albums are reported as warnings and the run continues
//! - A halted album, a failed login or a missing session end the program
//!   through `error!`
//! - Tracks that cannot be streamed are listed as skipped
//!
//! ## Usage Patterns
//!
//! ```bash
//! tidl login --username me@example.com      # Store a session
//! tidl search albums "kind of blue"         # Find album ids
//! tidl download album 77646168              # Download an album
//! tidl download artist 3346 --eps           # Albums, EPs and singles
//! tidl inspect "Miles Davis - So What.flac" # Check the written tags
//! ```

mod download;
mod inspect;
mod login;
mod search;

pub use download::{
    download_albums, download_artist, download_favorites, download_playlist, download_tracks,
};
pub use inspect::inspect;
pub use login::{login, session};
pub use search::{search_albums, search_artists, search_tracks};

use crate::{error, management::SessionManager, tidal::TidalClient};

/// Client for the stored session; ends the program when there is none.
pub(crate) async fn authorized_client() -> TidalClient {
    let manager = match SessionManager::load().await {
        Ok(m) => m,
        Err(e) => error!("{}", e),
    };

    match TidalClient::new(manager.into_session()) {
        Ok(client) => client,
        Err(e) => error!("Cannot create client. Err: {}", e),
    }
}

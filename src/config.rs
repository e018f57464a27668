//! Configuration management for the TIDAL downloader.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including API endpoints, credentials and download settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, TidlError, types::AudioQuality, utils};

const DEFAULT_API_URL: &str = "https://api.tidalhifi.com/v1";
const DEFAULT_RESOURCES_URL: &str = "https://resources.tidal.com/images";
const DEFAULT_API_TOKEN: &str = "kgsOOmYk3zShYrNP";
const DEFAULT_CLIENT_VERSION: &str = "1.9.1";
const DEFAULT_ALBUM_CACHE_SIZE: usize = 64;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `tidl/.env`. This allows users to store
/// credentials without passing them on every invocation.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/tidl/.env`
/// - macOS: `~/Library/Application Support/tidl/.env`
/// - Windows: `%LOCALAPPDATA%/tidl/.env`
///
/// A missing `.env` file is not an error: every setting has a default or can
/// come from the process environment.
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// # Example
///
/// ```
/// use tidl::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| TidlError::filesystem(parent, e))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| TidlError::filesystem(&path, std::io::Error::other(e.to_string())))?;
    Ok(())
}

/// Platform-specific data directory of the application (`<data_local_dir>/tidl`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tidl");
    path
}

/// Returns the TIDAL API base URL (`TIDAL_API_URL`), without trailing slash.
pub fn api_url() -> String {
    env::var("TIDAL_API_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Returns the image resources base URL (`TIDAL_RESOURCES_URL`).
pub fn resources_url() -> String {
    env::var("TIDAL_RESOURCES_URL")
        .unwrap_or_else(|_| DEFAULT_RESOURCES_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Returns the application token sent during login (`TIDAL_API_TOKEN`).
pub fn api_token() -> String {
    env::var("TIDAL_API_TOKEN").unwrap_or_else(|_| DEFAULT_API_TOKEN.to_string())
}

/// Returns the client version sent during login (`TIDAL_CLIENT_VERSION`).
pub fn client_version() -> String {
    env::var("TIDAL_CLIENT_VERSION").unwrap_or_else(|_| DEFAULT_CLIENT_VERSION.to_string())
}

/// Returns the account name used by `tidl login` when none is given (`TIDAL_USERNAME`).
pub fn username() -> Option<String> {
    env::var("TIDAL_USERNAME").ok()
}

/// Returns the account password used by `tidl login` when none is given (`TIDAL_PASSWORD`).
///
/// # Security Note
///
/// The password should be kept in the `.env` file of the data directory rather
/// than in shell history.
pub fn password() -> Option<String> {
    env::var("TIDAL_PASSWORD").ok()
}

/// Returns the root directory downloads are written to (`TIDL_DOWNLOAD_DIR`).
///
/// Defaults to the current working directory.
pub fn download_dir() -> PathBuf {
    env::var("TIDL_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Returns the stream quality to request (`TIDL_AUDIO_QUALITY`).
///
/// Unknown values fall back to `LOSSLESS`.
pub fn audio_quality() -> AudioQuality {
    env::var("TIDL_AUDIO_QUALITY")
        .ok()
        .and_then(|q| utils::parse_audio_quality(&q).ok())
        .unwrap_or_default()
}

/// Returns how many albums are kept in the in-memory album cache (`TIDL_ALBUM_CACHE_SIZE`).
pub fn album_cache_size() -> usize {
    env::var("TIDL_ALBUM_CACHE_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_ALBUM_CACHE_SIZE)
}

/// Returns the per-request timeout (`TIDL_REQUEST_TIMEOUT_SECS`).
///
/// Unset means requests wait for the transport's own deadline.
pub fn request_timeout() -> Option<Duration> {
    env::var("TIDL_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Returns whether `meta.json` and `album.jpg` are written next to album downloads (`TIDL_SIDECARS`).
pub fn write_sidecars() -> bool {
    env::var("TIDL_SIDECARS")
        .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(true)
}

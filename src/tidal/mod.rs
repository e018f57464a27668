//! # TIDAL Integration Module
//!
//! This module is the thin HTTP layer between tidl and the TIDAL API. It logs
//! in, resolves catalog entities (albums, tracks, playlists, artists,
//! favourites, search results), resolves stream locations and downloads cover
//! art and audio streams.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (commands, progress bars)
//!          ↓
//! Download Pipeline (Catalog trait)
//!          ↓
//! TIDAL Integration Layer
//!     ├── Authentication (username/password login, session check)
//!     ├── Catalog (albums, tracks, playlists, artists, favourites)
//!     └── Search (albums, artists, tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Requests
//!
//! Every catalog request carries the session id in the `X-Tidal-SessionId`
//! header and the session's `countryCode` as query parameter. Error
//! documents (`{"status", "subStatus", "userMessage"}`) are surfaced as
//! [`TidlError::Service`]. Nothing is retried here: retry policy belongs to
//! the caller.
//!
//! ## Submodules
//!
//! - [`auth`] - login and session validation
//! - [`catalog`] - catalog lookups, stream URLs, cover art and stream downloads
//! - [`search`] - free-text search

pub mod auth;
pub mod catalog;
pub mod search;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    Res, TidlError, config,
    types::{ErrorResponse, Session},
};

/// Authenticated TIDAL API client.
pub struct TidalClient {
    http: Client,
    api_url: String,
    resources_url: String,
    session: Session,
}

impl TidalClient {
    /// Client for the configured endpoints.
    pub fn new(session: Session) -> Res<Self> {
        Self::with_urls(session, config::api_url(), config::resources_url())
    }

    pub fn with_urls(
        session: Session,
        api_url: impl Into<String>,
        resources_url: impl Into<String>,
    ) -> Res<Self> {
        Ok(Self {
            http: http_client()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            resources_url: resources_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Res<T> {
        let url = format!("{}/{}", self.api_url, path);
        let response = self
            .http
            .get(&url)
            .header("X-Tidal-SessionId", &self.session.session_id)
            .query(query)
            .query(&[("countryCode", &self.session.country_code)])
            .send()
            .await?;

        let json = check_status(response).await?.json::<T>().await?;
        Ok(json)
    }
}

/// Shared HTTP client: cookie store on, optional request timeout.
pub fn http_client() -> Res<Client> {
    let mut builder = Client::builder()
        .cookie_store(true)
        .user_agent(format!("tidl/{}", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config::request_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Turn a non-success response into a [`TidlError::Service`].
async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) if !err.user_message.is_empty() => TidlError::Service {
            status: if err.status == 0 {
                status.as_u16()
            } else {
                err.status
            },
            sub_status: err.sub_status,
            message: err.user_message,
        },
        _ => TidlError::Service {
            status: status.as_u16(),
            sub_status: 0,
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body
            },
        },
    })
}

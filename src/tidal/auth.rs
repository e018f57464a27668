use chrono::Utc;
use serde::Deserialize;

use crate::{
    Res, config,
    tidal::{TidalClient, check_status, http_client},
    types::Session,
    utils,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    session_id: String,
    country_code: String,
    user_id: u64,
}

/// Logs in with username and password and returns a fresh session.
///
/// Posts the credentials together with the application token, a random
/// client key and the client version to `login/username`. Any non-success
/// status is reported as a service error carrying TIDAL's message.
///
/// # Example
///
/// ```
/// let session = tidal::auth::login("me@example.com", "secret").await?;
/// SessionManager::new(session).persist().await?;
/// ```
pub async fn login(username: &str, password: &str) -> Res<Session> {
    let client_unique_key = utils::generate_client_unique_key();
    let token = config::api_token();
    let client_version = config::client_version();

    let response = http_client()?
        .post(format!("{}/login/username", config::api_url()))
        .form(&[
            ("username", username),
            ("password", password),
            ("token", token.as_str()),
            ("clientUniqueKey", client_unique_key.as_str()),
            ("clientVersion", client_version.as_str()),
        ])
        .send()
        .await?;

    let login = check_status(response).await?.json::<LoginResponse>().await?;

    Ok(Session {
        session_id: login.session_id,
        country_code: login.country_code,
        user_id: login.user_id,
        obtained_at: Utc::now().timestamp(),
    })
}

impl TidalClient {
    /// Verifies that the stored session is still accepted.
    pub async fn check_session(&self) -> Res<()> {
        let path = format!("users/{}/subscription", self.session.user_id);
        self.get::<serde_json::Value>(&path, &[]).await?;
        Ok(())
    }
}

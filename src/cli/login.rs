use std::time::Duration;

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config, error, info,
    management::SessionManager,
    success,
    tidal::{self, TidalClient},
    warning,
};

/// Logs in and stores the new session.
///
/// Credentials given on the command line win over `TIDAL_USERNAME` and
/// `TIDAL_PASSWORD` from the environment.
pub async fn login(username: Option<String>, password: Option<String>) {
    let Some(username) = username.or_else(config::username) else {
        error!("No username given. Pass --username or set TIDAL_USERNAME.");
    };
    let Some(password) = password.or_else(config::password) else {
        error!("No password given. Pass --password or set TIDAL_PASSWORD.");
    };

    let pb = spinner(format!("Logging in as {}...", username));
    let session = match tidal::auth::login(&username, &password).await {
        Ok(s) => s,
        Err(e) => {
            pb.finish_and_clear();
            error!("Login failed. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    let manager = SessionManager::new(session);
    if let Err(e) = manager.persist().await {
        error!("Cannot store session. Err: {}", e);
    }

    let session = manager.current_session();
    success!(
        "Logged in as user {} ({})",
        session.user_id,
        session.country_code
    );
}

/// Shows the stored session and checks that TIDAL still accepts it.
pub async fn session(logout: bool) {
    if logout {
        match SessionManager::clear().await {
            Ok(()) => success!("Session removed"),
            Err(e) => error!("Cannot remove session. Err: {}", e),
        }
        return;
    }

    let manager = match SessionManager::load().await {
        Ok(m) => m,
        Err(e) => error!("{}", e),
    };

    let session = manager.current_session();
    info!("User: {}", session.user_id);
    info!("Country: {}", session.country_code);
    if let Some(obtained) = DateTime::from_timestamp(session.obtained_at, 0) {
        info!(
            "Logged in: {}",
            obtained.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    let client = match TidalClient::new(manager.into_session()) {
        Ok(c) => c,
        Err(e) => error!("Cannot create client. Err: {}", e),
    };

    let pb = spinner("Checking session...".to_string());
    let result = client.check_session().await;
    pb.finish_and_clear();

    match result {
        Ok(()) => success!("Session is valid"),
        Err(e) => warning!("Session was rejected, run tidl login again. Err: {}", e),
    }
}

pub(crate) fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

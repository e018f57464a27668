use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    TidlError,
    cli::{authorized_client, login::spinner},
    download::{DownloadOptions, DownloadSummary, Downloader, SkipReason, TrackState},
    error, info, success,
    tidal::TidalClient,
    types::{Album, TrackMetadata},
    warning,
};

/// Downloads one or more albums by id.
pub async fn download_albums(ids: Vec<String>, options: DownloadOptions) {
    let mut downloader = Downloader::new(authorized_client().await, options);
    for id in ids {
        download_album(&mut downloader, &id).await;
    }
}

/// Downloads the albums of an artist, optionally followed by its EPs and singles.
pub async fn download_artist(id: String, eps_and_singles: bool, options: DownloadOptions) {
    let mut downloader = Downloader::new(authorized_client().await, options);

    let artist = match downloader.catalog().get_artist(&id).await {
        Ok(a) => a,
        Err(e) => error!("Cannot load artist {}. Err: {}", id, e),
    };

    let pb = spinner(format!("Fetching albums of {}...", artist.name));
    let mut albums = match downloader.catalog().get_artist_albums(&id, None, false).await {
        Ok(a) => a,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load albums of {}. Err: {}", artist.name, e);
        }
    };
    if eps_and_singles {
        match downloader.catalog().get_artist_albums(&id, None, true).await {
            Ok(eps) => albums.extend(eps),
            Err(e) => {
                pb.finish_and_clear();
                error!("Cannot load EPs and singles of {}. Err: {}", artist.name, e);
            }
        }
    }
    pb.finish_and_clear();

    info!("Found {} releases of {}", albums.len(), artist.name);
    download_album_list(&mut downloader, &albums).await;
}

pub async fn download_playlist(id: String, options: DownloadOptions) {
    let mut downloader = Downloader::new(authorized_client().await, options);

    let pb = spinner(format!("Fetching playlist {}...", id));
    let tracks = match downloader.catalog().get_playlist_tracks(&id).await {
        Ok(t) => t,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load playlist {}. Err: {}", id, e);
        }
    };
    pb.finish_and_clear();

    let pb = track_bar(tracks.len() as u64);
    let mut report = reporter(pb.clone());
    let result = downloader.download_tracks(&tracks, &mut report).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => report_summary(&format!("playlist {}", id), &summary),
        Err(e) => error!("Playlist {} stopped. Err: {}", id, e),
    }
}

pub async fn download_tracks(ids: Vec<String>, options: DownloadOptions) {
    let mut downloader = Downloader::new(authorized_client().await, options);

    let mut tracks = Vec::with_capacity(ids.len());
    for id in &ids {
        match downloader.catalog().get_track(id).await {
            Ok(t) => tracks.push(t),
            Err(e) => error!("Cannot load track {}. Err: {}", id, e),
        }
    }

    let pb = track_bar(tracks.len() as u64);
    let mut report = reporter(pb.clone());
    let result = downloader.download_tracks(&tracks, &mut report).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => report_summary("tracks", &summary),
        Err(e) => error!("Download stopped. Err: {}", e),
    }
}

pub async fn download_favorites(options: DownloadOptions) {
    let mut downloader = Downloader::new(authorized_client().await, options);

    let pb = spinner("Fetching favourite albums...".to_string());
    let albums = match downloader.catalog().get_favorite_albums().await {
        Ok(a) => a,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load favourite albums. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    info!("Found {} favourite albums", albums.len());
    download_album_list(&mut downloader, &albums).await;
}

async fn download_album_list(downloader: &mut Downloader<TidalClient>, albums: &[Album]) {
    for album in albums {
        download_album(downloader, &album.id.to_string()).await;
    }
}

/// Unavailable albums are reported and skipped, every other failure ends the run.
async fn download_album(downloader: &mut Downloader<TidalClient>, id: &str) {
    let pb = track_bar(0);
    let mut report = reporter(pb.clone());
    let result = downloader.download_album(id, &mut report).await;
    pb.finish_and_clear();

    match result {
        Ok(summary) => report_summary(&format!("album {}", id), &summary),
        Err(TidlError::Unavailable(what)) => warning!("{} is unavailable, skipping", what),
        Err(e) => error!("{}", e),
    }
}

fn report_summary(what: &str, summary: &DownloadSummary) {
    success!(
        "Finished {}: {} downloaded ({:.1} MiB), {} already present",
        what,
        summary.finalized,
        summary.bytes as f64 / (1024.0 * 1024.0),
        summary.already_present
    );
    if summary.unavailable > 0 {
        warning!(
            "{} of {} tracks were unavailable",
            summary.unavailable,
            summary.total()
        );
    }
}

fn track_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {wide_msg}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Progress callback that drives `pb` from track state changes.
fn reporter(pb: ProgressBar) -> impl FnMut(&TrackMetadata<'_>, TrackState) + Send {
    move |track: &TrackMetadata<'_>, state: TrackState| {
        let name = format!("{} - {}", track.artist, track.title);
        match state {
            TrackState::Pending => {
                if pb.length() == Some(0) {
                    pb.set_length(u64::from(track.total_tracks));
                }
                pb.set_message(name);
            }
            TrackState::Finalized => pb.inc(1),
            TrackState::Skipped(SkipReason::AlreadyExists) => pb.inc(1),
            TrackState::Skipped(SkipReason::Unavailable) => {
                pb.inc(1);
                pb.suspend(|| warning!("{} is not available, skipping", name));
            }
            TrackState::Aborted => pb.suspend(|| warning!("{} aborted", name)),
            other => pb.set_message(format!("{} ({})", name, other)),
        }
    }
}

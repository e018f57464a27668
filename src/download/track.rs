use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use crate::{
    Res, TidlError,
    download::Catalog,
    flac,
    types::{AudioQuality, TrackMetadata},
    utils::{self, FLAC_EXTENSION, PART_EXTENSION, STAGING_EXTENSION},
};

/// Why a track was not downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The final file is already on disk.
    AlreadyExists,
    /// No stream is offered at the requested quality.
    Unavailable,
}

/// Lifecycle of a single track, reported through the progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackState {
    Pending,
    Downloading,
    Downloaded { bytes: u64 },
    Tagging,
    Finalized,
    Skipped(SkipReason),
    Aborted,
}

impl Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackState::Pending => f.write_str("pending"),
            TrackState::Downloading => f.write_str("downloading"),
            TrackState::Downloaded { bytes } => write!(f, "downloaded {} bytes", bytes),
            TrackState::Tagging => f.write_str("tagging"),
            TrackState::Finalized => f.write_str("done"),
            TrackState::Skipped(SkipReason::AlreadyExists) => f.write_str("already downloaded"),
            TrackState::Skipped(SkipReason::Unavailable) => f.write_str("unavailable"),
            TrackState::Aborted => f.write_str("aborted"),
        }
    }
}

/// Terminal result of a track that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Finalized { path: PathBuf, bytes: u64 },
    Skipped(SkipReason),
}

/// Downloads, tags and persists one track into `dir`.
///
/// The final `<artist> - <title>.flac` only ever appears through an atomic
/// rename of a fully written staging file, so a file at the final path is
/// always complete. An existing final file short-circuits everything else
/// without touching the catalog, which makes reruns resume where a previous
/// run stopped.
///
/// # Errors
///
/// Any failure after the stream location was resolved moves the track to
/// [`TrackState::Aborted`]: the `.part` and `.flac.tmp` files are removed and
/// the error is returned unchanged. Nothing is retried.
pub async fn materialize_track<C>(
    catalog: &C,
    track: &TrackMetadata<'_>,
    dir: &Path,
    quality: AudioQuality,
    progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
) -> Res<TrackOutcome>
where
    C: Catalog + ?Sized,
{
    progress(track, TrackState::Pending);

    let final_path = utils::track_path(dir, track, FLAC_EXTENSION);
    if async_fs::metadata(&final_path).await.is_ok() {
        progress(track, TrackState::Skipped(SkipReason::AlreadyExists));
        return Ok(TrackOutcome::Skipped(SkipReason::AlreadyExists));
    }

    let url = match catalog.stream_url(&track.id, quality).await {
        Ok(url) if !url.is_empty() => url,
        Ok(_) => return Ok(skip_unavailable(track, progress)),
        Err(e) if e.is_unavailable() => return Ok(skip_unavailable(track, progress)),
        Err(e) => {
            progress(track, TrackState::Aborted);
            return Err(e);
        }
    };

    let part_path = utils::track_path(dir, track, PART_EXTENSION);
    let staging_path = utils::track_path(dir, track, STAGING_EXTENSION);

    match persist(catalog, track, &url, &part_path, &staging_path, &final_path, progress).await {
        Ok(bytes) => {
            progress(track, TrackState::Finalized);
            Ok(TrackOutcome::Finalized {
                path: final_path,
                bytes,
            })
        }
        Err(e) => {
            remove_if_present(&part_path).await;
            remove_if_present(&staging_path).await;
            progress(track, TrackState::Aborted);
            Err(e)
        }
    }
}

fn skip_unavailable(
    track: &TrackMetadata<'_>,
    progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
) -> TrackOutcome {
    progress(track, TrackState::Skipped(SkipReason::Unavailable));
    TrackOutcome::Skipped(SkipReason::Unavailable)
}

async fn persist<C>(
    catalog: &C,
    track: &TrackMetadata<'_>,
    url: &str,
    part_path: &Path,
    staging_path: &Path,
    final_path: &Path,
    progress: &mut (dyn FnMut(&TrackMetadata<'_>, TrackState) + Send),
) -> Res<u64>
where
    C: Catalog + ?Sized,
{
    progress(track, TrackState::Downloading);
    let bytes = catalog.download(url, part_path).await?;
    progress(track, TrackState::Downloaded { bytes });

    progress(track, TrackState::Tagging);
    let mut container = flac::parse(part_path).await?;
    flac::tag_track(&mut container, track)?;
    flac::write(&container, staging_path).await?;

    async_fs::rename(staging_path, final_path)
        .await
        .map_err(|e| TidlError::filesystem(final_path, e))?;
    remove_if_present(part_path).await;

    Ok(bytes)
}

async fn remove_if_present(path: &Path) {
    // best effort; a leftover temp file never changes the outcome
    let _ = async_fs::remove_file(path).await;
}

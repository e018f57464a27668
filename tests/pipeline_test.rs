mod common;

use std::path::Path;

use common::*;
use tempfile::tempdir;
use tidl::{
    TidlError,
    download::{Downloader, SkipReason, TrackOutcome, TrackState, materialize_track},
    flac::{self, EncodeError, PictureBlock},
    types::{AlbumMetadata, AudioQuality, TrackMetadata},
};

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn three_track_album() -> (tidl::types::Album, Vec<tidl::types::Track>) {
    let album = album(100, "First Light", 3, 600);
    let tracks = vec![
        track(1, 1, "Dawn", &album),
        track(2, 2, "Noon", &album),
        track(3, 3, "Dusk", &album),
    ];
    (album, tracks)
}

#[tokio::test]
async fn test_finalized_track_is_tagged_and_keeps_frames() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default().with_album(album.clone(), tracks.clone());
    let metadata = album_metadata(&album);
    let track = TrackMetadata::new(&tracks[0], &metadata);

    let mut states = Vec::new();
    let mut progress = |_: &TrackMetadata<'_>, state: TrackState| states.push(state);
    let outcome = materialize_track(
        &catalog,
        &track,
        dir.path(),
        AudioQuality::Lossless,
        &mut progress,
    )
    .await
    .unwrap();

    let final_path = dir.path().join("Test Artist - Dawn.flac");
    assert_eq!(
        outcome,
        TrackOutcome::Finalized {
            path: final_path.clone(),
            bytes: raw_flac().len() as u64,
        }
    );
    assert_eq!(
        states,
        vec![
            TrackState::Pending,
            TrackState::Downloading,
            TrackState::Downloaded {
                bytes: raw_flac().len() as u64
            },
            TrackState::Tagging,
            TrackState::Finalized,
        ]
    );
    assert_eq!(files_in(dir.path()), vec!["Test Artist - Dawn.flac"]);

    let container = flac::parse(&final_path).await.unwrap();
    assert_eq!(container.frames, FRAMES);
    let comment = container.comment().unwrap();
    assert_eq!(comment.vendor, flac::VENDOR);
    assert_eq!(comment.get("TITLE"), Some("Dawn"));
    assert_eq!(comment.get("ALBUM"), Some("First Light"));
    assert_eq!(comment.get("TRACKNUMBER"), Some("1"));
    assert_eq!(comment.get("TRACKTOTAL"), Some("3"));
    assert_eq!(comment.get("ALBUMARTIST"), Some(ARTIST));

    let picture =
        PictureBlock::from_tag_value(comment.get(flac::PICTURE_TAG).unwrap()).unwrap();
    assert_eq!(picture.data, COVER_ART);
}

#[tokio::test]
async fn test_existing_file_is_skipped_without_network() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let mut downloader = Downloader::new(
        FakeCatalog::default().with_album(album, tracks),
        options(dir.path()),
    );

    let first = downloader.download_album("100", &mut quiet()).await.unwrap();
    assert_eq!(first.finalized, 3);

    let album_dir = dir.path().join("Test Artist").join("First Light");
    let before = std::fs::read(album_dir.join("Test Artist - Noon.flac")).unwrap();
    let stream_calls = FakeCatalog::calls(&downloader.catalog().stream_url_calls);
    let download_calls = FakeCatalog::calls(&downloader.catalog().download_calls);

    let second = downloader.download_album("100", &mut quiet()).await.unwrap();
    assert_eq!(second.finalized, 0);
    assert_eq!(second.already_present, 3);
    assert_eq!(
        FakeCatalog::calls(&downloader.catalog().stream_url_calls),
        stream_calls
    );
    assert_eq!(
        FakeCatalog::calls(&downloader.catalog().download_calls),
        download_calls
    );

    let after = std::fs::read(album_dir.join("Test Artist - Noon.flac")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_unavailable_track_is_skipped_and_siblings_continue() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default()
        .with_album(album, tracks)
        .without_stream(2);
    let mut downloader = Downloader::new(catalog, options(dir.path()));

    let mut skipped = Vec::new();
    let mut progress = |track: &TrackMetadata<'_>, state: TrackState| {
        if state == TrackState::Skipped(SkipReason::Unavailable) {
            skipped.push(track.title.clone());
        }
    };
    let summary = downloader.download_album("100", &mut progress).await.unwrap();

    assert_eq!(summary.finalized, 2);
    assert_eq!(summary.unavailable, 1);
    assert_eq!(skipped, vec!["Noon".to_string()]);
    assert_eq!(FakeCatalog::calls(&downloader.catalog().download_calls), 2);

    let album_dir = dir.path().join("Test Artist").join("First Light");
    assert_eq!(
        files_in(&album_dir),
        vec![
            "Test Artist - Dawn.flac",
            "Test Artist - Dusk.flac",
            "album.jpg",
            "meta.json",
        ]
    );
}

#[tokio::test]
async fn test_malformed_stream_leaves_no_files() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default()
        .with_album(album.clone(), tracks.clone())
        .with_stream(1, b"this is not a flac stream".to_vec());
    let metadata = album_metadata(&album);
    let track = TrackMetadata::new(&tracks[0], &metadata);

    let mut states = Vec::new();
    let mut progress = |_: &TrackMetadata<'_>, state: TrackState| states.push(state);
    let result = materialize_track(
        &catalog,
        &track,
        dir.path(),
        AudioQuality::Lossless,
        &mut progress,
    )
    .await;

    assert!(matches!(result, Err(TidlError::Parse(_))));
    assert_eq!(states.last(), Some(&TrackState::Aborted));
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_tagging_failure_leaves_no_files() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default().with_album(album.clone(), tracks.clone());
    // no cover art resolved, so the tagger refuses the track
    let metadata = AlbumMetadata::from(&album);
    let track = TrackMetadata::new(&tracks[0], &metadata);

    let mut states = Vec::new();
    let mut progress = |_: &TrackMetadata<'_>, state: TrackState| states.push(state);
    let result = materialize_track(
        &catalog,
        &track,
        dir.path(),
        AudioQuality::Lossless,
        &mut progress,
    )
    .await;

    assert!(matches!(
        result,
        Err(TidlError::Encode(EncodeError::MissingArt(id))) if id == "100"
    ));
    assert!(states.contains(&TrackState::Tagging));
    assert_eq!(states.last(), Some(&TrackState::Aborted));
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_broken_download_leaves_no_files() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default()
        .with_album(album.clone(), tracks.clone())
        .with_broken_download(1);
    let metadata = album_metadata(&album);
    let track = TrackMetadata::new(&tracks[0], &metadata);

    let result = materialize_track(
        &catalog,
        &track,
        dir.path(),
        AudioQuality::Lossless,
        &mut quiet(),
    )
    .await;

    assert!(matches!(result, Err(TidlError::Service { status: 503, .. })));
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_album_halts_at_first_failed_track() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let catalog = FakeCatalog::default()
        .with_album(album, tracks)
        .with_stream(2, b"garbage".to_vec());
    let mut downloader = Downloader::new(catalog, options(dir.path()));

    let err = downloader
        .download_album("100", &mut quiet())
        .await
        .unwrap_err();

    match err {
        TidlError::AlbumHalted {
            album,
            track,
            position,
            source,
        } => {
            assert_eq!(album, "First Light");
            assert_eq!(track, "Noon");
            assert_eq!(position, 2);
            assert!(matches!(*source, TidlError::Parse(_)));
        }
        other => panic!("expected AlbumHalted, got {:?}", other),
    }

    // the third track is never attempted
    assert_eq!(FakeCatalog::calls(&downloader.catalog().stream_url_calls), 2);

    let album_dir = dir.path().join("Test Artist").join("First Light");
    assert_eq!(
        files_in(&album_dir),
        vec!["Test Artist - Dawn.flac", "album.jpg", "meta.json"]
    );
}

#[tokio::test]
async fn test_unavailable_album_is_rejected() {
    let dir = tempdir().unwrap();
    let album = album(200, "Gone", 1, 0);
    let tracks = vec![track(20, 1, "Lost", &album)];
    let mut downloader = Downloader::new(
        FakeCatalog::default().with_album(album, tracks),
        options(dir.path()),
    );

    let err = downloader
        .download_album("200", &mut quiet())
        .await
        .unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(FakeCatalog::calls(&downloader.catalog().cover_art_calls), 0);
    assert!(!dir.path().join("Test Artist").exists());
}

#[tokio::test]
async fn test_cover_art_is_fetched_once_per_album() {
    let dir = tempdir().unwrap();
    let (first, first_tracks) = three_track_album();
    let second = album(300, "Second Wind", 1, 180);
    let second_tracks = vec![track(30, 1, "Gust", &second)];

    let playlist: Vec<_> = first_tracks
        .iter()
        .chain(second_tracks.iter())
        .cloned()
        .collect();
    let catalog = FakeCatalog::default()
        .with_album(first, first_tracks)
        .with_album(second, second_tracks);
    let mut downloader = Downloader::new(catalog, options(dir.path()));

    let summary = downloader
        .download_tracks(&playlist, &mut quiet())
        .await
        .unwrap();

    assert_eq!(summary.finalized, 4);
    assert_eq!(FakeCatalog::calls(&downloader.catalog().album_calls), 2);
    assert_eq!(FakeCatalog::calls(&downloader.catalog().cover_art_calls), 2);

    // the album of a later download comes from the cache
    downloader.download_album("100", &mut quiet()).await.unwrap();
    assert_eq!(FakeCatalog::calls(&downloader.catalog().album_calls), 2);
    assert_eq!(FakeCatalog::calls(&downloader.catalog().cover_art_calls), 2);

    assert!(
        dir.path()
            .join("Test Artist/Second Wind/Test Artist - Gust.flac")
            .is_file()
    );
}

#[tokio::test]
async fn test_coverless_album_skips_its_tracks_only() {
    let dir = tempdir().unwrap();
    let (first, first_tracks) = three_track_album();
    let bare = album(400, "No Sleeve", 1, 240);
    let bare_tracks = vec![track(40, 1, "Naked", &bare)];

    let playlist = vec![bare_tracks[0].clone(), first_tracks[0].clone()];
    let catalog = FakeCatalog::default()
        .with_album(first, first_tracks)
        .with_album(bare, bare_tracks)
        .with_coverless_album(400);
    let mut downloader = Downloader::new(catalog, options(dir.path()));

    let mut skipped = Vec::new();
    let mut progress = |track: &TrackMetadata<'_>, state: TrackState| {
        if state == TrackState::Skipped(SkipReason::Unavailable) {
            skipped.push(track.title.clone());
        }
    };
    let summary = downloader
        .download_tracks(&playlist, &mut progress)
        .await
        .unwrap();

    assert_eq!(summary.unavailable, 1);
    assert_eq!(summary.finalized, 1);
    assert_eq!(skipped, vec!["Naked".to_string()]);
    assert!(!dir.path().join("Test Artist").join("No Sleeve").exists());
    assert!(
        dir.path()
            .join("Test Artist/First Light/Test Artist - Dawn.flac")
            .is_file()
    );
}

#[tokio::test]
async fn test_sidecars_can_be_disabled() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let mut opts = options(dir.path());
    opts.sidecars = false;
    let mut downloader = Downloader::new(FakeCatalog::default().with_album(album, tracks), opts);

    downloader.download_album("100", &mut quiet()).await.unwrap();

    let album_dir = dir.path().join("Test Artist").join("First Light");
    assert!(!album_dir.join("meta.json").exists());
    assert!(!album_dir.join("album.jpg").exists());
    assert_eq!(files_in(&album_dir).len(), 3);
}

#[tokio::test]
async fn test_meta_sidecar_describes_album() {
    let dir = tempdir().unwrap();
    let (album, tracks) = three_track_album();
    let mut downloader = Downloader::new(
        FakeCatalog::default().with_album(album, tracks),
        options(dir.path()),
    );

    downloader.download_album("100", &mut quiet()).await.unwrap();

    let album_dir = dir.path().join("Test Artist").join("First Light");
    let meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(album_dir.join("meta.json")).unwrap())
            .unwrap();
    assert_eq!(meta["title"], "First Light");
    assert_eq!(meta["numberOfTracks"], 3);
    assert!(meta.get("art").is_none());
    assert_eq!(std::fs::read(album_dir.join("album.jpg")).unwrap(), COVER_ART);
}

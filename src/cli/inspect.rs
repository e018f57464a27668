use std::path::PathBuf;

use crate::{
    error,
    flac::{self, PICTURE_TAG, PictureBlock},
    info, warning,
};

/// Prints the metadata blocks of a FLAC file and a summary of its embedded cover.
pub async fn inspect(path: PathBuf) {
    let container = match flac::parse(&path).await {
        Ok(c) => c,
        Err(e) => error!("Cannot read {}. Err: {}", path.display(), e),
    };

    println!("{}", container);

    let Some(comment) = container.comment() else {
        warning!("No VORBIS_COMMENT block");
        return;
    };

    let pictures: Vec<&str> = comment
        .tags
        .iter()
        .filter(|t| t.key.eq_ignore_ascii_case(PICTURE_TAG))
        .map(|t| t.value.as_str())
        .collect();

    if pictures.is_empty() {
        warning!("No embedded cover art");
    }

    for value in pictures {
        match PictureBlock::from_tag_value(value) {
            Ok(picture) => info!(
                "Cover: type {}, {}, {}x{} @ {} bit{}, {} bytes",
                picture.picture_type,
                picture.mime_type,
                picture.width,
                picture.height,
                picture.color_depth,
                if picture.indexed { ", indexed" } else { "" },
                picture.data.len()
            ),
            Err(e) => warning!("Embedded cover cannot be decoded. Err: {}", e),
        }
    }
}

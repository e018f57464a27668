//! Merges track metadata and cover art into a container's comment block.

use crate::{
    flac::{CommentBlock, Container, EncodeError, MetadataBlock, PictureBlock, Tag},
    types::TrackMetadata,
};

/// Vendor string written when a file arrives without any comment block.
pub const VENDOR: &str = "Lavf57.71.100";

pub const PICTURE_TAG: &str = "METADATA_BLOCK_PICTURE";

/// Tags for `track`, in the order they are written.
///
/// Fails if the owning album has no cover art yet.
pub fn track_tags(track: &TrackMetadata<'_>) -> Result<Vec<Tag>, EncodeError> {
    let art = track
        .album
        .art
        .as_ref()
        .ok_or_else(|| EncodeError::MissingArt(track.album.id.clone()))?;
    let picture = PictureBlock::front_cover(art.clone()).to_tag_value()?;

    Ok(vec![
        Tag::new("TITLE", track.title.as_str()),
        Tag::new("ALBUM", track.album.title.as_str()),
        Tag::new("TRACKNUMBER", track.track_number.to_string()),
        Tag::new("TRACKTOTAL", track.total_tracks.to_string()),
        Tag::new("ARTIST", track.artist.as_str()),
        Tag::new("ALBUMARTIST", track.album_artist.as_str()),
        Tag::new("COPYRIGHT", track.copyright.as_str()),
        Tag::new(PICTURE_TAG, picture),
    ])
}

/// Append `tags` to the existing comment block, or add a new one as the last
/// metadata block. Existing tags are kept even when keys repeat.
pub fn merge_tags(container: &mut Container, tags: Vec<Tag>) {
    match container.comment_mut() {
        Some(comment) => comment.tags.extend(tags),
        None => container
            .blocks
            .push(MetadataBlock::Comment(CommentBlock::new(VENDOR, tags))),
    }
}

pub fn tag_track(container: &mut Container, track: &TrackMetadata<'_>) -> Result<(), EncodeError> {
    let tags = track_tags(track)?;
    merge_tags(container, tags);
    Ok(())
}

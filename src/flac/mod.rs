//! # FLAC Tagging Module
//!
//! Reads a FLAC file into an ordered list of metadata blocks plus the raw
//! frame payload, merges track metadata into its VORBIS_COMMENT block and
//! writes the result back out.
//!
//! ```text
//! "fLaC" | STREAMINFO | ... | VORBIS_COMMENT | ... (last flag) | frames ...
//! ```
//!
//! Frames are never decoded: they are copied through untouched. Cover art is
//! embedded the way Ogg/FLAC readers expect it, as a base64 encoded PICTURE
//! payload under the `METADATA_BLOCK_PICTURE` comment key, rather than as a
//! separate PICTURE block.
//!
//! ## Submodules
//!
//! - [`picture`] - PICTURE payload layout and its base64 tag form
//! - [`comment`] - VORBIS_COMMENT body with ordered, non-unique tags
//! - [`container`] - block list parsing and byte-exact serialization
//! - [`tagger`] - builds the track tags and merges them into a container

pub mod comment;
pub mod container;
mod error;
pub mod picture;
pub mod tagger;

pub use comment::{CommentBlock, Tag};
pub use container::{Container, MetadataBlock, parse, write};
pub use error::{EncodeError, ParseError};
pub use picture::PictureBlock;
pub use tagger::{PICTURE_TAG, VENDOR, merge_tags, tag_track, track_tags};

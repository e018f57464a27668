use thiserror::Error;

/// Errors raised while reading a FLAC container.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid FLAC marker: expected 'fLaC', found {found:?}")]
    InvalidMarker { found: Vec<u8> },

    #[error("missing STREAMINFO block (must be the first metadata block)")]
    MissingStreamInfo,

    #[error("STREAMINFO block has invalid size: expected 34 bytes, found {0}")]
    InvalidStreamInfoSize(u32),

    #[error("unexpected end of data at offset {offset} while reading {context}")]
    UnexpectedEof { offset: usize, context: &'static str },

    #[error("metadata block at offset {offset} declares {length} bytes but only {available} remain")]
    BlockOverrun {
        offset: usize,
        length: u32,
        available: usize,
    },

    #[error("container holds more than one VORBIS_COMMENT block")]
    DuplicateCommentBlock,

    #[error("vendor string is not valid UTF-8")]
    InvalidVendor,

    #[error("comment #{index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },

    #[error("comment #{index} has no '=' separator")]
    MissingSeparator { index: usize },

    #[error("comment #{index} has a key outside printable ASCII or an empty key")]
    InvalidTagKey { index: usize },

    #[error("VORBIS_COMMENT block has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("picture tag is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while serializing a FLAC container or one of its payloads.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("field '{field}' is {len} bytes, larger than a 32-bit length allows")]
    FieldTooLarge { field: &'static str, len: usize },

    #[error("metadata block of {0} bytes exceeds the 24-bit length field")]
    BlockTooLarge(usize),

    #[error("invalid tag key {0:?}: keys must be non-empty printable ASCII without '='")]
    InvalidTagKey(String),

    #[error("album {0} has no cover art resolved")]
    MissingArt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

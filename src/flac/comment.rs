//! VORBIS_COMMENT block payload.
//!
//! Unlike the rest of FLAC, every length in this block is little-endian.
//! Tags are kept as an ordered list: keys are not unique and insertion order
//! is what readers see.

use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::flac::{EncodeError, ParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBlock {
    pub vendor: String,
    pub tags: Vec<Tag>,
}

impl CommentBlock {
    pub fn new(vendor: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            vendor: vendor.into(),
            tags,
        }
    }

    /// Parse the block body (without the 4-byte block header).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut pos = 0;

        let vendor_len = read_le_u32(bytes, &mut pos, "vendor length")? as usize;
        let vendor = std::str::from_utf8(take(bytes, &mut pos, vendor_len, "vendor string")?)
            .map_err(|_| ParseError::InvalidVendor)?
            .to_string();

        let count = read_le_u32(bytes, &mut pos, "comment count")? as usize;
        // every comment needs at least its 4-byte length, don't trust the count
        let mut tags = Vec::with_capacity(count.min(bytes.len() / 4));

        for index in 0..count {
            let len = read_le_u32(bytes, &mut pos, "comment length")? as usize;
            let raw = take(bytes, &mut pos, len, "comment")?;
            let comment =
                std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8 { index })?;
            let (key, value) = comment
                .split_once('=')
                .ok_or(ParseError::MissingSeparator { index })?;
            if !is_valid_key(key) {
                return Err(ParseError::InvalidTagKey { index });
            }
            tags.push(Tag::new(key, value));
        }

        if pos != bytes.len() {
            return Err(ParseError::TrailingBytes(bytes.len() - pos));
        }

        Ok(Self { vendor, tags })
    }

    /// Serialize the block body.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::new();

        write_le_field(&mut bytes, "vendor", self.vendor.as_bytes())?;

        let count = u32::try_from(self.tags.len()).map_err(|_| EncodeError::FieldTooLarge {
            field: "comment count",
            len: self.tags.len(),
        })?;
        bytes.extend_from_slice(&count.to_le_bytes());

        for tag in &self.tags {
            if !is_valid_key(&tag.key) {
                return Err(EncodeError::InvalidTagKey(tag.key.clone()));
            }
            let comment = format!("{}={}", tag.key, tag.value);
            write_le_field(&mut bytes, "comment", comment.as_bytes())?;
        }

        Ok(bytes)
    }

    /// First value stored under `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key.eq_ignore_ascii_case(key))
            .map(|t| t.value.as_str())
    }

    /// Last value stored under `key`; what most players display.
    pub fn get_last(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|t| t.key.eq_ignore_ascii_case(key))
            .map(|t| t.value.as_str())
    }
}

impl Display for CommentBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "VORBIS_COMMENT:")?;
        write!(f, "  Vendor: {}", self.vendor)?;
        for tag in &self.tags {
            if tag.key.eq_ignore_ascii_case(super::PICTURE_TAG) {
                write!(f, "\n  {}=<{} base64 chars>", tag.key, tag.value.len())?;
            } else {
                write!(f, "\n  {}={}", tag.key, tag.value)?;
            }
        }
        Ok(())
    }
}

/// Keys are printable ASCII 0x20..=0x7D excluding '='. Parsing and
/// serialization share this grammar, so every parsed block can be written back.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| (0x20..=0x7D).contains(&b) && b != b'=')
}

fn write_le_field(bytes: &mut Vec<u8>, field: &'static str, data: &[u8]) -> Result<(), EncodeError> {
    let len = u32::try_from(data.len()).map_err(|_| EncodeError::FieldTooLarge {
        field,
        len: data.len(),
    })?;
    bytes.extend_from_slice(&len.to_le_bytes());
    bytes.extend_from_slice(data);
    Ok(())
}

fn take<'a>(
    bytes: &'a [u8],
    pos: &mut usize,
    len: usize,
    context: &'static str,
) -> Result<&'a [u8], ParseError> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= bytes.len())
        .ok_or(ParseError::UnexpectedEof {
            offset: *pos,
            context,
        })?;
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn read_le_u32(bytes: &[u8], pos: &mut usize, context: &'static str) -> Result<u32, ParseError> {
    let b = take(bytes, pos, 4, context)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

//! Binary layout of the FLAC PICTURE payload.
//!
//! FLAC readers accept cover art stored inside the VORBIS_COMMENT block under
//! the `METADATA_BLOCK_PICTURE` key, with the value being the base64 form of
//! the PICTURE payload (<https://xiph.org/flac/format.html#metadata_block_picture>).

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::flac::{EncodeError, ParseError};

/// Picture type code for "Cover (front)".
pub const FRONT_COVER: u32 = 3;

/// Cover art served by the resources endpoint is always a 1280x1280 JPEG.
pub const COVER_MIME_TYPE: &str = "image/jpeg";
pub const COVER_WIDTH: u32 = 1280;
pub const COVER_HEIGHT: u32 = 1280;
pub const COVER_COLOR_DEPTH: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureBlock {
    pub picture_type: u32,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub indexed: bool,
    pub data: Vec<u8>,
}

impl PictureBlock {
    /// Front cover with the dimensions the art endpoint delivers.
    ///
    /// The image bytes are trusted as-is, nothing is decoded to verify the
    /// claimed size or format.
    pub fn front_cover(data: Vec<u8>) -> Self {
        Self {
            picture_type: FRONT_COVER,
            mime_type: COVER_MIME_TYPE.to_string(),
            description: String::new(),
            width: COVER_WIDTH,
            height: COVER_HEIGHT,
            color_depth: COVER_COLOR_DEPTH,
            indexed: false,
            data,
        }
    }

    /// Serialize to the big-endian PICTURE layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mime = self.mime_type.as_bytes();
        let description = self.description.as_bytes();
        let mut bytes = Vec::with_capacity(32 + mime.len() + description.len() + self.data.len());

        bytes.extend_from_slice(&self.picture_type.to_be_bytes());
        bytes.extend_from_slice(&field_len("mime_type", mime)?.to_be_bytes());
        bytes.extend_from_slice(mime);
        bytes.extend_from_slice(&field_len("description", description)?.to_be_bytes());
        bytes.extend_from_slice(description);
        bytes.extend_from_slice(&self.width.to_be_bytes());
        bytes.extend_from_slice(&self.height.to_be_bytes());
        bytes.extend_from_slice(&self.color_depth.to_be_bytes());
        bytes.extend_from_slice(&u32::from(self.indexed).to_be_bytes());
        bytes.extend_from_slice(&field_len("data", &self.data)?.to_be_bytes());
        bytes.extend_from_slice(&self.data);

        Ok(bytes)
    }

    /// Serialize and base64 encode (standard alphabet, padded), ready to be
    /// stored as a tag value.
    pub fn to_tag_value(&self) -> Result<String, EncodeError> {
        Ok(STANDARD.encode(self.to_bytes()?))
    }

    /// Parse a PICTURE payload using its own declared lengths.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut reader = FieldReader { bytes, pos: 0 };

        let picture_type = reader.u32("picture type")?;
        let mime_len = reader.u32("mime length")? as usize;
        let mime_type = String::from_utf8_lossy(reader.take(mime_len, "mime type")?).into_owned();
        let desc_len = reader.u32("description length")? as usize;
        let description =
            String::from_utf8_lossy(reader.take(desc_len, "description")?).into_owned();
        let width = reader.u32("width")?;
        let height = reader.u32("height")?;
        let color_depth = reader.u32("color depth")?;
        let indexed = reader.u32("indexed flag")? != 0;
        let data_len = reader.u32("data length")? as usize;
        let data = reader.take(data_len, "picture data")?.to_vec();

        Ok(Self {
            picture_type,
            mime_type,
            description,
            width,
            height,
            color_depth,
            indexed,
            data,
        })
    }

    /// Decode a `METADATA_BLOCK_PICTURE` tag value.
    pub fn from_tag_value(value: &str) -> Result<Self, ParseError> {
        Self::from_bytes(&STANDARD.decode(value)?)
    }
}

fn field_len(field: &'static str, bytes: &[u8]) -> Result<u32, EncodeError> {
    u32::try_from(bytes.len()).map_err(|_| EncodeError::FieldTooLarge {
        field,
        len: bytes.len(),
    })
}

struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn take(&mut self, len: usize, context: &'static str) -> Result<&'a [u8], ParseError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ParseError::UnexpectedEof {
                offset: self.pos,
                context,
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u32(&mut self, context: &'static str) -> Result<u32, ParseError> {
        let b = self.take(4, context)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

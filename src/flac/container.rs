//! In-memory FLAC container: metadata blocks followed by untouched frames.
//!
//! Only VORBIS_COMMENT blocks are decoded. Every other block (STREAMINFO,
//! SEEKTABLE, PICTURE, PADDING, ...) is carried as raw bytes, so writing a
//! parsed container back out reproduces the input byte for byte.

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use crate::flac::{CommentBlock, EncodeError, ParseError};

pub const FLAC_MARKER: &[u8; 4] = b"fLaC";

pub const STREAMINFO: u8 = 0;
pub const PADDING: u8 = 1;
pub const APPLICATION: u8 = 2;
pub const SEEKTABLE: u8 = 3;
pub const VORBIS_COMMENT: u8 = 4;
pub const CUESHEET: u8 = 5;
pub const PICTURE: u8 = 6;

const STREAMINFO_SIZE: u32 = 34;
/// Block lengths are stored in 24 bits.
const MAX_BLOCK_LEN: usize = (1 << 24) - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataBlock {
    Comment(CommentBlock),
    Opaque { kind: u8, data: Vec<u8> },
}

impl MetadataBlock {
    pub fn kind(&self) -> u8 {
        match self {
            MetadataBlock::Comment(_) => VORBIS_COMMENT,
            MetadataBlock::Opaque { kind, .. } => *kind,
        }
    }

    fn body(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            MetadataBlock::Comment(comment) => comment.to_bytes(),
            MetadataBlock::Opaque { data, .. } => Ok(data.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub blocks: Vec<MetadataBlock>,
    pub frames: Vec<u8>,
}

impl Container {
    /// Parse a complete FLAC file held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < FLAC_MARKER.len() || &data[..4] != FLAC_MARKER {
            return Err(ParseError::InvalidMarker {
                found: data[..data.len().min(4)].to_vec(),
            });
        }

        let mut offset = FLAC_MARKER.len();
        let mut blocks = Vec::new();
        let mut seen_comment = false;

        loop {
            let header = data
                .get(offset..offset + 4)
                .ok_or(ParseError::UnexpectedEof {
                    offset,
                    context: "metadata block header",
                })?;
            let is_last = header[0] & 0x80 != 0;
            let kind = header[0] & 0x7F;
            let length = u32::from_be_bytes([0, header[1], header[2], header[3]]);

            if blocks.is_empty() {
                if kind != STREAMINFO {
                    return Err(ParseError::MissingStreamInfo);
                }
                if length != STREAMINFO_SIZE {
                    return Err(ParseError::InvalidStreamInfoSize(length));
                }
            }

            let start = offset + 4;
            let available = data.len() - start;
            if length as usize > available {
                return Err(ParseError::BlockOverrun {
                    offset,
                    length,
                    available,
                });
            }
            let body = &data[start..start + length as usize];

            let block = if kind == VORBIS_COMMENT {
                if seen_comment {
                    return Err(ParseError::DuplicateCommentBlock);
                }
                seen_comment = true;
                MetadataBlock::Comment(CommentBlock::from_bytes(body)?)
            } else {
                MetadataBlock::Opaque {
                    kind,
                    data: body.to_vec(),
                }
            };

            blocks.push(block);
            offset = start + length as usize;

            if is_last {
                break;
            }
        }

        Ok(Self {
            blocks,
            frames: data[offset..].to_vec(),
        })
    }

    /// Serialize the container. The last-block flag is set on the final
    /// block only, whatever the blocks looked like when parsed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = Vec::with_capacity(self.frames.len() + 8192);
        bytes.extend_from_slice(FLAC_MARKER);

        let last = self.blocks.len().saturating_sub(1);
        for (index, block) in self.blocks.iter().enumerate() {
            let body = block.body()?;
            if body.len() > MAX_BLOCK_LEN {
                return Err(EncodeError::BlockTooLarge(body.len()));
            }

            let len = (body.len() as u32).to_be_bytes();
            let flag = if index == last { 0x80 } else { 0 };
            bytes.extend_from_slice(&[block.kind() | flag, len[1], len[2], len[3]]);
            bytes.extend_from_slice(&body);
        }

        bytes.extend_from_slice(&self.frames);
        Ok(bytes)
    }

    pub fn comment(&self) -> Option<&CommentBlock> {
        self.blocks.iter().find_map(|b| match b {
            MetadataBlock::Comment(comment) => Some(comment),
            _ => None,
        })
    }

    pub fn comment_mut(&mut self) -> Option<&mut CommentBlock> {
        self.blocks.iter_mut().find_map(|b| match b {
            MetadataBlock::Comment(comment) => Some(comment),
            _ => None,
        })
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                MetadataBlock::Comment(comment) => writeln!(f, "#{index} {comment}")?,
                MetadataBlock::Opaque { kind, data } => {
                    writeln!(f, "#{index} {}: {} bytes", kind_name(*kind), data.len())?
                }
            }
        }
        write!(f, "FRAMES: {} bytes", self.frames.len())
    }
}

pub fn kind_name(kind: u8) -> String {
    match kind {
        STREAMINFO => "STREAMINFO".to_string(),
        PADDING => "PADDING".to_string(),
        APPLICATION => "APPLICATION".to_string(),
        SEEKTABLE => "SEEKTABLE".to_string(),
        VORBIS_COMMENT => "VORBIS_COMMENT".to_string(),
        CUESHEET => "CUESHEET".to_string(),
        PICTURE => "PICTURE".to_string(),
        n => format!("RESERVED({n})"),
    }
}

/// Read and validate a FLAC file from disk.
pub async fn parse(path: &Path) -> Result<Container, ParseError> {
    let data = async_fs::read(path).await?;
    Container::from_bytes(&data)
}

/// Serialize `container` into a new file at `path`.
pub async fn write(container: &Container, path: &Path) -> Result<(), EncodeError> {
    let bytes = container.to_bytes()?;
    async_fs::write(path, bytes).await?;
    Ok(())
}

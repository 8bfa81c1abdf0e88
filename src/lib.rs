#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod genres;
mod id3v2;

mod dispatch;
mod tools;


pub use crate::dispatch::decode;
pub use crate::dispatch::encode;
pub use crate::dispatch::get_tag;
pub use crate::dispatch::read_tag;
pub use crate::dispatch::write_tag;

pub use crate::genres::genre_name;
pub use crate::genres::GENRES;

pub use crate::id3v2::get::*;
pub use crate::id3v2::structure::*;

use std::io;

/// Everything that can go wrong while reading a tag.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(io::Error),
    /// The stream does not start with the `ID3` marker.
    #[error("ID3v2 header not found")]
    MalformedHeader,
    #[error("ID3v2.{0} is not supported")]
    UnsupportedRevision(u8),
    /// A size field does not fit its bit width, e.g. a set top bit in a synchsafe byte.
    #[error("Invalid size: {0}")]
    InvalidSize(String),
    #[error("Invalid text encoding byte {0:#04x}")]
    InvalidEncodingByte(u8),
    #[error("Unsupported character: {0}")]
    UnsupportedCharacter(String),
    #[error("Stream truncated: {0}")]
    TruncatedStream(String),
    /// Only returned when asking for the content of an opaque frame;
    /// decoding itself keeps such frames as raw bytes.
    #[error("Frame {id} is {transform} and cannot be decoded")]
    UnsupportedFrameTransform {
        id: String,
        transform: FrameTransform,
    },
    #[error("ID3v2.2 tag compression is not supported")]
    CompressedTag,
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> DecodeError {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::TruncatedStream(err.to_string()),
            _ => DecodeError::Io(err),
        }
    }
}

/// Everything that can go wrong while writing a tag back out.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid size: {0}")]
    InvalidSize(String),
    #[error("Unsupported character: {0}")]
    UnsupportedCharacter(String),
    #[error("Invalid frame ID {0:?}")]
    InvalidFrameId(String),
    #[error("Frame {id} declares {declared} content bytes but encodes to {actual}")]
    FrameSizeMismatch {
        id: String,
        declared: u32,
        actual: usize,
    },
    #[error("Tag declares {declared} bytes but encodes to {actual}")]
    TagSizeMismatch { declared: u32, actual: usize },
}

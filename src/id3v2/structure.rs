use std::fmt;

use crate::DecodeError;

pub use crate::tools::encoding::StringEncoding;

pub const MAGIC: &[u8; 3] = b"ID3";
pub const HEADER_LEN: u32 = 10;

// tag flags
pub const FLAG_UNSYNCHRONIZED: u8 = 0b1000_0000;
// extended header on 2.3, whole tag compression on 2.2
pub const FLAG_EXTENDED_OR_COMPRESSED: u8 = 0b0100_0000;
pub const FLAG_EXPERIMENTAL: u8 = 0b0010_0000;

// extended header flags
pub const EXT_FLAG_CRC: u16 = 0x8000;

// frame flags, 2.3 only
pub const FRAME_FLAG_COMPRESSED: u16 = 0x0080;
pub const FRAME_FLAG_ENCRYPTED: u16 = 0x0040;
pub const FRAME_FLAG_GROUPED: u16 = 0x0020;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    /// ID3v2.2: 3 character frame IDs, 24 bit frame sizes, no frame flags.
    V22,
    /// ID3v2.3: 4 character frame IDs, 32 bit frame sizes, frame flags.
    V23,
}

impl Revision {
    pub fn from_major(major: u8) -> Result<Revision, DecodeError> {
        match major {
            2 => Ok(Revision::V22),
            3 => Ok(Revision::V23),
            _ => Err(DecodeError::UnsupportedRevision(major)),
        }
    }

    pub fn major(self) -> u8 {
        match self {
            Revision::V22 => 2,
            Revision::V23 => 3,
        }
    }

    pub fn id_len(self) -> usize {
        match self {
            Revision::V22 => 3,
            Revision::V23 => 4,
        }
    }

    pub fn size_len(self) -> usize {
        self.id_len()
    }

    /// Fixed part of a frame header, without optional fields.
    pub fn frame_header_len(self) -> u32 {
        match self {
            Revision::V22 => 6,
            Revision::V23 => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub revision: Revision,
    pub minor_version: u8,
    pub flags: u8,
    /// Everything after the 10 byte header: extended header, frames and padding.
    pub size: u32,
}

impl Header {
    pub fn is_unsynchronized(&self) -> bool {
        self.flags & FLAG_UNSYNCHRONIZED != 0
    }
    pub fn has_extended_header(&self) -> bool {
        self.revision == Revision::V23 && self.flags & FLAG_EXTENDED_OR_COMPRESSED != 0
    }
    pub fn is_compressed(&self) -> bool {
        self.revision == Revision::V22 && self.flags & FLAG_EXTENDED_OR_COMPRESSED != 0
    }
    pub fn is_experimental(&self) -> bool {
        self.flags & FLAG_EXPERIMENTAL != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedHeader {
    /// As declared, excluding the size field itself (6 or 10).
    pub size: u32,
    pub flags: u16,
    pub padding_size: u32,
    pub crc32: Option<u32>,
}

impl ExtendedHeader {
    pub fn has_crc(&self) -> bool {
        self.flags & EXT_FLAG_CRC != 0
    }

    /// Bytes this header takes up in the tag.
    pub fn encoded_len(&self) -> u32 {
        if self.has_crc() {
            14
        } else {
            10
        }
    }
}

/// Why a frame body was kept as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTransform {
    Compressed,
    Encrypted,
}

impl fmt::Display for FrameTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FrameTransform::Compressed => write!(f, "compressed"),
            FrameTransform::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// What body decoders need to know about the frame they are decoding.
pub trait FrameHeaderInfo {
    fn id(&self) -> &str;
    /// Declared size: optional header fields and body, not the fixed header.
    fn size(&self) -> u32;
    fn revision(&self) -> Revision;

    fn optional_len(&self) -> u32 {
        0
    }
    fn transform(&self) -> Option<FrameTransform> {
        None
    }

    /// Bytes left for the body once optional fields are consumed.
    fn content_len(&self) -> u32 {
        self.size().saturating_sub(self.optional_len())
    }
    fn total_len(&self) -> u32 {
        self.revision().frame_header_len().saturating_add(self.size())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct V22FrameHeader {
    pub id: String,
    pub size: u32,
}

impl FrameHeaderInfo for V22FrameHeader {
    fn id(&self) -> &str {
        &self.id
    }
    fn size(&self) -> u32 {
        self.size
    }
    fn revision(&self) -> Revision {
        Revision::V22
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct V23FrameHeader {
    pub id: String,
    pub size: u32,
    pub flags: u16,

    // present exactly when the matching flag is set
    pub decompressed_size: Option<u32>,
    pub encryption_method: Option<u8>,
    pub group_id: Option<u8>,
}

impl FrameHeaderInfo for V23FrameHeader {
    fn id(&self) -> &str {
        &self.id
    }
    fn size(&self) -> u32 {
        self.size
    }
    fn revision(&self) -> Revision {
        Revision::V23
    }
    fn optional_len(&self) -> u32 {
        self.decompressed_size.map_or(0, |_| 4)
            + self.encryption_method.map_or(0, |_| 1)
            + self.group_id.map_or(0, |_| 1)
    }
    fn transform(&self) -> Option<FrameTransform> {
        if self.flags & FRAME_FLAG_ENCRYPTED != 0 {
            Some(FrameTransform::Encrypted)
        } else if self.flags & FRAME_FLAG_COMPRESSED != 0 {
            Some(FrameTransform::Compressed)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameHeader {
    V22(V22FrameHeader),
    V23(V23FrameHeader),
}

impl FrameHeaderInfo for FrameHeader {
    fn id(&self) -> &str {
        match self {
            FrameHeader::V22(h) => h.id(),
            FrameHeader::V23(h) => h.id(),
        }
    }
    fn size(&self) -> u32 {
        match self {
            FrameHeader::V22(h) => h.size(),
            FrameHeader::V23(h) => h.size(),
        }
    }
    fn revision(&self) -> Revision {
        match self {
            FrameHeader::V22(h) => h.revision(),
            FrameHeader::V23(h) => h.revision(),
        }
    }
    fn optional_len(&self) -> u32 {
        match self {
            FrameHeader::V22(h) => h.optional_len(),
            FrameHeader::V23(h) => h.optional_len(),
        }
    }
    fn transform(&self) -> Option<FrameTransform> {
        match self {
            FrameHeader::V22(h) => h.transform(),
            FrameHeader::V23(h) => h.transform(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generic {
    pub data: Vec<u8>,
    /// Set when the flags ask for decompression or decryption we can't do.
    pub transform: Option<FrameTransform>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub encoding: StringEncoding,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserText {
    pub encoding: StringEncoding,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub encoding: StringEncoding,
    /// ISO-639-2 code, always 3 ISO-8859-1 characters.
    pub language: String,
    pub description: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub encoding: StringEncoding,
    // 2.2 stores a 3 character image format ("JPG") instead of a MIME type
    pub mime: String,
    pub picture_type: u8,
    pub description: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameBody {
    Generic(Generic),
    Text(Text),
    UserText(UserText),
    Comment(Comment),
    Picture(Picture),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: FrameHeader,
    pub body: FrameBody,
}

impl Frame {
    pub fn id(&self) -> &str {
        self.header.id()
    }

    /// Header, optional fields and body.
    pub fn total_len(&self) -> u32 {
        self.header.total_len()
    }

    /// The main string of a text carrying frame, as stored.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            FrameBody::Text(t) => Some(&t.text),
            FrameBody::UserText(t) => Some(&t.value),
            FrameBody::Comment(c) => Some(&c.text),
            FrameBody::Generic(_) | FrameBody::Picture(_) => None,
        }
    }

    /// Raw bytes of a generic frame, refusing frames we could not decode.
    pub fn content(&self) -> Result<Option<&[u8]>, DecodeError> {
        match &self.body {
            FrameBody::Generic(Generic {
                transform: Some(t), ..
            }) => Err(DecodeError::UnsupportedFrameTransform {
                id: self.id().to_string(),
                transform: *t,
            }),
            FrameBody::Generic(g) => Ok(Some(g.data.as_slice())),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub header: Header,
    pub extended_header: Option<ExtendedHeader>,
    pub frames: Vec<Frame>,
    /// Zero bytes after the last frame.
    pub padding: u32,
    /// CRC-32 of the frame bytes as they were read, when the extended
    /// header carries a checksum. `None` for tags built in memory.
    pub frames_crc32: Option<u32>,
}

impl Tag {
    pub fn revision(&self) -> Revision {
        self.header.revision
    }

    pub fn frame(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id() == id)
    }

    /// Sum of header and body bytes over all frames.
    pub fn frames_len(&self) -> u32 {
        self.frames.iter().map(|f| f.total_len()).sum()
    }
}

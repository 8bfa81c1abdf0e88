use std::io::prelude::*;
use std::io::Cursor;

use crc::crc32::checksum_ieee;

use crate::id3v2::structure::*;
use crate::id3v2::tools::*;
use crate::tools::encoding::*;
use crate::tools::reader::TagReader;
use crate::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameKind {
    Generic,
    Text,
    UserText,
    Comment,
    Picture,
}

// exact IDs take priority over the T prefix rule
const FRAME_KINDS: &[(&str, FrameKind)] = &[
    ("TXX", FrameKind::UserText),
    ("TXXX", FrameKind::UserText),
    ("COM", FrameKind::Comment),
    ("COMM", FrameKind::Comment),
    ("PIC", FrameKind::Picture),
    ("APIC", FrameKind::Picture),
];

impl FrameKind {
    pub fn of(id: &str, revision: Revision) -> FrameKind {
        if id.len() != revision.id_len() {
            return FrameKind::Generic;
        }
        if let Some((_, kind)) = FRAME_KINDS.iter().find(|(i, _)| *i == id) {
            return *kind;
        }
        if id.starts_with('T') {
            return FrameKind::Text;
        }
        FrameKind::Generic
    }
}

pub fn header<R: Read>(input: &mut TagReader<R>) -> Result<Header, DecodeError> {
    let mut arr: [u8; 6] = [0; 6];
    input.read_exact(&mut arr)?;

    // ID3v2 identifier      "ID3"
    if &arr[0..3] != MAGIC {
        return Err(DecodeError::MalformedHeader);
    }

    // ID3v2 version              $0X 00
    let revision = Revision::from_major(arr[3])?;

    // ID3v2 size             4 * %0xxxxxxx
    let size = input.read_uint(4, 7)?;

    Ok(Header {
        revision,
        minor_version: arr[4],
        flags: arr[5],
        size,
    })
}

pub fn extended_header<R: Read>(input: &mut TagReader<R>) -> Result<ExtendedHeader, DecodeError> {
    let size = input.read_uint(4, 8)?;
    let flags = input.read_uint(2, 8)? as u16;
    let padding_size = input.read_uint(4, 8)?;
    let mut header = ExtendedHeader {
        size,
        flags,
        padding_size,
        crc32: None,
    };
    if header.has_crc() {
        header.crc32 = Some(input.read_uint(4, 8)?);
    }
    Ok(header)
}

pub fn frame_header<R: Read>(
    input: &mut TagReader<R>,
    revision: Revision,
) -> Result<FrameHeader, DecodeError> {
    let mut id = [0; 4];
    input.read_exact(&mut id[..revision.id_len()])?;
    let id = decode_frame_id(&id[..revision.id_len()]);

    // 3: Frame ID  3: Size
    let size = input.read_uint(revision.size_len(), 8)?;
    if revision == Revision::V22 {
        return Ok(FrameHeader::V22(V22FrameHeader { id, size }));
    }

    // 4: Frame ID  4: Size  2: Flags  + optional fields
    let flags = input.read_uint(2, 8)? as u16;
    let mut header = V23FrameHeader {
        id,
        size,
        flags,
        decompressed_size: None,
        encryption_method: None,
        group_id: None,
    };
    if flags & FRAME_FLAG_COMPRESSED != 0 {
        header.decompressed_size = Some(input.read_uint(4, 8)?);
    }
    if flags & FRAME_FLAG_ENCRYPTED != 0 {
        header.encryption_method = Some(input.read_u8()?);
    }
    if flags & FRAME_FLAG_GROUPED != 0 {
        header.group_id = Some(input.read_u8()?);
    }
    if header.optional_len() > size {
        return Err(DecodeError::InvalidSize(format!(
            "Frame {} is {} bytes, too small for its {} bytes of optional fields",
            header.id,
            size,
            header.optional_len()
        )));
    }
    Ok(FrameHeader::V23(header))
}

pub fn frame_body<R: Read, H: FrameHeaderInfo>(
    input: &mut TagReader<R>,
    header: &H,
) -> Result<FrameBody, DecodeError> {
    let data = input.read_vec(header.content_len() as usize)?;

    if let Some(transform) = header.transform() {
        warn!(
            "Frame {} is {}, keeping it as raw bytes",
            header.id(),
            transform
        );
        return Ok(FrameBody::Generic(Generic {
            data,
            transform: Some(transform),
        }));
    }

    let kind = FrameKind::of(header.id(), header.revision());
    if data.is_empty() && kind != FrameKind::Generic {
        debug!("Frame {} has no body, keeping it as generic", header.id());
        return Ok(generic(data));
    }

    match kind {
        FrameKind::Text => text(&data),
        FrameKind::UserText => user_text(&data),
        FrameKind::Comment => comment(&data),
        FrameKind::Picture => picture(&data, header.revision()),
        FrameKind::Generic => {
            debug!("No decoder for frame {}, keeping raw bytes", header.id());
            Ok(generic(data))
        }
    }
}

fn encoding_byte(data: &[u8]) -> Result<StringEncoding, DecodeError> {
    match data.first() {
        Some(b) => StringEncoding::from_byte(*b),
        None => Err(DecodeError::TruncatedStream(
            "Frame body has no text encoding byte".to_string(),
        )),
    }
}

fn generic(data: Vec<u8>) -> FrameBody {
    FrameBody::Generic(Generic {
        data,
        transform: None,
    })
}

// <encoding> <text>
pub fn text(data: &[u8]) -> Result<FrameBody, DecodeError> {
    let encoding = encoding_byte(data)?;
    Ok(FrameBody::Text(Text {
        encoding,
        text: decode_fixed(&data[1..], encoding)?,
    }))
}

// <encoding> <description> 00 <value>
pub fn user_text(data: &[u8]) -> Result<FrameBody, DecodeError> {
    let encoding = encoding_byte(data)?;
    let (description, used) = decode_terminated(&data[1..], '\0', encoding)?;
    Ok(FrameBody::UserText(UserText {
        encoding,
        description,
        value: decode_fixed(&data[1 + used..], encoding)?,
    }))
}

// <encoding> <language, 3> <description> 00 <text>
pub fn comment(data: &[u8]) -> Result<FrameBody, DecodeError> {
    let encoding = encoding_byte(data)?;
    if data.len() < 4 {
        return Err(DecodeError::TruncatedStream(format!(
            "Comment frame of {} bytes has no room for a language",
            data.len()
        )));
    }
    let language = decode_iso_8859_1(&data[1..4])?;
    // the description's length depends on its encoding, so take what it used
    let (description, used) = decode_terminated(&data[4..], '\0', encoding)?;
    Ok(FrameBody::Comment(Comment {
        encoding,
        language,
        description,
        text: decode_fixed(&data[4 + used..], encoding)?,
    }))
}

// 2.2: <encoding> <format, 3> <type> <description> 00 <data>
// 2.3: <encoding> <mime> 00 <type> <description> 00 <data>
pub fn picture(data: &[u8], revision: Revision) -> Result<FrameBody, DecodeError> {
    let encoding = encoding_byte(data)?;
    let mut pos = 1;
    let mime = match revision {
        Revision::V22 => {
            if data.len() < 4 {
                return Err(DecodeError::TruncatedStream(
                    "Picture frame too short for an image format".to_string(),
                ));
            }
            pos += 3;
            decode_iso_8859_1(&data[1..4])?
        }
        Revision::V23 => {
            let (mime, used) = decode_terminated(&data[pos..], '\0', StringEncoding::Latin1)?;
            pos += used;
            mime
        }
    };
    let picture_type = match data.get(pos) {
        Some(t) => *t,
        None => {
            return Err(DecodeError::TruncatedStream(
                "Picture frame too short for a picture type".to_string(),
            ))
        }
    };
    pos += 1;
    let (description, used) = decode_terminated(&data[pos..], '\0', encoding)?;
    pos += used;
    Ok(FrameBody::Picture(Picture {
        encoding,
        mime,
        picture_type,
        description,
        data: data[pos..].to_vec(),
    }))
}

/// Reads the next frame, or `None` once the next byte starts the padding.
///
/// The first byte is only peeked, so on `None` nothing has been consumed.
pub fn frame<R: Read>(
    input: &mut TagReader<R>,
    revision: Revision,
    remaining: u32,
) -> Result<Option<Frame>, DecodeError> {
    if input.peek_u8()? == 0x00 {
        return Ok(None);
    }
    if remaining < revision.frame_header_len() {
        return Err(DecodeError::TruncatedStream(format!(
            "{} bytes left in the tag, too few for a frame header",
            remaining
        )));
    }

    let header = frame_header(input, revision)?;
    if header.total_len() > remaining {
        return Err(DecodeError::TruncatedStream(format!(
            "Frame {} claims {} bytes but only {} are left in the tag",
            header.id(),
            header.total_len(),
            remaining
        )));
    }

    let body = frame_body(input, &header)?;
    Ok(Some(Frame { header, body }))
}

/// Reads frames until `size` bytes are used up, returning them with the
/// number of padding bytes that followed.
pub fn frames<R: Read>(
    input: &mut TagReader<R>,
    revision: Revision,
    size: u32,
) -> Result<(Vec<Frame>, u32), DecodeError> {
    let mut frames = Vec::new();
    let mut remaining = size;

    while remaining > 0 {
        match frame(input, revision, remaining)? {
            Some(f) => {
                remaining -= f.total_len();
                frames.push(f);
            }
            None => {
                debug!("Padding of {} bytes after {} frames", remaining, frames.len());
                let padding = input.read_vec(remaining as usize)?;
                if padding.iter().any(|&b| b != 0x00) {
                    debug!("Padding contains non-zero bytes");
                }
                return Ok((frames, remaining));
            }
        }
    }

    Ok((frames, 0))
}

pub fn tag_body<R: Read>(
    input: &mut TagReader<R>,
    header: Header,
    size: u32,
) -> Result<Tag, DecodeError> {
    match header.revision {
        Revision::V22 => {
            if header.is_compressed() {
                return Err(DecodeError::CompressedTag);
            }
            let (frames, padding) = frames(input, Revision::V22, size)?;
            Ok(Tag {
                header,
                extended_header: None,
                frames,
                padding,
                frames_crc32: None,
            })
        }
        Revision::V23 => {
            let mut budget = size;
            let extended_header = if header.has_extended_header() {
                let ext = extended_header(input)?;
                budget = budget.checked_sub(ext.encoded_len()).ok_or_else(|| {
                    DecodeError::TruncatedStream(format!(
                        "Extended header of {} bytes does not fit in a {} byte tag",
                        ext.encoded_len(),
                        size
                    ))
                })?;
                Some(ext)
            } else {
                None
            };

            let (frames, padding, frames_crc32) = match &extended_header {
                Some(ext) if ext.has_crc() => {
                    // the checksum covers the frame bytes as stored
                    let region = input.read_vec(budget as usize)?;
                    let (frames, padding) = frames(
                        &mut TagReader::new(Cursor::new(&region[..])),
                        Revision::V23,
                        budget,
                    )?;
                    let crc = checksum_ieee(&region[..(budget - padding) as usize]);
                    (frames, padding, Some(crc))
                }
                _ => {
                    let (frames, padding) = frames(input, Revision::V23, budget)?;
                    (frames, padding, None)
                }
            };
            if let Some(ext) = &extended_header {
                if ext.padding_size != padding {
                    debug!(
                        "Extended header declares {} bytes of padding, found {}",
                        ext.padding_size, padding
                    );
                }
            }
            Ok(Tag {
                header,
                extended_header,
                frames,
                padding,
                frames_crc32,
            })
        }
    }
}

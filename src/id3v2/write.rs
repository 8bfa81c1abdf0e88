use crate::id3v2::structure::*;
use crate::id3v2::tools::*;
use crate::tools::encode_uint;
use crate::tools::encoding::*;
use crate::EncodeError;

pub fn tag(tag: &Tag) -> Result<Vec<u8>, EncodeError> {
    let header = &tag.header;

    // everything the declared size covers
    let mut body = Vec::with_capacity(header.size as usize);
    if let Some(ext) = &tag.extended_header {
        body.append(&mut extended_header(ext)?);
    }
    body.append(&mut frames(&tag.frames)?);
    body.resize(body.len() + tag.padding as usize, 0x00);

    if header.is_unsynchronized() {
        body = apply_unsynch(&body);
    }
    if body.len() != header.size as usize {
        return Err(EncodeError::TagSizeMismatch {
            declared: header.size,
            actual: body.len(),
        });
    }

    let mut vec = Vec::with_capacity(HEADER_LEN as usize + body.len());
    vec.extend_from_slice(MAGIC);
    vec.push(header.revision.major());
    vec.push(header.minor_version);
    vec.push(header.flags);
    vec.append(&mut encode_synch_int(header.size)?);
    vec.append(&mut body);
    Ok(vec)
}

pub fn extended_header(ext: &ExtendedHeader) -> Result<Vec<u8>, EncodeError> {
    let mut vec = encode_uint(ext.size, 4, 8)?;
    vec.append(&mut encode_uint(ext.flags as u32, 2, 8)?);
    vec.append(&mut encode_uint(ext.padding_size, 4, 8)?);
    if ext.has_crc() {
        vec.append(&mut encode_uint(ext.crc32.unwrap_or(0), 4, 8)?);
    }
    Ok(vec)
}

/// All frames back to back, no padding.
pub fn frames(frames: &[Frame]) -> Result<Vec<u8>, EncodeError> {
    let mut vec = Vec::new();
    for f in frames {
        vec.append(&mut frame(f)?);
    }
    Ok(vec)
}

pub fn frame(frame: &Frame) -> Result<Vec<u8>, EncodeError> {
    let mut vec = frame_header(&frame.header)?;
    let body = frame_body(&frame.body, frame.header.revision())?;

    let declared = frame.header.content_len();
    if body.len() != declared as usize || frame.header.optional_len() > frame.header.size() {
        return Err(EncodeError::FrameSizeMismatch {
            id: frame.id().to_string(),
            declared,
            actual: body.len(),
        });
    }

    vec.extend_from_slice(&body);
    Ok(vec)
}

pub fn frame_header(header: &FrameHeader) -> Result<Vec<u8>, EncodeError> {
    let revision = header.revision();
    let mut vec = encode_frame_id(header.id(), revision.id_len())?;
    vec.append(&mut encode_uint(header.size(), revision.size_len(), 8)?);

    if let FrameHeader::V23(h) = header {
        vec.append(&mut encode_uint(h.flags as u32, 2, 8)?);
        if let Some(x) = h.decompressed_size {
            vec.append(&mut encode_uint(x, 4, 8)?);
        }
        if let Some(x) = h.encryption_method {
            vec.push(x);
        }
        if let Some(x) = h.group_id {
            vec.push(x);
        }
    }
    Ok(vec)
}

pub fn frame_body(body: &FrameBody, revision: Revision) -> Result<Vec<u8>, EncodeError> {
    let mut vec = Vec::new();
    match body {
        FrameBody::Generic(g) => vec.extend_from_slice(&g.data),
        FrameBody::Text(t) => {
            vec.push(t.encoding.to_byte());
            vec.append(&mut encode_fixed(&t.text, t.encoding)?);
        }
        FrameBody::UserText(t) => {
            vec.push(t.encoding.to_byte());
            vec.append(&mut encode_terminated(&t.description, '\0', t.encoding)?);
            vec.append(&mut encode_fixed(&t.value, t.encoding)?);
        }
        FrameBody::Comment(c) => {
            vec.push(c.encoding.to_byte());
            vec.append(&mut language(&c.language)?);
            vec.append(&mut encode_terminated(&c.description, '\0', c.encoding)?);
            vec.append(&mut encode_fixed(&c.text, c.encoding)?);
        }
        FrameBody::Picture(p) => {
            vec.push(p.encoding.to_byte());
            match revision {
                Revision::V22 => vec.append(&mut language(&p.mime)?),
                Revision::V23 => vec.append(&mut encode_terminated(
                    &p.mime,
                    '\0',
                    StringEncoding::Latin1,
                )?),
            }
            vec.push(p.picture_type);
            vec.append(&mut encode_terminated(&p.description, '\0', p.encoding)?);
            vec.extend_from_slice(&p.data);
        }
    }
    Ok(vec)
}

// fixed 3 byte fields: comment language, 2.2 image format
fn language(input: &str) -> Result<Vec<u8>, EncodeError> {
    let vec = encode_iso_8859_1(input)?;
    if vec.len() != 3 {
        return Err(EncodeError::InvalidSize(format!(
            "{:?} is not a 3 character code",
            input
        )));
    }
    Ok(vec)
}

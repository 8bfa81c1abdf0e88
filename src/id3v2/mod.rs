use std::io::prelude::*;
use std::io::Cursor;

use crc::crc32::checksum_ieee;

use crate::tools::reader::TagReader;
use crate::DecodeError;
use crate::EncodeError;

pub mod get;
mod read;
mod regex;
pub mod structure;
mod tools;
mod write;

use self::structure::Tag;

pub fn read<R: Read>(input: R) -> Result<Tag, DecodeError> {
    let mut input = TagReader::new(input);
    let header = read::header(&mut input)?;

    let tag = if header.is_unsynchronized() {
        // undo unsynch on the whole tag, then parse what is left
        let vec = tools::undo_unsynch(&input.read_vec(header.size as usize)?);
        let size = vec.len() as u32;
        read::tag_body(&mut TagReader::new(Cursor::new(vec)), header, size)?
    } else {
        let size = header.size;
        read::tag_body(&mut input, header, size)?
    };

    match tag.verify_checksum() {
        Ok(Some(false)) => warn!("Extended header CRC does not match the frame data"),
        Err(e) => warn!("Could not check the extended header CRC: {}", e),
        _ => {}
    }
    Ok(tag)
}

pub fn write<W: Write>(tag: &Tag, output: &mut W) -> Result<usize, EncodeError> {
    let vec = write::tag(tag)?;
    output.write_all(&vec)?;
    output.flush()?;
    Ok(vec.len())
}

pub fn encode(tag: &Tag) -> Result<Vec<u8>, EncodeError> {
    write::tag(tag)
}

impl Tag {
    /// Checks the extended header CRC-32 against the frame data as it was
    /// read, or as it encodes for tags that were not decoded.
    /// `None` when the tag carries no checksum.
    pub fn verify_checksum(&self) -> Result<Option<bool>, EncodeError> {
        let expected = match self.extended_header.as_ref().and_then(|e| e.crc32) {
            None => return Ok(None),
            Some(crc) => crc,
        };
        let actual = match self.frames_crc32 {
            Some(crc) => crc,
            None => checksum_ieee(&write::frames(&self.frames)?),
        };
        Ok(Some(actual == expected))
    }
}

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::id3v2;
use crate::id3v2::structure::Tag;
use crate::DecodeError;
use crate::EncodeError;

/// Decodes the tag at the start of `bytes`; anything after it is ignored.
pub fn decode(bytes: &[u8]) -> Result<Tag, DecodeError> {
    id3v2::read(bytes)
}

pub fn read_tag<R: Read>(input: R) -> Result<Tag, DecodeError> {
    id3v2::read(input)
}

/// Reads the tag at the start of the file at `path`.
pub fn get_tag<P: AsRef<Path>>(path: P) -> Result<Tag, DecodeError> {
    let file = File::open(path.as_ref())?;
    // the file is closed when the reader drops, on errors too
    id3v2::read(BufReader::new(file))
}

/// Encodes `tag` using the sizes its headers declare.
///
/// UCS-2 strings are always written big endian with an `FE FF` byte order
/// mark. A frame read from little endian text keeps its size, but one whose
/// strings had no byte order mark grows by two bytes per string and fails
/// with `EncodeError::FrameSizeMismatch` until its header size is updated.
pub fn encode(tag: &Tag) -> Result<Vec<u8>, EncodeError> {
    id3v2::encode(tag)
}

/// Writes the encoded tag, returning the number of bytes written.
pub fn write_tag<W: Write>(tag: &Tag, output: &mut W) -> Result<usize, EncodeError> {
    id3v2::write(tag, output)
}

extern crate encoding;
use self::encoding::all::{ISO_8859_1, UTF_16BE};
use self::encoding::{DecoderTrap, EncoderTrap, Encoding};

use crate::DecodeError;
use crate::EncodeError;

/// Text encodings a frame can announce with its leading encoding byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    /// ISO-8859-1, one byte per character.
    Latin1,
    /// UCS-2 behind a byte order mark, two bytes per character.
    Ucs2,
}

impl StringEncoding {
    pub fn from_byte(b: u8) -> Result<StringEncoding, DecodeError> {
        match b {
            0x00 => Ok(StringEncoding::Latin1),
            0x01 => Ok(StringEncoding::Ucs2),
            _ => Err(DecodeError::InvalidEncodingByte(b)),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            StringEncoding::Latin1 => 0x00,
            StringEncoding::Ucs2 => 0x01,
        }
    }
}

const BOM_BE: [u8; 2] = [0xFE, 0xFF];
const BOM_LE: [u8; 2] = [0xFF, 0xFE];

/// Decodes all of `input` as one string, embedded nulls included.
pub fn decode_fixed(input: &[u8], encoding: StringEncoding) -> Result<String, DecodeError> {
    match encoding {
        StringEncoding::Latin1 => decode_iso_8859_1(input),
        StringEncoding::Ucs2 => {
            if input.is_empty() {
                return Ok(String::new());
            }
            if input.len() % 2 != 0 {
                return Err(DecodeError::TruncatedStream(format!(
                    "UCS-2 string of odd length {}",
                    input.len()
                )));
            }
            let (little_endian, start) = byte_order(input);
            decode_ucs2(&input[start..], little_endian)
        }
    }
}

/// Decodes up to the first `terminator`, returning the string and the number
/// of bytes consumed including the terminator (and the byte order mark).
pub fn decode_terminated(
    input: &[u8],
    terminator: char,
    encoding: StringEncoding,
) -> Result<(String, usize), DecodeError> {
    match encoding {
        StringEncoding::Latin1 => {
            let t = terminator as u32;
            match input.iter().position(|&b| b as u32 == t) {
                Some(end) => Ok((decode_iso_8859_1(&input[..end])?, end + 1)),
                None => Err(unterminated(input.len())),
            }
        }
        StringEncoding::Ucs2 => {
            let (little_endian, start) = byte_order(input);
            let t = terminator as u32;
            let mut end = start;
            while end + 2 <= input.len() {
                let unit = unit_at(input, end, little_endian);
                if unit as u32 == t {
                    let s = decode_ucs2(&input[start..end], little_endian)?;
                    return Ok((s, end + 2));
                }
                end += 2;
            }
            Err(unterminated(input.len()))
        }
    }
}

pub fn encode_fixed(input: &str, encoding: StringEncoding) -> Result<Vec<u8>, EncodeError> {
    match encoding {
        StringEncoding::Latin1 => encode_iso_8859_1(input),
        StringEncoding::Ucs2 => {
            let mut vec = BOM_BE.to_vec();
            vec.append(&mut encode_ucs2(input)?);
            Ok(vec)
        }
    }
}

pub fn encode_terminated(
    input: &str,
    terminator: char,
    encoding: StringEncoding,
) -> Result<Vec<u8>, EncodeError> {
    let mut vec = encode_fixed(input, encoding)?;
    match encoding {
        StringEncoding::Latin1 => vec.append(&mut encode_iso_8859_1(&terminator.to_string())?),
        StringEncoding::Ucs2 => vec.append(&mut encode_ucs2(&terminator.to_string())?),
    }
    Ok(vec)
}

pub fn decode_iso_8859_1(input: &[u8]) -> Result<String, DecodeError> {
    ISO_8859_1
        .decode(input, DecoderTrap::Strict)
        .map_err(|e| DecodeError::UnsupportedCharacter(e.into_owned()))
}

pub fn encode_iso_8859_1(input: &str) -> Result<Vec<u8>, EncodeError> {
    if let Some(c) = input.chars().find(|c| *c as u32 > 0xFF) {
        return Err(unsupported(c, "ISO-8859-1"));
    }
    ISO_8859_1
        .encode(input, EncoderTrap::Strict)
        .map_err(|e| EncodeError::UnsupportedCharacter(e.into_owned()))
}

// (little endian, offset of the first code unit)
fn byte_order(input: &[u8]) -> (bool, usize) {
    if input.len() < 2 {
        return (false, 0);
    }
    match [input[0], input[1]] {
        BOM_LE => (true, 2),
        BOM_BE => (false, 2),
        _ => {
            // no BOM, assume big endian like most writers do
            debug!("UCS-2 string without byte order mark");
            (false, 0)
        }
    }
}

fn unit_at(input: &[u8], at: usize, little_endian: bool) -> u16 {
    let pair = [input[at], input[at + 1]];
    if little_endian {
        u16::from_le_bytes(pair)
    } else {
        u16::from_be_bytes(pair)
    }
}

fn decode_ucs2(input: &[u8], little_endian: bool) -> Result<String, DecodeError> {
    let mut be = input.to_vec();
    if little_endian {
        for pair in be.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
    }
    UTF_16BE
        .decode(&be, DecoderTrap::Strict)
        .map_err(|e| DecodeError::UnsupportedCharacter(e.into_owned()))
}

fn encode_ucs2(input: &str) -> Result<Vec<u8>, EncodeError> {
    // surrogate pairs are not part of UCS-2
    if let Some(c) = input.chars().find(|c| *c as u32 > 0xFFFF) {
        return Err(unsupported(c, "UCS-2"));
    }
    UTF_16BE
        .encode(input, EncoderTrap::Strict)
        .map_err(|e| EncodeError::UnsupportedCharacter(e.into_owned()))
}

fn unsupported(c: char, name: &str) -> EncodeError {
    EncodeError::UnsupportedCharacter(format!(
        "U+{:04X} cannot be encoded as {}",
        c as u32, name
    ))
}

fn unterminated(len: usize) -> DecodeError {
    DecodeError::TruncatedStream(format!("No terminator in {} bytes of string data", len))
}

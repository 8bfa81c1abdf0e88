use crate::tools::{decode_uint, encode_uint};
use crate::DecodeError;
use crate::EncodeError;

// collapse every FF 00 back to FF
pub fn undo_unsynch(input: &[u8]) -> Vec<u8> {
    let mut vec = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        vec.push(input[i]);
        if input[i] == 0xFF && i + 1 < input.len() && input[i + 1] == 0x00 {
            i += 1;
        }
        i += 1;
    }
    vec
}

// insert a zero after every FF that could be read as a sync or an escape
pub fn apply_unsynch(input: &[u8]) -> Vec<u8> {
    let mut vec = Vec::with_capacity(input.len());
    for (i, b) in input.iter().enumerate() {
        vec.push(*b);
        if *b == 0xFF {
            match input.get(i + 1) {
                Some(&next) if next == 0x00 || next & 0xE0 == 0xE0 => vec.push(0x00),
                _ => (),
            }
        }
    }
    vec
}

pub fn decode_synch_int(input: &[u8]) -> Result<u32, DecodeError> {
    decode_uint(input, 7)
}

pub fn encode_synch_int(input: u32) -> Result<Vec<u8>, EncodeError> {
    encode_uint(input, 4, 7)
}

// IDs are taken as they are, one byte per character, so that an ID with
// stray bytes still decodes as a frame instead of being mistaken for padding
pub fn decode_frame_id(input: &[u8]) -> String {
    input.iter().map(|&c| c as char).collect()
}

pub fn encode_frame_id(input: &str, width: usize) -> Result<Vec<u8>, EncodeError> {
    let v: Vec<u8> = input
        .chars()
        .map(|c| c as u32)
        .take_while(|&c| c <= 0xFF)
        .map(|c| c as u8)
        .collect();
    if v.len() != width || input.chars().count() != width {
        return Err(EncodeError::InvalidFrameId(input.to_string()));
    }
    Ok(v)
}

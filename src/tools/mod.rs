pub mod encoding;
pub mod reader;

use crate::DecodeError;
use crate::EncodeError;

// packs `bits_per_byte` bits of every byte, most significant byte first.
// 8 gives an ordinary big endian int, 7 a synchsafe one.
pub fn decode_uint(input: &[u8], bits_per_byte: u32) -> Result<u32, DecodeError> {
    if input.len() > 4 {
        return Err(DecodeError::InvalidSize(format!(
            "Expected at most 4 bytes, got {}",
            input.len()
        )));
    }
    let mask = (1u32 << bits_per_byte) - 1;
    let mut result: u32 = 0;
    for (i, b) in input.iter().enumerate() {
        let b = *b as u32;
        // the unused top bits have to be zero
        if b & !mask != 0 {
            return Err(DecodeError::InvalidSize(format!(
                "Byte {:#04x} at position {} does not fit in {} bits",
                b, i, bits_per_byte
            )));
        }
        result = (result << bits_per_byte) | b;
    }
    Ok(result)
}

pub fn encode_uint(input: u32, width: usize, bits_per_byte: u32) -> Result<Vec<u8>, EncodeError> {
    let capacity = width as u32 * bits_per_byte;
    if width > 4 || (capacity < 32 && input >> capacity != 0) {
        return Err(EncodeError::InvalidSize(format!(
            "{} does not fit in {} bytes of {} bits",
            input, width, bits_per_byte
        )));
    }
    let mask = (1u32 << bits_per_byte) - 1;
    Ok((0..width)
        .map(|i| ((input >> (bits_per_byte * (width - 1 - i) as u32)) & mask) as u8)
        .collect())
}

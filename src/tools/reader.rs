use std::io::prelude::*;

use crate::tools::decode_uint;
use crate::DecodeError;

/// Sequential byte source with a single byte of lookahead.
///
/// A peeked byte stays buffered until the next read, so peeking never moves
/// `position()`. The frame loop relies on this to tell the start of padding
/// from the start of another frame.
pub struct TagReader<R> {
    inner: R,
    peeked: Option<u8>,
    position: u64,
}

impl<R: Read> TagReader<R> {
    pub fn new(inner: R) -> TagReader<R> {
        TagReader {
            inner,
            peeked: None,
            position: 0,
        }
    }

    /// Bytes consumed so far; a peeked byte does not count.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn peek_u8(&mut self) -> Result<u8, DecodeError> {
        if let Some(b) = self.peeked {
            return Ok(b);
        }
        let mut buf = [0; 1];
        self.inner.read_exact(&mut buf)?;
        self.peeked = Some(buf[0]);
        Ok(buf[0])
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let mut buf = [0; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        if buf.is_empty() {
            return Ok(());
        }
        let start = match self.peeked.take() {
            Some(b) => {
                buf[0] = b;
                1
            }
            None => 0,
        };
        self.inner.read_exact(&mut buf[start..])?;
        self.position += buf.len() as u64;
        Ok(())
    }

    // avoids allocating the whole claimed length up front,
    // so a bogus size on a short stream fails cheaply
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut vec = Vec::new();
        if len == 0 {
            return Ok(vec);
        }
        if let Some(b) = self.peeked.take() {
            vec.push(b);
        }
        let rest = (len - vec.len()) as u64;
        (&mut self.inner).take(rest).read_to_end(&mut vec)?;
        if vec.len() < len {
            self.position += vec.len() as u64;
            return Err(DecodeError::TruncatedStream(format!(
                "Expected {} bytes, only {} available",
                len,
                vec.len()
            )));
        }
        self.position += len as u64;
        Ok(vec)
    }

    pub fn read_uint(&mut self, width: usize, bits_per_byte: u32) -> Result<u32, DecodeError> {
        let mut buf = [0; 4];
        if width > buf.len() {
            return Err(DecodeError::InvalidSize(format!(
                "Cannot read a {} byte integer",
                width
            )));
        }
        self.read_exact(&mut buf[..width])?;
        decode_uint(&buf[..width], bits_per_byte)
    }
}

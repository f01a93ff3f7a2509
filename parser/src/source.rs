//! A positioned byte source with typed integer reads and peek-style undo.
//!
//! This is the only layer which touches the underlying reader directly.
//! Typed integer reads always interpret the bytes in little-endian wire
//! order; swapping values into the byte order of the data set is the
//! decoder's concern.

use byteordered::byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Result as IoResult, Seek, SeekFrom};

/// A byte source over a readable and seekable stream,
/// keeping track of the current position.
///
/// Reads which cannot be fully satisfied
/// surface as `UnexpectedEof` I/O errors.
#[derive(Debug)]
pub struct ByteSource<R> {
    inner: R,
    position: u64,
}

impl<R> ByteSource<R>
where
    R: Read + Seek,
{
    /// Create a new byte source,
    /// assuming that the stream is at position 0.
    pub fn new(inner: R) -> Self {
        ByteSource { inner, position: 0 }
    }

    /// The current position in the stream, in bytes.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move to the given absolute position.
    pub fn seek_to(&mut self, position: u64) -> IoResult<()> {
        self.inner.seek(SeekFrom::Start(position))?;
        self.position = position;
        Ok(())
    }

    /// Move the given number of bytes forward without reading.
    pub fn skip(&mut self, n: u64) -> IoResult<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        self.position += n;
        Ok(())
    }

    /// Put the last `n` read bytes back,
    /// so that the next read starts over at them.
    pub fn undo(&mut self, n: u64) -> IoResult<()> {
        self.inner.seek(SeekFrom::Current(-(n as i64)))?;
        self.position -= n;
        Ok(())
    }

    /// Fill the whole buffer from the stream.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> IoResult<()> {
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Read an unsigned 16-bit integer in little-endian wire order.
    pub fn read_u16(&mut self) -> IoResult<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Read an unsigned 32-bit integer in little-endian wire order.
    pub fn read_u32(&mut self) -> IoResult<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Read `n` bytes as a string.
    /// Bytes which do not form valid UTF-8 text are replaced,
    /// so that probing arbitrary binary data is not an error.
    pub fn read_str(&mut self, n: usize) -> IoResult<String> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

//! A thin sequential-read wrapper over a classfile byte source.
//!
//! Mirrors the teacher's `ClassFileStream`: the decoder never seeks
//! backward within a classfile (spec.md §4.1 "Input constraints"), only
//! forward reads and bounded skips.

use std::io::Read;

use crate::error::{self, ClassFileError};

/// A utility wrapper to allow easily reading classfile primitives from a
/// [`Read`]er. `.1`/`bytes_read` tracks the stream position purely for
/// diagnostics; the decoder itself never uses it to seek.
pub struct ClassFileStream<'a, R: Read> {
    reader: &'a mut R,
    bytes_read: usize,
}

impl<'a, R: Read> ClassFileStream<'a, R> {
    pub fn new(r: &'a mut R) -> Self {
        Self { reader: r, bytes_read: 0 }
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Read an unsigned 4-byte integer from the stream.
    pub fn read_u4(&mut self) -> error::Result<u32> {
        Ok(u32::from_be_bytes(self.read::<4>()?))
    }

    /// Read an unsigned 2-byte integer from the stream.
    pub fn read_u2(&mut self) -> error::Result<u16> {
        Ok(u16::from_be_bytes(self.read::<2>()?))
    }

    /// Read an unsigned byte from the stream.
    pub fn read_u1(&mut self) -> error::Result<u8> {
        Ok(self.read::<1>()?[0])
    }

    /// Read `S` bytes from the stream.
    pub fn read<const S: usize>(&mut self) -> error::Result<[u8; S]> {
        let mut buf = [0; S];
        self.reader.read_exact(&mut buf).map_err(ClassFileError::Io)?;
        self.bytes_read += S;
        Ok(buf)
    }

    /// Read `len` bytes from the stream with a runtime length.
    pub fn read_dynamic(&mut self, len: usize) -> error::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf).map_err(ClassFileError::Io)?;
        self.bytes_read += len;
        Ok(buf)
    }

    /// Skip `len` bytes, discarding them — used for attributes and method
    /// bodies the decoder does not otherwise parse (spec.md §4.1 steps 10,
    /// 11: "all other attributes are skipped" / "skipped by their declared
    /// length").
    pub fn skip(&mut self, len: usize) -> error::Result<()> {
        // `io::copy` into a sink would still materialize reads; since most
        // readers here are in-memory (`Cursor`) or buffered files, a
        // straightforward discard-read keeps this allocation-free for the
        // common small-attribute case without requiring `R: Seek`.
        let mut remaining = len;
        let mut scratch = [0u8; 4096];
        while remaining > 0 {
            let chunk = remaining.min(scratch.len());
            self.reader
                .read_exact(&mut scratch[..chunk])
                .map_err(ClassFileError::Io)?;
            remaining -= chunk;
        }
        self.bytes_read += len;
        Ok(())
    }
}

//! Byte readers/writers for the GBS header.
use thiserror::Error;

/// Error type returned by the reading helpers in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An attempted read was outside the available buffer range.
    ///
    /// - `offset` is the index that was attempted to be accessed.
    /// - `needed` is the number of bytes required for the operation.
    /// - `available` is the current buffer length.
    #[error("offset out of range: 0x{offset:X} (needed {needed} bytes, available {available})")]
    OffsetOutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A magic tag did not match the expected value.
    #[error("invalid ident: {0:?}")]
    InvalidIdent([u8; 3]),

    /// The data uses a version the reader does not support.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
}

fn check_range(bytes: &[u8], off: usize, needed: usize) -> Result<(), ParseError> {
    if bytes.len() < off + needed {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

/// Read a single byte from `bytes` at `off`.
pub fn read_u8_at(bytes: &[u8], off: usize) -> Result<u8, ParseError> {
    check_range(bytes, off, 1)?;
    Ok(bytes[off])
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
pub fn read_u16_le_at(bytes: &[u8], off: usize) -> Result<u16, ParseError> {
    check_range(bytes, off, 2)?;
    Ok(u16::from_le_bytes([bytes[off], bytes[off + 1]]))
}

/// Return a borrowed slice of length `len` starting at `off` from `bytes`.
pub fn read_slice(bytes: &[u8], off: usize, len: usize) -> Result<&[u8], ParseError> {
    check_range(bytes, off, len)?;
    Ok(&bytes[off..off + len])
}

/// Write a 16-bit little-endian unsigned integer `v` into `buf` at `off`.
///
/// Does not perform bounds checking; callers must ensure the destination
/// range is valid.
pub fn write_u16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

/// Write a single byte `v` into `buf` at `off`.
pub fn write_u8(buf: &mut [u8], off: usize, v: u8) {
    buf[off] = v;
}

/// Copy the contents of `s` into `buf` starting at `off`.
pub fn write_slice(buf: &mut [u8], off: usize, s: &[u8]) {
    buf[off..off + s.len()].copy_from_slice(s);
}

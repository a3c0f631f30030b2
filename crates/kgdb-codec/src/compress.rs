//! Optional lz4-frame wrapping, toggled per column at schema time.
//!
//! Compression wraps whatever bytes a [`crate::value_codec::ValueCodec`]
//! already produced; it never looks inside them. A leading
//! little-endian `u32` original-length prefix lets the block codec
//! size its output buffer up front.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use thiserror::Error;

/// Errors from the lz4 framing layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompressError {
    /// The frame's length prefix or block was corrupt.
    #[error("lz4 frame corrupt: {0}")]
    Corrupt(String),
}

/// Compress `data`, prefixing the output with its decompressed length.
#[must_use]
pub fn compress_frame(data: &[u8]) -> Vec<u8> {
    compress_prepend_size(data)
}

/// Reverse [`compress_frame`].
///
/// # Errors
///
/// Returns [`CompressError`] if `frame` isn't a valid length-prefixed
/// lz4 block.
pub fn decompress_frame(frame: &[u8]) -> Result<Vec<u8>, CompressError> {
    decompress_size_prepended(frame).map_err(|e| CompressError::Corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let framed = compress_frame(&data);
        let recovered = decompress_frame(&framed).unwrap();
        assert_eq!(data, recovered);
    }

    #[test]
    fn round_trips_empty_input() {
        let framed = compress_frame(&[]);
        assert_eq!(decompress_frame(&framed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_truncated_frame() {
        let framed = compress_frame(b"some reasonably long payload to compress");
        let truncated = &framed[..framed.len() - 2];
        assert!(decompress_frame(truncated).is_err());
    }

    #[test]
    fn compressed_is_smaller_for_repetitive_input() {
        let data = vec![b'a'; 4096];
        let framed = compress_frame(&data);
        assert!(framed.len() < data.len());
    }
}

//! Key and value encodings for kgdb's columnar store.
//!
//! Keys are plain byte strings; the store never interprets them beyond
//! ordering and prefix matching. This crate owns the handful of byte
//! shapes every column agrees on: fixed-width integer keys, composite
//! (tuple-of-LID) keys, and the small family of value encodings a
//! schema entry can select (`OBJ`, `INT_NUMPY`, `INT_BITMAP`, `BYTES`).

pub mod compress;
pub mod key;
pub mod value_codec;

pub use compress::{compress_frame, decompress_frame};
pub use key::{composite_key, composite_key_prefix, split_composite_key, KeyError, SENTINEL};
pub use value_codec::{ColumnValue, ValueCodec, ValueCodecError, ValueEncoding};

//! Key encodings: fixed-width integers and composite (tuple-of-LID) keys.
//!
//! A composite key is the concatenation of big-endian `u32` LID segments
//! separated by a one-byte sentinel. Segments sit at fixed byte offsets
//! (`4*i + i` for the `i`-th separator), so a byte-prefix match against
//! `encode(a) ++ [SENTINEL]` can only match keys whose first segment is
//! `a` — the separator's role is positional, not a scanned delimiter, so
//! its value need not be excluded from segment bytes for correctness.
//! `0x7C` (`|`) is kept as the sentinel byte for readability when keys
//! are dumped for debugging.

use kgdb_core::Lid;
use thiserror::Error;

/// Sentinel byte separating composite-key segments.
pub const SENTINEL: u8 = 0x7C;

/// Errors raised while decoding a key back into LID segments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The byte length wasn't a multiple of the expected segment stride.
    #[error("malformed composite key: {0} bytes is not a valid segment layout")]
    MalformedLength(usize),
    /// A separator byte was found somewhere other than a segment boundary.
    #[error("malformed composite key: separator at unexpected offset {0}")]
    MisplacedSeparator(usize),
}

/// Encode a single `u32` as a fixed-width big-endian key.
#[must_use]
pub fn fixed_key_u32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Encode a single `u64` as a fixed-width big-endian key.
#[must_use]
pub fn fixed_key_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Encode a tuple of LIDs as a composite key: 4-byte big-endian segments
/// joined by [`SENTINEL`].
#[must_use]
pub fn composite_key(lids: &[Lid]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lids.len() * 5);
    for (i, lid) in lids.iter().enumerate() {
        if i > 0 {
            out.push(SENTINEL);
        }
        out.extend_from_slice(&lid.get().to_be_bytes());
    }
    out
}

/// Build the byte prefix that selects every composite key whose leading
/// segments match `lids`, i.e. `get_with_prefix((a, ...))`.
///
/// An empty `lids` prefix matches every key in the column.
#[must_use]
pub fn composite_key_prefix(lids: &[Lid]) -> Vec<u8> {
    if lids.is_empty() {
        return Vec::new();
    }
    let mut out = composite_key(lids);
    out.push(SENTINEL);
    out
}

/// Decode a composite key back into its LID segments.
///
/// # Errors
///
/// Returns [`KeyError`] if the byte layout doesn't match the expected
/// `4, 1, 4, 1, 4, ...` segment/separator stride.
pub fn split_composite_key(bytes: &[u8]) -> Result<Vec<Lid>, KeyError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut lids = Vec::new();
    let mut offset = 0usize;
    loop {
        let segment_end = offset + 4;
        if segment_end > bytes.len() {
            return Err(KeyError::MalformedLength(bytes.len()));
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[offset..segment_end]);
        lids.push(Lid::new(u32::from_be_bytes(raw)));
        offset = segment_end;
        if offset == bytes.len() {
            break;
        }
        if bytes[offset] != SENTINEL {
            return Err(KeyError::MisplacedSeparator(offset));
        }
        offset += 1;
        if offset == bytes.len() {
            return Err(KeyError::MalformedLength(bytes.len()));
        }
    }
    Ok(lids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lid_round_trips() {
        let key = composite_key(&[Lid::new(42)]);
        assert_eq!(key, vec![0, 0, 0, 42]);
        assert_eq!(split_composite_key(&key).unwrap(), vec![Lid::new(42)]);
    }

    #[test]
    fn pair_round_trips_with_sentinel() {
        let key = composite_key(&[Lid::new(1), Lid::new(2)]);
        assert_eq!(key, vec![0, 0, 0, 1, SENTINEL, 0, 0, 0, 2]);
        assert_eq!(
            split_composite_key(&key).unwrap(),
            vec![Lid::new(1), Lid::new(2)]
        );
    }

    #[test]
    fn prefix_selects_matching_first_segment() {
        let prefix = composite_key_prefix(&[Lid::new(1)]);
        let matching = composite_key(&[Lid::new(1), Lid::new(2)]);
        let not_matching = composite_key(&[Lid::new(12), Lid::new(2)]);
        assert!(matching.starts_with(&prefix));
        assert!(!not_matching.starts_with(&prefix));
    }

    #[test]
    fn empty_prefix_matches_everything() {
        assert!(composite_key_prefix(&[]).is_empty());
    }

    #[test]
    fn malformed_length_is_rejected() {
        assert!(matches!(
            split_composite_key(&[1, 2, 3]),
            Err(KeyError::MalformedLength(3))
        ));
    }

    #[test]
    fn misplaced_separator_is_rejected() {
        let mut bytes = composite_key(&[Lid::new(1), Lid::new(2)]);
        bytes[4] = 0xAA;
        assert!(matches!(
            split_composite_key(&bytes),
            Err(KeyError::MisplacedSeparator(4))
        ));
    }

    #[test]
    fn fixed_u32_key_is_big_endian() {
        assert_eq!(fixed_key_u32(1), [0, 0, 0, 1]);
    }

    #[test]
    fn fixed_u64_key_is_big_endian() {
        assert_eq!(fixed_key_u64(1), [0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn composite_keys_sort_like_tuples() {
        let a = composite_key(&[Lid::new(1), Lid::new(5)]);
        let b = composite_key(&[Lid::new(1), Lid::new(9)]);
        let c = composite_key(&[Lid::new(2), Lid::new(0)]);
        assert!(a < b);
        assert!(b < c);
    }
}

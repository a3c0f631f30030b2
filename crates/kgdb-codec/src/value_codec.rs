//! Value encodings selectable per column at schema time.
//!
//! Four shapes cover every column in the store: `OBJ` (an arbitrary
//! [`kgdb_core::Value`], msgpack-encoded), `INT_NUMPY` (a sorted LID
//! array), `INT_BITMAP` (a roaring bitmap of LIDs) and `BYTES` (opaque
//! passthrough). Each also defines the associative `merge` operator a
//! `put_batch`/`merge` write uses instead of overwrite.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use kgdb_core::{Lid, Value};
use roaring::RoaringBitmap;
use std::io::Cursor;
use thiserror::Error;

/// Which of the four value shapes a column uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Arbitrary structured value, msgpack-encoded.
    Obj,
    /// Sorted-ascending `uint32` LID array, little-endian packed.
    IntNumpy,
    /// Roaring bitmap of `uint32` LIDs.
    IntBitmap,
    /// Opaque bytes, stored and returned unchanged.
    Bytes,
}

/// A decoded column value, tagged by the encoding that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// `OBJ`-encoded structured value.
    Obj(Value),
    /// `INT_NUMPY`-encoded sorted LID array.
    IntNumpy(Vec<Lid>),
    /// `INT_BITMAP`-encoded LID set.
    IntBitmap(RoaringBitmap),
    /// `BYTES`-encoded opaque blob.
    Bytes(Vec<u8>),
}

/// Errors from encoding or decoding a column value.
#[derive(Debug, Error)]
pub enum ValueCodecError {
    /// The msgpack payload for an `OBJ` column didn't decode.
    #[error("OBJ decode failed: {0}")]
    ObjDecode(String),
    /// The `INT_NUMPY` byte length wasn't a multiple of 4.
    #[error("INT_NUMPY payload length {0} is not a multiple of 4")]
    NumpyLength(usize),
    /// The `INT_BITMAP` payload didn't parse as a roaring bitmap.
    #[error("INT_BITMAP decode failed: {0}")]
    BitmapDecode(String),
    /// `merge` was called on mismatched or unsupported column value kinds.
    #[error("merge is not defined between {0} and {1}")]
    UnsupportedMerge(&'static str, &'static str),
}

/// Stateless encode/decode/merge for one [`ValueEncoding`].
pub struct ValueCodec {
    encoding: ValueEncoding,
}

impl ValueCodec {
    /// Build a codec bound to `encoding`.
    #[must_use]
    pub fn new(encoding: ValueEncoding) -> Self {
        ValueCodec { encoding }
    }

    /// Which encoding this codec was built for.
    #[must_use]
    pub fn encoding(&self) -> ValueEncoding {
        self.encoding
    }

    /// Encode a [`ColumnValue`] to its on-disk byte representation.
    ///
    /// # Errors
    ///
    /// Returns [`ValueCodecError`] only for `Obj` values that fail to
    /// msgpack-encode (practically unreachable for well-formed `Value`s).
    pub fn encode(&self, value: &ColumnValue) -> Result<Vec<u8>, ValueCodecError> {
        match value {
            ColumnValue::Obj(v) => {
                rmp_serde::to_vec(v).map_err(|e| ValueCodecError::ObjDecode(e.to_string()))
            }
            ColumnValue::IntNumpy(lids) => {
                let mut sorted: Vec<u32> = lids.iter().map(|l| l.get()).collect();
                sorted.sort_unstable();
                let mut buf = Vec::with_capacity(sorted.len() * 4);
                for v in sorted {
                    buf.write_u32::<LittleEndian>(v).expect("vec write");
                }
                Ok(buf)
            }
            ColumnValue::IntBitmap(bitmap) => {
                let mut buf = Vec::new();
                bitmap
                    .serialize_into(&mut buf)
                    .map_err(|e| ValueCodecError::BitmapDecode(e.to_string()))?;
                Ok(buf)
            }
            ColumnValue::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Decode raw bytes back into a [`ColumnValue`] under this codec's
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ValueCodecError`] if `bytes` doesn't match the shape
    /// this encoding expects.
    pub fn decode(&self, bytes: &[u8]) -> Result<ColumnValue, ValueCodecError> {
        match self.encoding {
            ValueEncoding::Obj => rmp_serde::from_slice(bytes)
                .map(ColumnValue::Obj)
                .map_err(|e| ValueCodecError::ObjDecode(e.to_string())),
            ValueEncoding::IntNumpy => {
                if bytes.len() % 4 != 0 {
                    return Err(ValueCodecError::NumpyLength(bytes.len()));
                }
                let mut cursor = Cursor::new(bytes);
                let mut lids = Vec::with_capacity(bytes.len() / 4);
                while (cursor.position() as usize) < bytes.len() {
                    let raw = cursor
                        .read_u32::<LittleEndian>()
                        .map_err(|e| ValueCodecError::NumpyLength(e.to_string().len()))?;
                    lids.push(Lid::new(raw));
                }
                Ok(ColumnValue::IntNumpy(lids))
            }
            ValueEncoding::IntBitmap => RoaringBitmap::deserialize_from(bytes)
                .map(ColumnValue::IntBitmap)
                .map_err(|e| ValueCodecError::BitmapDecode(e.to_string())),
            ValueEncoding::Bytes => Ok(ColumnValue::Bytes(bytes.to_vec())),
        }
    }

    /// Associatively combine two decoded values of this column's kind:
    /// `INT_NUMPY` union-and-resort, `INT_BITMAP` roaring union, `Bytes`
    /// concatenation. `Obj` has no merge operator (overwrite only).
    ///
    /// # Errors
    ///
    /// Returns [`ValueCodecError::UnsupportedMerge`] for `Obj` or for
    /// mismatched variants.
    pub fn merge(&self, a: ColumnValue, b: ColumnValue) -> Result<ColumnValue, ValueCodecError> {
        match (a, b) {
            (ColumnValue::IntNumpy(mut left), ColumnValue::IntNumpy(right)) => {
                left.extend(right);
                left.sort_unstable();
                left.dedup();
                Ok(ColumnValue::IntNumpy(left))
            }
            (ColumnValue::IntBitmap(mut left), ColumnValue::IntBitmap(right)) => {
                left |= right;
                Ok(ColumnValue::IntBitmap(left))
            }
            (ColumnValue::Bytes(mut left), ColumnValue::Bytes(right)) => {
                left.extend(right);
                Ok(ColumnValue::Bytes(left))
            }
            (a, b) => Err(ValueCodecError::UnsupportedMerge(variant_name(&a), variant_name(&b))),
        }
    }
}

fn variant_name(v: &ColumnValue) -> &'static str {
    match v {
        ColumnValue::Obj(_) => "Obj",
        ColumnValue::IntNumpy(_) => "IntNumpy",
        ColumnValue::IntBitmap(_) => "IntBitmap",
        ColumnValue::Bytes(_) => "Bytes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obj_round_trips() {
        let codec = ValueCodec::new(ValueEncoding::Obj);
        let v = ColumnValue::Obj(Value::Text("Tokyo".into()));
        let bytes = codec.encode(&v).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn int_numpy_is_sorted_on_encode() {
        let codec = ValueCodec::new(ValueEncoding::IntNumpy);
        let v = ColumnValue::IntNumpy(vec![Lid::new(5), Lid::new(1), Lid::new(3)]);
        let bytes = codec.encode(&v).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(
            decoded,
            ColumnValue::IntNumpy(vec![Lid::new(1), Lid::new(3), Lid::new(5)])
        );
    }

    #[test]
    fn int_numpy_rejects_misaligned_length() {
        let codec = ValueCodec::new(ValueEncoding::IntNumpy);
        assert!(matches!(
            codec.decode(&[1, 2, 3]),
            Err(ValueCodecError::NumpyLength(3))
        ));
    }

    #[test]
    fn int_bitmap_round_trips() {
        let codec = ValueCodec::new(ValueEncoding::IntBitmap);
        let mut bitmap = RoaringBitmap::new();
        bitmap.insert(1);
        bitmap.insert(1000);
        let v = ColumnValue::IntBitmap(bitmap);
        let bytes = codec.encode(&v).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn bytes_round_trips_unchanged() {
        let codec = ValueCodec::new(ValueEncoding::Bytes);
        let v = ColumnValue::Bytes(vec![9, 8, 7]);
        let bytes = codec.encode(&v).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), v);
    }

    #[test]
    fn merge_unions_bitmaps() {
        let codec = ValueCodec::new(ValueEncoding::IntBitmap);
        let mut a = RoaringBitmap::new();
        a.insert(1);
        let mut b = RoaringBitmap::new();
        b.insert(2);
        let merged = codec
            .merge(ColumnValue::IntBitmap(a), ColumnValue::IntBitmap(b))
            .unwrap();
        match merged {
            ColumnValue::IntBitmap(bm) => {
                assert!(bm.contains(1));
                assert!(bm.contains(2));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn merge_dedups_numpy_union() {
        let codec = ValueCodec::new(ValueEncoding::IntNumpy);
        let merged = codec
            .merge(
                ColumnValue::IntNumpy(vec![Lid::new(1), Lid::new(2)]),
                ColumnValue::IntNumpy(vec![Lid::new(2), Lid::new(3)]),
            )
            .unwrap();
        assert_eq!(
            merged,
            ColumnValue::IntNumpy(vec![Lid::new(1), Lid::new(2), Lid::new(3)])
        );
    }

    #[test]
    fn merge_rejects_obj_variant() {
        let codec = ValueCodec::new(ValueEncoding::Obj);
        let result = codec.merge(
            ColumnValue::Obj(Value::Null),
            ColumnValue::Obj(Value::Null),
        );
        assert!(matches!(result, Err(ValueCodecError::UnsupportedMerge(_, _))));
    }
}

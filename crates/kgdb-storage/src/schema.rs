//! Column schema declarations.
//!
//! Each column is declared once, at store-open time, as a
//! `(name, integer_key?, composite_key?, is_64bit?, value_encoding,
//! compressed?)` tuple. The schema never changes after open; adding a
//! column means recreating the store (no online migration).

use kgdb_codec::ValueEncoding;
use serde::{Deserialize, Serialize};

/// Shape of the keys a column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyKind {
    /// UTF-8 string keys (e.g. `ID_LID`'s source id, `DBPEDIA`'s resource name).
    StringKey,
    /// A single fixed-width integer key (`LID_ID`, `PAGERANK`, most domain columns).
    IntegerKey {
        /// `true` for a 64-bit key, `false` for 32-bit.
        is_64bit: bool,
    },
    /// A tuple of LID segments (`CLAIMS_ENT`, `CLAIMS_ENT_INV`).
    CompositeKey,
}

/// One column's declared schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name, used as the heed sub-database name.
    pub name: String,
    /// Key shape.
    pub key_kind: KeyKind,
    /// Value encoding selected for this column.
    #[serde(with = "value_encoding_serde")]
    pub value_encoding: ValueEncoding,
    /// Whether values are lz4-framed before being written.
    pub compressed: bool,
}

impl ColumnSchema {
    /// Declare a column.
    #[must_use]
    pub fn new(name: impl Into<String>, key_kind: KeyKind, value_encoding: ValueEncoding) -> Self {
        ColumnSchema {
            name: name.into(),
            key_kind,
            value_encoding,
            compressed: false,
        }
    }

    /// Enable lz4 framing for this column's values.
    #[must_use]
    pub fn with_compression(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }
}

/// The full set of columns a store opens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// An empty schema; add columns with [`Schema::with_column`].
    #[must_use]
    pub fn new() -> Self {
        Schema::default()
    }

    /// Append a column declaration.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSchema) -> Self {
        self.columns.push(column);
        self
    }

    /// Look up a column's schema by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All declared columns, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }
}

mod value_encoding_serde {
    use kgdb_codec::ValueEncoding;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &ValueEncoding, s: S) -> Result<S::Ok, S::Error> {
        let tag = match v {
            ValueEncoding::Obj => "obj",
            ValueEncoding::IntNumpy => "int_numpy",
            ValueEncoding::IntBitmap => "int_bitmap",
            ValueEncoding::Bytes => "bytes",
        };
        s.serialize_str(tag)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ValueEncoding, D::Error> {
        let tag = String::deserialize(d)?;
        match tag.as_str() {
            "obj" => Ok(ValueEncoding::Obj),
            "int_numpy" => Ok(ValueEncoding::IntNumpy),
            "int_bitmap" => Ok(ValueEncoding::IntBitmap),
            "bytes" => Ok(ValueEncoding::Bytes),
            other => Err(serde::de::Error::custom(format!("unknown value encoding {other}"))),
        }
    }
}

//! Domain column declarations.
//!
//! Names are illustrative (matching the source system's own naming);
//! the schema itself is fixed at these nine columns plus the two the
//! interner owns.

use kgdb_codec::ValueEncoding;
use kgdb_storage::{ColumnSchema, KeyKind, Schema};

/// Canonical English label. `lid -> OBJ(Text)`.
pub const COL_LABEL: &str = "LABEL";
/// Per-language labels. `lid -> OBJ(Map<lang, Text>)`.
pub const COL_LABELS: &str = "LABELS";
/// Per-language descriptions. `lid -> OBJ(Map<lang, Text>)`.
pub const COL_DESC: &str = "DESC";
/// Per-language alias sets. `lid -> OBJ(Map<lang, Array<Text>>)`.
pub const COL_ALIASES: &str = "ALIASES";
/// Sitelinks. `lid -> OBJ(Map<site, Text>)`.
pub const COL_SITELINKS: &str = "SITELINKS";
/// Entity-valued claims: `(subject_lid, prop_lid) -> INT_NUMPY` of object LIDs.
pub const COL_CLAIMS_ENT: &str = "CLAIMS_ENT";
/// Inverted entity-valued claims: `(object_lid, prop_lid) -> INT_BITMAP` of subject LIDs.
pub const COL_CLAIMS_ENT_INV: &str = "CLAIMS_ENT_INV";
/// Literal-valued claims: `lid -> OBJ(Map<datatype, Map<pid, Array<value>>>)`.
pub const COL_CLAIMS_LIT: &str = "CLAIMS_LIT";
/// Redirect target. `lid -> OBJ(Int(lid))`.
pub const COL_REDIRECT: &str = "REDIRECT";
/// Reverse redirect set. `lid -> INT_BITMAP` of LIDs that redirect to it.
pub const COL_REDIRECT_OF: &str = "REDIRECT_OF";
/// Wikipedia mapping. `lid -> OBJ(Text)` (title).
pub const COL_WIKIPEDIA: &str = "WIKIPEDIA";
/// DBpedia mapping. `lid -> OBJ(Text)` (resource name).
pub const COL_DBPEDIA: &str = "DBPEDIA";
/// PageRank score. `lid -> OBJ(Float)`.
pub const COL_PAGERANK: &str = "PAGERANK";

/// Declare every domain column this crate owns. Callers merge this with
/// [`kgdb_interner::interner_schema`] and any `kgdb-labels`/`kgdb-invindex`
/// schema before opening the shared [`kgdb_storage::KVStore`].
#[must_use]
pub fn graph_schema() -> Schema {
    let lid_key = KeyKind::IntegerKey { is_64bit: false };
    Schema::new()
        .with_column(ColumnSchema::new(COL_LABEL, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_LABELS, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_DESC, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_ALIASES, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_SITELINKS, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(
            COL_CLAIMS_ENT,
            KeyKind::CompositeKey,
            ValueEncoding::IntNumpy,
        ))
        .with_column(ColumnSchema::new(
            COL_CLAIMS_ENT_INV,
            KeyKind::CompositeKey,
            ValueEncoding::IntBitmap,
        ))
        .with_column(ColumnSchema::new(COL_CLAIMS_LIT, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_REDIRECT, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(
            COL_REDIRECT_OF,
            lid_key,
            ValueEncoding::IntBitmap,
        ))
        .with_column(ColumnSchema::new(COL_WIKIPEDIA, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_DBPEDIA, lid_key, ValueEncoding::Obj))
        .with_column(ColumnSchema::new(COL_PAGERANK, lid_key, ValueEncoding::Obj))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_every_domain_column() {
        let schema = graph_schema();
        for name in [
            COL_LABEL,
            COL_LABELS,
            COL_DESC,
            COL_ALIASES,
            COL_SITELINKS,
            COL_CLAIMS_ENT,
            COL_CLAIMS_ENT_INV,
            COL_CLAIMS_LIT,
            COL_REDIRECT,
            COL_REDIRECT_OF,
            COL_WIKIPEDIA,
            COL_DBPEDIA,
            COL_PAGERANK,
        ] {
            assert!(schema.column(name).is_some(), "missing column {name}");
        }
    }
}

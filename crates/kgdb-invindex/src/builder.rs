//! Builds `CLAIMS_ENT_INV` from `CLAIMS_ENT` in a single pass.

use kgdb_codec::key::split_composite_key;
use kgdb_core::{Error, Result};
use kgdb_graph::domain::COL_CLAIMS_ENT;
use kgdb_graph::GraphStore;
use kgdb_storage::KVStore;
use roaring::RoaringBitmap;
use std::collections::BTreeMap;

/// Scan every `(subject, prop) -> [objects]` row in `CLAIMS_ENT` and
/// merge `subject` into the `(object, prop)` posting list of
/// `CLAIMS_ENT_INV` for each object. Output is accumulated in memory
/// keyed by `(object, prop)` so the merges land sorted, matching the
/// tail-sharing flush order the source builder relies on.
///
/// # Errors
///
/// Propagates storage faults or a malformed `CLAIMS_ENT` key.
pub fn build_inverted_index(store: &KVStore, graph: &GraphStore<'_>) -> Result<usize> {
    let rows = store.iter(COL_CLAIMS_ENT, None, None)?;
    let codec = kgdb_codec::ValueCodec::new(kgdb_codec::ValueEncoding::IntNumpy);

    let mut postings: BTreeMap<(u32, u32), RoaringBitmap> = BTreeMap::new();
    for (key, value) in &rows {
        let segments = split_composite_key(key).map_err(|e| Error::DecodeError {
            column: COL_CLAIMS_ENT.to_string(),
            reason: e.to_string(),
        })?;
        let subject = *segments.first().ok_or_else(|| Error::DecodeError {
            column: COL_CLAIMS_ENT.to_string(),
            reason: "composite key missing subject segment".to_string(),
        })?;
        let prop = *segments.get(1).ok_or_else(|| Error::DecodeError {
            column: COL_CLAIMS_ENT.to_string(),
            reason: "composite key missing property segment".to_string(),
        })?;
        let objects = match codec.decode(value).map_err(|e| Error::DecodeError {
            column: COL_CLAIMS_ENT.to_string(),
            reason: e.to_string(),
        })? {
            kgdb_codec::ColumnValue::IntNumpy(lids) => lids,
            _ => unreachable!("CLAIMS_ENT is always IntNumpy-encoded"),
        };
        for object in objects {
            postings
                .entry((object.get(), prop.get()))
                .or_default()
                .insert(subject.get());
        }
    }

    let merged_count = postings.len();
    for ((object, prop), subjects) in postings {
        graph.merge_claims_entity_inverse(
            kgdb_core::Lid::new(object),
            kgdb_core::Lid::new(prop),
            subjects,
        )?;
    }
    Ok(merged_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdb_graph::domain::graph_schema;
    use kgdb_graph::EntityRef;
    use kgdb_interner::{interner_schema, IdInterner};
    use kgdb_storage::StoreConfig;
    use tempfile::tempdir;

    fn open(dir: &std::path::Path) -> KVStore {
        let mut schema = interner_schema();
        for col in graph_schema().columns() {
            schema = schema.with_column(col.clone());
        }
        KVStore::open(StoreConfig::for_testing(dir), schema).unwrap()
    }

    #[test]
    fn builds_inverted_postings_from_claims() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);

        let q1 = interner.get_or_create("Q1").unwrap();
        let q2 = interner.get_or_create("Q2").unwrap();
        let p31 = interner.get_or_create("P31").unwrap();
        graph.put_claims_entity_with_interning(q1, p31, &["Q5"]).unwrap();
        graph.put_claims_entity_with_interning(q2, p31, &["Q5"]).unwrap();

        let merged = build_inverted_index(&store, &graph).unwrap();
        assert_eq!(merged, 1);

        let q5 = interner.lookup_by_id("Q5").unwrap();
        let subjects = graph.get_claims_entity_inverse(EntityRef::Lid(q5), p31).unwrap();
        assert!(subjects.contains(q1.get()));
        assert!(subjects.contains(q2.get()));
    }
}

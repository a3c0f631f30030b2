//! Fuses edge contributions from Wikidata claims, Wikipedia
//! infobox/link claims, and DBpedia object facts into one weighted
//! graph, redirect-resolving every endpoint to its canonical LID.

use crate::csr::EdgeListBuilder;
use kgdb_core::{Lid, Result};
use kgdb_graph::domain::COL_CLAIMS_ENT;
use kgdb_graph::GraphStore;
use kgdb_storage::KVStore;

/// Edge weight for a direct Wikidata claim, and for a DBpedia
/// mappingbased-objects fact resolved through to Wikidata.
pub const WEIGHT_WD: f64 = 3.0;
/// Edge weight for a Wikipedia "other" (non-infobox, e.g. section
/// link) claim resolved through to Wikidata.
pub const WEIGHT_W_OTHERS: f64 = 1.0;

/// One externally-sourced edge to fuse into the graph (Wikipedia or
/// DBpedia, already mapped to Wikidata LIDs by the caller).
#[derive(Debug, Clone, Copy)]
pub struct ExternalEdge {
    /// Subject LID, pre-redirect-resolution.
    pub from: Lid,
    /// Object LID, pre-redirect-resolution.
    pub to: Lid,
    /// Edge weight ([`WEIGHT_WD`] or [`WEIGHT_W_OTHERS`]).
    pub weight: f64,
}

/// Stream every `CLAIMS_ENT` row into `builder` at [`WEIGHT_WD`],
/// redirect-resolving both subject and object first.
///
/// # Errors
///
/// Propagates storage faults or a malformed `CLAIMS_ENT` key.
pub fn add_wikidata_claim_edges(
    store: &KVStore,
    graph: &GraphStore<'_>,
    builder: &mut EdgeListBuilder,
) -> Result<()> {
    let rows = store.iter(COL_CLAIMS_ENT, None, None)?;
    let codec = kgdb_codec::ValueCodec::new(kgdb_codec::ValueEncoding::IntNumpy);
    for (key, value) in &rows {
        let segments = kgdb_codec::key::split_composite_key(key).map_err(|e| {
            kgdb_core::Error::DecodeError {
                column: COL_CLAIMS_ENT.to_string(),
                reason: e.to_string(),
            }
        })?;
        let subject = *segments.first().expect("composite key has subject segment");
        let objects = match codec.decode(value).map_err(|e| kgdb_core::Error::DecodeError {
            column: COL_CLAIMS_ENT.to_string(),
            reason: e.to_string(),
        })? {
            kgdb_codec::ColumnValue::IntNumpy(lids) => lids,
            _ => unreachable!("CLAIMS_ENT is always IntNumpy-encoded"),
        };
        let canonical_subject = graph.canonicalize(subject)?;
        for object in objects {
            let canonical_object = graph.canonicalize(object)?;
            builder.push(canonical_subject.get(), canonical_object.get(), WEIGHT_WD);
        }
    }
    Ok(())
}

/// Add a batch of already-mapped Wikipedia/DBpedia edges, redirect
/// resolving each endpoint before staging it.
///
/// # Errors
///
/// Propagates storage faults from redirect resolution.
pub fn add_external_edges(
    graph: &GraphStore<'_>,
    builder: &mut EdgeListBuilder,
    edges: &[ExternalEdge],
) -> Result<()> {
    for edge in edges {
        let from = graph.canonicalize(edge.from)?;
        let to = graph.canonicalize(edge.to)?;
        builder.push(from.get(), to.get(), edge.weight);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdb_graph::domain::graph_schema;
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
    fn wikidata_claims_resolve_redirects_before_staging() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);

        let q1 = interner.get_or_create("Q1").unwrap();
        let q2_old = interner.get_or_create("Q2_old").unwrap();
        let q2_new = interner.get_or_create("Q2_new").unwrap();
        let p31 = interner.get_or_create("P31").unwrap();
        graph.put_redirect(q2_old, q2_new).unwrap();
        graph
            .put_claims_entity_with_interning(q1, p31, &["Q2_old"])
            .unwrap();

        let mut builder = EdgeListBuilder::new();
        add_wikidata_claim_edges(&store, &graph, &mut builder).unwrap();
        let matrix = builder.build(interner.len() as usize);
        assert_eq!(matrix.get(q1.get() as usize, q2_new.get() as usize), Some(&WEIGHT_WD));
    }

    #[test]
    fn external_edges_use_w_others_weight() {
        let dir = tempdir().unwrap();
        let store = open(dir.path());
        let interner = IdInterner::open(&store).unwrap();
        let graph = GraphStore::new(&store, &interner);
        let a = interner.get_or_create("Q1").unwrap();
        let b = interner.get_or_create("Q2").unwrap();

        let mut builder = EdgeListBuilder::new();
        add_external_edges(&graph, &mut builder, &[ExternalEdge { from: a, to: b, weight: WEIGHT_W_OTHERS }])
            .unwrap();
        let matrix = builder.build(interner.len() as usize);
        assert_eq!(matrix.get(a.get() as usize, b.get() as usize), Some(&WEIGHT_W_OTHERS));
    }
}

//! `GraphStore`: the typed entity-graph facade over `kgdb-storage` and
//! `kgdb-interner`, plus the dump-ingestion helpers that turn parsed
//! Wikidata/Wikipedia/DBpedia records into writes against it.
//!
//! Wire-level dump parsing (bz2/gzip framing, full MediaWiki-XML and
//! Turtle grammars, HTTP fetch) stays outside this crate per the
//! specification's scope cut — [`ingest`] owns the small, precisely
//! specified pieces that sit on this side of that boundary: SQL
//! `INSERT` tuple splitting, DBpedia IRI/literal cleanup, Wikipedia
//! title normalization, and Wikidata claim-value normalization.

#![warn(missing_docs)]

pub mod domain;
pub mod graph_store;
pub mod ingest;

pub use domain::graph_schema;
pub use graph_store::{EntityRef, GraphStore};

//! The small, precisely specified pieces of dump ingestion that sit
//! on this side of the wire-format scope cut: SQL `INSERT` tuple
//! splitting, title/text cleanup, identifier classification, and
//! Wikidata claim-value normalization.
//!
//! Decompressing `.bz2`/`.gz` dump files, walking the MediaWiki XML
//! or Turtle grammars, and fetching dumps over HTTP are all out of
//! scope; these helpers operate on already-tokenized lines/strings a
//! caller has produced from such a stream.

pub mod dbpedia;
pub mod identifiers;
pub mod sql_dump;
pub mod wikidata;
pub mod wikipedia;

pub use dbpedia::{clean_text_brackets, strip_known_prefix};
pub use identifiers::{human_name_abbreviation, is_entity_name_prop, WD_ENTITY_NAME_PROPS};
pub use sql_dump::parse_sql_values;
pub use wikidata::{normalize_claim_value, ClaimValue, IdentifierClassSet};
pub use wikipedia::{is_ignored_namespace, norm_wikipedia_title};

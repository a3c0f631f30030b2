//! Argument surface for the operational CLI (§6): `download`,
//! `build <stage>`, `compact <store>`, `query entity`, `query boolean`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kgdb — operational CLI over a kgdb knowledge-graph store tree.
#[derive(Debug, Parser)]
#[command(name = "kgdb", version, about)]
pub struct Cli {
    /// Directory the entity/labels/deletes stores live under.
    #[arg(long, global = true, default_value = "./kgdb-data")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a dump file. A thin stub: validates that `path` exists
    /// and is non-empty; the HTTP transfer itself is an external
    /// collaborator this CLI doesn't implement.
    Download {
        /// Path the dump is expected to already be downloaded to.
        path: PathBuf,
    },
    /// Run one idempotent ingestion stage.
    Build {
        #[command(subcommand)]
        stage: BuildStage,
    },
    /// Rewrite a store's backing file, reclaiming space from deleted
    /// and overwritten rows.
    Compact {
        /// `entity`, `labels`, or `deletes:<lang>:<max_distance>:<prefix_len>`.
        store: String,
    },
    /// Resolve a search-box query to ranked entities.
    Query {
        #[command(subcommand)]
        kind: QueryKind,
    },
}

#[derive(Debug, Subcommand)]
pub enum BuildStage {
    /// Ingest `page.sql` + `redirect.sql` tuples into the `REDIRECT`/
    /// `REDIRECT_OF` columns.
    Redirects {
        /// MySQL `page` table dump (`INSERT INTO ... VALUES (...);` lines).
        page_sql: PathBuf,
        /// MySQL `redirect` table dump, same shape.
        redirect_sql: PathBuf,
    },
    /// Ingest Wikipedia/DBpedia identifier mappings for already-known
    /// Wikidata entities.
    Mappings {
        /// Tab-separated `qid\twikipedia_title` lines, one per entity.
        wikipedia: PathBuf,
        /// Tab-separated `qid\tdbpedia_resource` lines, one per entity.
        dbpedia: PathBuf,
    },
    /// Ingest a Wikidata JSON dump: one JSON object per line (the
    /// dump's outer `[`/`]`/trailing commas are stripped if present).
    Info {
        /// Path to the (already decompressed) dump.
        wikidata_dump: PathBuf,
    },
    /// Recompute PageRank over every entity currently in the store and
    /// persist scores plus the normalization stats.
    Pagerank {
        /// PID used for the Wikidata-claim edge weight (defaults to `P31`
        /// being irrelevant here — every `CLAIMS_ENT` row contributes).
        #[arg(long, default_value_t = 0.85)]
        alpha: f64,
    },
    /// Rebuild the label vocabulary and PageRank-ranked lookup lists.
    Labels {
        /// "instance of" property id, for the Q5-human heuristic.
        #[arg(long, default_value = "P31")]
        instance_of: String,
        /// "subclass of" property id, for entity/type classification.
        #[arg(long, default_value = "P279")]
        subclass_of: String,
        /// The "human" class id.
        #[arg(long, default_value = "Q5")]
        q5: String,
    },
    /// Rebuild a SymDelete fuzzy index from the current label vocabulary.
    Deletes {
        /// `en` or `all` — which vocabulary to index.
        #[arg(long, default_value = "en")]
        lang: String,
        /// Max characters considered when trimming a label.
        #[arg(long, default_value_t = 10)]
        prefix_len: usize,
        /// Max deletions a variant may represent.
        #[arg(long, default_value_t = 4)]
        max_distance: usize,
    },
    /// Build/refresh the external BM25 text index. A thin stub: text
    /// indexing lives outside this crate's boundary
    /// ([`kgdb_search::text_index::TextIndex`] is the seam), so this
    /// stage only confirms the labels store it would read from exists.
    TextIndex,
}

#[derive(Debug, Subcommand)]
pub enum QueryKind {
    /// `query entity <text>`.
    Entity {
        /// The search-box text, or a bare QID/PID.
        text: String,
        /// `en` or `all`.
        #[arg(long, default_value = "en")]
        lang: String,
        /// `a` (text+fuzzy), `b` (text only), `f` (fuzzy only).
        #[arg(long, default_value = "a")]
        mode: String,
        /// Max rows returned.
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// `en`/`all` deletes store tuning to attach, as `max_distance:prefix_len`.
        #[arg(long, default_value = "4:10")]
        fuzzy_tuning: String,
    },
    /// `query boolean <predicates...>`, each `[+-=]P=Q`: `+` intersects
    /// (AND), `-` unions (OR), `=` subtracts (NOT) from the running
    /// result, matching the symbol order `[+-=]` against `AND/OR/NOT`
    /// in §6's grammar.
    Boolean {
        /// One or more `[+-=]P=Q` predicates.
        predicates: Vec<String>,
    },
}

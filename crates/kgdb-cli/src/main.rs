//! `kgdb` — the operational CLI over a kgdb knowledge-graph store
//! tree (§6): dump ingestion stages, store compaction, and the
//! entity/boolean query surface.

mod build;
mod cli;
mod compact;
mod download;
mod exit;
mod query;
mod stores;

use clap::Parser;
use cli::{BuildStage, Cli, Command, QueryKind};
use kgdb_core::{Error, Result};
use kgdb_graph::ingest::IdentifierClassSet;
use kgdb_graph::GraphStore;
use kgdb_interner::IdInterner;
use kgdb_labels::{LabelIndex, SymDeleteConfig, SymDeleteIndex};
use stores::{deletes_store_name, open_deletes_store, open_entity_store, open_labels_store};
use tracing::error;

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let code = match dispatch(&cli) {
        Ok(()) => exit::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            exit_code_for(&cli.command, &err)
        }
    };
    std::process::exit(code);
}

/// `download`'s missing-dump case is the only one that maps to exit
/// code 3; every other command's `NotFound` (unknown store, missing
/// prerequisite stage) is an invalid-input mistake on the operator's
/// part, not a missing-dump condition.
fn exit_code_for(command: &Command, err: &Error) -> i32 {
    if matches!(command, Command::Download { .. }) && matches!(err, Error::NotFound(_)) {
        return exit::MISSING_DUMP;
    }
    exit::from_error(err)
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Download { path } => download::run(path),
        Command::Build { stage } => run_build(cli, stage),
        Command::Compact { store } => compact::run(&cli.data_dir, store),
        Command::Query { kind } => run_query(cli, kind),
    }
}

fn run_build(cli: &Cli, stage: &BuildStage) -> Result<()> {
    let data_dir = &cli.data_dir;
    match stage {
        BuildStage::Redirects { page_sql, redirect_sql } => {
            let entity_store = open_entity_store(data_dir, false)?;
            let interner = IdInterner::open(&entity_store)?;
            let graph = GraphStore::new(&entity_store, &interner);
            let count = build::run_redirects(&interner, &graph, page_sql, redirect_sql)?;
            tracing::info!(count, "build redirects complete");
            Ok(())
        }
        BuildStage::Mappings { wikipedia, dbpedia } => {
            let entity_store = open_entity_store(data_dir, false)?;
            let interner = IdInterner::open(&entity_store)?;
            let graph = GraphStore::new(&entity_store, &interner);
            let count = build::run_mappings(&interner, &graph, wikipedia, dbpedia)?;
            tracing::info!(count, "build mappings complete");
            Ok(())
        }
        BuildStage::Info { wikidata_dump } => {
            let entity_store = open_entity_store(data_dir, false)?;
            let interner = IdInterner::open(&entity_store)?;
            let graph = GraphStore::new(&entity_store, &interner);
            let skip = IdentifierClassSet::new();
            let count = build::run_info(&interner, &graph, wikidata_dump, "P31", &skip)?;
            tracing::info!(count, "build info complete");
            Ok(())
        }
        BuildStage::Pagerank { alpha } => {
            let entity_store = open_entity_store(data_dir, false)?;
            let interner = IdInterner::open(&entity_store)?;
            let graph = GraphStore::new(&entity_store, &interner);
            let stats = build::run_pagerank(&entity_store, &graph, &interner, *alpha)?;
            tracing::info!(?stats, "build pagerank complete");
            Ok(())
        }
        BuildStage::Labels { instance_of, subclass_of, q5 } => {
            let entity_store = open_entity_store(data_dir, false)?;
            let interner = IdInterner::open(&entity_store)?;
            let graph = GraphStore::new(&entity_store, &interner);
            let labels_store = open_labels_store(data_dir, false)?;
            let labels = LabelIndex::open(&labels_store)?;
            let entities = build::all_entity_lids(&entity_store)?;
            build::run_labels(&labels, &graph, &interner, &entities, instance_of, subclass_of, q5)
        }
        BuildStage::Deletes { lang, prefix_len, max_distance } => {
            let labels_store = open_labels_store(data_dir, true)?;
            let labels = LabelIndex::open(&labels_store)?;
            let deletes_store = open_deletes_store(data_dir, lang, *max_distance, *prefix_len, false)?;
            let config = SymDeleteConfig { prefix_len: *prefix_len, max_distance: *max_distance };
            let symdelete = SymDeleteIndex::open(&deletes_store, config);
            let count = build::run_deletes(&symdelete, &labels)?;
            tracing::info!(
                count,
                store = deletes_store_name(lang, *max_distance, *prefix_len),
                "build deletes complete"
            );
            Ok(())
        }
        BuildStage::TextIndex => build::run_text_index(data_dir),
    }
}

fn run_query(cli: &Cli, kind: &QueryKind) -> Result<()> {
    match kind {
        QueryKind::Entity { text, lang, mode, limit, fuzzy_tuning } => {
            let hits = query::run_entity(&cli.data_dir, text, lang, mode, *limit, fuzzy_tuning)?;
            for (qid, score) in hits {
                println!("{qid}\t{score:.4}");
            }
            Ok(())
        }
        QueryKind::Boolean { predicates } => {
            let qids = query::run_boolean(&cli.data_dir, predicates)?;
            for qid in qids {
                println!("{qid}");
            }
            Ok(())
        }
    }
}

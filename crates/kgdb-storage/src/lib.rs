//! Memory-mapped columnar key/value store.
//!
//! `KVStore` opens a single heed (LMDB) environment and exposes get /
//! multi_get / iter / iter_prefix / put / put_batch / merge / delete /
//! delete_prefix / compact over a fixed, schema-declared set of named
//! columns. See [`schema`] for column declarations and [`config`] for
//! the tunables ([`kgdb_core::limits::Limits`] carries the same
//! defaults for crates that don't need a live store).

#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod schema;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use schema::{ColumnSchema, KeyKind, Schema};
pub use store::KVStore;

//! Inverted claim index (`CLAIMS_ENT_INV`) builder and the Boolean
//! `AND`/`OR`/`NOT` query planner built on top of it.

#![warn(missing_docs)]

pub mod builder;
pub mod query;

pub use builder::build_inverted_index;
pub use query::{evaluate, BoolOp, Predicate};

//! Label normalization, the PageRank-ranked label vocabulary
//! (`LabelIndex`), and the Symmetric-Delete fuzzy index
//! (`SymDeleteIndex`) that sit between `kgdb-graph` and `kgdb-search`.

#![warn(missing_docs)]

pub mod external;
pub mod lid;
pub mod normalize;
pub mod symdelete;
pub mod vocab;

pub use external::{ExternalLabelSource, NoExternalSources};
pub use lid::LabelLid;
pub use normalize::{is_ascii, normalize, normalize_forms, repair_mojibake, NormalizeOptions};
pub use symdelete::{delete_variants, symdelete_schema, SymDeleteConfig, SymDeleteIndex};
pub use vocab::{label_schema, LabelIndex, RankKind, RankedLists};

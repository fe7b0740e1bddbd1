//! Multi-attribute linear-hashed relation files.
//!
//! A relation is stored as fixed-size pages in a primary data file plus
//! an overflow file. Bucket addresses are composed bit-by-bit from the
//! hashes of several attributes through a choice vector, so tuples can
//! be found by partial-match patterns where only some attributes are
//! known. Insertion grows the file one bucket at a time by linear
//! hashing; no full-table reorganization ever happens.
//!
//! Everything is single-threaded, synchronous file I/O. A relation is
//! exclusively owned by the handle that opened it; opening the same
//! files from two processes at once is unsupported.

#[macro_use]
extern crate log;

pub mod consts;
pub mod errors;
pub mod hash;
pub mod query;
pub mod storage;
pub mod tuple;
pub mod types;

pub use crate::errors::choice_error::ChoiceVectorError;
pub use crate::errors::query_error::QueryError;
pub use crate::errors::storage_error::StorageError;
pub use crate::storage::relation::bucket_address;
pub use crate::types::choice_types::{ChoiceBit, ChoiceVector};
pub use crate::types::page_types::PageId;
pub use crate::types::query_types::{ScanState, TupleScan};
pub use crate::types::stats_types::RelationStats;
pub use crate::types::storage_types::{OpenMode, Relation, RelationConfig, SplitPolicy};
pub use crate::types::tuple_types::Tuple;

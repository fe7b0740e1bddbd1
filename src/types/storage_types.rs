use crate::consts::page_consts::PAGE_DATA_SIZE;
use crate::storage::page_file::PageFile;
use crate::types::choice_types::ChoiceVector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::num::NonZeroU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

/// Relation metadata persisted in the `.info` file: five fixed-width
/// counters followed by the choice vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationHeader {
    pub attr_count: u32,    // attributes per tuple, fixed at creation
    pub page_count: u32,    // primary pages; always 2^depth + split_pointer
    pub depth: u32,         // current address width in bits
    pub split_pointer: u32, // next bucket due to split
    pub tuple_count: u32,   // tuples across all pages
    pub choice_vector: ChoiceVector,
}

/// When the engine splits a bucket on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Split once every `k` insertions.
    EveryInserts(NonZeroU32),
    /// Never split automatically; `Relation::split` still works.
    Never,
}

impl SplitPolicy {
    /// One split per page-load of tuples, assuming ~10 bytes per field.
    /// A performance knob, not a correctness constraint.
    pub fn default_for(attr_count: u32) -> Self {
        let k = (PAGE_DATA_SIZE as u32 / (10 * attr_count.max(1))).max(1);
        SplitPolicy::EveryInserts(NonZeroU32::new(k).unwrap())
    }
}

/// Creation-time parameters for a relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    pub attr_count: u32,
    pub initial_pages: u32,      // must equal 2^initial_depth
    pub initial_depth: u32,
    pub choice_vector: String,   // textual spec, e.g. "0,0:1,0:0,1"
    pub split: SplitPolicy,
}

impl RelationConfig {
    pub fn new(attr_count: u32, initial_depth: u32, choice_vector: &str) -> Self {
        Self {
            attr_count,
            initial_pages: 1 << initial_depth,
            initial_depth,
            choice_vector: choice_vector.to_string(),
            split: SplitPolicy::default_for(attr_count),
        }
    }
}

/// An open relation: header state plus exclusive handles on the three
/// backing files. Not shareable; concurrent opens are unsupported.
pub struct Relation {
    pub(crate) name: String,
    pub(crate) header: RelationHeader,
    pub(crate) info: File,        // header file, rewritten on close
    pub(crate) data: PageFile,    // primary bucket pages
    pub(crate) ovflow: PageFile,  // overflow chain pages
    pub(crate) mode: OpenMode,
    pub(crate) split: SplitPolicy,
    pub(crate) dirty: bool,       // header changed since last flush
}

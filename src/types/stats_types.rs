use crate::types::page_types::PageId;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PageStats {
    pub id: PageId,
    pub tuples: u32,
    pub free_bytes: u32,
    pub ovflow: Option<PageId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketStats {
    pub bucket: PageId,
    pub primary: PageStats,
    pub chain: Vec<PageStats>, // overflow pages in link order
}

/// Read-only snapshot of a relation's layout, one entry per primary
/// bucket. `Display` renders the classic per-bucket report.
#[derive(Debug, Clone, Serialize)]
pub struct RelationStats {
    pub attr_count: u32,
    pub page_count: u32,
    pub depth: u32,
    pub split_pointer: u32,
    pub tuple_count: u32,
    pub choice_vector: String,
    pub buckets: Vec<BucketStats>,
}

use crate::hash::bits::Bits;
use crate::types::page_types::PageId;
use crate::types::storage_types::Relation;
use crate::types::tuple_types::Tuple;

/// Where a scan currently sits. Buckets are visited in increasing id
/// order, primary page before its overflow chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Primary { bucket: PageId },
    Overflow { bucket: PageId, page: PageId },
    Exhausted,
}

/// Forward-only partial-match scan over one relation. Borrowing the
/// relation mutably keeps the cursor from outliving it and rules out
/// inserts mid-scan. Dropping the scan closes it.
pub struct TupleScan<'r> {
    pub(crate) rel: &'r mut Relation,
    pub(crate) pattern: Tuple,    // query tuple, `?` fields are wildcards
    pub(crate) known: Bits,       // address bits fixed by non-wildcard attributes
    pub(crate) unknown: Bits,     // address bits fed by wildcard attributes
    pub(crate) state: ScanState,
    pub(crate) offset: u32,       // byte offset of the next tuple in the current page
}

pub const PAGE_SIZE: usize = 4096;                              // total page size in bytes (4 KB)
pub const PAGE_HEADER_SIZE: usize = 12;                         // ntuples + free_offset + ovflow link
pub const PAGE_DATA_SIZE: usize = PAGE_SIZE - PAGE_HEADER_SIZE; // bytes available for tuples
pub const NO_PAGE: u32 = u32::MAX;                              // on-disk sentinel for "no overflow page"

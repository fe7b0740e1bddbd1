use crate::consts::page_consts::PAGE_DATA_SIZE;

/// Zero-based page index within one file (data or overflow).
pub type PageId = u32;

pub struct PageHeader {
    pub ntuples: u32,           // tuples stored in this page
    pub free_offset: u32,       // byte offset in data where the next tuple goes
    pub ovflow: Option<PageId>, // next page in the overflow chain
}

pub struct Page {
    pub header: PageHeader,
    pub data: [u8; PAGE_DATA_SIZE],
}

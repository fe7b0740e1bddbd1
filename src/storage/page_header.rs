use crate::consts::page_consts::{NO_PAGE, PAGE_DATA_SIZE, PAGE_HEADER_SIZE};
use crate::types::page_types::PageHeader;

impl PageHeader {
    pub fn new() -> Self {
        Self {
            ntuples: 0,     // no tuples yet
            free_offset: 0, // next tuple goes at the start of the data region
            ovflow: None,   // no overflow chain
        }
    }

    pub fn to_bytes(&self) -> [u8; PAGE_HEADER_SIZE] {
        let mut buf = [0u8; PAGE_HEADER_SIZE];
        // serialize tuple count (4 bytes)
        buf[0..4].copy_from_slice(&self.ntuples.to_le_bytes());
        // serialize free offset (4 bytes)
        buf[4..8].copy_from_slice(&self.free_offset.to_le_bytes());
        // serialize overflow link, NO_PAGE when absent (4 bytes)
        let link = self.ovflow.unwrap_or(NO_PAGE);
        buf[8..12].copy_from_slice(&link.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Self {
        assert!(buf.len() >= PAGE_HEADER_SIZE); // must have enough bytes

        let mut ntuples = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        let mut free_offset = u32::from_le_bytes(buf[4..8].try_into().unwrap());
        let link = u32::from_le_bytes(buf[8..12].try_into().unwrap());

        // a free offset past the data region means a corrupt page: read its
        // tuple region as empty, keeping the chain link reachable
        if free_offset > PAGE_DATA_SIZE as u32 {
            warn!("free offset {free_offset} past the data region, reading page as empty");
            ntuples = 0;
            free_offset = 0;
        }

        Self {
            ntuples,
            free_offset,
            ovflow: if link == NO_PAGE { None } else { Some(link) },
        }
    }

    pub fn free_space(&self) -> u32 {
        PAGE_DATA_SIZE as u32 - self.free_offset
    }
}

impl Default for PageHeader {
    fn default() -> Self {
        Self::new()
    }
}

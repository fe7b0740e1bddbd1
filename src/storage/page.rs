use crate::consts::page_consts::{PAGE_DATA_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE};
use crate::types::page_types::{Page, PageHeader};

impl Page {
    pub fn new() -> Self {
        Self {
            header: PageHeader::new(),
            data: [0u8; PAGE_DATA_SIZE],
        }
    }

    pub fn to_bytes(&self) -> [u8; PAGE_SIZE] {
        // serialize header + tuple region
        let mut buf = [0u8; PAGE_SIZE];
        buf[0..PAGE_HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        buf[PAGE_HEADER_SIZE..].copy_from_slice(&self.data);
        buf
    }

    pub fn from_bytes(buf: [u8; PAGE_SIZE]) -> Self {
        let header = PageHeader::from_bytes(&buf[0..PAGE_HEADER_SIZE]);
        let data: [u8; PAGE_DATA_SIZE] = buf[PAGE_HEADER_SIZE..].try_into().unwrap();
        Self { header, data }
    }

    /// Appends the serialized tuple plus a NUL terminator when it fits.
    /// Page-full is an expected outcome, hence a bool and not an error.
    pub fn try_insert(&mut self, tup: &[u8]) -> bool {
        let at = self.header.free_offset as usize;
        let needed = tup.len() + 1;
        if at + needed > PAGE_DATA_SIZE {
            return false;
        }

        self.data[at..at + tup.len()].copy_from_slice(tup);
        self.data[at + tup.len()] = 0;
        self.header.ntuples += 1;
        self.header.free_offset = (at + needed) as u32;
        true
    }

    /// The tuple bytes starting at `offset`, without the terminator.
    /// `None` at or past `free_offset`; a missing terminator means a
    /// corrupt page and ends the walk early.
    pub fn tuple_bytes_at(&self, offset: u32) -> Option<&[u8]> {
        let at = offset as usize;
        let end = self.header.free_offset as usize;
        if at >= end {
            return None;
        }
        match self.data[at..end].iter().position(|&b| b == 0) {
            Some(nul) => Some(&self.data[at..at + nul]),
            None => {
                warn!("unterminated tuple at offset {offset}, stopping page walk");
                None
            }
        }
    }

    /// Walks the packed tuples in storage order.
    pub fn tuple_slices(&self) -> TupleSlices<'_> {
        TupleSlices { page: self, offset: 0 }
    }

    pub fn free_space(&self) -> u32 {
        self.header.free_space()
    }

    /// Empties the tuple region in place but keeps the overflow link,
    /// so an existing chain stays reachable for reuse.
    pub fn reset_keep_link(&mut self) {
        self.header.ntuples = 0;
        self.header.free_offset = 0;
        self.data = [0u8; PAGE_DATA_SIZE];
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TupleSlices<'a> {
    page: &'a Page,
    offset: u32,
}

impl<'a> Iterator for TupleSlices<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let bytes = self.page.tuple_bytes_at(self.offset)?;
        self.offset += bytes.len() as u32 + 1;
        Some(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_packs_tuples_densely() {
        let mut page = Page::new();
        assert!(page.try_insert(b"abc,123"));
        assert!(page.try_insert(b"x,y"));
        assert_eq!(page.header.ntuples, 2);
        assert_eq!(page.header.free_offset, 8 + 4);
        assert_eq!(page.tuple_bytes_at(0), Some(&b"abc,123"[..]));
        assert_eq!(page.tuple_bytes_at(8), Some(&b"x,y"[..]));
        assert_eq!(page.tuple_bytes_at(12), None);
    }

    #[test]
    fn insert_respects_capacity() {
        let mut page = Page::new();
        let exact = vec![b'a'; PAGE_DATA_SIZE - 1]; // + terminator fills the page
        assert!(page.try_insert(&exact));
        assert_eq!(page.free_space(), 0);
        assert!(!page.try_insert(b"x"));

        let mut page = Page::new();
        let too_big = vec![b'a'; PAGE_DATA_SIZE];
        assert!(!page.try_insert(&too_big));
        assert_eq!(page.header.ntuples, 0);
    }

    #[test]
    fn byte_codec_roundtrip() {
        let mut page = Page::new();
        page.try_insert(b"hello,world");
        page.header.ovflow = Some(7);

        let decoded = Page::from_bytes(page.to_bytes());
        assert_eq!(decoded.header.ntuples, 1);
        assert_eq!(decoded.header.free_offset, page.header.free_offset);
        assert_eq!(decoded.header.ovflow, Some(7));
        assert_eq!(decoded.tuple_bytes_at(0), Some(&b"hello,world"[..]));
    }

    #[test]
    fn oversized_free_offset_reads_as_empty() {
        let mut page = Page::new();
        page.try_insert(b"a,b");
        page.header.ovflow = Some(9);
        let mut buf = page.to_bytes();
        buf[4..8].copy_from_slice(&u32::MAX.to_le_bytes());

        let decoded = Page::from_bytes(buf);
        assert_eq!(decoded.header.ntuples, 0);
        assert_eq!(decoded.header.free_offset, 0);
        assert_eq!(decoded.header.ovflow, Some(9)); // chain link survives
        assert_eq!(decoded.tuple_bytes_at(0), None);
        assert_eq!(decoded.free_space(), PAGE_DATA_SIZE as u32);
    }

    #[test]
    fn slices_walk_in_storage_order() {
        let mut page = Page::new();
        for t in ["one,1", "two,2", "three,3"] {
            assert!(page.try_insert(t.as_bytes()));
        }
        let seen: Vec<&[u8]> = page.tuple_slices().collect();
        assert_eq!(seen, vec![&b"one,1"[..], &b"two,2"[..], &b"three,3"[..]]);
    }

    #[test]
    fn reset_keeps_overflow_link() {
        let mut page = Page::new();
        page.try_insert(b"a,b");
        page.header.ovflow = Some(3);
        page.reset_keep_link();
        assert_eq!(page.header.ntuples, 0);
        assert_eq!(page.header.free_offset, 0);
        assert_eq!(page.header.ovflow, Some(3));
        assert_eq!(page.tuple_bytes_at(0), None);
    }
}

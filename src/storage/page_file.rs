use crate::consts::page_consts::PAGE_SIZE;
use crate::errors::storage_error::StorageError;
use crate::types::page_types::{Page, PageId};
use crate::types::storage_types::OpenMode;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// One page-array file (primary data or overflow) with an owned handle.
/// Every logical access re-reads or rewrites the whole page; there is
/// no buffer cache layer.
pub struct PageFile {
    file: File,
    pages: u32, // pages currently in the file
}

impl PageFile {
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file, pages: 0 })
    }

    pub fn open(path: &Path, mode: OpenMode) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(path)?;
        let pages = (file.metadata()?.len() / PAGE_SIZE as u64) as u32;
        Ok(Self { file, pages })
    }

    pub fn page_count(&self) -> u32 {
        self.pages
    }

    /// Writes a new empty page at end-of-file and returns its index.
    pub fn append_page(&mut self) -> Result<PageId, StorageError> {
        let id = self.pages;
        self.file.seek(SeekFrom::Start(id as u64 * PAGE_SIZE as u64))?;
        self.file.write_all(&Page::new().to_bytes())?;
        self.pages += 1;
        Ok(id)
    }

    pub fn read_page(&mut self, id: PageId) -> Result<Page, StorageError> {
        self.file.seek(SeekFrom::Start(id as u64 * PAGE_SIZE as u64))?;
        let mut buf = [0u8; PAGE_SIZE];
        self.file.read_exact(&mut buf)?;
        Ok(Page::from_bytes(buf))
    }

    pub fn write_page(&mut self, id: PageId, page: &Page) -> Result<(), StorageError> {
        self.file.seek(SeekFrom::Start(id as u64 * PAGE_SIZE as u64))?;
        self.file.write_all(&page.to_bytes())?;
        Ok(())
    }

    pub fn sync(&mut self) -> Result<(), StorageError> {
        self.file.sync_all()?;
        Ok(())
    }
}

use crate::consts::hash_consts::{ADDRESS_WIDTH, RELATION_HEADER_SIZE};
use crate::consts::page_consts::PAGE_DATA_SIZE;
use crate::errors::storage_error::StorageError;
use crate::hash::bits::{format_bits, lower_bits, Bits};
use crate::storage::page_file::PageFile;
use crate::tuple::WILDCARD;
use crate::types::choice_types::ChoiceVector;
use crate::types::page_types::{Page, PageId};
use crate::types::storage_types::{
    OpenMode, Relation, RelationConfig, RelationHeader, SplitPolicy,
};
use crate::types::tuple_types::Tuple;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

impl RelationHeader {
    pub fn to_bytes(&self) -> [u8; RELATION_HEADER_SIZE] {
        let mut buf = [0u8; RELATION_HEADER_SIZE];
        // five fixed-width counters, in header order
        buf[0..4].copy_from_slice(&self.attr_count.to_le_bytes());
        buf[4..8].copy_from_slice(&self.page_count.to_le_bytes());
        buf[8..12].copy_from_slice(&self.depth.to_le_bytes());
        buf[12..16].copy_from_slice(&self.split_pointer.to_le_bytes());
        buf[16..20].copy_from_slice(&self.tuple_count.to_le_bytes());
        // choice vector, two bytes per entry
        buf[20..].copy_from_slice(&self.choice_vector.to_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Self {
        assert!(buf.len() >= RELATION_HEADER_SIZE); // must have enough bytes

        Self {
            attr_count: u32::from_le_bytes(buf[0..4].try_into().unwrap()),
            page_count: u32::from_le_bytes(buf[4..8].try_into().unwrap()),
            depth: u32::from_le_bytes(buf[8..12].try_into().unwrap()),
            split_pointer: u32::from_le_bytes(buf[12..16].try_into().unwrap()),
            tuple_count: u32::from_le_bytes(buf[16..20].try_into().unwrap()),
            choice_vector: ChoiceVector::from_bytes(&buf[20..]),
        }
    }
}

/// The linear-hashing address rule: buckets below the split pointer
/// have already been split this round and carry one extra address bit.
pub fn bucket_address(hash: Bits, depth: u32, split_pointer: u32) -> PageId {
    let addr = lower_bits(hash, depth);
    if addr < split_pointer {
        lower_bits(hash, depth + 1)
    } else {
        addr
    }
}

fn info_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.info"))
}

fn data_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.data"))
}

fn ovflow_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.ovflow"))
}

// malformed stored tuples are dropped; splits and stats keep going
fn collect_tuples(page: &Page, attr_count: u32, out: &mut Vec<Tuple>) {
    for bytes in page.tuple_slices() {
        let parsed = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| Tuple::parse(s, attr_count).ok());
        match parsed {
            Some(t) => out.push(t),
            None => warn!(
                "dropping malformed stored tuple: {:?}",
                String::from_utf8_lossy(bytes)
            ),
        }
    }
}

impl Relation {
    /// Creates the three relation files and preallocates the primary
    /// buckets. The relation comes back open for writing.
    pub fn create(dir: &Path, name: &str, config: &RelationConfig) -> Result<Relation, StorageError> {
        // validate everything before touching disk
        if config.attr_count < 1 || config.attr_count > u8::MAX as u32 {
            return Err(StorageError::BadConfig(format!(
                "attribute count {} not in 1..=255",
                config.attr_count
            )));
        }
        if config.initial_depth as usize >= ADDRESS_WIDTH {
            return Err(StorageError::BadConfig(format!(
                "initial depth {} exceeds the address width",
                config.initial_depth
            )));
        }
        if config.initial_pages != 1 << config.initial_depth {
            return Err(StorageError::BadConfig(format!(
                "initial pages {} must equal 2^depth = {}",
                config.initial_pages,
                1u32 << config.initial_depth
            )));
        }
        let choice_vector = ChoiceVector::parse(&config.choice_vector, config.attr_count)?;

        if Self::exists(dir, name) {
            return Err(StorageError::RelationExists(name.to_string()));
        }
        fs::create_dir_all(dir)?;

        let mut info = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(info_path(dir, name))?;
        let mut data = PageFile::create(&data_path(dir, name))?;
        let ovflow = PageFile::create(&ovflow_path(dir, name))?;

        // preallocate the primary buckets
        for _ in 0..config.initial_pages {
            data.append_page()?;
        }

        let header = RelationHeader {
            attr_count: config.attr_count,
            page_count: config.initial_pages,
            depth: config.initial_depth,
            split_pointer: 0,
            tuple_count: 0,
            choice_vector,
        };
        info.write_all(&header.to_bytes())?;

        debug!(
            "created relation {name}: {} attrs, {} pages, depth {}",
            header.attr_count, header.page_count, header.depth
        );

        Ok(Relation {
            name: name.to_string(),
            header,
            info,
            data,
            ovflow,
            mode: OpenMode::ReadWrite,
            split: config.split,
            dirty: false,
        })
    }

    pub fn exists(dir: &Path, name: &str) -> bool {
        info_path(dir, name).exists()
    }

    /// Opens an existing relation, decoding and sanity-checking its
    /// header. The split policy is a runtime knob, not persisted; it
    /// starts at the default for the attribute count.
    pub fn open(dir: &Path, name: &str, mode: OpenMode) -> Result<Relation, StorageError> {
        let info_file = info_path(dir, name);
        if !info_file.exists()
            || !data_path(dir, name).exists()
            || !ovflow_path(dir, name).exists()
        {
            return Err(StorageError::RelationNotFound(name.to_string()));
        }

        let mut info = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(info_file)?;
        let mut buf = [0u8; RELATION_HEADER_SIZE];
        info.read_exact(&mut buf)?;
        let header = RelationHeader::from_bytes(&buf);

        if header.attr_count < 1 || header.attr_count > u8::MAX as u32 {
            return Err(StorageError::CorruptHeader(format!(
                "attribute count {}",
                header.attr_count
            )));
        }
        if header.depth as usize >= ADDRESS_WIDTH
            || header.split_pointer >= 1 << header.depth
            || header.page_count != (1 << header.depth) + header.split_pointer
        {
            return Err(StorageError::CorruptHeader(format!(
                "depth {} / split pointer {} / page count {}",
                header.depth, header.split_pointer, header.page_count
            )));
        }
        // entries were range-checked at creation, so an out-of-range one
        // here means a corrupt or foreign header
        for cb in &header.choice_vector.bits {
            if cb.attr as u32 >= header.attr_count || cb.bit as usize >= ADDRESS_WIDTH {
                return Err(StorageError::CorruptHeader(format!(
                    "choice vector entry {},{} out of range for {} attributes",
                    cb.attr, cb.bit, header.attr_count
                )));
            }
        }

        let data = PageFile::open(&data_path(dir, name), mode)?;
        let ovflow = PageFile::open(&ovflow_path(dir, name), mode)?;
        if data.page_count() != header.page_count {
            return Err(StorageError::CorruptHeader(format!(
                "header says {} pages, data file holds {}",
                header.page_count,
                data.page_count()
            )));
        }

        debug!(
            "opened relation {name}: depth {}, split pointer {}, {} tuples",
            header.depth, header.split_pointer, header.tuple_count
        );

        let split = SplitPolicy::default_for(header.attr_count);
        Ok(Relation {
            name: name.to_string(),
            header,
            info,
            data,
            ovflow,
            mode,
            split,
            dirty: false,
        })
    }

    /// Flushes the header (when opened writable) and syncs all three
    /// files. Dropping without close still flushes, best effort.
    pub fn close(mut self) -> Result<(), StorageError> {
        self.flush_header()?;
        if self.mode == OpenMode::ReadWrite {
            self.data.sync()?;
            self.ovflow.sync()?;
            self.info.sync_all()?;
        }
        debug!("closed relation {}", self.name);
        Ok(())
    }

    fn flush_header(&mut self) -> Result<(), StorageError> {
        if !self.dirty || self.mode == OpenMode::ReadOnly {
            return Ok(());
        }
        self.info.seek(SeekFrom::Start(0))?;
        self.info.write_all(&self.header.to_bytes())?;
        self.dirty = false;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr_count(&self) -> u32 {
        self.header.attr_count
    }

    pub fn page_count(&self) -> u32 {
        self.header.page_count
    }

    pub fn depth(&self) -> u32 {
        self.header.depth
    }

    pub fn split_pointer(&self) -> u32 {
        self.header.split_pointer
    }

    pub fn tuple_count(&self) -> u32 {
        self.header.tuple_count
    }

    pub fn choice_vector(&self) -> &ChoiceVector {
        &self.header.choice_vector
    }

    pub fn split_policy(&self) -> SplitPolicy {
        self.split
    }

    pub fn set_split_policy(&mut self, policy: SplitPolicy) {
        self.split = policy;
    }

    /// Bucket the given composite hash addresses right now.
    pub fn bucket_of(&self, hash: Bits) -> PageId {
        bucket_address(hash, self.header.depth, self.header.split_pointer)
    }

    /// Inserts one tuple and returns the bucket it landed in. May run
    /// an automatic split first, per the split policy.
    pub fn insert(&mut self, tuple: &Tuple) -> Result<PageId, StorageError> {
        // reject tuples that could not round-trip through the page format
        if tuple.fields.len() != self.header.attr_count as usize {
            return Err(StorageError::MalformedTuple(tuple.serialize()));
        }
        if tuple
            .fields
            .iter()
            .any(|f| f == WILDCARD || f.contains(',') || f.contains('\0'))
        {
            return Err(StorageError::MalformedTuple(tuple.serialize()));
        }
        let bytes = tuple.serialize().into_bytes();
        if bytes.len() + 1 > PAGE_DATA_SIZE {
            return Err(StorageError::TupleTooLarge(bytes.len()));
        }

        // one split per k insertions, counted before this tuple lands
        if let SplitPolicy::EveryInserts(k) = self.split {
            if (self.header.tuple_count + 1) % k.get() == 0 {
                self.split()?;
            }
        }

        let hash = tuple.composite_hash(&self.header.choice_vector);
        let addr = self.bucket_of(hash);
        trace!("insert {}: hash {} -> bucket {addr}", tuple.serialize(), format_bits(hash));
        self.insert_at_bucket(addr, &bytes)?;
        self.header.tuple_count += 1;
        self.dirty = true;
        Ok(addr)
    }

    /// Bucket-targeted insert shared by `insert` and `split`: primary
    /// page first, then the first overflow page with room, else a new
    /// page linked at the chain tail.
    fn insert_at_bucket(&mut self, bucket: PageId, bytes: &[u8]) -> Result<(), StorageError> {
        let mut page = self.data.read_page(bucket)?;
        if page.try_insert(bytes) {
            return self.data.write_page(bucket, &page);
        }

        // primary page full: walk the overflow chain
        let mut prev: Option<(PageId, Page)> = None;
        let mut next = page.header.ovflow;
        while let Some(ov) = next {
            let mut ovpage = self.ovflow.read_page(ov)?;
            if ovpage.try_insert(bytes) {
                return self.ovflow.write_page(ov, &ovpage);
            }
            next = ovpage.header.ovflow;
            prev = Some((ov, ovpage));
        }

        // no room anywhere: extend the chain
        let newp = self.ovflow.append_page()?;
        trace!("bucket {bucket}: allocated overflow page ov{newp}");
        let mut newpage = Page::new();
        if !newpage.try_insert(bytes) {
            return Err(StorageError::TupleTooLarge(bytes.len()));
        }
        self.ovflow.write_page(newp, &newpage)?;

        match prev {
            Some((prevp, mut prevpage)) => {
                prevpage.header.ovflow = Some(newp);
                self.ovflow.write_page(prevp, &prevpage)?;
            }
            None => {
                page.header.ovflow = Some(newp);
                self.data.write_page(bucket, &page)?;
            }
        }
        Ok(())
    }

    /// One linear-hashing split: adds the buddy bucket for the current
    /// split pointer, redistributes that bucket's tuples using one more
    /// address bit, then advances the pointer.
    pub fn split(&mut self) -> Result<(), StorageError> {
        let depth = self.header.depth;
        let sp = self.header.split_pointer;
        if depth as usize >= ADDRESS_WIDTH {
            warn!(
                "relation {}: split at depth {depth} cannot widen addresses, skipping",
                self.name
            );
            return Ok(());
        }

        let buddy = (1u32 << depth) + sp;
        let appended = self.data.append_page()?;
        debug_assert_eq!(appended, buddy);
        self.header.page_count += 1;
        debug!(
            "relation {}: splitting bucket {sp} into buddy {buddy} at depth {depth}",
            self.name
        );

        // drain the bucket: collect its tuples, leaving every visited
        // page empty with its chain link intact so the chain is reused
        let mut tuples: Vec<Tuple> = Vec::new();
        let mut page = self.data.read_page(sp)?;
        collect_tuples(&page, self.header.attr_count, &mut tuples);
        let mut next = page.header.ovflow;
        page.reset_keep_link();
        self.data.write_page(sp, &page)?;

        while let Some(ov) = next {
            let mut ovpage = self.ovflow.read_page(ov)?;
            collect_tuples(&ovpage, self.header.attr_count, &mut tuples);
            next = ovpage.header.ovflow;
            ovpage.reset_keep_link();
            self.ovflow.write_page(ov, &ovpage)?;
        }

        // redistribute with one extra address bit, recomputing every
        // hash from scratch
        for tuple in &tuples {
            let hash = tuple.composite_hash(&self.header.choice_vector);
            let target = lower_bits(hash, depth + 1);
            debug_assert!(target == sp || target == buddy);
            trace!("split moves {} to bucket {target}", tuple.serialize());
            self.insert_at_bucket(target, tuple.serialize().as_bytes())?;
        }

        // advance the split pointer, widening the address on wrap-around
        self.header.split_pointer += 1;
        if self.header.split_pointer == 1 << depth {
            self.header.split_pointer = 0;
            self.header.depth += 1;
        }
        self.dirty = true;
        debug!(
            "relation {}: split done, depth {} split pointer {}",
            self.name, self.header.depth, self.header.split_pointer
        );
        Ok(())
    }
}

impl Drop for Relation {
    fn drop(&mut self) {
        // best-effort header flush; explicit close is the supported path
        if let Err(err) = self.flush_header() {
            warn!("header flush failed while dropping relation {}: {err}", self.name);
        }
    }
}

use crate::errors::storage_error::StorageError;
use crate::types::page_types::{Page, PageId};
use crate::types::stats_types::{BucketStats, PageStats, RelationStats};
use crate::types::storage_types::Relation;
use std::fmt;

fn page_stats(id: PageId, page: &Page) -> PageStats {
    PageStats {
        id,
        tuples: page.header.ntuples,
        free_bytes: page.free_space(),
        ovflow: page.header.ovflow,
    }
}

impl Relation {
    /// Walks every primary bucket and its overflow chain. A read-only
    /// diagnostic, not part of the insert or query path.
    pub fn stats(&mut self) -> Result<RelationStats, StorageError> {
        let mut buckets = Vec::with_capacity(self.header.page_count as usize);
        for pid in 0..self.header.page_count {
            let page = self.data.read_page(pid)?;
            let primary = page_stats(pid, &page);

            let mut chain = Vec::new();
            let mut next = page.header.ovflow;
            while let Some(ov) = next {
                let ovpage = self.ovflow.read_page(ov)?;
                next = ovpage.header.ovflow;
                chain.push(page_stats(ov, &ovpage));
            }

            buckets.push(BucketStats { bucket: pid, primary, chain });
        }

        Ok(RelationStats {
            attr_count: self.header.attr_count,
            page_count: self.header.page_count,
            depth: self.header.depth,
            split_pointer: self.header.split_pointer,
            tuple_count: self.header.tuple_count,
            choice_vector: self.header.choice_vector.to_string(),
            buckets,
        })
    }
}

// -1 stands in for "no overflow", as in the on-disk sentinel
fn link(ovflow: Option<PageId>) -> i64 {
    match ovflow {
        Some(id) => id as i64,
        None => -1,
    }
}

impl fmt::Display for RelationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Global Info:")?;
        writeln!(
            f,
            "#attrs:{}  #pages:{}  #tuples:{}  d:{}  sp:{}",
            self.attr_count, self.page_count, self.tuple_count, self.depth, self.split_pointer
        )?;
        writeln!(f, "Choice vector")?;
        writeln!(f, "{}", self.choice_vector)?;
        writeln!(f, "Bucket Info:")?;
        writeln!(f, "{:<3} {}", "#", "Info on pages in bucket")?;
        writeln!(f, "{:<3} {}", "", "(pageID,#tuples,freebytes,ovflow)")?;
        for b in &self.buckets {
            write!(
                f,
                "{:<3} (d{},{},{},{})",
                b.bucket,
                b.primary.id,
                b.primary.tuples,
                b.primary.free_bytes,
                link(b.primary.ovflow)
            )?;
            for p in &b.chain {
                write!(f, " -> (ov{},{},{},{})", p.id, p.tuples, p.free_bytes, link(p.ovflow))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

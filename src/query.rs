use crate::errors::query_error::QueryError;
use crate::hash::bits::{bit_is_set, format_bits, low_mask, lower_bits, set_bit, Bits};
use crate::hash::hash_bytes;
use crate::tuple::WILDCARD;
use crate::types::page_types::PageId;
use crate::types::query_types::{ScanState, TupleScan};
use crate::types::storage_types::{Relation, RelationHeader};
use crate::types::tuple_types::Tuple;

/// Bucket `b` can hold a match iff its address agrees with `known` on
/// every bit the pattern pins; `unknown` bits are free. The address
/// width per bucket follows the split-pointer rule: buckets whose
/// low-depth bits sit below the pointer are addressed with one extra
/// bit, which covers both the already-split buckets and their buddies.
fn is_candidate(header: &RelationHeader, known: Bits, unknown: Bits, bucket: PageId) -> bool {
    let eff_depth = if lower_bits(bucket, header.depth) < header.split_pointer {
        header.depth + 1
    } else {
        header.depth
    };
    (bucket ^ known) & !unknown & low_mask(eff_depth) == 0
}

fn next_candidate(
    header: &RelationHeader,
    known: Bits,
    unknown: Bits,
    after: Option<PageId>,
) -> Option<PageId> {
    let start = match after {
        Some(b) => b + 1,
        None => 0,
    };
    (start..header.page_count).find(|&b| is_candidate(header, known, unknown, b))
}

impl Relation {
    /// Starts a partial-match scan for `pattern`, a comma-separated
    /// tuple with `?` for unknown attributes. The scan visits exactly
    /// the buckets that could hold a match, in increasing id order.
    pub fn scan(&mut self, pattern: &str) -> Result<TupleScan<'_>, QueryError> {
        let fields: Vec<&str> = pattern.split(',').collect();
        if fields.len() != self.header.attr_count as usize {
            return Err(QueryError::WrongFieldCount {
                got: fields.len(),
                want: self.header.attr_count as usize,
            });
        }
        let pattern = Tuple {
            fields: fields.iter().map(|s| s.to_string()).collect(),
        };

        // hash the known attributes once; wildcards contribute zeros
        let hashes: Vec<Bits> = pattern
            .fields
            .iter()
            .map(|f| if f == WILDCARD { 0 } else { hash_bytes(f.as_bytes()) })
            .collect();

        // one walk of the choice vector builds both masks
        let mut known = 0;
        let mut unknown = 0;
        for (i, cb) in self.header.choice_vector.bits.iter().enumerate() {
            if pattern.fields[cb.attr as usize] == WILDCARD {
                unknown = set_bit(unknown, i as u32);
            } else if bit_is_set(hashes[cb.attr as usize], cb.bit as u32) {
                known = set_bit(known, i as u32);
            }
        }

        let state = match next_candidate(&self.header, known, unknown, None) {
            Some(bucket) => ScanState::Primary { bucket },
            None => ScanState::Exhausted,
        };
        trace!(
            "scan {}: known {}, unknown {}, first state {state:?}",
            pattern.serialize(),
            format_bits(known),
            format_bits(unknown)
        );

        Ok(TupleScan {
            rel: self,
            pattern,
            known,
            unknown,
            state,
            offset: 0,
        })
    }
}

impl TupleScan<'_> {
    /// Returns the next stored tuple matching the pattern, or `None`
    /// once every candidate bucket is exhausted. Forward-only; after
    /// the first `None` it yields `None` forever.
    pub fn next_match(&mut self) -> Result<Option<Tuple>, QueryError> {
        loop {
            let (bucket, page) = match self.state {
                ScanState::Exhausted => return Ok(None),
                ScanState::Primary { bucket } => (bucket, self.rel.data.read_page(bucket)?),
                ScanState::Overflow { bucket, page } => (bucket, self.rel.ovflow.read_page(page)?),
            };

            // scan the rest of the current page
            while let Some(bytes) = page.tuple_bytes_at(self.offset) {
                self.offset += bytes.len() as u32 + 1;
                let parsed = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| Tuple::parse(s, self.rel.header.attr_count).ok());
                let Some(tuple) = parsed else {
                    warn!(
                        "dropping malformed stored tuple: {:?}",
                        String::from_utf8_lossy(bytes)
                    );
                    continue;
                };
                if tuple.matches(&self.pattern) {
                    return Ok(Some(tuple));
                }
            }

            // page done: follow the overflow chain, else the next bucket
            self.offset = 0;
            self.state = match page.header.ovflow {
                Some(ov) => ScanState::Overflow { bucket, page: ov },
                None => {
                    match next_candidate(&self.rel.header, self.known, self.unknown, Some(bucket)) {
                        Some(b) => {
                            trace!("scan advances to bucket {b}");
                            ScanState::Primary { bucket: b }
                        }
                        None => ScanState::Exhausted,
                    }
                }
            };
        }
    }
}

impl Iterator for TupleScan<'_> {
    type Item = Result<Tuple, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_match().transpose()
    }
}

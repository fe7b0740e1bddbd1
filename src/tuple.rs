use crate::errors::storage_error::StorageError;
use crate::hash::bits::{bit_is_set, set_bit, Bits};
use crate::hash::hash_bytes;
use crate::types::choice_types::ChoiceVector;
use crate::types::tuple_types::Tuple;

pub const WILDCARD: &str = "?";

impl Tuple {
    /// Splits a comma-separated line into fields; the count must match
    /// the relation's attribute count.
    pub fn parse(line: &str, attr_count: u32) -> Result<Tuple, StorageError> {
        let fields: Vec<String> = line.split(',').map(str::to_string).collect();
        if fields.len() != attr_count as usize {
            return Err(StorageError::MalformedTuple(line.to_string()));
        }
        Ok(Tuple { fields })
    }

    pub fn serialize(&self) -> String {
        self.fields.join(",")
    }

    pub fn has_wildcards(&self) -> bool {
        self.fields.iter().any(|f| f == WILDCARD)
    }

    /// Assembles the 32-bit bucket hash: output bit `i` is bit
    /// `cv[i].bit` of the hash of field `cv[i].attr`.
    pub fn composite_hash(&self, cv: &ChoiceVector) -> Bits {
        let hashes: Vec<Bits> = self.fields.iter().map(|f| hash_bytes(f.as_bytes())).collect();

        let mut result = 0;
        for (i, cb) in cv.bits.iter().enumerate() {
            if bit_is_set(hashes[cb.attr as usize], cb.bit as u32) {
                result = set_bit(result, i as u32);
            }
        }
        result
    }

    /// Per-field equality with `?` in either tuple matching anything.
    /// Field counts are assumed equal.
    pub fn matches(&self, other: &Tuple) -> bool {
        debug_assert_eq!(self.fields.len(), other.fields.len());
        self.fields
            .iter()
            .zip(other.fields.iter())
            .all(|(a, b)| a == WILDCARD || b == WILDCARD || a == b)
    }
}

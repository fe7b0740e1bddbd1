use crate::consts::hash_consts::{ADDRESS_WIDTH, CHOICE_VECTOR_SIZE};
use crate::errors::choice_error::ChoiceVectorError;
use crate::types::choice_types::{ChoiceBit, ChoiceVector};
use std::fmt;

impl ChoiceVector {
    /// Parses a textual spec of colon-separated `attr,bit` pairs, e.g.
    /// `"0,0:1,0:0,1"`. More than 32 pairs are truncated; fewer are
    /// padded by spreading address bits round-robin across attributes,
    /// so the same spec always yields the same vector.
    ///
    /// `attr_count` must be in `1..=255`; `Relation::create` validates
    /// that before calling here.
    pub fn parse(spec: &str, attr_count: u32) -> Result<ChoiceVector, ChoiceVectorError> {
        debug_assert!(attr_count >= 1 && attr_count <= u8::MAX as u32);

        if spec.trim().is_empty() {
            return Err(ChoiceVectorError::EmptySpec);
        }

        let mut bits = [ChoiceBit { attr: 0, bit: 0 }; ADDRESS_WIDTH];
        let mut parsed = 0;

        for pair in spec.split(':') {
            if parsed == ADDRESS_WIDTH {
                break; // spec longer than the address width
            }
            let pair = pair.trim();
            let (attr, bit) = pair
                .split_once(',')
                .ok_or_else(|| ChoiceVectorError::MalformedPair(pair.to_string()))?;
            let attr: u8 = attr
                .trim()
                .parse()
                .map_err(|_| ChoiceVectorError::MalformedPair(pair.to_string()))?;
            let bit: u8 = bit
                .trim()
                .parse()
                .map_err(|_| ChoiceVectorError::MalformedPair(pair.to_string()))?;
            if attr as u32 >= attr_count {
                return Err(ChoiceVectorError::AttrOutOfRange { attr, attr_count });
            }
            if bit as usize >= ADDRESS_WIDTH {
                return Err(ChoiceVectorError::BitOutOfRange(bit));
            }
            bits[parsed] = ChoiceBit { attr, bit };
            parsed += 1;
        }

        // pad remaining positions deterministically
        for i in parsed..ADDRESS_WIDTH {
            bits[i] = ChoiceBit {
                attr: (i as u32 % attr_count) as u8,
                bit: (i as u32 / attr_count % ADDRESS_WIDTH as u32) as u8,
            };
        }

        Ok(ChoiceVector { bits })
    }

    pub fn to_bytes(&self) -> [u8; CHOICE_VECTOR_SIZE] {
        let mut buf = [0u8; CHOICE_VECTOR_SIZE];
        for (i, cb) in self.bits.iter().enumerate() {
            buf[2 * i] = cb.attr;
            buf[2 * i + 1] = cb.bit;
        }
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Self {
        assert!(buf.len() >= CHOICE_VECTOR_SIZE); // must have enough bytes

        let mut bits = [ChoiceBit { attr: 0, bit: 0 }; ADDRESS_WIDTH];
        for (i, pair) in buf[..CHOICE_VECTOR_SIZE].chunks(2).enumerate() {
            let pair: [u8; 2] = pair.try_into().unwrap();
            bits[i] = ChoiceBit { attr: pair[0], bit: pair[1] };
        }
        Self { bits }
    }
}

// renders the parse format, all 32 entries
impl fmt::Display for ChoiceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cb) in self.bits.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{},{}", cb.attr, cb.bit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs_in_order() {
        let cv = ChoiceVector::parse("0,0:1,0:0,1", 2).unwrap();
        assert_eq!(cv.bits[0], ChoiceBit { attr: 0, bit: 0 });
        assert_eq!(cv.bits[1], ChoiceBit { attr: 1, bit: 0 });
        assert_eq!(cv.bits[2], ChoiceBit { attr: 0, bit: 1 });
    }

    #[test]
    fn parse_tolerates_whitespace() {
        let cv = ChoiceVector::parse(" 0,0 : 1 , 3 ", 2).unwrap();
        assert_eq!(cv.bits[1], ChoiceBit { attr: 1, bit: 3 });
    }

    #[test]
    fn padding_is_round_robin() {
        let cv = ChoiceVector::parse("0,0", 2).unwrap();
        // position 1 onward is padded: attr cycles, bit steps every cycle
        assert_eq!(cv.bits[1], ChoiceBit { attr: 1, bit: 0 });
        assert_eq!(cv.bits[2], ChoiceBit { attr: 0, bit: 1 });
        assert_eq!(cv.bits[3], ChoiceBit { attr: 1, bit: 1 });
        assert_eq!(cv.bits[31], ChoiceBit { attr: 1, bit: 15 });
    }

    #[test]
    fn padding_is_deterministic() {
        let a = ChoiceVector::parse("0,0:2,5", 3).unwrap();
        let b = ChoiceVector::parse("0,0:2,5", 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overlong_spec_truncates() {
        let spec = (0..40).map(|i| format!("0,{}", i % 32)).collect::<Vec<_>>().join(":");
        let cv = ChoiceVector::parse(&spec, 1).unwrap();
        assert_eq!(cv.bits[31], ChoiceBit { attr: 0, bit: 31 });
    }

    #[test]
    fn rejects_bad_specs() {
        assert_eq!(ChoiceVector::parse("  ", 2), Err(ChoiceVectorError::EmptySpec));
        assert_eq!(
            ChoiceVector::parse("0;0", 2),
            Err(ChoiceVectorError::MalformedPair("0;0".into()))
        );
        assert_eq!(
            ChoiceVector::parse("0,x", 2),
            Err(ChoiceVectorError::MalformedPair("0,x".into()))
        );
        assert_eq!(
            ChoiceVector::parse("2,0", 2),
            Err(ChoiceVectorError::AttrOutOfRange { attr: 2, attr_count: 2 })
        );
        assert_eq!(
            ChoiceVector::parse("0,32", 2),
            Err(ChoiceVectorError::BitOutOfRange(32))
        );
    }

    #[test]
    fn byte_codec_roundtrip() {
        let cv = ChoiceVector::parse("0,0:1,7:2,31", 3).unwrap();
        let decoded = ChoiceVector::from_bytes(&cv.to_bytes());
        assert_eq!(decoded, cv);
    }

    #[test]
    fn display_reparses_to_itself() {
        let cv = ChoiceVector::parse("1,4:0,2", 2).unwrap();
        let redone = ChoiceVector::parse(&cv.to_string(), 2).unwrap();
        assert_eq!(redone, cv);
    }
}

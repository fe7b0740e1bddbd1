use crate::consts::hash_consts::ADDRESS_WIDTH;

/// Fixed-width bit vector; bit 0 is the least significant.
pub type Bits = u32;

pub fn bit_is_set(bits: Bits, i: u32) -> bool {
    debug_assert!((i as usize) < ADDRESS_WIDTH);
    bits & (1 << i) != 0
}

pub fn set_bit(bits: Bits, i: u32) -> Bits {
    debug_assert!((i as usize) < ADDRESS_WIDTH);
    bits | (1 << i)
}

pub fn unset_bit(bits: Bits, i: u32) -> Bits {
    debug_assert!((i as usize) < ADDRESS_WIDTH);
    bits & !(1 << i)
}

/// Mask with the lowest `n` bits set; `n >= 32` gives the full word,
/// which keeps `lower_bits(h, depth + 1)` total at maximum depth.
pub fn low_mask(n: u32) -> Bits {
    if n as usize >= ADDRESS_WIDTH {
        Bits::MAX
    } else {
        (1 << n) - 1
    }
}

/// The lowest `n` bits of `bits`, used as a bucket address of width `n`.
pub fn lower_bits(bits: Bits, n: u32) -> Bits {
    bits & low_mask(n)
}

/// Binary rendering for logs and reports, most significant bit first,
/// grouped in bytes: "00000000 00000000 00000001 01001010".
pub fn format_bits(bits: Bits) -> String {
    let raw = format!("{bits:032b}");
    raw.as_bytes()
        .chunks(8)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_test_bits() {
        let b = set_bit(set_bit(0, 0), 5);
        assert!(bit_is_set(b, 0));
        assert!(bit_is_set(b, 5));
        assert!(!bit_is_set(b, 1));
        assert_eq!(unset_bit(b, 5), 1);
    }

    #[test]
    fn low_mask_edges() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(1), 1);
        assert_eq!(low_mask(31), 0x7fff_ffff);
        assert_eq!(low_mask(32), u32::MAX);
        assert_eq!(low_mask(40), u32::MAX);
    }

    #[test]
    fn lower_bits_truncates() {
        assert_eq!(lower_bits(0b1101, 2), 0b01);
        assert_eq!(lower_bits(0b1101, 3), 0b101);
        assert_eq!(lower_bits(0xdead_beef, 32), 0xdead_beef);
    }

    #[test]
    fn format_groups_bytes() {
        assert_eq!(format_bits(0), "00000000 00000000 00000000 00000000");
        assert_eq!(format_bits(0x0000_014a), "00000000 00000000 00000001 01001010");
    }
}

pub const ADDRESS_WIDTH: usize = 32;        // bits in a composite hash = choice vector length
pub const HASH_SEED: u32 = 0x4d41_4c48;     // fixed xxh32 seed; changing it invalidates stored files
pub const CHOICE_VECTOR_SIZE: usize = ADDRESS_WIDTH * 2; // on-disk bytes: (attr, bit) pair per entry

// header record: attr_count, page_count, depth, split_pointer, tuple_count + choice vector
pub const RELATION_HEADER_SIZE: usize = 5 * 4 + CHOICE_VECTOR_SIZE;

pub mod hash_consts;
pub mod page_consts;

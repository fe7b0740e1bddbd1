pub mod page;
pub mod page_file;
pub mod page_header;
pub mod relation;
pub mod stats;

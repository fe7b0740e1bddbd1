pub mod choice_types;
pub mod page_types;
pub mod query_types;
pub mod stats_types;
pub mod storage_types;
pub mod tuple_types;

pub mod choice_error;
pub mod query_error;
pub mod storage_error;

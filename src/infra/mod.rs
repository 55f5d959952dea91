//! Storage and file export.

pub mod export;
pub mod storage;

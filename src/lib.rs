pub mod common;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;
pub mod sys;

pub use error::{Result, SyncError};

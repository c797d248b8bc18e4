//! Lockstep core library — domain types, record codec, configuration, errors.
//!
//! Public API surface:
//! - [`types`] — [`FileRecord`], [`RecordSet`] and newtypes
//! - [`codec`] — parse / serialize of the shared clipboard text
//! - [`config`] — operator configuration loading
//! - [`error`] — [`CoreError`]

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::CoreError;
pub use types::{FileName, FileRecord, RecordSet, Username};

//! Bulk user provisioning for a fleet-management platform.
//!
//! - Roster in: streaming CSV (local files, gzip/zstd, legacy charsets).
//! - Accounts out: each row is resolved against the remote group catalog,
//!   validated, and created through the platform API, one record at a time.
//!
//! Data shape:
//! - `RosterReader` pulls `CandidateUser` records lazily from a CSV source.
//! - `run_import` drives resolve -> validate -> submit and returns one
//!   `RecordOutcome` per roster row.
//
pub mod api;
mod codec;
mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod validate;

pub use crate::io::{build_roster_reader, reader_from_path, RosterMeta};
pub use crate::pipeline::{run_import, RecordOutcome};
pub use crate::record::{open_roster, RosterReader};

use thiserror::Error;

/// Fatal error type for an import run. Per-record problems are not errors;
/// they surface as [`RecordOutcome`] entries instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv_async::Error),
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

//! Batch scatter plots of upload creation vs. received times.
//!
//! Each `<experiment>_<node>.csv` in a directory holds one upload per line
//! as `created,received` epoch seconds. Files with at least
//! [`data::filter::MIN_RECORDS`] uploads are drawn to
//! `<output_dir>/<experiment>_<node>.png`; smaller ones are skipped.

pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod plot;

pub use batch::{run_batch, BatchSummary, FileOutcome, Status};
pub use config::{Cli, Config};

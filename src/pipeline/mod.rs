//! Processing pipeline stages wired from files on disk.

mod runner;

pub use runner::{extract_rows, report_table, run_pipeline, sync_table};

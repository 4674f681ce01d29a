//! CLI argument parsing.

mod args;

pub use args::{
    Cli, Command, ConfigAction, GlobalArgs, ReportArgs, ReportOverrides, RunArgs, SyncArgs,
    TrackArgs,
};

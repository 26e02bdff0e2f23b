//! Command-line interface for agglomerative clustering runs.
//!
//! The `run` command loads either a Parquet dense matrix or a line-based
//! UTF-8 text corpus, builds the requested hierarchy and optionally cuts it
//! into flat clusters.

mod commands;
mod options;

pub use commands::{ExecutionSummary, render_summary, run_cli};
pub use options::{
    AlgorithmArg, Cli, CliError, Command, LinkageArg, ParquetArgs, RunCommand, RunSource,
    TextArgs, TextMetric, VectorMetric, parse_byte_size,
};

#[cfg(test)]
mod tests;

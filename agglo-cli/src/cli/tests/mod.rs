//! Unit tests for the CLI commands and data ingestion helpers.

mod fixtures;
mod helpers;

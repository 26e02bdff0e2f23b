//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use crate::cli::commands::run_command;
use crate::cli::{
    AlgorithmArg, CliError, LinkageArg, RunCommand, RunSource, TextArgs, TextMetric,
};

pub(super) type TestResult = Result<(), Box<dyn std::error::Error>>;

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Default `run` options over a text file; tests override single fields.
pub(super) fn text_command(path: PathBuf) -> RunCommand {
    RunCommand {
        algorithm: AlgorithmArg::Anderberg,
        linkage: LinkageArg::Single,
        beta: None,
        min_pts: 2,
        max_bytes: None,
        cut_height: None,
        clusters: None,
        source: RunSource::Text(TextArgs {
            path,
            metric: TextMetric::Levenshtein,
            name: None,
        }),
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

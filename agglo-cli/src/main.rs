//! CLI entry point for building agglomerative clustering hierarchies.
//!
//! Parses command-line arguments with clap, runs the requested algorithm,
//! renders the pointer representation to stdout, and maps errors to exit
//! codes. Logging is initialized eagerly so subsequent operations can emit
//! structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use agglo_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{debug, error, field};

/// Parse CLI arguments, execute the command, render the summary, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    match logging::init_logging() {
        Ok(format) => debug!(?format, "logging initialised"),
        Err(err) => {
            report_logging_init_error(&err);
            return ExitCode::FAILURE;
        }
    }

    if let Err(err) = try_main() {
        let (code, hierarchy_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some((Some(core.code().as_str()), core.hierarchy_code())),
                CliError::Cut(cut) => Some((None, Some(cut.code()))),
                _ => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(field::display);
        let hierarchy_code_field = hierarchy_code.map(|code| field::display(code.as_str()));

        error!(
            error = %format!("{err:#}"),
            code = code_field,
            hierarchy_code = hierarchy_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}

//! Command implementations for the `agglo` CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use agglo_core::{
    Agglo, AggloBuilder, Algorithm, ClusteringResult, DistanceQuery, Linkage, PointerHierarchy,
    cut_by_count, cut_by_height, estimate_peak_bytes, format_bytes,
};
use agglo_providers_dense::{DenseMatrixProvider, DenseMetric};
use agglo_providers_text::TextProvider;
use tracing::{Span, debug, field, info, instrument};

use super::options::{
    Cli, CliError, Command, ParquetArgs, RunCommand, RunSource, TextArgs, TextMetric,
};

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name reported by the data source implementation.
    pub data_source: String,
    /// Algorithm that built the hierarchy.
    pub algorithm: Algorithm,
    /// Linkage handed to the algorithm.
    pub linkage: Linkage,
    /// Resulting pointer representation.
    pub hierarchy: PointerHierarchy,
    /// Flat clusters, present when a cut was requested.
    pub clusters: Option<ClusteringResult>,
}

/// How the finished hierarchy is turned into flat clusters.
#[derive(Debug, Clone, Copy)]
enum FlatCut {
    Height(f64),
    Count(usize),
}

/// Validated settings shared by every input source.
struct Plan {
    agglo: Agglo,
    max_bytes: Option<u64>,
    cut: Option<FlatCut>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when parsing or execution fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use agglo_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "alpha\nbeta\n")?;
/// let path = file.path().to_str().ok_or("non-UTF-8 temp path")?;
/// let cli = Cli::try_parse_from([
///     "agglo", "run", "--clusters", "1", "text", path, "--metric", "levenshtein",
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.hierarchy.link_count(), 1);
/// assert_eq!(summary.clusters.map(|c| c.cluster_count()), Some(1));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(algorithm = field::Empty, linkage = field::Empty, source = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let linkage = command.linkage.resolve(command.beta)?;
    let agglo = AggloBuilder::new()
        .with_algorithm(command.algorithm.into())
        .with_linkage(linkage)
        .with_min_pts(command.min_pts)
        .build()?;

    let span = Span::current();
    span.record("algorithm", field::display(agglo.algorithm()));
    span.record("linkage", field::display(agglo.linkage()));

    let cut = match (command.cut_height, command.clusters) {
        (Some(height), _) => Some(FlatCut::Height(height)),
        (None, Some(count)) => Some(FlatCut::Count(count)),
        (None, None) => None,
    };
    let plan = Plan {
        agglo,
        max_bytes: command.max_bytes,
        cut,
    };

    let summary = match command.source {
        RunSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            run_parquet(&plan, args)?
        }
        RunSource::Text(args) => {
            span.record("source", field::display("text"));
            run_text(&plan, args)?
        }
    };

    info!(
        data_source = summary.data_source.as_str(),
        merges = summary.hierarchy.link_count(),
        clusters = summary.clusters.as_ref().map(ClusteringResult::cluster_count),
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.run_parquet",
    err,
    skip(plan, args),
    fields(path = field::Empty, column = field::Empty, override_name = field::Empty),
)]
fn run_parquet(plan: &Plan, args: ParquetArgs) -> Result<ExecutionSummary, CliError> {
    let ParquetArgs {
        path,
        column,
        metric,
        name,
    } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let provider = DenseMatrixProvider::try_from_parquet_path(chosen_name, &path, &column)?
        .with_metric(DenseMetric::from(metric));
    execute(plan, &provider)
}

#[instrument(
    name = "cli.run_text",
    err,
    skip(plan, args),
    fields(path = field::Empty, metric = field::Empty, override_name = field::Empty),
)]
fn run_text(plan: &Plan, args: TextArgs) -> Result<ExecutionSummary, CliError> {
    let TextArgs { path, metric, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let metric_label = match metric {
        TextMetric::Levenshtein => "levenshtein",
    };
    span.record("metric", field::display(metric_label));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_text_reader(&path)?;
    let provider = match metric {
        TextMetric::Levenshtein => TextProvider::try_from_reader(chosen_name, reader)?,
    };
    execute(plan, &provider)
}

fn execute<D: DistanceQuery>(plan: &Plan, source: &D) -> Result<ExecutionSummary, CliError> {
    let algorithm = plan.agglo.algorithm();
    check_memory(algorithm, source.len(), plan.max_bytes)?;
    let hierarchy = plan.agglo.run(source)?;
    let clusters = match plan.cut {
        Some(FlatCut::Height(height)) => Some(cut_by_height(&hierarchy, height)),
        Some(FlatCut::Count(count)) => {
            Some(cut_by_count(&hierarchy, count).map_err(CliError::Cut)?)
        }
        None => None,
    };
    Ok(ExecutionSummary {
        data_source: source.name().to_owned(),
        algorithm,
        linkage: plan.agglo.linkage(),
        hierarchy,
        clusters,
    })
}

/// Rejects runs whose estimated peak memory exceeds `limit`.
pub(super) fn check_memory(
    algorithm: Algorithm,
    objects: usize,
    limit: Option<u64>,
) -> Result<(), CliError> {
    let estimated = estimate_peak_bytes(objects, algorithm);
    debug!(
        %algorithm,
        objects,
        estimated = %format_bytes(estimated),
        "estimated peak memory"
    );
    match limit {
        Some(limit) if estimated > limit => Err(CliError::MemoryLimitExceeded {
            algorithm,
            objects,
            estimated,
            limit,
        }),
        _ => Ok(()),
    }
}

#[instrument(name = "cli.open_text_reader", err, fields(path = field::Empty))]
pub(super) fn open_text_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer` as tab-separated text.
///
/// A short header is followed by one `index parent distance` row per object
/// and, when a cut was requested, one `index cluster` row per object.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "algorithm: {}", summary.algorithm)?;
    writeln!(writer, "linkage: {}", summary.linkage)?;
    writeln!(writer, "objects: {}", summary.hierarchy.len())?;
    writeln!(writer, "index\tparent\tdistance")?;
    let hierarchy = &summary.hierarchy;
    for (index, (parent, distance)) in hierarchy
        .parents()
        .iter()
        .zip(hierarchy.distances())
        .enumerate()
    {
        writeln!(writer, "{index}\t{parent}\t{distance}")?;
    }
    if let Some(clusters) = &summary.clusters {
        writeln!(writer, "clusters: {}", clusters.cluster_count())?;
        for (index, cluster) in clusters.assignments().iter().enumerate() {
            writeln!(writer, "{index}\t{}", cluster.get())?;
        }
    }
    Ok(())
}

//! Argument parsing and error types for the `agglo` CLI.

use std::io;
use std::path::PathBuf;

use agglo_core::{AggloError, Algorithm, HierarchyError, Linkage, PrototypeObjective};
use agglo_providers_dense::{DenseMatrixProviderError, DenseMetric};
use agglo_providers_text::TextProviderError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

const DEFAULT_MIN_PTS: usize = 5;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "agglo", about = "Build agglomerative clustering hierarchies.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a hierarchy and print its pointer representation.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Clustering algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Anderberg)]
    pub algorithm: AlgorithmArg,

    /// Linkage criterion for the matrix algorithms.
    #[arg(long, value_enum, default_value_t = LinkageArg::Single)]
    pub linkage: LinkageArg,

    /// Coefficient for `--linkage flexible-beta` (defaults to -0.25).
    #[arg(long, allow_negative_numbers = true)]
    pub beta: Option<f64>,

    /// Neighbourhood size for HDBSCAN core distances, counting the object itself.
    #[arg(
        long = "min-pts",
        default_value_t = DEFAULT_MIN_PTS,
        value_parser = clap::value_parser!(usize),
    )]
    pub min_pts: usize,

    /// Refuse to run when the estimated peak memory exceeds this size
    /// (e.g. `512M`, `2GiB`).
    #[arg(long = "max-bytes", value_parser = parse_byte_size)]
    pub max_bytes: Option<u64>,

    /// Cut the hierarchy at this height.
    #[arg(long = "cut-height", conflicts_with = "clusters")]
    pub cut_height: Option<f64>,

    /// Cut the hierarchy into this many clusters.
    #[arg(long)]
    pub clusters: Option<usize>,

    /// Data source configuration.
    #[command(subcommand)]
    pub source: RunSource,
}

/// Input data sources.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read a Parquet file containing a `FixedSizeList<Float32, D>` column.
    Parquet(ParquetArgs),
    /// Read a UTF-8 text corpus, one string per line.
    Text(TextArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file containing feature vectors.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` rows.
    #[arg(long)]
    pub column: String,

    /// Distance between feature vectors.
    #[arg(long, value_enum, default_value_t = VectorMetric::Euclidean)]
    pub metric: VectorMetric,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Text ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to a UTF-8 text file with one string per line.
    pub path: PathBuf,

    /// Distance metric to use when comparing lines.
    #[arg(long, value_enum)]
    pub metric: TextMetric,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Supported text metrics.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TextMetric {
    /// Compute Levenshtein edit distance between lines.
    Levenshtein,
}

/// Supported vector metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VectorMetric {
    /// Straight-line distance.
    Euclidean,
    /// Squared straight-line distance.
    SquaredEuclidean,
}

impl From<VectorMetric> for DenseMetric {
    fn from(metric: VectorMetric) -> Self {
        match metric {
            VectorMetric::Euclidean => Self::Euclidean,
            VectorMetric::SquaredEuclidean => Self::SquaredEuclidean,
        }
    }
}

/// Algorithm names accepted by `--algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Agnes,
    Anderberg,
    NnChain,
    Slink,
    Clink,
    HdbscanSlink,
    HdbscanPrim,
    #[value(name = "minimax")]
    MiniMax,
    #[value(name = "minimax-anderberg")]
    MiniMaxAnderberg,
    #[value(name = "minimax-nn-chain")]
    MiniMaxNnChain,
    /// Medoid linkage minimising the largest member distance.
    MedoidMaxDistance,
    /// Medoid linkage minimising the sum of member distances.
    MedoidDistanceSum,
    /// Medoid linkage minimising the increase of the distance sum.
    MedoidDistanceSumIncrease,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Agnes => Self::Agnes,
            AlgorithmArg::Anderberg => Self::Anderberg,
            AlgorithmArg::NnChain => Self::NnChain,
            AlgorithmArg::Slink => Self::Slink,
            AlgorithmArg::Clink => Self::Clink,
            AlgorithmArg::HdbscanSlink => Self::HdbscanSlink,
            AlgorithmArg::HdbscanPrim => Self::HdbscanPrim,
            AlgorithmArg::MiniMax => Self::MiniMax,
            AlgorithmArg::MiniMaxAnderberg => Self::MiniMaxAnderberg,
            AlgorithmArg::MiniMaxNnChain => Self::MiniMaxNnChain,
            AlgorithmArg::MedoidMaxDistance => Self::Medoid(PrototypeObjective::MaxDistance),
            AlgorithmArg::MedoidDistanceSum => Self::Medoid(PrototypeObjective::DistanceSum),
            AlgorithmArg::MedoidDistanceSumIncrease => {
                Self::Medoid(PrototypeObjective::DistanceSumIncrease)
            }
        }
    }
}

/// Linkage names accepted by `--linkage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageArg {
    Single,
    Complete,
    GroupAverage,
    WeightedAverage,
    Centroid,
    Median,
    Ward,
    MinimumVariance,
    FlexibleBeta,
}

impl LinkageArg {
    /// Resolves the linkage, attaching `beta` to the flexible strategy.
    ///
    /// # Errors
    /// Returns [`CliError::UnusedBeta`] when `beta` is given for any other
    /// linkage.
    pub fn resolve(self, beta: Option<f64>) -> Result<Linkage, CliError> {
        let linkage = match self {
            Self::Single => Linkage::Single,
            Self::Complete => Linkage::Complete,
            Self::GroupAverage => Linkage::GroupAverage,
            Self::WeightedAverage => Linkage::WeightedAverage,
            Self::Centroid => Linkage::Centroid,
            Self::Median => Linkage::Median,
            Self::Ward => Linkage::Ward,
            Self::MinimumVariance => Linkage::MinimumVariance,
            Self::FlexibleBeta => {
                return Ok(Linkage::FlexibleBeta {
                    beta: beta.unwrap_or(Linkage::DEFAULT_FLEXIBLE_BETA),
                });
            }
        };
        match beta {
            Some(beta) => Err(CliError::UnusedBeta { beta, linkage }),
            None => Ok(linkage),
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading an input source.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// `--beta` was supplied for a linkage without a coefficient.
    #[error("`--beta {beta}` only applies to flexible-beta linkage, not {linkage}")]
    UnusedBeta {
        /// Supplied coefficient.
        beta: f64,
        /// Linkage selected with `--linkage`.
        linkage: Linkage,
    },
    /// The estimated peak memory exceeds `--max-bytes`.
    #[error(
        "{algorithm} on {objects} objects needs about {estimated} bytes, above the {limit}-byte limit"
    )]
    MemoryLimitExceeded {
        /// Selected algorithm.
        algorithm: Algorithm,
        /// Number of objects loaded.
        objects: usize,
        /// Estimated peak bytes.
        estimated: u64,
        /// Limit from `--max-bytes`.
        limit: u64,
    },
    /// Dense matrix ingestion failed.
    #[error(transparent)]
    Dense(#[from] DenseMatrixProviderError),
    /// Text ingestion failed.
    #[error(transparent)]
    Text(#[from] TextProviderError),
    /// Configuration or clustering failed.
    #[error(transparent)]
    Core(#[from] AggloError),
    /// The flat cut could not be applied.
    #[error("failed to cut the hierarchy: {0}")]
    Cut(#[source] HierarchyError),
}

/// Parses a byte size such as `1024`, `100k`, `512MiB` or `2GB`.
///
/// Suffixes are case-insensitive binary multiples; `K`, `KB` and `KiB` all
/// mean 1024 bytes.
///
/// # Errors
/// Returns a message when the number is missing or malformed, the suffix is
/// unknown, or the value overflows `u64`.
///
/// # Examples
/// ```
/// use agglo_cli::cli::parse_byte_size;
///
/// assert_eq!(parse_byte_size("2G"), Ok(2 * 1024 * 1024 * 1024));
/// assert!(parse_byte_size("1.5G").is_err());
/// ```
pub fn parse_byte_size(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(format!("`{raw}` does not start with a byte count"));
    }
    let value: u64 = digits
        .parse()
        .map_err(|err| format!("invalid byte count `{digits}`: {err}"))?;
    let shift = match suffix.to_ascii_lowercase().as_str() {
        "" | "b" => 0,
        "k" | "kb" | "kib" => 10,
        "m" | "mb" | "mib" => 20,
        "g" | "gb" | "gib" => 30,
        "t" | "tb" | "tib" => 40,
        other => return Err(format!("unknown size suffix `{other}`")),
    };
    value
        .checked_mul(1_u64 << shift)
        .ok_or_else(|| format!("`{raw}` overflows a 64-bit byte count"))
}

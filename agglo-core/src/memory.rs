//! Pre-flight memory estimation for the clustering algorithms.
//!
//! Provides a conservative estimate of peak memory consumption so callers can
//! reject oversized inputs before any distance is computed. The matrix-based
//! algorithms dominate with their `n(n-1)/2` triangle; the SLINK family only
//! needs a handful of per-object arrays.

use crate::Algorithm;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Safety multiplier applied to the raw estimate to cover heap fragmentation
/// and transient allocations.
const SAFETY_MULTIPLIER_NUMERATOR: u64 = 3;
const SAFETY_MULTIPLIER_DENOMINATOR: u64 = 2;

/// Size of an `f64` matrix cell or per-object distance.
const F64_BYTES: u64 = 8;

/// Size of a `usize` on 64-bit platforms.
const USIZE_BYTES: u64 = 8;

/// Pointer builder state per object: parent, distance, merge order and
/// cluster size.
const BUILDER_BYTES: u64 = 2 * USIZE_BYTES + F64_BYTES + USIZE_BYTES;

/// Row buffer used while filling the matrix: column indices plus distances.
const ROW_BYTES: u64 = USIZE_BYTES + F64_BYTES;

/// Nearest-neighbour cache entry: distance plus an optional index.
const CACHE_BYTES: u64 = F64_BYTES + 2 * USIZE_BYTES;

/// Prototype bookkeeping per object: recorded prototype, member list entry
/// and hash map slot.
const PROTOTYPE_OBJECT_BYTES: u64 = USIZE_BYTES + USIZE_BYTES + 4 * USIZE_BYTES;

/// Spanning-tree edge kept in the heap by the Prim variant.
const SPANNING_EDGE_BYTES: u64 = F64_BYTES + 2 * USIZE_BYTES;

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Returns a conservative estimate of peak memory (in bytes) that
/// `algorithm` needs for `objects` inputs.
///
/// The estimate covers:
///
/// - the distance triangle (`f64` per pair) for the matrix algorithms, plus a
///   second value triangle and a prototype triangle for the prototype-based
///   ones;
/// - the pointer builder arrays;
/// - algorithm-specific per-object state such as nearest-neighbour caches,
///   chains, core distances and spanning-tree edges.
///
/// A 1.5× safety multiplier is applied to the raw total.
///
/// # Examples
///
/// ```
/// use agglo_core::{Algorithm, estimate_peak_bytes};
///
/// let matrix = estimate_peak_bytes(1_000, Algorithm::Anderberg);
/// let linear = estimate_peak_bytes(1_000, Algorithm::Slink);
/// assert!(matrix > linear);
///
/// assert_eq!(estimate_peak_bytes(0, Algorithm::Agnes), 0);
/// ```
#[must_use]
pub fn estimate_peak_bytes(objects: usize, algorithm: Algorithm) -> u64 {
    if objects == 0 {
        return 0;
    }

    let n = objects as u64;
    let cells = pair_count(n);
    let triangle = cells.saturating_mul(F64_BYTES);
    let builder = n.saturating_mul(BUILDER_BYTES);
    let rows = n.saturating_mul(ROW_BYTES);

    let specific = match algorithm {
        Algorithm::Agnes => triangle,
        Algorithm::Anderberg => triangle.saturating_add(n.saturating_mul(CACHE_BYTES)),
        Algorithm::NnChain => triangle.saturating_add(n.saturating_mul(USIZE_BYTES)),
        Algorithm::MiniMax
        | Algorithm::MiniMaxAnderberg
        | Algorithm::MiniMaxNnChain
        | Algorithm::Medoid(_) => {
            // Input distances, working values and per-cell prototypes.
            let prototype_cells = cells.saturating_mul(USIZE_BYTES);
            triangle
                .saturating_mul(2)
                .saturating_add(prototype_cells)
                .saturating_add(n.saturating_mul(PROTOTYPE_OBJECT_BYTES))
                .saturating_add(n.saturating_mul(CACHE_BYTES))
        }
        Algorithm::Slink | Algorithm::Clink => n.saturating_mul(USIZE_BYTES + F64_BYTES),
        Algorithm::HdbscanSlink => n.saturating_mul(USIZE_BYTES + 2 * F64_BYTES),
        Algorithm::HdbscanPrim => {
            n.saturating_mul(F64_BYTES + 2 * USIZE_BYTES + F64_BYTES + SPANNING_EDGE_BYTES)
        }
    };

    let subtotal = specific.saturating_add(builder).saturating_add(rows);

    // Apply safety multiplier (3/2 = 1.5×) using integer arithmetic.
    subtotal
        .saturating_mul(SAFETY_MULTIPLIER_NUMERATOR)
        .saturating_div(SAFETY_MULTIPLIER_DENOMINATOR)
}

/// Number of unordered pairs among `n` objects, saturating at `u64::MAX`.
fn pair_count(n: u64) -> u64 {
    if n % 2 == 0 {
        (n / 2).saturating_mul(n.saturating_sub(1))
    } else {
        n.saturating_mul((n - 1) / 2)
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Formats a byte count as a human-readable string using binary units.
///
/// Returns values like `"0 B"`, `"1.0 KiB"`, `"2.4 GiB"`. The result uses
/// one decimal place for values ≥ 1 KiB.
///
/// # Examples
///
/// ```
/// use agglo_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.1} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

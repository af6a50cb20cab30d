use thiserror::Error;

/// Failure modes of the panel computations. All are fatal to the current
/// request and leave the shared panel untouched; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A geography class has no date range overlapping the others, so no
    /// balanced panel exists.
    #[error("no shared date range across geography types: {0}")]
    DataGap(String),

    /// Rebasing or CAGR could not find exactly one observation at an
    /// area's start or end period.
    #[error("no unique baseline for {area} at {period} ({found} matching rows)")]
    MissingBaseline {
        area: String,
        period: String,
        found: usize,
    },

    /// A growth rate was requested over a zero-length time span.
    #[error("cannot compute a growth rate over a zero-length period")]
    DegenerateRange,

    /// A selected geography is not in the state lookup or not in the panel.
    #[error("unknown geography: {0}")]
    UnknownGeography(String),
}

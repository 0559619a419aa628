use thiserror::Error;

// ---------------------------------------------------------------------------
// Library error type
// ---------------------------------------------------------------------------

/// Errors produced by the TDR pipeline.
///
/// All variants are returned synchronously to the immediate caller; the
/// pipeline never retries (the computation is deterministic) and never
/// returns partial results.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or empty frequency/real/imaginary input.
    #[error("invalid spectrum: {reason}")]
    InvalidSpectrum { reason: String },

    /// A zero-length time-domain signal was passed to peak location.
    /// Indicates an upstream transform defect.
    #[error("cannot locate a peak in an empty time-domain signal")]
    EmptySignal,

    /// Non-physical configuration, rejected before any computation runs.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// First per-DUT failure encountered during a batch aggregation.
    /// The batch is abandoned as a whole.
    #[error("aggregation failed at DUT source {index}: {source}")]
    Aggregation {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_spectrum(reason: impl Into<String>) -> Self {
        Error::InvalidSpectrum {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

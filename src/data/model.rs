use std::fmt;

use chrono::NaiveDateTime;
use num_complex::Complex64;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Spectrum – one frequency-domain sweep
// ---------------------------------------------------------------------------

/// A single frequency-domain sweep: per-sample `(frequency, real, imaginary)`
/// triples with strictly increasing frequencies.
///
/// Spectra are ephemeral: built once per measurement, handed to the
/// transform, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Frequency axis in Hz, strictly increasing.
    pub frequencies: Vec<f64>,
    /// Real part of the S-parameter at each frequency.
    pub real: Vec<f64>,
    /// Imaginary part of the S-parameter at each frequency.
    pub imag: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum, validating the invariants the pipeline relies on:
    /// equal-length axes, at least one sample, strictly increasing
    /// non-negative frequencies.
    pub fn new(frequencies: Vec<f64>, real: Vec<f64>, imag: Vec<f64>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::invalid_spectrum("spectrum contains no samples"));
        }
        if frequencies.len() != real.len() || frequencies.len() != imag.len() {
            return Err(Error::invalid_spectrum(format!(
                "mismatched lengths: {} frequencies, {} real, {} imaginary",
                frequencies.len(),
                real.len(),
                imag.len()
            )));
        }
        if frequencies[0] < 0.0 {
            return Err(Error::invalid_spectrum(format!(
                "negative frequency {}",
                frequencies[0]
            )));
        }
        for pair in frequencies.windows(2) {
            if pair[1] <= pair[0] {
                return Err(Error::invalid_spectrum(format!(
                    "frequencies not strictly increasing ({} followed by {})",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Spectrum {
            frequencies,
            real,
            imag,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the sweep has no samples.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Derived complex response, `real + i·imag` per sample.
    pub fn response(&self) -> Vec<Complex64> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TimeDomainSignal – impulse response on a uniform time grid
// ---------------------------------------------------------------------------

/// A complex impulse response sampled on a uniform time grid starting at 0.
///
/// The grid shape (`num_points` over `[0, time_window]`) is configuration,
/// never derived from the spectrum that produced the signal.
#[derive(Debug, Clone)]
pub struct TimeDomainSignal {
    /// Time axis in seconds, uniform, starting at 0.
    pub times: Vec<f64>,
    /// Complex amplitude at each time sample.
    pub amplitudes: Vec<Complex64>,
}

impl TimeDomainSignal {
    /// Number of time samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Peak – the dominant reflection in a time-domain signal
// ---------------------------------------------------------------------------

/// The sample of maximum `|amplitude|` in a [`TimeDomainSignal`].
/// Ties resolve to the lowest index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    /// Time of the peak sample in seconds.
    pub time: f64,
    pub magnitude: f64,
}

// ---------------------------------------------------------------------------
// MeasurementRecord – one entry of an εᵣ-over-time series
// ---------------------------------------------------------------------------

/// One batch-series entry: the DUT file's timestamp paired with its εᵣ.
///
/// Timestamps carry minute resolution only (seconds are truncated when the
/// timestamp is derived from file metadata), so chronological ordering and
/// lexicographic ordering of the `YYYY-MM-DD HH:MM` rendering coincide.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub timestamp: NaiveDateTime,
    pub epsilon_r: f64,
}

impl fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  εᵣ = {:.3}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.epsilon_r
        )
    }
}

// ---------------------------------------------------------------------------
// PermittivityConfig – pipeline configuration
// ---------------------------------------------------------------------------

/// Configuration bundle for permittivity estimation, validated once at the
/// boundary before any computation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermittivityConfig {
    /// Physical path length between the ports in millimetres. Must be > 0.
    pub distance_mm: f64,
    /// εᵣ of the reference medium (1.0 for air). Must be > 0.
    pub reference_permittivity: f64,
    /// Span of the output time grid in nanoseconds.
    pub time_window_ns: f64,
    /// Number of samples on the output time grid.
    pub num_points: usize,
}

impl PermittivityConfig {
    /// Configuration with the measurement tool's historical defaults:
    /// air reference, 50 ns window, 100 001 grid points.
    pub fn new(distance_mm: f64) -> Self {
        PermittivityConfig {
            distance_mm,
            reference_permittivity: 1.0,
            time_window_ns: 50.0,
            num_points: 100_001,
        }
    }

    /// Reject non-physical configurations. `distance_mm` divides the peak
    /// delay and `reference_permittivity` sits under a square root, so both
    /// must be strictly positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.distance_mm > 0.0) {
            return Err(Error::invalid_config(format!(
                "distance_mm must be > 0, got {}",
                self.distance_mm
            )));
        }
        if !(self.reference_permittivity > 0.0) {
            return Err(Error::invalid_config(format!(
                "reference_permittivity must be > 0, got {}",
                self.reference_permittivity
            )));
        }
        if !(self.time_window_ns > 0.0) {
            return Err(Error::invalid_config(format!(
                "time_window_ns must be > 0, got {}",
                self.time_window_ns
            )));
        }
        if self.num_points == 0 {
            return Err(Error::invalid_config("num_points must be at least 1"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ColumnMapping – which sweep-file columns hold the S-parameter
// ---------------------------------------------------------------------------

/// Explicit column selection for sweep files.
///
/// Column 0 is always the frequency; the real/imaginary columns depend on
/// which S-parameter the file carries and have varied between tool revisions
/// (1/2 for S11 in `.s1p`-style rows, 3/4 for S21 in `.s2p`-style rows), so
/// the mapping is configuration rather than a hard-coded index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub real_col: usize,
    pub imag_col: usize,
}

impl ColumnMapping {
    /// S11 from a one-port row: `freq  re  im`.
    pub const S11: ColumnMapping = ColumnMapping {
        real_col: 1,
        imag_col: 2,
    };

    /// S21 from a two-port row: `freq  s11re  s11im  s21re  s21im  …`.
    pub const S21: ColumnMapping = ColumnMapping {
        real_col: 3,
        imag_col: 4,
    };
}

impl Default for ColumnMapping {
    /// The transmission measurement the tool historically reads.
    fn default() -> Self {
        ColumnMapping::S21
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_rejects_mismatched_lengths() {
        let err = Spectrum::new(vec![1.0, 2.0], vec![0.0], vec![0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidSpectrum { .. }));
    }

    #[test]
    fn spectrum_rejects_empty_input() {
        let err = Spectrum::new(vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidSpectrum { .. }));
    }

    #[test]
    fn spectrum_rejects_non_increasing_frequencies() {
        let err = Spectrum::new(
            vec![1.0e9, 1.0e9, 2.0e9],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSpectrum { .. }));
    }

    #[test]
    fn response_pairs_real_and_imaginary() {
        let sp = Spectrum::new(vec![1.0e9, 2.0e9], vec![1.0, 0.5], vec![0.0, -0.5]).unwrap();
        let resp = sp.response();
        assert_eq!(resp[0], Complex64::new(1.0, 0.0));
        assert_eq!(resp[1], Complex64::new(0.5, -0.5));
    }

    #[test]
    fn config_rejects_zero_distance() {
        let cfg = PermittivityConfig::new(0.0);
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn config_rejects_non_positive_reference_permittivity() {
        let mut cfg = PermittivityConfig::new(10.0);
        cfg.reference_permittivity = 0.0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { .. })));
        cfg.reference_permittivity = -2.0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn config_defaults_match_tool_history() {
        let cfg = PermittivityConfig::new(10.0);
        assert_eq!(cfg.reference_permittivity, 1.0);
        assert_eq!(cfg.time_window_ns, 50.0);
        assert_eq!(cfg.num_points, 100_001);
        assert!(cfg.validate().is_ok());
    }
}

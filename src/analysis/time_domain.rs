use num_complex::Complex64;

use crate::analysis::czt::freq2time;
use crate::data::model::{Spectrum, TimeDomainSignal};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Frequency → time transform
// ---------------------------------------------------------------------------

/// Convert a frequency-domain sweep into a time-domain impulse response on a
/// uniform grid of `num_points` samples spanning `[0, time_window_ns]`.
///
/// The grid is pure configuration: nothing about it is derived from the
/// spectrum's bandwidth or sample count, and the sweep's frequency spacing
/// need not be uniform. Deterministic and free of I/O; concurrent calls on
/// independent inputs are safe.
pub fn transform(
    spectrum: &Spectrum,
    time_window_ns: f64,
    num_points: usize,
) -> Result<TimeDomainSignal> {
    if spectrum.is_empty() {
        return Err(Error::invalid_spectrum("spectrum contains no samples"));
    }
    if spectrum.frequencies.len() != spectrum.real.len()
        || spectrum.frequencies.len() != spectrum.imag.len()
    {
        return Err(Error::invalid_spectrum(format!(
            "mismatched lengths: {} frequencies, {} real, {} imaginary",
            spectrum.frequencies.len(),
            spectrum.real.len(),
            spectrum.imag.len()
        )));
    }
    if num_points == 0 {
        return Err(Error::invalid_config("num_points must be at least 1"));
    }
    if !(time_window_ns > 0.0) {
        return Err(Error::invalid_config(format!(
            "time_window_ns must be > 0, got {time_window_ns}"
        )));
    }

    let times = linspace(0.0, time_window_ns * 1e-9, num_points);
    let response: Vec<Complex64> = spectrum.response();
    let amplitudes = freq2time(&spectrum.frequencies, &response, &times);

    Ok(TimeDomainSignal { times, amplitudes })
}

/// `n` evenly spaced values over `[start, stop]`, endpoints included.
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + i as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_sweep() -> Spectrum {
        let freqs: Vec<f64> = (0..101).map(|i| 1.0e9 + i as f64 * 1.0e7).collect();
        let n = freqs.len();
        Spectrum::new(freqs, vec![1.0; n], vec![0.0; n]).unwrap()
    }

    #[test]
    fn grid_shape_follows_configuration_only() {
        let signal = transform(&flat_sweep(), 10.0, 501).unwrap();
        assert_eq!(signal.len(), 501);
        assert_eq!(signal.times[0], 0.0);
        assert_relative_eq!(signal.times[500], 10.0e-9, max_relative = 1e-12);
        let dt = signal.times[1] - signal.times[0];
        assert_relative_eq!(signal.times[250], 250.0 * dt, max_relative = 1e-12);
    }

    #[test]
    fn transform_is_deterministic() {
        let sp = flat_sweep();
        let a = transform(&sp, 10.0, 1001).unwrap();
        let b = transform(&sp, 10.0, 1001).unwrap();
        assert_eq!(a.times, b.times);
        for (x, y) in a.amplitudes.iter().zip(&b.amplitudes) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn mismatched_axes_are_rejected() {
        // Bypass Spectrum::new to exercise the transform's own validation.
        let sp = Spectrum {
            frequencies: vec![1.0e9, 2.0e9],
            real: vec![1.0],
            imag: vec![0.0, 0.0],
        };
        assert!(matches!(
            transform(&sp, 10.0, 100),
            Err(Error::InvalidSpectrum { .. })
        ));
    }

    #[test]
    fn empty_spectrum_is_rejected() {
        let sp = Spectrum {
            frequencies: vec![],
            real: vec![],
            imag: vec![],
        };
        assert!(matches!(
            transform(&sp, 10.0, 100),
            Err(Error::InvalidSpectrum { .. })
        ));
    }

    #[test]
    fn non_uniform_sweeps_are_accepted() {
        // Log-spaced frequencies, the case a plain inverse FFT cannot take.
        let freqs: Vec<f64> = (0..50)
            .map(|i| 1.0e8 * 10f64.powf(i as f64 / 49.0 * 2.0))
            .collect();
        let n = freqs.len();
        let sp = Spectrum::new(freqs, vec![1.0; n], vec![0.0; n]).unwrap();
        let signal = transform(&sp, 20.0, 201).unwrap();
        assert_eq!(signal.len(), 201);
        assert!(signal.amplitudes.iter().all(|a| a.norm().is_finite()));
    }
}

//! Chirp z-transform and the frequency→time conversion built on it.
//!
//! The CZT evaluates the z-transform of a sequence along an arbitrary
//! geometric contour, which is what lets a VNA sweep of any length and
//! spacing land on exactly the time grid the caller asked for — something a
//! plain inverse FFT cannot do.

use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Chirp z-transform of `x`: `X[k] = Σ_n x[n]·a^(−n)·w^(n·k)` for
/// `k = 0..m`.
///
/// Uses Bluestein's algorithm: `n·k = (n² + k² − (k−n)²) / 2` turns the sum
/// into a circular convolution of chirp-premultiplied inputs, evaluated with
/// three FFTs of length `≥ n+m−1`. O((n+m)·log(n+m)) regardless of input
/// length or output point count.
pub fn czt(x: &[Complex64], m: usize, w: Complex64, a: Complex64) -> Vec<Complex64> {
    let n = x.len();
    if n == 0 || m == 0 {
        return vec![Complex64::new(0.0, 0.0); m];
    }

    let len = (n + m - 1).next_power_of_two();
    let zero = Complex64::new(0.0, 0.0);

    // w^(j²/2) for every index either chirp needs.
    let chirp: Vec<Complex64> = (0..n.max(m))
        .map(|j| {
            let jj = j as f64;
            w.powf(jj * jj / 2.0)
        })
        .collect();

    // Premultiplied input: x[n]·a^(−n)·w^(n²/2), zero-padded to the FFT size.
    let mut u = vec![zero; len];
    for (j, &xj) in x.iter().enumerate() {
        u[j] = xj * a.powf(-(j as f64)) * chirp[j];
    }

    // Chirp filter w^(−j²/2), laid out circularly so negative lags
    // (down to −(n−1)) wrap to the tail of the buffer.
    let mut v = vec![zero; len];
    for (k, item) in v.iter_mut().enumerate().take(m) {
        let kk = k as f64;
        *item = w.powf(-kk * kk / 2.0);
    }
    for j in 1..n {
        let jj = j as f64;
        v[len - j] = w.powf(-jj * jj / 2.0);
    }

    // Circular convolution via FFT.
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);
    let ifft = planner.plan_fft_inverse(len);

    fft.process(&mut u);
    fft.process(&mut v);
    for (uj, vj) in u.iter_mut().zip(&v) {
        *uj *= vj;
    }
    ifft.process(&mut u);

    // rustfft leaves the inverse unnormalized.
    let scale = 1.0 / len as f64;
    (0..m).map(|k| u[k] * scale * chirp[k]).collect()
}

/// Evaluate a frequency-domain response on an arbitrary uniform time grid:
///
/// `h(t_k) = (1/N) · Σ_n H[n] · exp(+2πi·f_n·t_k)`
///
/// The input grid is characterised by its first frequency and average
/// spacing `Δf = (f_last − f_first)/(N−1)`; the inner sum over the spacing
/// then factors into a CZT with `a = exp(−2πi·t_0·Δf)` and
/// `w = exp(+2πi·Δf·Δt)`, post-multiplied by the `f_0` carrier phase.
pub fn freq2time(freqs: &[f64], response: &[Complex64], times: &[f64]) -> Vec<Complex64> {
    let n = freqs.len();
    let m = times.len();
    debug_assert_eq!(n, response.len());
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let df = if n > 1 {
        (freqs[n - 1] - freqs[0]) / (n - 1) as f64
    } else {
        0.0
    };
    let dt = if m > 1 {
        (times[m - 1] - times[0]) / (m - 1) as f64
    } else {
        0.0
    };
    let t0 = times[0];
    let f0 = freqs[0];

    let w = Complex64::from_polar(1.0, 2.0 * PI * df * dt);
    let a = Complex64::from_polar(1.0, -2.0 * PI * df * t0);

    let spectral_sum = czt(response, m, w, a);

    let scale = 1.0 / n as f64;
    spectral_sum
        .iter()
        .zip(times)
        .map(|(&h, &t)| h * Complex64::from_polar(scale, 2.0 * PI * f0 * t))
        .collect()
}

use crate::analysis::peak::locate_peak;
use crate::analysis::time_domain::transform;
use crate::data::model::{PermittivityConfig, Spectrum};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Permittivity estimation
// ---------------------------------------------------------------------------

/// Propagation speed used throughout, in m/s. The measurement history was
/// produced with the rounded value, so it stays `3e8` rather than the CODATA
/// constant.
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// εᵣ from a signed peak-delay difference and the configured path length:
///
/// `εᵣ = ε_ref · (1 + Δt·c / (d·√ε_ref))²`
///
/// with `d` in metres. The result is returned raw: noisy or mis-timed peaks
/// can yield values below 1, and callers see them as computed.
pub fn epsilon_from_delay(delta_t: f64, config: &PermittivityConfig) -> f64 {
    let distance_m = config.distance_mm * 1e-3;
    let eps_ref = config.reference_permittivity;
    eps_ref * (1.0 + delta_t * SPEED_OF_LIGHT / (distance_m * eps_ref.sqrt())).powi(2)
}

/// Estimate the DUT's relative permittivity against a reference sweep.
///
/// Both sweeps go through the same transform (identical window and grid),
/// each yields its dominant peak, and the signed timing difference
/// `Δt = t_dut − t_ref` feeds [`epsilon_from_delay`]. Pure function of its
/// three inputs; the configuration is validated before any computation.
pub fn estimate(dut: &Spectrum, reference: &Spectrum, config: &PermittivityConfig) -> Result<f64> {
    config.validate()?;

    let dut_signal = transform(dut, config.time_window_ns, config.num_points)?;
    let ref_signal = transform(reference, config.time_window_ns, config.num_points)?;

    let dut_peak = locate_peak(&dut_signal)?;
    let ref_peak = locate_peak(&ref_signal)?;

    let delta_t = dut_peak.time - ref_peak.time;
    Ok(epsilon_from_delay(delta_t, config))
}

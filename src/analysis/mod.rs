/// Analysis layer: the TDR pipeline.
///
/// ```text
///   Spectrum ──transform──▶ TimeDomainSignal ──locate_peak──▶ Peak
///                                                              │
///                               reference peak ──── Δt ────────┤
///                                                              ▼
///                                  estimate / aggregate ──▶ εᵣ, series
/// ```
pub mod czt;
pub mod peak;
pub mod permittivity;
pub mod series;
pub mod time_domain;

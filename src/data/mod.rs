/// Data layer: core types and sweep-file loading.
///
/// Architecture:
/// ```text
///  .s1p / .s2p style text
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Spectrum, file timestamp
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  Spectrum, TimeDomainSignal, Peak, records, config
///   └──────────┘
///        │
///        ▼
///     analysis (CZT → peak → εᵣ)
/// ```
pub mod loader;
pub mod model;

//! Time-domain reflectometry permittivity estimation from VNA sweep data.
//!
//! A frequency-domain S-parameter sweep is converted into a time-domain
//! impulse response with a chirp z-transform, the dominant reflection peak
//! is located, and the peak-timing difference between a reference sweep and
//! a device-under-test sweep yields the material's relative permittivity.
//! Batches of DUT files against one reference become a timestamp-ordered
//! εᵣ series.
//!
//! The pipeline is pure computation over in-memory arrays; file reading
//! lives in [`data::loader`], and presentation (the `vna-tdr` binary) only
//! consumes results.

pub mod analysis;
pub mod data;
pub mod error;

pub use analysis::czt::{czt, freq2time};
pub use analysis::peak::locate_peak;
pub use analysis::permittivity::{epsilon_from_delay, estimate, SPEED_OF_LIGHT};
pub use analysis::series::aggregate;
pub use analysis::time_domain::transform;
pub use data::model::{
    ColumnMapping, MeasurementRecord, Peak, PermittivityConfig, Spectrum, TimeDomainSignal,
};
pub use error::{Error, Result};

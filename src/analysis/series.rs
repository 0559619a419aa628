use chrono::NaiveDateTime;
use log::debug;

use crate::analysis::peak::locate_peak;
use crate::analysis::permittivity::epsilon_from_delay;
use crate::analysis::time_domain::transform;
use crate::data::model::{MeasurementRecord, PermittivityConfig, Spectrum};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// εᵣ-over-time aggregation
// ---------------------------------------------------------------------------

/// Compute εᵣ for a batch of DUT sweeps against one shared reference,
/// producing a chronologically ordered series.
///
/// The reference is transformed exactly once; every record in the batch
/// therefore shares an identical reference peak. DUT sources are processed
/// in the order given, and the finished series is sorted ascending by
/// timestamp (the stable sort keeps input order for equal minutes), so
/// presentation gets a monotone time axis even when files arrive shuffled.
///
/// The batch is atomic: the first DUT that fails to transform aborts the
/// whole aggregation, wrapped in [`Error::Aggregation`] with the failing
/// source's position. No partial series is ever returned.
pub fn aggregate(
    reference: &Spectrum,
    dut_sources: &[(Spectrum, NaiveDateTime)],
    config: &PermittivityConfig,
) -> Result<Vec<MeasurementRecord>> {
    config.validate()?;

    let ref_signal = transform(reference, config.time_window_ns, config.num_points)?;
    let ref_peak = locate_peak(&ref_signal)?;
    debug!(
        "reference peak at {:.3} ns (magnitude {:.4})",
        ref_peak.time * 1e9,
        ref_peak.magnitude
    );

    let mut records = Vec::with_capacity(dut_sources.len());
    for (index, (dut, timestamp)) in dut_sources.iter().enumerate() {
        let record = (|| -> Result<MeasurementRecord> {
            let signal = transform(dut, config.time_window_ns, config.num_points)?;
            let peak = locate_peak(&signal)?;
            let delta_t = peak.time - ref_peak.time;
            Ok(MeasurementRecord {
                timestamp: *timestamp,
                epsilon_r: epsilon_from_delay(delta_t, config),
            })
        })()
        .map_err(|source| Error::Aggregation {
            index,
            source: Box::new(source),
        })?;
        debug!("DUT {index}: {record}");
        records.push(record);
    }

    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_config() -> PermittivityConfig {
        PermittivityConfig {
            distance_mm: 10.0,
            reference_permittivity: 1.0,
            time_window_ns: 10.0,
            num_points: 2_001,
        }
    }

    fn flat_sweep() -> Spectrum {
        let freqs: Vec<f64> = (0..101).map(|i| 1.0e9 + i as f64 * 1.0e7).collect();
        let n = freqs.len();
        Spectrum::new(freqs, vec![1.0; n], vec![0.0; n]).unwrap()
    }

    fn stamp(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn series_is_sorted_by_timestamp_not_input_order() {
        let reference = flat_sweep();
        let sources = vec![
            (flat_sweep(), stamp("2024-03-02 10:00")),
            (flat_sweep(), stamp("2024-01-01 09:00")),
        ];

        let series = aggregate(&reference, &sources, &test_config()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp, stamp("2024-01-01 09:00"));
        assert_eq!(series[1].timestamp, stamp("2024-03-02 10:00"));
    }

    #[test]
    fn identical_sweeps_give_unit_permittivity_throughout() {
        let reference = flat_sweep();
        let sources = vec![
            (flat_sweep(), stamp("2024-01-01 09:00")),
            (flat_sweep(), stamp("2024-01-01 09:05")),
            (flat_sweep(), stamp("2024-01-01 09:10")),
        ];

        let series = aggregate(&reference, &sources, &test_config()).unwrap();
        assert!(series.iter().all(|r| r.epsilon_r == 1.0));
    }

    #[test]
    fn first_failing_source_aborts_the_batch() {
        let reference = flat_sweep();
        let broken = Spectrum {
            frequencies: vec![],
            real: vec![],
            imag: vec![],
        };
        let sources = vec![
            (flat_sweep(), stamp("2024-01-01 09:00")),
            (broken, stamp("2024-01-01 09:05")),
            (flat_sweep(), stamp("2024-01-01 09:10")),
        ];

        let err = aggregate(&reference, &sources, &test_config()).unwrap_err();
        match err {
            Error::Aggregation { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, Error::InvalidSpectrum { .. }));
            }
            other => panic!("expected Aggregation error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_config_fails_before_any_transform() {
        let mut config = test_config();
        config.distance_mm = 0.0;
        let err = aggregate(&flat_sweep(), &[], &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn empty_batch_yields_an_empty_series() {
        let series = aggregate(&flat_sweep(), &[], &test_config()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn display_renders_the_minute_format() {
        let record = MeasurementRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            epsilon_r: 2.345_678,
        };
        assert_eq!(record.to_string(), "2024-03-02 10:00  εᵣ = 2.346");
    }
}

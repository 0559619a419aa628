use crate::data::model::{Peak, TimeDomainSignal};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Peak location
// ---------------------------------------------------------------------------

/// Find the dominant reflection: the first sample attaining the maximum
/// `|amplitude|` in the signal.
///
/// The global maximum is the right pick for single-interface measurements;
/// with several comparably strong reflections it can land on the wrong
/// boundary, which remains a known limitation of this heuristic.
pub fn locate_peak(signal: &TimeDomainSignal) -> Result<Peak> {
    if signal.is_empty() {
        return Err(Error::EmptySignal);
    }

    let mut best = Peak {
        index: 0,
        time: signal.times[0],
        magnitude: signal.amplitudes[0].norm(),
    };
    for (index, (&time, amplitude)) in signal.times.iter().zip(&signal.amplitudes).enumerate() {
        let magnitude = amplitude.norm();
        // Strict comparison keeps the first occurrence on ties.
        if magnitude > best.magnitude {
            best = Peak {
                index,
                time,
                magnitude,
            };
        }
    }
    Ok(best)
}

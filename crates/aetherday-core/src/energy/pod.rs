//! Regen Pod settlement.
//!
//! A pod session regenerates energy at a flat per-minute rate for its whole
//! duration, independent of breaks or the workday window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::constants::{EnergyRates, MAX_ENERGY};
use crate::error::ValidationError;

/// Energy credited for one finished pod session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSettlement {
    pub energy: i32,
    pub gained: i32,
    pub duration_minutes: f64,
}

/// Settle a pod session that ran from `start` to `end` against `energy`.
///
/// # Errors
/// Returns [`ValidationError::InvalidTimeRange`] when `end <= start`.
pub fn settle_pod(
    energy: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    rates: &EnergyRates,
) -> Result<PodSettlement, ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }

    let duration_minutes = (end - start).num_milliseconds() as f64 / 60_000.0;
    let raw_gain = duration_minutes * rates.pod_rate_per_minute.max(0.0);
    // A pod never lowers energy, even when it is already above the cap.
    let new_energy = if energy >= MAX_ENERGY {
        energy
    } else {
        (f64::from(energy) + raw_gain)
            .min(f64::from(MAX_ENERGY))
            .round() as i32
    };

    Ok(PodSettlement {
        energy: new_energy,
        gained: new_energy - energy,
        duration_minutes,
    })
}

//! Energy rate constants.

use serde::{Deserialize, Serialize};

/// Hard ceiling for stored energy.
pub const MAX_ENERGY: i32 = 100;

pub const PASSIVE_ENERGY_REGEN_PER_MINUTE: f64 = 0.1;
pub const BREAK_ENERGY_BOOST_PER_MINUTE: f64 = 0.4;
pub const NIGHT_ENERGY_BOOST_PER_MINUTE: f64 = 0.15;
pub const REGEN_POD_RATE_PER_MINUTE: f64 = 1.0;

/// Fallback workday used when a profile has no window configured.
/// Everything outside it (22:00-06:00 UTC) counts as night.
pub const FALLBACK_WORKDAY_START: &str = "06:00";
pub const FALLBACK_WORKDAY_END: &str = "22:00";

/// Per-minute rates, overridable from the `[energy]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRates {
    #[serde(default = "default_passive")]
    pub passive_per_minute: f64,
    #[serde(default = "default_break_boost")]
    pub break_boost_per_minute: f64,
    #[serde(default = "default_night_boost")]
    pub night_boost_per_minute: f64,
    #[serde(default = "default_pod_rate")]
    pub pod_rate_per_minute: f64,
}

fn default_passive() -> f64 {
    PASSIVE_ENERGY_REGEN_PER_MINUTE
}
fn default_break_boost() -> f64 {
    BREAK_ENERGY_BOOST_PER_MINUTE
}
fn default_night_boost() -> f64 {
    NIGHT_ENERGY_BOOST_PER_MINUTE
}
fn default_pod_rate() -> f64 {
    REGEN_POD_RATE_PER_MINUTE
}

impl Default for EnergyRates {
    fn default() -> Self {
        Self {
            passive_per_minute: PASSIVE_ENERGY_REGEN_PER_MINUTE,
            break_boost_per_minute: BREAK_ENERGY_BOOST_PER_MINUTE,
            night_boost_per_minute: NIGHT_ENERGY_BOOST_PER_MINUTE,
            pod_rate_per_minute: REGEN_POD_RATE_PER_MINUTE,
        }
    }
}

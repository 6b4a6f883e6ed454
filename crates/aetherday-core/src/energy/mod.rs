//! Energy accounting.
//!
//! Energy is spent by completing tasks and regained over time. This module
//! holds the pure arithmetic; persistence lives in [`crate::service`].

pub mod constants;
mod pod;
mod regen;
mod window;

pub use constants::{EnergyRates, MAX_ENERGY};
pub use pod::{settle_pod, PodSettlement};
pub use regen::{regenerate, RegenOutcome};
pub use window::{parse_clock, WorkdayWindow};

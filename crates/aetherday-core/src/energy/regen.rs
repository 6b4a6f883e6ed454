//! Time-based energy regeneration.
//!
//! Energy accrues per minute since the profile's last checkpoint. The base
//! passive rate is raised while a task named "break" is running and while
//! the clock is outside the profile's workday window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::constants::{EnergyRates, MAX_ENERGY};
use crate::profile::Profile;
use crate::schedule::ScheduledTask;

/// Result of one regeneration pass over a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RegenOutcome {
    /// Nothing to write; the checkpoint stays where it is.
    Unchanged,
    /// Store `energy` and move the checkpoint to `regenerated_at`.
    Updated {
        energy: i32,
        gained: f64,
        regenerated_at: DateTime<Utc>,
    },
}

impl RegenOutcome {
    pub fn energy(&self) -> Option<i32> {
        match self {
            RegenOutcome::Unchanged => None,
            RegenOutcome::Updated { energy, .. } => Some(*energy),
        }
    }
}

/// Compute the energy a profile has regained between its checkpoint and `now`.
///
/// `tasks` are the user's scheduled tasks; only those named "break" matter.
/// The returned energy never exceeds [`MAX_ENERGY`] and never drops below
/// the stored value.
pub fn regenerate(
    profile: &Profile,
    tasks: &[ScheduledTask],
    now: DateTime<Utc>,
    rates: &EnergyRates,
) -> RegenOutcome {
    let elapsed_ms = (now - profile.last_energy_regen_at).num_milliseconds();
    if elapsed_ms <= 0 || profile.energy >= MAX_ENERGY {
        return RegenOutcome::Unchanged;
    }

    let total_minutes = elapsed_ms as f64 / 60_000.0;
    let headroom = (i64::from(MAX_ENERGY) - i64::from(profile.energy)) as f64;
    let window = profile.workday_window();
    let breaks: Vec<&ScheduledTask> = tasks.iter().filter(|t| t.is_break()).collect();

    let mut gained = 0.0;
    let mut offset = 0.0;
    let mut cursor = profile.last_energy_regen_at;
    while offset < total_minutes {
        let chunk = (total_minutes - offset).min(1.0);

        let mut rate = rates.passive_per_minute;
        if breaks.iter().any(|b| b.contains(cursor)) {
            rate += rates.break_boost_per_minute;
        }
        if window.is_night(cursor) {
            rate += rates.night_boost_per_minute;
        }
        gained += chunk * rate.max(0.0);

        if gained >= headroom {
            gained = headroom;
            break;
        }
        offset += 1.0;
        cursor += Duration::minutes(1);
    }

    let energy = (f64::from(profile.energy) + gained)
        .min(f64::from(MAX_ENERGY))
        .round() as i32;
    if energy == profile.energy {
        return RegenOutcome::Unchanged;
    }

    RegenOutcome::Updated {
        energy,
        gained,
        regenerated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::NewScheduledTask;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn profile(energy: i32, checkpoint: DateTime<Utc>) -> Profile {
        let mut p = Profile::new("u-1", checkpoint);
        p.energy = energy;
        p
    }

    fn task(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduledTask {
        NewScheduledTask {
            name: name.into(),
            start_time: start,
            end_time: end,
            energy_cost: 0,
            is_critical: false,
            is_flexible: true,
            is_locked: false,
        }
        .into_task("u-1", start)
        .unwrap()
    }

    #[test]
    fn no_elapsed_time_is_a_no_op() {
        let p = profile(50, at(10, 0));
        let rates = EnergyRates::default();
        assert_eq!(regenerate(&p, &[], at(10, 0), &rates), RegenOutcome::Unchanged);
        assert_eq!(regenerate(&p, &[], at(9, 0), &rates), RegenOutcome::Unchanged);
    }

    #[test]
    fn full_energy_is_a_no_op() {
        let p = profile(MAX_ENERGY, at(10, 0));
        let outcome = regenerate(&p, &[], at(12, 0), &EnergyRates::default());
        assert_eq!(outcome, RegenOutcome::Unchanged);
    }

    #[test]
    fn one_daytime_hour_adds_passive_rate() {
        let p = profile(90, at(10, 0));
        let outcome = regenerate(&p, &[], at(11, 0), &EnergyRates::default());
        // 90 + 60 * 0.1
        assert_eq!(outcome.energy(), Some(96));
    }

    #[test]
    fn break_covering_window_adds_boost_then_clamps() {
        let p = profile(40, at(10, 0));
        let tasks = vec![task("Break", at(10, 0), at(11, 0))];
        let outcome = regenerate(&p, &tasks, at(11, 0), &EnergyRates::default());
        // 40 + 60 * (0.1 + 0.4) = 70
        assert_eq!(outcome.energy(), Some(70));

        let p = profile(90, at(10, 0));
        let outcome = regenerate(&p, &tasks, at(11, 0), &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(MAX_ENERGY));
    }

    #[test]
    fn non_break_tasks_do_not_boost() {
        let p = profile(40, at(10, 0));
        let tasks = vec![task("Deep work", at(10, 0), at(11, 0))];
        let outcome = regenerate(&p, &tasks, at(11, 0), &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(46));
    }

    #[test]
    fn night_minutes_use_fallback_window() {
        // 23:00-00:00 is outside 06:00-22:00
        let p = profile(0, at(23, 0));
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let outcome = regenerate(&p, &[], now, &EnergyRates::default());
        // 60 * (0.1 + 0.15) = 15
        assert_eq!(outcome.energy(), Some(15));
    }

    #[test]
    fn configured_window_decides_night() {
        let mut p = profile(0, at(10, 0));
        p.default_auto_schedule_start_time = Some("12:00".into());
        p.default_auto_schedule_end_time = Some("20:00".into());
        let outcome = regenerate(&p, &[], at(11, 0), &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(15));
    }

    #[test]
    fn fractional_gain_that_rounds_away_keeps_checkpoint() {
        let p = profile(50, at(10, 0));
        let outcome = regenerate(&p, &[], at(10, 3), &EnergyRates::default());
        assert_eq!(outcome, RegenOutcome::Unchanged);
    }

    #[test]
    fn deficit_recovers_toward_zero() {
        let p = profile(-20, at(10, 0));
        let outcome = regenerate(&p, &[], at(12, 0), &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(-8));
    }

    #[test]
    fn long_absence_stops_at_cap() {
        let p = profile(-50, at(10, 0));
        let now = at(10, 0) + Duration::days(30);
        let outcome = regenerate(&p, &[], now, &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(MAX_ENERGY));
    }

    #[test]
    fn headroom_from_minimum_energy_does_not_overflow() {
        let p = profile(i32::MIN, at(10, 0));
        let outcome = regenerate(&p, &[], at(11, 0), &EnergyRates::default());
        assert_eq!(outcome.energy(), Some(i32::MIN + 6));
    }

    proptest! {
        #[test]
        fn never_exceeds_cap_and_never_decreases(
            energy in -200i32..=100,
            minutes in -120i64..5_000,
            start_hour in 0u32..24,
        ) {
            let checkpoint = at(start_hour, 0);
            let p = profile(energy, checkpoint);
            let tasks = vec![task("break", checkpoint, checkpoint + Duration::minutes(45))];
            let now = checkpoint + Duration::minutes(minutes);
            match regenerate(&p, &tasks, now, &EnergyRates::default()) {
                RegenOutcome::Unchanged => {}
                RegenOutcome::Updated { energy: new_energy, regenerated_at, .. } => {
                    prop_assert!(new_energy <= MAX_ENERGY);
                    prop_assert!(new_energy > energy);
                    prop_assert_eq!(regenerated_at, now);
                }
            }
        }
    }
}

//! Per-user gamification state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::energy::{WorkdayWindow, MAX_ENERGY};
use crate::progression::{calculate_target, level_for_xp};

/// One row of the `profiles` table.
///
/// `energy` is capped at [`MAX_ENERGY`] by every crediting write but may go
/// negative when completed tasks cost more than is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub energy: i32,
    pub xp: i64,
    pub level: i32,
    pub last_energy_regen_at: DateTime<Utc>,
    pub tasks_completed_today: i32,
    pub last_daily_reward_claim: Option<DateTime<Utc>>,
    pub daily_challenge_target: i32,
    /// UTC date of the last daily challenge reset.
    pub daily_challenge_reset_on: Option<NaiveDate>,
    pub default_auto_schedule_start_time: Option<String>,
    pub default_auto_schedule_end_time: Option<String>,
    /// Bumped on every write; writers compare-and-swap on it.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile at full energy, level 1.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            energy: MAX_ENERGY,
            xp: 0,
            level: level_for_xp(0),
            last_energy_regen_at: now,
            tasks_completed_today: 0,
            last_daily_reward_claim: None,
            daily_challenge_target: calculate_target(1),
            daily_challenge_reset_on: None,
            default_auto_schedule_start_time: None,
            default_auto_schedule_end_time: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn workday_window(&self) -> WorkdayWindow {
        WorkdayWindow::from_profile(
            self.default_auto_schedule_start_time.as_deref(),
            self.default_auto_schedule_end_time.as_deref(),
        )
    }

    pub fn is_energy_full(&self) -> bool {
        self.energy >= MAX_ENERGY
    }

    /// Whether the daily reward was claimed on `now`'s UTC date.
    pub fn claimed_on(&self, now: DateTime<Utc>) -> bool {
        self.last_daily_reward_claim
            .is_some_and(|claimed| claimed.date_naive() == now.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn new_profile_starts_full_at_level_one() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let profile = Profile::new("u-1", now);
        assert_eq!(profile.energy, MAX_ENERGY);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.daily_challenge_target, 3);
        assert!(profile.is_energy_full());
    }

    #[test]
    fn claimed_on_compares_utc_dates() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let mut profile = Profile::new("u-1", now);
        assert!(!profile.claimed_on(now));

        profile.last_daily_reward_claim = Some(now - Duration::hours(10));
        assert!(profile.claimed_on(now));
        assert!(!profile.claimed_on(now + Duration::hours(1)));
    }
}

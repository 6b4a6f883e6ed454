//! Storage-backed operations.
//!
//! Each function here is one request's worth of work: read rows, run the
//! pure arithmetic from [`crate::energy`], [`crate::progression`] or
//! [`crate::schedule`], and write the result back. Profile writes are
//! compare-and-swap on `version` so two overlapping requests for the same
//! user cannot lose each other's update.

mod energy;
mod progress;
mod sink;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{CoreError, Result};
use crate::profile::Profile;
use crate::storage::database::update_profile_cas;
use crate::storage::Database;

pub use energy::{regen_user, run_regen_batch, settle_pod_exit, RegenReport, RegenUpdate};
pub use progress::{claim_daily_reward, complete_task, create_task, refresh_daily_challenge};
pub use sink::{
    auto_balance_day, restore_sink_snapshot, retire_task, schedule_from_sink, send_to_sink,
    BalanceReport,
};

/// Attempts before a contended profile write gives up.
pub const MAX_CAS_ATTEMPTS: usize = 3;

/// Read-modify-write a profile with optimistic locking.
///
/// `apply` may run more than once; it must derive everything from the
/// profile it is handed. Nothing is written when `apply` leaves the profile
/// unchanged.
pub(crate) fn update_profile<T>(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
    mut apply: impl FnMut(&mut Profile) -> Result<T>,
) -> Result<(Profile, T)> {
    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let current = db.ensure_profile(user_id, now)?;
        let mut next = current.clone();
        let value = apply(&mut next)?;
        if next == current {
            return Ok((current, value));
        }
        if update_profile_cas(db.conn(), &next)? {
            next.version += 1;
            return Ok((next, value));
        }
        warn!(user_id, attempt, "profile changed concurrently, retrying");
    }
    Err(CoreError::Conflict(format!(
        "profile {user_id} kept changing; gave up after {MAX_CAS_ATTEMPTS} attempts"
    )))
}

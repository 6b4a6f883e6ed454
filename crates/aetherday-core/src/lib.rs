//! Aetherday core library.
//!
//! Energy accounting and progression for a gamified day planner.
//! The CLI and HTTP server are thin layers over this library.
//!
//! - [`energy`]: time-based regeneration and Regen Pod settlement
//! - [`progression`]: XP, levels and the daily challenge
//! - [`schedule`]: day tasks, the Aether Sink and auto-balance
//! - [`service`]: the storage-backed operations the front ends call
//! - [`storage`]: SQLite persistence and TOML configuration
//! - [`auth`]: bearer token verification

pub mod auth;
pub mod energy;
pub mod error;
pub mod profile;
pub mod progression;
pub mod schedule;
pub mod service;
pub mod storage;

pub use auth::{bearer_token, Claims, TokenVerifier};
pub use energy::{
    regenerate, settle_pod, EnergyRates, PodSettlement, RegenOutcome, WorkdayWindow, MAX_ENERGY,
};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use profile::Profile;
pub use progression::{calculate_target, ChallengeRefresh, RewardClaim, TaskCompletion};
pub use schedule::{
    auto_balance, BalancePlan, NewScheduledTask, RetireReason, RetiredTask, ScheduledTask,
    SinkSnapshot, SinkTask,
};
pub use storage::{Config, Database};

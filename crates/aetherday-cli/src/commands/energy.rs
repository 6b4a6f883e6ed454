//! Energy regeneration and Regen Pod commands.

use aetherday_core::service;
use chrono::Utc;
use clap::Subcommand;

use crate::common::{open, parse_time, print_json, shift_minutes, CliResult};

#[derive(Subcommand)]
pub enum EnergyAction {
    /// Regenerate energy up to now
    Regen {
        /// Run the batch over every profile below the cap
        #[arg(long)]
        all: bool,
    },
    /// Settle a finished Regen Pod session
    Pod {
        /// Session start (RFC 3339 or HH:MM today)
        #[arg(long, conflicts_with = "minutes")]
        start: Option<String>,
        /// Session end (RFC 3339 or HH:MM today); defaults to now
        #[arg(long)]
        end: Option<String>,
        /// Session length in minutes, ending at --end
        #[arg(long)]
        minutes: Option<i64>,
    },
}

pub fn run(action: EnergyAction, user: &str) -> CliResult {
    let (config, db) = open()?;
    let now = Utc::now();
    match action {
        EnergyAction::Regen { all: true } => {
            let report = service::run_regen_batch(&db, now, &config.energy)?;
            print_json(&report)
        }
        EnergyAction::Regen { all: false } => {
            let before = db.ensure_profile(user, now)?.energy;
            let profile = service::regen_user(&db, user, now, &config.energy)?;
            println!("Energy: {} -> {}", before, profile.energy);
            Ok(())
        }
        EnergyAction::Pod { start, end, minutes } => {
            let end = match end {
                Some(raw) => parse_time(&raw)?,
                None => now,
            };
            let start = match (start, minutes) {
                (Some(raw), _) => parse_time(&raw)?,
                (None, Some(minutes)) => shift_minutes(end, minutes.checked_neg().ok_or("--minutes is out of range")?)?,
                (None, None) => return Err("pass --start or --minutes".into()),
            };
            let (_, settlement) = service::settle_pod_exit(&db, user, start, end, now, &config.energy)?;
            println!(
                "Pod: {:.1} min, +{} energy (now {})",
                settlement.duration_minutes, settlement.gained, settlement.energy
            );
            Ok(())
        }
    }
}

use aetherday_core::{calculate_target, service};
use chrono::Utc;
use clap::Subcommand;

use crate::common::{open, CliResult};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Show the daily challenge target for a level
    Target {
        level: i32,
    },
    /// Start today's challenge if it has not been started
    Refresh,
    /// Claim the reward for a finished challenge
    Claim,
}

pub fn run(action: ChallengeAction, user: &str) -> CliResult {
    let now = Utc::now();
    match action {
        ChallengeAction::Target { level } => println!("{}", calculate_target(level)),
        ChallengeAction::Refresh => {
            let (_, db) = open()?;
            let (_, refresh) = service::refresh_daily_challenge(&db, user, now)?;
            if refresh.reset {
                println!("New challenge: complete {} tasks today", refresh.target);
            } else {
                println!(
                    "Challenge in progress: {}/{}",
                    refresh.tasks_completed_today, refresh.target
                );
            }
        }
        ChallengeAction::Claim => {
            let (_, db) = open()?;
            let (_, claim) = service::claim_daily_reward(&db, user, now)?;
            println!(
                "Reward claimed: +{} XP, +{} energy (level {})",
                claim.xp_gained, claim.energy_gained, claim.level
            );
        }
    }
    Ok(())
}

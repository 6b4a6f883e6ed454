use aetherday_core::energy::parse_clock;
use aetherday_core::MAX_ENERGY;
use chrono::Utc;
use clap::Subcommand;

use crate::common::{open, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show energy, XP, level and challenge progress
    Show {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the workday window used for night regen and auto-balance
    Workday {
        /// Start of the workday (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// End of the workday (HH:MM)
        #[arg(long)]
        end: Option<String>,
    },
}

pub fn run(action: ProfileAction, user: &str) -> CliResult {
    let (_, db) = open()?;
    let now = Utc::now();
    match action {
        ProfileAction::Show { json } => {
            let profile = db.ensure_profile(user, now)?;
            if json {
                return print_json(&profile);
            }
            println!("{}", profile.id);
            println!("  Energy: {}/{}", profile.energy, MAX_ENERGY);
            println!("  Level:  {} ({} XP)", profile.level, profile.xp);
            println!(
                "  Daily challenge: {}/{}",
                profile.tasks_completed_today, profile.daily_challenge_target
            );
            let window = profile.workday_window();
            println!(
                "  Workday: {}-{}",
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            );
        }
        ProfileAction::Workday { start, end } => {
            for value in [&start, &end].into_iter().flatten() {
                if parse_clock(value).is_none() {
                    return Err(format!("invalid time '{value}': use HH:MM").into());
                }
            }
            db.ensure_profile(user, now)?;
            db.set_workday_window(user, start.as_deref(), end.as_deref(), now)?;
            println!("ok");
        }
    }
    Ok(())
}

//! Scheduled task commands.

use aetherday_core::{service, NewScheduledTask};
use chrono::Utc;
use clap::Subcommand;

use crate::common::{open, parse_date, parse_time, print_json, shift_minutes, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the day
    Add {
        /// Task name ("break" boosts regeneration while it runs)
        name: String,
        /// Start time (RFC 3339 or HH:MM today)
        #[arg(long)]
        start: String,
        /// Length in minutes
        #[arg(long, default_value = "30")]
        minutes: i64,
        /// Energy cost
        #[arg(long, default_value = "0")]
        cost: i32,
        #[arg(long)]
        critical: bool,
        /// Never moved by auto-balance or sent to the sink
        #[arg(long)]
        locked: bool,
        /// Fixed time, but still removable
        #[arg(long)]
        rigid: bool,
    },
    /// List a day's tasks
    List {
        /// Day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Complete a task, spending its energy and earning XP
    Complete {
        id: String,
    },
    /// Move a task into the Aether Sink
    Sink {
        id: String,
    },
    /// Archive a task
    Retire {
        id: String,
    },
    /// List archived tasks
    Retired,
    /// Re-pack the day's flexible tasks into the workday
    Balance {
        /// Day (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: TaskAction, user: &str) -> CliResult {
    let (_, db) = open()?;
    let now = Utc::now();
    match action {
        TaskAction::Add {
            name,
            start,
            minutes,
            cost,
            critical,
            locked,
            rigid,
        } => {
            let start = parse_time(&start)?;
            let input = NewScheduledTask {
                name,
                start_time: start,
                end_time: shift_minutes(start, minutes)?,
                energy_cost: cost,
                is_critical: critical,
                is_flexible: !rigid,
                is_locked: locked,
            };
            let task = service::create_task(&db, user, input, now)?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List { date, json } => {
            let tasks = db.tasks_on(user, parse_date(date.as_deref())?)?;
            if json {
                return print_json(&tasks);
            }
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                let mark = if task.is_completed { "x" } else { " " };
                println!(
                    "[{mark}] {} {}-{} {} (cost {}) {}",
                    task.id,
                    task.start_time.format("%H:%M"),
                    task.end_time.format("%H:%M"),
                    task.name,
                    task.energy_cost,
                    if task.is_locked { "locked" } else { "" }
                );
            }
        }
        TaskAction::Complete { id } => {
            let (_, done) = service::complete_task(&db, user, &id, now)?;
            println!(
                "Completed: -{} energy (now {}), +{} XP",
                done.energy_spent, done.energy, done.xp_gained
            );
            if done.leveled_up {
                println!("Level up! Now level {}", done.level);
            }
        }
        TaskAction::Sink { id } => {
            let sunk = service::send_to_sink(&db, user, &id, now)?;
            println!("Sent to sink: {}", sunk.id);
        }
        TaskAction::Retire { id } => {
            let retired = service::retire_task(&db, user, &id, now)?;
            println!("Retired ({}): {}", retired.reason.as_str(), retired.name);
        }
        TaskAction::Retired => {
            print_json(&db.retired(user)?)?;
        }
        TaskAction::Balance { date } => {
            let report = service::auto_balance_day(&db, user, parse_date(date.as_deref())?, now)?;
            print_json(&report)?;
        }
    }
    Ok(())
}

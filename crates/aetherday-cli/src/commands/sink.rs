use aetherday_core::service;
use chrono::Utc;
use clap::Subcommand;

use crate::common::{open, parse_time, print_json, CliResult};

#[derive(Subcommand)]
pub enum SinkAction {
    /// List the sink
    List,
    /// Put a sink task back on the schedule
    Schedule {
        id: String,
        /// Start time (RFC 3339 or HH:MM today)
        #[arg(long)]
        start: String,
    },
    /// Undo the last auto-balance
    Restore,
}

pub fn run(action: SinkAction, user: &str) -> CliResult {
    let (_, db) = open()?;
    match action {
        SinkAction::List => print_json(&db.sink(user)?),
        SinkAction::Schedule { id, start } => {
            let task = service::schedule_from_sink(&db, user, &id, parse_time(&start)?, Utc::now())?;
            println!("Scheduled: {} at {}", task.id, task.start_time.to_rfc3339());
            Ok(())
        }
        SinkAction::Restore => {
            let snapshot = service::restore_sink_snapshot(&db, user)?;
            println!(
                "Undid auto-balance from {}: {} day tasks returned",
                snapshot.taken_at.to_rfc3339(),
                snapshot.removed_tasks.len()
            );
            Ok(())
        }
    }
}

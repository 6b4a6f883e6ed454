//! Issue bearer tokens signed with the configured secret, for local testing
//! of the HTTP API.

use aetherday_core::{Config, TokenVerifier};
use chrono::{Duration, Utc};
use clap::Subcommand;

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Print a signed token
    Issue {
        /// Subject (user id)
        sub: String,
        /// Optional role claim, e.g. "service_role"
        #[arg(long)]
        role: Option<String>,
        /// Lifetime in hours
        #[arg(long, default_value = "24")]
        ttl_hours: i64,
    },
}

pub fn run(action: TokenAction) -> CliResult {
    match action {
        TokenAction::Issue { sub, role, ttl_hours } => {
            let config = Config::load()?;
            let secret = config
                .auth
                .resolved_secret()
                .ok_or("no signing secret configured (auth.jwt_secret or AETHERDAY_JWT_SECRET)")?;
            let verifier = TokenVerifier::new(secret, config.auth.issuer.clone());
            let ttl = Duration::try_hours(ttl_hours).ok_or("--ttl-hours is out of range")?;
            let token = verifier.issue(&sub, role.as_deref(), ttl, Utc::now());
            println!("{token}");
        }
    }
    Ok(())
}

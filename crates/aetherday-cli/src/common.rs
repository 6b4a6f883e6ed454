//! Helpers shared by the subcommands.

use aetherday_core::{Config, Database};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load config (writing defaults on first run) and open the configured database.
pub fn open() -> CliResult<(Config, Database)> {
    let config = Config::load()?;
    let db = Database::open_at(&config.database_path()?)?;
    Ok((config, db))
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Accepts RFC 3339 (`2024-05-01T09:00:00Z`) or a local `HH:MM` meaning today.
pub fn parse_time(value: &str) -> CliResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| format!("invalid time '{value}': use RFC 3339 or HH:MM"))?;
    let local = Local::now().date_naive().and_time(time);
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| format!("'{value}' does not exist in the local timezone today").into())
}

/// `at` shifted by a signed number of minutes, failing instead of overflowing.
pub fn shift_minutes(at: DateTime<Utc>, minutes: i64) -> CliResult<DateTime<Utc>> {
    Duration::try_minutes(minutes)
        .and_then(|delta| at.checked_add_signed(delta))
        .ok_or_else(|| format!("{minutes} minutes is out of range").into())
}

pub fn parse_date(value: Option<&str>) -> CliResult<NaiveDate> {
    match value {
        Some(raw) => Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{raw}': use YYYY-MM-DD"))?),
        None => Ok(Utc::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_is_converted_to_utc() {
        let ts = parse_time("2024-05-01T11:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn clock_time_and_garbage() {
        assert!(parse_time("09:30").is_ok());
        assert!(parse_time("half past nine").is_err());
    }

    #[test]
    fn minute_shifts_reject_overflow() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(shift_minutes(base, -30).unwrap(), Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap());
        assert!(shift_minutes(base, i64::MAX).is_err());
        assert!(shift_minutes(base, i64::MIN).is_err());
        assert!(shift_minutes(base, 10_000_000_000_000).is_err());
    }

    #[test]
    fn dates_default_to_today() {
        assert_eq!(parse_date(None).unwrap(), Utc::now().date_naive());
        assert_eq!(
            parse_date(Some("2024-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(parse_date(Some("May 1")).is_err());
    }
}

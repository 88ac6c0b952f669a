//! Derivation of the random seed from a user supplied option.
//!
//! The matching engine itself only ever accepts an already seeded random generator, so all
//! seeding policy lives here. The default seed is the number of whole weeks since the Unix
//! epoch: re-running the tool within the same week reproduces the same groups, while every new
//! week reshuffles them.

use chrono::{NaiveDate, Utc};
use log::debug;

const SECONDS_PER_WEEK: i64 = 60 * 60 * 24 * 7;

/// Number of whole weeks between the Unix epoch and the given Unix timestamp
///
/// # Errors
///
/// Fails with a string message for timestamps before the end of the first week of 1970, which
/// can only result from a misconfigured clock or a mistyped date.
pub fn weeks_since_epoch(timestamp: i64) -> Result<u64, String> {
    let n_weeks = timestamp / SECONDS_PER_WEEK;
    if n_weeks <= 0 {
        return Err(format!("Implausible timestamp: {}", timestamp));
    }
    Ok(n_weeks as u64)
}

/// Interpret the seed command line option.
///
/// `"week"` uses the current week number, a bare integer is used verbatim, and anything else is
/// parsed as a date (`2022-08-08` or `Aug 12 2022`) whose week number becomes the seed.
pub fn seed_from_option(option: &str) -> Result<u64, String> {
    if option == "week" {
        debug!("Getting seed from the current week number");
        return weeks_since_epoch(Utc::now().timestamp());
    }
    if let Ok(seed) = option.parse::<u64>() {
        debug!("Explicitly set seed to {}", seed);
        return Ok(seed);
    }
    let date = NaiveDate::parse_from_str(option, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(option, "%b %d %Y"))
        .map_err(|_| format!("Unsupported option for the RNG seed: {}", option))?;
    debug!("Getting seed from the week number of {}", date);
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("Unsupported option for the RNG seed: {}", option))?;
    weeks_since_epoch(midnight.and_utc().timestamp())
}

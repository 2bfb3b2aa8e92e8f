//! Credential lifetimes.

use std::sync::LazyLock;

use jiff::SignedDuration;
use regex::Regex;

use crate::tokens::TokenError;

/// Shortest lifetime a credential may be issued with.
pub const MIN_TTL: SignedDuration = SignedDuration::from_mins(10);

/// Lifetime of an ephemeral credential when none is requested.
pub const DEFAULT_EPHEMERAL_TTL: SignedDuration = SignedDuration::from_hours(4);

/// Lifetime of a named credential when none is requested.
pub const DEFAULT_NAMED_TTL: SignedDuration = SignedDuration::from_hours(30 * 24);

#[expect(clippy::expect_used, reason = "literal pattern")]
static TTL_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(\.\d+)?[hms])+$").expect("valid pattern"));

#[expect(clippy::expect_used, reason = "literal pattern")]
static TTL_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)([hms])").expect("valid pattern"));

/// Parse a lifetime such as `"30m"`, `"4h"` or `"1h30m"`.
///
/// # Errors
///
/// Returns [`TokenError::InvalidTtl`] if the value does not match the
/// accepted grammar.
pub fn parse_ttl(value: &str) -> Result<SignedDuration, TokenError> {
    let value = value.trim();

    if !TTL_FORMAT.is_match(value) {
        return Err(TokenError::InvalidTtl(format!(
            "{value:?} must be a duration like 30m, 4h or 1h30m"
        )));
    }

    let mut total = 0.0_f64;

    for component in TTL_COMPONENT.captures_iter(value) {
        let amount: f64 = component
            .get(1)
            .map_or("", |amount| amount.as_str())
            .parse()
            .map_err(|error| TokenError::InvalidTtl(format!("{value:?}: {error}")))?;

        let unit = match component.get(2).map(|unit| unit.as_str()) {
            Some("h") => 3600.0,
            Some("m") => 60.0,
            _ => 1.0,
        };

        total += amount * unit;
    }

    from_seconds(total)
}

/// Convert a number of seconds to a lifetime.
///
/// # Errors
///
/// Returns [`TokenError::InvalidTtl`] for negative or non-finite values.
pub fn from_seconds(seconds: f64) -> Result<SignedDuration, TokenError> {
    SignedDuration::try_from_secs_f64(seconds)
        .ok()
        .filter(|duration| !duration.is_negative())
        .ok_or_else(|| TokenError::InvalidTtl(format!("{seconds} is not a valid number of seconds")))
}

/// Reject lifetimes shorter than [`MIN_TTL`].
///
/// # Errors
///
/// Returns [`TokenError::InvalidTtl`] when `ttl` is too short.
pub fn validate_ttl(ttl: SignedDuration) -> Result<(), TokenError> {
    if ttl < MIN_TTL {
        return Err(TokenError::InvalidTtl(format!(
            "token expiration must be at least {}",
            format_ttl(MIN_TTL)
        )));
    }

    Ok(())
}

/// Render a lifetime as hours, minutes and seconds, e.g. `"4h0m0s"`.
#[must_use]
pub fn format_ttl(ttl: SignedDuration) -> String {
    let total = ttl.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{hours}h{minutes}m{seconds}s")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_single_units() -> TestResult {
        assert_eq!(parse_ttl("30m")?, SignedDuration::from_mins(30));
        assert_eq!(parse_ttl("4h")?, SignedDuration::from_hours(4));
        assert_eq!(parse_ttl("900s")?, SignedDuration::from_secs(900));

        Ok(())
    }

    #[test]
    fn parses_compound_and_fractional_values() -> TestResult {
        assert_eq!(parse_ttl("2h45m")?, SignedDuration::from_mins(165));
        assert_eq!(parse_ttl("1.5h")?, SignedDuration::from_mins(90));

        Ok(())
    }

    #[test]
    fn rejects_unknown_formats() {
        for value in ["", "10", "1d", "h", "-5m", "5 m", "1h-30m"] {
            assert!(parse_ttl(value).is_err(), "{value:?} should be rejected");
        }
    }

    #[test]
    fn enforces_minimum() -> TestResult {
        validate_ttl(SignedDuration::from_mins(10))?;

        assert!(validate_ttl(SignedDuration::from_mins(9)).is_err(), "9m is too short");

        Ok(())
    }

    #[test]
    fn seconds_must_be_non_negative() -> TestResult {
        assert_eq!(from_seconds(3600.0)?, SignedDuration::from_hours(1));
        assert!(from_seconds(-1.0).is_err(), "negative seconds");
        assert!(from_seconds(f64::NAN).is_err(), "NaN seconds");

        Ok(())
    }

    #[test]
    fn formats_as_hours_minutes_seconds() {
        assert_eq!(format_ttl(DEFAULT_EPHEMERAL_TTL), "4h0m0s");
        assert_eq!(format_ttl(SignedDuration::from_secs(5430)), "1h30m30s");
        assert_eq!(format_ttl(DEFAULT_NAMED_TTL), "720h0m0s");
    }
}

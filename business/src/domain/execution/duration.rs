use std::time::Duration;

use super::errors::ExecutionError;

/// Parses the wire timeout format: `"500ms"`, `"30s"`, `"5m"`, `"2h"`, or a
/// plain integer meaning seconds. `"0s"` is valid and disables the deadline.
pub fn parse_duration(value: &str) -> Result<Duration, ExecutionError> {
    let invalid = || ExecutionError::InvalidTimeout {
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (digits, unit_ms) = if let Some(digits) = trimmed.strip_suffix("ms") {
        (digits, 1u64)
    } else if let Some(digits) = trimmed.strip_suffix('s') {
        (digits, 1_000)
    } else if let Some(digits) = trimmed.strip_suffix('m') {
        (digits, 60_000)
    } else if let Some(digits) = trimmed.strip_suffix('h') {
        (digits, 3_600_000)
    } else {
        (trimmed, 1_000)
    };

    let amount: u64 = digits.parse().map_err(|_| invalid())?;
    Ok(Duration::from_millis(amount.saturating_mul(unit_ms)))
}

/// Formats a duration in the wire timeout format: whole seconds as `"Ns"`,
/// anything finer as `"Nms"`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_each_supported_unit() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7_200));
    }

    #[test]
    fn should_parse_bare_integer_as_seconds() {
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn should_parse_zero_as_disabled_deadline() {
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn should_tolerate_surrounding_whitespace() {
        assert_eq!(parse_duration(" 10s ").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn should_reject_malformed_values() {
        for value in ["", "abc", "10x", "-5s", "1.5h", "s", "ms"] {
            let err = parse_duration(value).unwrap_err();
            assert!(
                matches!(err, ExecutionError::InvalidTimeout { .. }),
                "expected InvalidTimeout for {value:?}"
            );
        }
    }

    #[test]
    fn should_format_whole_seconds_and_millis() {
        assert_eq!(format_duration(Duration::from_secs(60)), "60s");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1500ms");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn should_round_trip_formatted_values() {
        for duration in [
            Duration::from_millis(250),
            Duration::from_secs(1),
            Duration::from_secs(3_600),
        ] {
            assert_eq!(parse_duration(&format_duration(duration)).unwrap(), duration);
        }
    }
}

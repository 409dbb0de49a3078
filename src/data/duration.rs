use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to milliseconds multiplier (order matters: "ms" before "s" and "m")
const UNITS: &[(&str, f64)] = &[("ms", 1.0), ("s", 1_000.0), ("m", 60_000.0)];

/// Parse duration strings like "10s", "1500ms", "1.5m" or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            return from_millis(val * multiplier, s);
        }
    }

    match s.parse::<f64>() {
        Ok(secs) => from_millis(secs * 1_000.0, s),
        Err(_) => bail!("Unknown duration format: {}", s),
    }
}

fn from_millis(millis: f64, original: &str) -> Result<Duration> {
    if !millis.is_finite() || millis <= 0.0 {
        bail!("Duration must be positive: {}", original);
    }
    Ok(Duration::from_millis(millis.round() as u64))
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if millis % 1_000 == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("2.5s").unwrap(), Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_milliseconds() {
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_bare_seconds() {
        assert_eq!(parse_duration(" 7 ").unwrap(), Duration::from_secs(7));
    }

    #[test]
    fn test_rejects_garbage_and_zero() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("-3").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(25)), "25s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}

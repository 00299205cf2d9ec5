//! Duration strings in config files.
//!
//! Accepts the service's historical format: one or more `<number><unit>`
//! pairs such as `"250ms"`, `"1h"` or `"1h30m"`, with units `ns`, `us`
//! (`µs`), `ms`, `s`, `m`, `h`. Fractions are allowed (`"1.5s"`); a bare `0`
//! is zero. Use with `#[serde(with = "crate::config::duration")]`.

use serde::{de, Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Parse a duration string.
pub fn parse(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    if text == "0" {
        return Ok(Duration::ZERO);
    }
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = text;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration {:?}", text))?;
        if num_len == 0 {
            return Err(format!("expected a number in duration {:?}", text));
        }
        let value: f64 = rest[..num_len]
            .parse()
            .map_err(|_| format!("invalid number in duration {:?}", text))?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            other => return Err(format!("unknown unit {:?} in duration {:?}", other, text)),
        };
        rest = &rest[unit_len..];
        total_nanos += value * scale;
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

/// Format a duration in the same notation, choosing the largest exact unit.
pub fn format(duration: &Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos % 1_000_000_000 == 0 {
        format!("{}s", duration.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{}ns", nanos)
    }
}

pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(duration))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse("80us").unwrap(), Duration::from_micros(80));
        assert_eq!(parse("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("10").is_err());
        assert!(parse("10d").is_err());
        assert!(parse("ms").is_err());
    }

    #[test]
    fn test_format_picks_exact_unit() {
        assert_eq!(format(&Duration::ZERO), "0s");
        assert_eq!(format(&Duration::from_secs(3600)), "3600s");
        assert_eq!(format(&Duration::from_millis(250)), "250ms");
        assert_eq!(parse(&format(&Duration::from_nanos(1_500))).unwrap(), Duration::from_nanos(1_500));
    }
}

//! ISO-8601 durations as used by ARM (`PT1M`, `PT10M`, `PT1H30M`, `P1D`).
//!
//! Only the day/hour/minute/second designators are supported; ARM never
//! emits years, months or weeks for autoscale time spans.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Format a duration the way ARM echoes it back (`PT5M`, `PT1H`, `PT0S`).
pub fn format(d: Duration) -> String {
    let total = d.as_secs();
    let nanos = d.subsec_nanos();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours == 0 && minutes == 0 && seconds == 0 && nanos == 0 {
        if days == 0 {
            out.push_str("T0S");
        }
        return out;
    }
    out.push('T');
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let frac = format!("{:09}", nanos);
        out.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
    } else if seconds > 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Parse an ISO-8601 duration. Returns `None` for anything malformed.
pub fn parse(s: &str) -> Option<Duration> {
    let rest = s.trim().strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => {
            if t.is_empty() {
                return None;
            }
            (d, Some(t))
        }
        None => (rest, None),
    };

    let mut secs = 0f64;
    for (value, unit) in components(date_part)? {
        match unit {
            'D' => secs += value * 86_400.0,
            'W' => secs += value * 7.0 * 86_400.0,
            _ => return None,
        }
    }
    if let Some(time) = time_part {
        for (value, unit) in components(time)? {
            match unit {
                'H' => secs += value * 3_600.0,
                'M' => secs += value * 60.0,
                'S' => secs += value,
                _ => return None,
            }
        }
    }

    Duration::try_from_secs_f64(secs).ok()
}

/// Split `1H30M` into `[(1.0, 'H'), (30.0, 'M')]`.
fn components(s: &str) -> Option<Vec<(f64, char)>> {
    let mut out = Vec::new();
    let mut number = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            number.push(if c == ',' { '.' } else { c });
        } else {
            if number.is_empty() {
                return None;
            }
            out.push((number.parse().ok()?, c.to_ascii_uppercase()));
            number.clear();
        }
    }
    if !number.is_empty() {
        return None;
    }
    Some(out)
}

pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*d))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 duration: {s}")))
}

//! Instants with a display format, plus the parser and renderer behind
//! [`DateTimeField`](crate::field::DateTimeField).

use std::cmp::Ordering;
use std::fmt::{self, Write as _};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Serialize, Serializer};

use crate::error::{Result, SchemaError};

/// Default display format: ISO-8601 with offset, e.g. `2021-08-30T08:24:15+00:00`.
pub const DEFAULT_FORMAT: &str = "c";

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// An instant carrying the format token it should be rendered with.
///
/// Equality and ordering only look at the instant; two timestamps for the
/// same moment in different offsets or formats compare equal.
#[derive(Debug, Clone)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    format: String,
}

impl Timestamp {
    #[must_use]
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant,
            format: DEFAULT_FORMAT.to_owned(),
        }
    }

    /// Parse a date-time string. Naive inputs are taken as UTC.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            return Err(SchemaError::InvalidValue);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::new(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Ok(Self::new(dt));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(Self::new(dt));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_utc(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self::from_utc)
            .ok_or(SchemaError::InvalidValue)
    }

    /// Instant at `secs` seconds after the Unix epoch, in UTC.
    pub fn from_epoch(secs: i64) -> Result<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| Self::new(dt.fixed_offset()))
            .ok_or(SchemaError::InvalidValue)
    }

    /// Fractional epoch seconds, kept to nanosecond precision.
    pub fn from_epoch_f64(secs: f64) -> Result<Self> {
        if !secs.is_finite() {
            return Err(SchemaError::InvalidValue);
        }
        let whole = secs.floor();
        let mut nanos = ((secs - whole) * 1e9).round() as u32;
        let mut whole = whole as i64;
        if nanos >= 1_000_000_000 {
            whole += 1;
            nanos -= 1_000_000_000;
        }
        DateTime::<Utc>::from_timestamp(whole, nanos)
            .map(|dt| Self::new(dt.fixed_offset()))
            .ok_or(SchemaError::InvalidValue)
    }

    fn from_utc(naive: NaiveDateTime) -> Self {
        Self::new(naive.and_utc().fixed_offset())
    }

    /// Replace the display format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Render with the carried format token.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.instant, &self.format)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::new(instant)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant.fixed_offset())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Render `dt` using single-letter date tokens (`Y-m-d H:i:s`, `c`, `U`).
/// Unknown letters are copied through and `\` escapes the next character.
pub fn render(dt: &DateTime<FixedOffset>, format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        // Writing into a String cannot fail.
        let _ = match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                Ok(())
            }
            'd' => write!(out, "{}", dt.format("%d")),
            'D' => write!(out, "{}", dt.format("%a")),
            'j' => write!(out, "{}", dt.day()),
            'l' => write!(out, "{}", dt.format("%A")),
            'N' => write!(out, "{}", dt.weekday().number_from_monday()),
            'w' => write!(out, "{}", dt.weekday().num_days_from_sunday()),
            'z' => write!(out, "{}", dt.ordinal0()),
            'W' => write!(out, "{}", dt.format("%V")),
            'F' => write!(out, "{}", dt.format("%B")),
            'm' => write!(out, "{}", dt.format("%m")),
            'M' => write!(out, "{}", dt.format("%b")),
            'n' => write!(out, "{}", dt.month()),
            't' => write!(out, "{}", dt.date_naive().num_days_in_month()),
            'L' => write!(out, "{}", u8::from(dt.date_naive().leap_year())),
            'o' => write!(out, "{}", dt.iso_week().year()),
            'Y' => write!(out, "{}", dt.format("%Y")),
            'y' => write!(out, "{}", dt.format("%y")),
            'a' => write!(out, "{}", dt.format("%P")),
            'A' => write!(out, "{}", dt.format("%p")),
            'g' => write!(out, "{}", dt.format("%-I")),
            'G' => write!(out, "{}", dt.hour()),
            'h' => write!(out, "{}", dt.format("%I")),
            'H' => write!(out, "{}", dt.format("%H")),
            'i' => write!(out, "{}", dt.format("%M")),
            's' => write!(out, "{}", dt.format("%S")),
            'u' => write!(out, "{}", dt.format("%6f")),
            'v' => write!(out, "{}", dt.format("%3f")),
            // Fixed offsets carry no zone name, so zone letters render the offset.
            'e' | 'T' | 'P' => write!(out, "{}", dt.format("%:z")),
            'p' if dt.offset().local_minus_utc() == 0 => {
                out.push('Z');
                Ok(())
            }
            'p' => write!(out, "{}", dt.format("%:z")),
            'O' => write!(out, "{}", dt.format("%z")),
            'Z' => write!(out, "{}", dt.offset().local_minus_utc()),
            'c' => write!(out, "{}", dt.format("%Y-%m-%dT%H:%M:%S%:z")),
            'r' => write!(out, "{}", dt.format("%a, %d %b %Y %H:%M:%S %z")),
            'U' => write!(out, "{}", dt.timestamp()),
            other => {
                out.push(other);
                Ok(())
            }
        };
    }
    out
}

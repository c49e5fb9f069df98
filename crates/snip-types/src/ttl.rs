use std::fmt;
use std::time::Duration;

use crate::error::TypeError;

/// Time-to-live for a paste, fixed at creation and never extended by edits.
///
/// Parsed from a small symbolic vocabulary (`"1h"`, `"24h"`, `"168h"`,
/// `"7d"`, empty string for the default) or a general duration expression:
/// a concatenation of `<integer><unit>` terms with units `ns`, `us`, `ms`,
/// `s`, `m`, `h`, `d` (e.g. `"90m"` or `"1h30m"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ttl(Duration);

impl Ttl {
    /// Default lifetime when the caller passes an empty string: 24 hours.
    pub const DEFAULT: Ttl = Ttl(Duration::from_secs(24 * 60 * 60));

    /// Parse a TTL string.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        match input.trim() {
            "" => Ok(Self::DEFAULT),
            "1h" => Ok(Self(Duration::from_secs(60 * 60))),
            "24h" => Ok(Self::DEFAULT),
            "168h" | "7d" => Ok(Self(Duration::from_secs(168 * 60 * 60))),
            other => parse_duration(other).map(Self),
        }
    }

    /// Construct directly from a duration.
    pub fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    /// The parsed duration.
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ttl({:?})", self.0)
    }
}

/// Parse a concatenation of `<integer><unit>` terms.
fn parse_duration(input: &str) -> Result<Duration, TypeError> {
    let invalid = || TypeError::InvalidTtl(input.to_string());
    let bytes = input.as_bytes();
    let mut total = Duration::ZERO;
    let mut i = 0;

    while i < bytes.len() {
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return Err(invalid());
        }
        let value: u64 = input[digits_start..i].parse().map_err(|_| invalid())?;

        let unit_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1;
        }
        let term = match &input[unit_start..i] {
            "ns" => Duration::from_nanos(value),
            "us" | "µs" => Duration::from_micros(value),
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(invalid)?),
            "h" => Duration::from_secs(value.checked_mul(60 * 60).ok_or_else(invalid)?),
            "d" => Duration::from_secs(value.checked_mul(24 * 60 * 60).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        };
        total = total.saturating_add(term);
    }

    Ok(total)
}

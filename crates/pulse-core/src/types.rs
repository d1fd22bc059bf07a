//! Endpoint and retry policy types.
//!
//! These map one-to-one onto the configuration file:
//!
//! ```text
//! { "url": "https://example.com",
//!   "retry": { "retries": 3, "delay": { "unit": "s", "time": 5 } } }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A URL target with its retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub retry: RetryPolicy,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            url: url.into(),
            retry,
        }
    }
}

/// How many attempts a probe makes and how long it waits between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    #[serde(rename = "retries")]
    pub max_attempts: u32,
    pub delay: DelayPolicy,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: DelayPolicy) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Attempts actually performed. A probe always makes at least one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Constant pause between attempts, as written in the configuration file.
///
/// The unit is kept as the raw string so that a save/load cycle writes
/// back exactly what was read. Interpretation happens in [`DelayPolicy::wait`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayPolicy {
    pub unit: String,
    pub time: f64,
}

impl DelayPolicy {
    pub fn new(unit: impl Into<String>, time: f64) -> Self {
        Self {
            unit: unit.into(),
            time,
        }
    }

    pub fn seconds(time: f64) -> Self {
        Self::new("s", time)
    }

    pub fn millis(time: f64) -> Self {
        Self::new("ms", time)
    }

    /// The parsed unit, or `None` if the string is not recognized.
    pub fn unit(&self) -> Option<DelayUnit> {
        DelayUnit::parse(&self.unit)
    }

    /// Absolute wait before the next attempt.
    ///
    /// Unknown units fall back to seconds. Negative or non-finite times
    /// yield no wait at all.
    pub fn wait(&self) -> Duration {
        let unit = self.unit().unwrap_or_else(|| {
            warn!(unit = %self.unit, "unrecognized delay unit, treating as seconds");
            DelayUnit::Seconds
        });

        let nanos = self.time * unit.nanos_per_unit();
        if !nanos.is_finite() || nanos < 0.0 {
            warn!(time = self.time, unit = %self.unit, "invalid delay time, not waiting");
            return Duration::ZERO;
        }
        if nanos >= u64::MAX as f64 {
            warn!(time = self.time, unit = %self.unit, "delay time out of range, clamping");
            return Duration::from_nanos(u64::MAX);
        }
        Duration::from_nanos(nanos.round() as u64)
    }
}

impl fmt::Display for DelayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time, self.unit)
    }
}

/// Recognized delay units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayUnit {
    Milliseconds,
    Seconds,
    Minutes,
}

impl DelayUnit {
    /// Parse a unit name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millis" | "millisecond" | "milliseconds" => Some(Self::Milliseconds),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            _ => None,
        }
    }

    /// Length of one unit in nanoseconds.
    pub fn nanos_per_unit(self) -> f64 {
        match self {
            Self::Milliseconds => 1e6,
            Self::Seconds => 1e9,
            Self::Minutes => 60e9,
        }
    }
}

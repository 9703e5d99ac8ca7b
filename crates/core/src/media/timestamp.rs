//! Presentation timestamp rescaling.
//!
//! Encoders and demuxers stamp frames in their own time base (e.g. `1/30`
//! or `1/1000`). RTP video uses a 90 kHz clock (RFC 6184 §8.2.1), so every
//! access unit's PTS is converted once:
//!
//! ```text
//! dst_ts = round(pts * clock_rate * num / den)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{PacketizeError, Result};

/// RTP clock rate for video payloads.
pub const VIDEO_CLOCK_RATE: u32 = 90_000;

/// Rational time base `num/den` seconds per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    num: u32,
    den: u32,
}

impl TimeBase {
    pub fn new(num: u32, den: u32) -> Result<Self> {
        if den == 0 {
            return Err(PacketizeError::InvalidTimeBase(format!(
                "{num}/{den}: zero denominator"
            )));
        }
        Ok(Self { num, den })
    }

    /// Time base whose ticks are cycles of a clock running at `rate` Hz.
    pub fn from_clock_rate(rate: u32) -> Result<Self> {
        Self::new(1, rate)
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn den(&self) -> u32 {
        self.den
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for TimeBase {
    type Err = PacketizeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PacketizeError::InvalidTimeBase(s.to_string());
        let (num, den) = s.split_once('/').ok_or_else(invalid)?;
        let num = num.trim().parse().map_err(|_| invalid())?;
        let den = den.trim().parse().map_err(|_| invalid())?;
        Self::new(num, den)
    }
}

/// Convert `pts` from `time_base` to ticks of a `clock_rate` Hz clock.
///
/// Computed exactly in 128-bit integers and rounded half away from zero.
pub fn rescale(pts: i64, time_base: TimeBase, clock_rate: u32) -> Result<i64> {
    let numer = i128::from(pts) * i128::from(clock_rate) * i128::from(time_base.num);
    let denom = i128::from(time_base.den);

    let quotient = numer / denom;
    let remainder = numer % denom;
    let rounded = if 2 * remainder.abs() >= denom {
        quotient + numer.signum()
    } else {
        quotient
    };

    i64::try_from(rounded).map_err(|_| PacketizeError::TimestampOverflow)
}

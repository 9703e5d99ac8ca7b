use crate::error::{PacketizeError, Result};
use crate::media::nal::{LENGTH_FIELD_SIZE, STAP_A_HEADER_SIZE};
use crate::media::timestamp::VIDEO_CLOCK_RATE;

/// Largest RTP payload emitted by default: a conservative MTU minus IP/UDP/RTP overhead.
pub const DEFAULT_MAX_PAYLOAD: usize = 1300;

/// Hard cap on NAL units packed into one STAP-A payload.
pub const MAX_AGGREGATED_UNITS: usize = 9;

/// Default STAP-A unit cap.
pub const DEFAULT_MAX_AGGREGATED_UNITS: usize = MAX_AGGREGATED_UNITS;

/// Dynamic RTP payload type conventionally used for H.264.
pub const DEFAULT_PAYLOAD_TYPE: u8 = 96;

/// Packetizer configuration.
///
/// Every payload produced by [`H264Packetizer`](crate::H264Packetizer) is at
/// most `max_payload` bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketizerConfig {
    /// Upper bound on the length of every produced RTP payload.
    pub max_payload: usize,
    /// Cap on the number of NAL units aggregated into one STAP-A payload, 1..=9.
    pub max_aggregated_units: usize,
    /// Destination clock rate in Hz (90 kHz for video, RFC 6184 §8.2.1).
    pub clock_rate: u32,
    /// RTP payload type advertised in SDP attributes.
    pub payload_type: u8,
}

impl Default for PacketizerConfig {
    fn default() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
            max_aggregated_units: DEFAULT_MAX_AGGREGATED_UNITS,
            clock_rate: VIDEO_CLOCK_RATE,
            payload_type: DEFAULT_PAYLOAD_TYPE,
        }
    }
}

impl PacketizerConfig {
    /// Smallest payload that still holds a STAP-A header plus a 1-byte unit.
    pub const MIN_MAX_PAYLOAD: usize = STAP_A_HEADER_SIZE + 1;

    /// Check every field against the limits of the payload formats.
    ///
    /// `max_payload` is capped at 65535 because STAP-A length fields are 16 bits.
    pub fn validate(&self) -> Result<()> {
        let max_len = (1usize << (LENGTH_FIELD_SIZE * 8)) - 1;
        if self.max_payload < Self::MIN_MAX_PAYLOAD || self.max_payload > max_len {
            return Err(PacketizeError::InvalidConfig(format!(
                "max_payload {} outside {}..={}",
                self.max_payload,
                Self::MIN_MAX_PAYLOAD,
                max_len
            )));
        }
        if !(1..=MAX_AGGREGATED_UNITS).contains(&self.max_aggregated_units) {
            return Err(PacketizeError::InvalidConfig(format!(
                "max_aggregated_units {} outside 1..={}",
                self.max_aggregated_units, MAX_AGGREGATED_UNITS
            )));
        }
        if self.clock_rate == 0 {
            return Err(PacketizeError::InvalidConfig(
                "clock_rate must be non-zero".into(),
            ));
        }
        if self.payload_type > 127 {
            return Err(PacketizeError::InvalidConfig(format!(
                "payload_type {} does not fit in 7 bits",
                self.payload_type
            )));
        }
        Ok(())
    }
}

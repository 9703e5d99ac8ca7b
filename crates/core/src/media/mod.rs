//! Media codecs and RTP payload packetization.
//!
//! This module provides the [`Packetizer`] trait and the H.264
//! implementation that converts raw encoded bitstreams into RTP payloads.
//!
//! ## RTP payloads (RFC 6184)
//!
//! Each encoded video frame (access unit) becomes one or more RTP payloads,
//! all sharing one timestamp on a 90 kHz clock. Payloads never exceed the
//! configured maximum, which is the path MTU minus IP/UDP/RTP overhead.
//!
//! | Packet type | Module | RFC 6184 | When |
//! |-------------|--------|----------|------|
//! | Single NAL unit | [`h264`] | §5.6 | a NAL fits and nothing fits beside it |
//! | STAP-A | [`stap_a`] | §5.7.1 | consecutive NALs fit together |
//! | FU-A | [`fu_a`] | §5.8 | a NAL exceeds the maximum payload |
//!
//! The RTP fixed header (sequence number, SSRC, marker bit) is written by the
//! session layer behind a [`PayloadSink`](crate::PayloadSink).

pub mod annexb;
pub mod fu_a;
pub mod h264;
pub mod nal;
pub mod payload;
pub mod stap_a;
pub mod timestamp;

use crate::access_unit::AccessUnit;
use crate::error::Result;
use timestamp::TimeBase;

/// Codec-specific RTP payload packetizer.
///
/// Implementations provide:
/// - **Packetization**: splitting encoded data into RTP-sized payloads
/// - **SDP attributes**: codec parameters for session descriptions
/// - **RTP metadata**: payload type, clock rate, payload size limit
pub trait Packetizer: Send {
    /// Packetize one encoded access unit (e.g. Annex B bitstream).
    ///
    /// `pts` is in `time_base` units and is rescaled to
    /// [`clock_rate`](Self::clock_rate) ticks once for the whole access unit.
    fn packetize(
        &mut self,
        encoded_data: &[u8],
        pts: i64,
        time_base: TimeBase,
    ) -> Result<AccessUnit>;

    /// Codec name for the SDP `a=rtpmap` attribute (e.g. `"H264"`).
    fn codec_name(&self) -> &'static str;

    /// RTP clock rate in Hz.
    ///
    /// Video codecs typically use 90000 (90 kHz) per RFC 3551 §4.
    fn clock_rate(&self) -> u32;

    /// RTP payload type number (RFC 3551).
    ///
    /// Dynamic types use 96–127. H.264 conventionally uses 96.
    fn payload_type(&self) -> u8;

    /// Largest payload this packetizer emits.
    fn max_payload(&self) -> usize;

    /// SDP media-level attribute lines for this codec, `a=` prefix included.
    fn sdp_attributes(&self) -> Vec<String>;
}

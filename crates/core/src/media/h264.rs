use base64::prelude::{BASE64_STANDARD, Engine as _};

use super::Packetizer;
use super::annexb::split_annex_b;
use super::fu_a::fragment;
use super::nal::{NAL_TYPE_PPS, NAL_TYPE_SPS, NalHeader};
use super::stap_a::aggregate;
use super::timestamp::{TimeBase, rescale};
use crate::access_unit::AccessUnit;
use crate::config::PacketizerConfig;
use crate::error::Result;

/// H.264 RTP payload packetizer (RFC 6184, packetization-mode=1).
///
/// Converts an H.264 Annex B access unit into RTP payloads. RTP headers are
/// not written; see [`PayloadSink`](crate::PayloadSink). Each NAL unit goes
/// out in one of three forms:
///
/// - **FU-A Fragmentation** (§5.8): NALs longer than `max_payload` are split
///   into balanced fragments, see [`fragment`].
///
/// - **STAP-A Aggregation** (§5.7.1): a NAL that fits is packed together with
///   the NALs that follow it while they still fit, see [`aggregate`].
///
/// - **Single NAL Unit** (§5.6): when nothing else fits next to it, a NAL is
///   sent as-is.
///
/// Fragmentation and aggregation share one forward-only iterator over the
/// NAL units, so a unit pulled by the aggregator but not packed is handed
/// back and dispatched next. No unit is skipped or sent twice.
///
/// ## SDP attributes (RFC 6184 §8.1)
///
/// SPS/PPS are auto-captured from the first access unit that contains them
/// (e.g. first keyframe); the fmtp line then includes `profile-level-id`
/// and `sprop-parameter-sets`.
#[derive(Debug, Default)]
pub struct H264Packetizer {
    config: PacketizerConfig,
    sps: Option<Vec<u8>>,
    pps: Option<Vec<u8>>,
}

impl H264Packetizer {
    pub fn new(config: PacketizerConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            max_payload = config.max_payload,
            max_aggregated_units = config.max_aggregated_units,
            clock_rate = config.clock_rate,
            "H.264 packetizer created"
        );
        Ok(Self {
            config,
            sps: None,
            pps: None,
        })
    }

    pub fn config(&self) -> &PacketizerConfig {
        &self.config
    }

    /// Derive profile-level-id from SPS NAL (RFC 6184 §8.1): bytes 1–3 are profile_idc, constraint_set, level_idc.
    fn get_profile_level_id(&self) -> Option<String> {
        let sps = self.sps.as_deref()?;
        if sps.len() < 4 {
            return None;
        }
        Some(format!("{:02x}{:02x}{:02x}", sps[1], sps[2], sps[3]))
    }

    fn get_sprop_parameter_sets(&self) -> Option<String> {
        let sps = self.sps.as_deref()?;
        let pps = self.pps.as_deref()?;
        Some(format!(
            "{},{}",
            BASE64_STANDARD.encode(sps),
            BASE64_STANDARD.encode(pps)
        ))
    }

    /// Remember the first SPS and PPS seen, for [`sdp_attributes`](Packetizer::sdp_attributes).
    fn remember_parameter_sets(&mut self, sps: Option<&[u8]>, pps: Option<&[u8]>) {
        if self.sps.is_none()
            && let Some(sps) = sps
        {
            self.sps = Some(sps.to_vec());
            tracing::debug!("H.264 SPS captured from bitstream ({} bytes)", sps.len());
        }
        if self.pps.is_none()
            && let Some(pps) = pps
        {
            self.pps = Some(pps.to_vec());
            tracing::debug!("H.264 PPS captured from bitstream ({} bytes)", pps.len());
        }
    }

    /// Packetize a sequence of NAL units (start codes already removed).
    ///
    /// Empty units are dropped with a warning. A fragmentation fault aborts
    /// the whole call so a partially fragmented NAL is never returned.
    pub fn packetize_units<'a, I>(&self, units: I) -> Result<Vec<Vec<u8>>>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let max_payload = self.config.max_payload;
        let mut units = units.into_iter().filter(|unit| {
            if unit.is_empty() {
                tracing::warn!("dropping empty NAL unit");
            }
            !unit.is_empty()
        });

        let mut payloads = Vec::new();
        let mut current = units.next();
        while let Some(unit) = current {
            if unit.len() > max_payload {
                payloads.extend(fragment(unit, max_payload)?);
                current = units.next();
            } else {
                let aggregation = aggregate(
                    unit,
                    &mut units,
                    max_payload,
                    self.config.max_aggregated_units,
                );
                payloads.extend(aggregation.payload);
                current = aggregation.next;
            }
        }

        Ok(payloads)
    }

    /// Split an Annex B access unit and packetize its NAL units.
    pub fn packetize_annex_b(&self, encoded_data: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.packetize_units(split_annex_b(encoded_data))
    }
}

impl Packetizer for H264Packetizer {
    fn packetize(
        &mut self,
        encoded_data: &[u8],
        pts: i64,
        time_base: TimeBase,
    ) -> Result<AccessUnit> {
        let timestamp = rescale(pts, time_base, self.config.clock_rate)?;

        // Parameter sets are picked up during the packetization pass and only
        // stored once the whole access unit succeeded.
        let capture = self.sps.is_none() || self.pps.is_none();
        let mut sps = None;
        let mut pps = None;
        let units = split_annex_b(encoded_data).inspect(|nal| {
            if !capture {
                return;
            }
            match NalHeader::from_unit(nal).map(|h| h.nal_type) {
                Some(NAL_TYPE_SPS) if sps.is_none() => sps = Some(*nal),
                Some(NAL_TYPE_PPS) if pps.is_none() => pps = Some(*nal),
                _ => {}
            }
        });
        let payloads = self.packetize_units(units)?;
        self.remember_parameter_sets(sps, pps);

        tracing::trace!(
            rtp_payloads = payloads.len(),
            frame_bytes = encoded_data.len(),
            pts,
            ts = timestamp,
            "frame packetized"
        );

        Ok(AccessUnit::new(payloads, timestamp))
    }

    fn codec_name(&self) -> &'static str {
        "H264"
    }

    fn clock_rate(&self) -> u32 {
        self.config.clock_rate
    }

    fn payload_type(&self) -> u8 {
        self.config.payload_type
    }

    fn max_payload(&self) -> usize {
        self.config.max_payload
    }

    /// SDP attributes per RFC 6184 §8.2.1.
    ///
    /// Order matters — `a=rtpmap` defines the payload type and MUST precede
    /// `a=fmtp` which references it.
    ///
    /// - `a=rtpmap:<pt> H264/90000` — codec name and clock rate
    /// - `a=fmtp:<pt> packetization-mode=1[;profile-level-id=...][;sprop-parameter-sets=...]`
    /// - `a=control:track1` — track control URL for SETUP
    fn sdp_attributes(&self) -> Vec<String> {
        let pt = self.payload_type();
        let mut fmtp = format!("a=fmtp:{pt} packetization-mode=1");
        if let Some(pl) = self.get_profile_level_id() {
            fmtp.push_str(&format!(";profile-level-id={pl}"));
        }
        if let Some(sprop) = self.get_sprop_parameter_sets() {
            fmtp.push_str(&format!(";sprop-parameter-sets={sprop}"));
        }

        vec![
            format!(
                "a=rtpmap:{} {}/{}",
                pt,
                self.codec_name(),
                self.clock_rate()
            ),
            fmtp,
            "a=control:track1".to_string(),
        ]
    }
}

//! FU-A fragmentation (RFC 6184 §5.8).
//!
//! ```text
//! FU indicator:  [F|NRI|Type=28]     (1 byte)
//! FU header:     [S|E|R|NAL_Type]    (1 byte)
//! Fragment data: [...]               (up to max_payload - 2 bytes)
//! ```
//!
//! The original NAL header byte is not sent; a receiver rebuilds it from the
//! FU indicator's F/NRI bits and the FU header's type.
//!
//! Fragment sizes are balanced rather than greedy: the payload is spread over
//! the minimum number of fragments so that sizes differ by at most one byte.

use crate::error::{PacketizeError, Result};
use crate::media::nal::{FU_A_HEADER_SIZE, FuHeader, NAL_HEADER_SIZE, NAL_TYPE_FU_A, NalHeader};

/// Split one NAL unit into FU-A payloads of at most `max_payload` bytes.
///
/// Meant for units longer than `max_payload`, which always yields two or more
/// fragments. The first fragment has the S bit, the last the E bit.
pub fn fragment(nal: &[u8], max_payload: usize) -> Result<Vec<Vec<u8>>> {
    let header = NalHeader::from_unit(nal).ok_or(PacketizeError::EmptyNalUnit)?;
    let available = max_payload
        .checked_sub(FU_A_HEADER_SIZE)
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            PacketizeError::InvalidConfig(format!("max_payload {max_payload} too small for FU-A"))
        })?;

    let payload = &nal[NAL_HEADER_SIZE..];
    let num_packets = payload.len().div_ceil(available).max(1);
    let base_size = payload.len() / num_packets;
    let num_larger = payload.len() % num_packets;

    let fu_indicator = header.with_type(NAL_TYPE_FU_A).to_byte();

    let mut fragments = Vec::with_capacity(num_packets);
    let mut offset = 0usize;
    for i in 0..num_packets {
        let size = if i < num_larger { base_size + 1 } else { base_size };
        let chunk = &payload[offset..offset + size];
        let fu_header = FuHeader {
            start: i == 0,
            end: i + 1 == num_packets,
            nal_type: header.nal_type,
        };

        let mut packet = Vec::with_capacity(FU_A_HEADER_SIZE + size);
        packet.push(fu_indicator);
        packet.push(fu_header.to_byte());
        packet.extend_from_slice(chunk);
        fragments.push(packet);

        offset += size;
    }

    if offset != payload.len() {
        tracing::error!(
            consumed = offset,
            expected = payload.len(),
            "FU-A fragment accounting mismatch"
        );
        return Err(PacketizeError::FragmentAccounting {
            consumed: offset,
            expected: payload.len(),
        });
    }

    tracing::trace!(
        nal_type = header.nal_type,
        nal_size = nal.len(),
        fragments = fragments.len(),
        "FU-A fragmented NAL unit"
    );

    Ok(fragments)
}

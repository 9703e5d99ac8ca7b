//! H.264 NAL unit header and FU header bit fields.
//!
//! ```text
//! NAL header (RFC 6184 §1.3):   FU header (RFC 6184 §5.8):
//! +---------------+             +---------------+
//! |0|1|2|3|4|5|6|7|             |0|1|2|3|4|5|6|7|
//! +-+-+-+-+-+-+-+-+             +-+-+-+-+-+-+-+-+
//! |F|NRI|  Type   |             |S|E|R|  Type   |
//! +---------------+             +---------------+
//! ```
//!
//! All masks and shifts for these two bytes live here; the fragmenter and
//! aggregator only deal in [`NalHeader`] and [`FuHeader`] values.

const F_MASK: u8 = 0x80;
const NRI_MASK: u8 = 0x60;
const NRI_SHIFT: u8 = 5;
const TYPE_MASK: u8 = 0x1f;
const START_MASK: u8 = 0x80;
const END_MASK: u8 = 0x40;

/// Sequence parameter set.
pub const NAL_TYPE_SPS: u8 = 7;
/// Picture parameter set.
pub const NAL_TYPE_PPS: u8 = 8;
/// Single-Time Aggregation Packet type A (RFC 6184 §5.7.1).
pub const NAL_TYPE_STAP_A: u8 = 24;
/// Fragmentation Unit type A (RFC 6184 §5.8).
pub const NAL_TYPE_FU_A: u8 = 28;

pub const NAL_HEADER_SIZE: usize = 1;
/// FU indicator + FU header.
pub const FU_A_HEADER_SIZE: usize = 2;
/// Big-endian NALU size preceding each aggregated unit.
pub const LENGTH_FIELD_SIZE: usize = 2;
/// STAP-A NAL header plus the first unit's length field.
pub const STAP_A_HEADER_SIZE: usize = NAL_HEADER_SIZE + LENGTH_FIELD_SIZE;

/// Decoded one-byte H.264 NAL unit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NalHeader {
    /// forbidden_zero_bit. Carried through, never validated.
    pub forbidden: bool,
    /// nal_ref_idc, 0..=3.
    pub nri: u8,
    /// nal_unit_type, 0..=31.
    pub nal_type: u8,
}

impl NalHeader {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            forbidden: byte & F_MASK != 0,
            nri: (byte & NRI_MASK) >> NRI_SHIFT,
            nal_type: byte & TYPE_MASK,
        }
    }

    /// Header of a NAL unit, or `None` for an empty slice.
    pub fn from_unit(unit: &[u8]) -> Option<Self> {
        unit.first().copied().map(Self::from_byte)
    }

    pub fn to_byte(self) -> u8 {
        let f = if self.forbidden { F_MASK } else { 0 };
        f | ((self.nri << NRI_SHIFT) & NRI_MASK) | (self.nal_type & TYPE_MASK)
    }

    /// Same F and NRI bits, different type. Used for FU indicators and STAP-A headers.
    pub fn with_type(self, nal_type: u8) -> Self {
        Self { nal_type, ..self }
    }
}

/// Second byte of an FU-A payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuHeader {
    pub start: bool,
    pub end: bool,
    /// Type of the fragmented NAL unit.
    pub nal_type: u8,
}

impl FuHeader {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            start: byte & START_MASK != 0,
            end: byte & END_MASK != 0,
            nal_type: byte & TYPE_MASK,
        }
    }

    pub fn to_byte(self) -> u8 {
        let s = if self.start { START_MASK } else { 0 };
        let e = if self.end { END_MASK } else { 0 };
        s | e | (self.nal_type & TYPE_MASK)
    }
}

//! Classification of produced RTP payloads.
//!
//! Used to describe a packetization plan (the CLI prints one line per
//! payload) and to check payloads in tests. This is not a depacketizer: it
//! only reads the leading header bytes and, for STAP-A, the length fields.

use std::fmt;

use crate::media::nal::{
    FU_A_HEADER_SIZE, FuHeader, LENGTH_FIELD_SIZE, NAL_HEADER_SIZE, NAL_TYPE_FU_A, NAL_TYPE_STAP_A,
    NalHeader,
};

/// The RFC 6184 packet type of one RTP payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadKind {
    /// Single NAL Unit packet (§5.6).
    Single { nal_type: u8 },
    /// STAP-A (§5.7.1), with the length of each aggregated unit.
    StapA { unit_sizes: Vec<usize> },
    /// FU-A fragment (§5.8).
    FuA {
        nal_type: u8,
        start: bool,
        end: bool,
        fragment_size: usize,
    },
    /// Empty, or a STAP-A/FU-A whose framing does not parse.
    Malformed,
}

impl PayloadKind {
    pub fn classify(payload: &[u8]) -> Self {
        let Some(header) = NalHeader::from_unit(payload) else {
            return Self::Malformed;
        };
        match header.nal_type {
            NAL_TYPE_STAP_A => Self::classify_stap_a(&payload[NAL_HEADER_SIZE..]),
            NAL_TYPE_FU_A => match payload.get(1) {
                Some(&byte) => {
                    let fu = FuHeader::from_byte(byte);
                    Self::FuA {
                        nal_type: fu.nal_type,
                        start: fu.start,
                        end: fu.end,
                        fragment_size: payload.len() - FU_A_HEADER_SIZE,
                    }
                }
                None => Self::Malformed,
            },
            nal_type => Self::Single { nal_type },
        }
    }

    fn classify_stap_a(mut rest: &[u8]) -> Self {
        let mut unit_sizes = Vec::new();
        while !rest.is_empty() {
            let Some(field) = rest.get(..LENGTH_FIELD_SIZE) else {
                return Self::Malformed;
            };
            let len = usize::from(u16::from_be_bytes([field[0], field[1]]));
            if len == 0 || rest.len() < LENGTH_FIELD_SIZE + len {
                return Self::Malformed;
            }
            unit_sizes.push(len);
            rest = &rest[LENGTH_FIELD_SIZE + len..];
        }
        if unit_sizes.is_empty() {
            return Self::Malformed;
        }
        Self::StapA { unit_sizes }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { nal_type } => write!(f, "single nal_type={nal_type}"),
            Self::StapA { unit_sizes } => write!(f, "STAP-A units={unit_sizes:?}"),
            Self::FuA {
                nal_type,
                start,
                end,
                fragment_size,
            } => {
                let position = match (start, end) {
                    (true, true) => "start+end",
                    (true, false) => "start",
                    (false, true) => "end",
                    (false, false) => "middle",
                };
                write!(
                    f,
                    "FU-A nal_type={nal_type} {position} fragment={fragment_size}"
                )
            }
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

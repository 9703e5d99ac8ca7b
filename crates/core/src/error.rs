//! Error types for the H.264 RTP packetizer.

/// Errors that can occur while packetizing an access unit.
///
/// Variants map to specific failure modes:
///
/// - **Input**: [`EmptyNalUnit`](Self::EmptyNalUnit) — a zero-length NAL unit
///   was handed directly to the fragmenter. The orchestrator never surfaces
///   this; it drops empty units before dispatch.
/// - **Internal**: [`FragmentAccounting`](Self::FragmentAccounting) — the
///   fragmenter did not consume exactly the NAL payload. Aborts the access unit.
/// - **Configuration**: [`InvalidConfig`](Self::InvalidConfig),
///   [`InvalidTimeBase`](Self::InvalidTimeBase).
/// - **Timestamp**: [`TimestampOverflow`](Self::TimestampOverflow).
/// - **Sink**: [`Io`](Self::Io) — failures reported by a [`PayloadSink`](crate::PayloadSink).
#[derive(Debug, thiserror::Error)]
pub enum PacketizeError {
    /// Underlying I/O or socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A NAL unit with no header byte reached a component that needs one.
    #[error("empty NAL unit")]
    EmptyNalUnit,

    /// FU-A fragmentation consumed a different number of bytes than the NAL payload holds.
    #[error("FU-A accounting mismatch: consumed {consumed} of {expected} payload bytes")]
    FragmentAccounting { consumed: usize, expected: usize },

    /// A [`PacketizerConfig`](crate::PacketizerConfig) field is out of range.
    #[error("invalid packetizer config: {0}")]
    InvalidConfig(String),

    /// A time base was malformed or had a zero denominator.
    #[error("invalid time base: {0}")]
    InvalidTimeBase(String),

    /// The rescaled timestamp does not fit in 64 bits.
    #[error("timestamp overflow while rescaling")]
    TimestampOverflow,
}

/// Convenience alias for `Result<T, PacketizeError>`.
pub type Result<T> = std::result::Result<T, PacketizeError>;

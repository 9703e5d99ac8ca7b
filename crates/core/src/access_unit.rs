use crate::error::Result;

/// Every RTP payload produced from one encoded frame, plus its timestamp.
///
/// Payloads are in transmission order and each is an owned copy, so the
/// input buffer can be dropped as soon as packetization returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessUnit {
    /// RTP payloads (no RTP header), each at most the configured max payload.
    pub payloads: Vec<Vec<u8>>,
    /// Presentation timestamp in destination clock ticks.
    pub timestamp: i64,
}

impl AccessUnit {
    pub fn new(payloads: Vec<Vec<u8>>, timestamp: i64) -> Self {
        Self {
            payloads,
            timestamp,
        }
    }

    /// Timestamp as written to the RTP header: the low 32 bits, wrapping.
    pub fn rtp_timestamp(&self) -> u32 {
        self.timestamp as u32
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Sum of all payload lengths.
    pub fn total_bytes(&self) -> usize {
        self.payloads.iter().map(Vec::len).sum()
    }

    /// Hand every payload to `sink` in order.
    ///
    /// All payloads share [`rtp_timestamp`](Self::rtp_timestamp); only the
    /// last one carries the marker flag (RFC 6184 §5.1). Returns the number of
    /// payloads sent. Stops at the first sink error.
    pub fn deliver<S: PayloadSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        let ts = self.rtp_timestamp();
        let last = self.payloads.len().saturating_sub(1);
        for (i, payload) in self.payloads.iter().enumerate() {
            sink.send_payload(payload, ts, i == last)?;
        }
        Ok(self.payloads.len())
    }
}

/// Destination for packetized payloads, typically an RTP session.
///
/// Implementors own the RTP header: sequence numbers (one per payload,
/// increasing across the whole session), SSRC, and payload type. The
/// timestamp and marker flag are supplied here.
pub trait PayloadSink {
    fn send_payload(&mut self, payload: &[u8], rtp_timestamp: u32, marker: bool) -> Result<()>;
}

//! STAP-A aggregation (RFC 6184 §5.7.1).
//!
//! ```text
//! STAP-A NAL HDR: [F|NRI|Type=24]    (1 byte)
//! NALU 1 size:    [u16 big-endian]   (2 bytes)
//! NALU 1:         [...]
//! NALU 2 size:    [u16 big-endian]   (2 bytes)
//! NALU 2:         [...]
//! ...
//! ```
//!
//! The aggregate header starts from the first unit's F/NRI bits. F is the OR
//! over all units; NRI is replaced whenever the stored value is lower than an
//! incoming unit's.

use crate::config::MAX_AGGREGATED_UNITS;
use crate::media::nal::{LENGTH_FIELD_SIZE, NAL_TYPE_STAP_A, NalHeader, STAP_A_HEADER_SIZE};

/// Result of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation<'a> {
    /// A STAP-A payload, or the first unit's bytes unchanged when nothing else fit.
    /// `None` when `first` was empty and nothing was produced.
    pub payload: Option<Vec<u8>>,
    /// The unit pulled from upstream but not consumed. `None` once upstream is exhausted.
    pub next: Option<&'a [u8]>,
}

/// Greedily pack `first` and the units that follow it into one STAP-A payload.
///
/// Units are pulled from `units` while they fit in `max_payload` and fewer
/// than `max_units` (never more than 9) have been packed. The first unit that
/// does not fit is handed back in [`Aggregation::next`] so the caller resumes
/// from it.
///
/// `first` must be no longer than `max_payload`, and `max_payload` must fit
/// a 16-bit length field. An empty `first` is skipped: no payload is produced
/// and the next upstream unit is handed back for the caller to dispatch. When
/// only one unit ends up packed, it is returned without a STAP-A header.
pub fn aggregate<'a, I>(
    first: &'a [u8],
    units: &mut I,
    max_payload: usize,
    max_units: usize,
) -> Aggregation<'a>
where
    I: Iterator<Item = &'a [u8]>,
{
    debug_assert!(max_payload <= usize::from(u16::MAX));

    let Some(first_header) = NalHeader::from_unit(first) else {
        tracing::warn!("skipping empty NAL unit during STAP-A aggregation");
        return Aggregation {
            payload: None,
            next: units.next(),
        };
    };

    let max_units = max_units.min(MAX_AGGREGATED_UNITS);
    // Budget always reserves the length field of the next candidate.
    let mut available = max_payload.saturating_sub(STAP_A_HEADER_SIZE);
    let mut stap_header = first_header.with_type(NAL_TYPE_STAP_A);

    let mut body = Vec::with_capacity(max_payload);
    let mut count = 0usize;
    let mut candidate = Some(first);

    while let Some(unit) = candidate {
        if unit.len() > available || count >= max_units {
            break;
        }
        let Some(header) = NalHeader::from_unit(unit) else {
            tracing::warn!("skipping empty NAL unit during STAP-A aggregation");
            candidate = units.next();
            continue;
        };

        stap_header.forbidden |= header.forbidden;
        if stap_header.nri < header.nri {
            stap_header.nri = header.nri;
        }

        available = available.saturating_sub(LENGTH_FIELD_SIZE + unit.len());
        count += 1;
        // unit.len() <= max_payload, which fits a u16
        body.extend_from_slice(&(unit.len() as u16).to_be_bytes());
        body.extend_from_slice(unit);

        candidate = units.next();
    }

    if count == 0 {
        candidate = units.next();
    }

    if count <= 1 {
        return Aggregation {
            payload: Some(first.to_vec()),
            next: candidate,
        };
    }

    tracing::trace!(
        units = count,
        stap_size = 1 + body.len(),
        "STAP-A aggregated NAL units"
    );

    let mut payload = Vec::with_capacity(1 + body.len());
    payload.push(stap_header.to_byte());
    payload.extend_from_slice(&body);
    Aggregation {
        payload: Some(payload),
        next: candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 1300;

    fn make_nal(header: u8, len: usize) -> Vec<u8> {
        let mut nal = vec![header];
        nal.resize(len, 0xAB);
        nal
    }

    fn payload<'b>(agg: &'b Aggregation<'_>) -> &'b [u8] {
        agg.payload.as_deref().expect("aggregation payload")
    }

    fn unpack(payload: &[u8]) -> Vec<Vec<u8>> {
        let mut units = Vec::new();
        let mut rest = &payload[1..];
        while rest.len() >= 2 {
            let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
            units.push(rest[2..2 + len].to_vec());
            rest = &rest[2 + len..];
        }
        units
    }

    #[test]
    fn three_small_units_aggregate() {
        let a = make_nal(0x67, 100);
        let b = make_nal(0x68, 150);
        let c = make_nal(0x65, 200);
        let rest = [b.as_slice(), c.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg).len(), 1 + (2 + 100) + (2 + 150) + (2 + 200));
        assert_eq!(payload(&agg).len(), 457);
        assert_eq!(payload(&agg)[0] & 0x1f, NAL_TYPE_STAP_A);
        assert_eq!(agg.next, None);
        assert_eq!(unpack(payload(&agg)), vec![a.clone(), b.clone(), c.clone()]);
    }

    #[test]
    fn single_fitting_unit_is_passed_through() {
        let a = make_nal(0x65, 800);
        let b = make_nal(0x41, 800);
        let rest = [b.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg), a);
        assert_eq!(agg.next, Some(b.as_slice()));
    }

    #[test]
    fn lone_unit_is_passed_through() {
        let a = make_nal(0x09, 2);
        let mut iter = std::iter::empty::<&[u8]>();
        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg), a);
        assert_eq!(agg.next, None);
    }

    #[test]
    fn unit_too_big_for_stap_fetches_replacement() {
        // Fits a single-NAL payload but not the STAP-A budget.
        let a = make_nal(0x65, MAX - 1);
        let b = make_nal(0x41, 10);
        let c = make_nal(0x41, 10);
        let rest = [b.as_slice(), c.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg), a);
        assert_eq!(agg.next, Some(b.as_slice()));
        assert_eq!(iter.next(), Some(c.as_slice()));
    }

    #[test]
    fn cap_of_nine_units() {
        let units: Vec<Vec<u8>> = (0..12).map(|_| make_nal(0x06, 10)).collect();
        let mut iter = units[1..].iter().map(Vec::as_slice);

        let agg = aggregate(&units[0], &mut iter, MAX, 9);
        assert_eq!(unpack(payload(&agg)).len(), 9);
        assert_eq!(agg.next, Some(units[9].as_slice()));
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn stops_at_budget_and_never_exceeds_max_payload() {
        let units: Vec<Vec<u8>> = (0..5).map(|_| make_nal(0x41, 400)).collect();
        let mut iter = units[1..].iter().map(Vec::as_slice);

        let agg = aggregate(&units[0], &mut iter, MAX, 9);
        assert_eq!(unpack(payload(&agg)).len(), 3);
        assert!(payload(&agg).len() <= MAX);
        assert_eq!(agg.next, Some(units[3].as_slice()));
    }

    #[test]
    fn exact_fit_reaches_max_payload() {
        // 1 + (2 + 600) + (2 + 695) = 1300
        let a = make_nal(0x41, 600);
        let b = make_nal(0x41, 695);
        let rest = [b.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg).len(), MAX);
        assert_eq!(agg.next, None);
    }

    #[test]
    fn header_merges_f_and_nri() {
        let a = make_nal(0x01, 10); // F=0, NRI=0
        let b = make_nal(0x41, 10); // NRI=2
        let c = make_nal(0xA1, 10); // F=1, NRI=1
        let rest = [b.as_slice(), c.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        let header = NalHeader::from_byte(payload(&agg)[0]);
        assert!(header.forbidden);
        assert_eq!(header.nri, 2);
        assert_eq!(header.nal_type, NAL_TYPE_STAP_A);
    }

    #[test]
    fn nri_starts_from_first_unit() {
        let a = make_nal(0x67, 10); // NRI=3
        let b = make_nal(0x06, 10); // NRI=0
        let rest = [b.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(payload(&agg)[0], 0x78);
    }

    #[test]
    fn empty_upstream_units_are_skipped() {
        let a = make_nal(0x67, 10);
        let b = make_nal(0x68, 10);
        let rest = [&[][..], b.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&a, &mut iter, MAX, 9);
        assert_eq!(unpack(payload(&agg)), vec![a.clone(), b.clone()]);
    }

    #[test]
    fn unit_cap_cannot_exceed_nine() {
        let units: Vec<Vec<u8>> = (0..15).map(|_| make_nal(0x06, 4)).collect();
        let mut iter = units[1..].iter().map(Vec::as_slice);

        let agg = aggregate(&units[0], &mut iter, MAX, 20);
        assert_eq!(unpack(payload(&agg)).len(), 9);
        assert_eq!(agg.next, Some(units[9].as_slice()));
    }

    #[test]
    fn empty_first_unit_hands_back_next() {
        let b = vec![0x41, 1, 2];
        let rest = [b.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&[], &mut iter, MAX, 9);
        assert_eq!(agg.payload, None);
        assert_eq!(agg.next, Some(b.as_slice()));
    }

    #[test]
    fn empty_first_unit_keeps_oversized_next() {
        let big = make_nal(0x65, MAX - 1);
        let c = make_nal(0x41, 10);
        let rest = [big.as_slice(), c.as_slice()];
        let mut iter = rest.into_iter();

        let agg = aggregate(&[], &mut iter, MAX, 9);
        assert_eq!(agg.payload, None);
        assert_eq!(agg.next, Some(big.as_slice()));
        assert_eq!(iter.next(), Some(c.as_slice()));
    }
}

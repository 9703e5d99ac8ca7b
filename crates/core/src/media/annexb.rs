//! Annex B byte stream splitting.
//!
//! H.264 Annex B bitstreams delimit NAL units with start codes:
//! - 4-byte: `0x00 0x00 0x00 0x01`
//! - 3-byte: `0x00 0x00 0x01`
//!
//! The splitter only searches for the 3-byte marker. When the byte right
//! before a terminating marker is `0x00`, the marker was really a 4-byte
//! start code and that zero is left out of the preceding unit.

use std::iter::FusedIterator;

const START_CODE: [u8; 3] = [0, 0, 1];

/// Lazily split an Annex B buffer into NAL units, start codes removed.
///
/// Units borrow from `data` and come out in stream order. Two adjacent start
/// codes produce a zero-length unit; callers decide what to do with it.
pub fn split_annex_b(data: &[u8]) -> NalUnits<'_> {
    NalUnits {
        data,
        cursor: 0,
        done: false,
    }
}

/// Iterator returned by [`split_annex_b`].
#[derive(Debug, Clone)]
pub struct NalUnits<'a> {
    data: &'a [u8],
    cursor: usize,
    done: bool,
}

fn find_start_code(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(START_CODE.len())
        .position(|w| w == START_CODE)
        .map(|pos| pos + from)
}

impl<'a> Iterator for NalUnits<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(marker) = find_start_code(self.data, self.cursor) else {
            self.done = true;
            return None;
        };
        let start = marker + START_CODE.len();

        match find_start_code(self.data, start) {
            None => {
                self.done = true;
                Some(&self.data[start..])
            }
            Some(next) => {
                self.cursor = next;
                // data[start - 1] is the marker's 0x01, so end never precedes start
                let end = if self.data[next - 1] == 0 { next - 1 } else { next };
                Some(&self.data[start..end])
            }
        }
    }
}

impl FusedIterator for NalUnits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(data: &[u8]) -> Vec<Vec<u8>> {
        split_annex_b(data).map(<[u8]>::to_vec).collect()
    }

    #[test]
    fn single_nal_4byte_sc() {
        let data = [0, 0, 0, 1, 0x65, 0xAA, 0xBB];
        assert_eq!(split(&data), vec![vec![0x65, 0xAA, 0xBB]]);
    }

    #[test]
    fn single_nal_3byte_sc() {
        let data = [0, 0, 1, 0x67, 0x42, 0x00];
        assert_eq!(split(&data), vec![vec![0x67, 0x42, 0x00]]);
    }

    #[test]
    fn two_nals_4byte_sc() {
        let mut data = vec![0, 0, 0, 1, 0x67, 0x42];
        data.extend_from_slice(&[0, 0, 0, 1, 0x68, 0xCE]);
        assert_eq!(split(&data), vec![vec![0x67, 0x42], vec![0x68, 0xCE]]);
    }

    #[test]
    fn three_byte_then_four_byte() {
        let a = [0x67, 0x42, 0xC0, 0x1F];
        let b = [0x68, 0xCE, 0x3C, 0x80];
        let data = [&[0u8, 0, 1][..], &a, &[0, 0, 0, 1], &b].concat();
        assert_eq!(split(&data), vec![a.to_vec(), b.to_vec()]);
    }

    #[test]
    fn alternating_start_codes_round_trip() {
        let units: Vec<Vec<u8>> = (0..6u8)
            .map(|i| {
                let mut unit = vec![0x41 + i];
                unit.extend(std::iter::repeat_n(0x10 + i, 5 + i as usize * 7));
                unit
            })
            .collect();

        let mut data = Vec::new();
        for (i, unit) in units.iter().enumerate() {
            if i % 2 == 0 {
                data.extend_from_slice(&[0, 0, 1]);
            } else {
                data.extend_from_slice(&[0, 0, 0, 1]);
            }
            data.extend_from_slice(unit);
        }

        assert_eq!(split(&data), units);
    }

    #[test]
    fn empty_data() {
        assert_eq!(split_annex_b(&[]).count(), 0);
    }

    #[test]
    fn no_start_code() {
        assert_eq!(split_annex_b(&[0xFF, 0xFE, 0x00, 0x00]).count(), 0);
    }

    #[test]
    fn leading_garbage_is_skipped() {
        let data = [0xAB, 0xCD, 0, 0, 1, 0x09, 0xF0];
        assert_eq!(split(&data), vec![vec![0x09, 0xF0]]);
    }

    #[test]
    fn bare_start_code_yields_empty_unit() {
        assert_eq!(split(&[0, 0, 1]), vec![Vec::<u8>::new()]);
        assert_eq!(split(&[0, 0, 0, 1]), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn adjacent_start_codes_yield_empty_unit() {
        let data = [0, 0, 1, 0, 0, 0, 1, 0x65, 0x88];
        assert_eq!(split(&data), vec![vec![], vec![0x65, 0x88]]);
    }

    #[test]
    fn iterator_is_fused() {
        let mut units = split_annex_b(&[0, 0, 1, 0x09]);
        assert_eq!(units.next(), Some(&[0x09][..]));
        assert_eq!(units.next(), None);
        assert_eq!(units.next(), None);
    }
}

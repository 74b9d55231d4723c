use std::ops::Range;

/// Best placement of a fragment: the smallest number of mismatches found and
/// the offset where it was first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHit {
    pub mismatches: usize,
    pub offset: Option<usize>,
}

impl ScanHit {
    /// The hit reported when no offset could be evaluated. It carries one
    /// mismatch more than the fragment length so any real placement beats it.
    pub fn unplaced(fragment_len: usize) -> Self {
        Self {
            mismatches: fragment_len + 1,
            offset: None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.offset.is_some()
    }

    /// Offset as a signed integer, -1 if the fragment was not placed.
    pub fn signed_offset(&self) -> i64 {
        self.offset.map_or(-1, |x| x as i64)
    }
}

pub trait MismatchScanner {
    /// Find the best placement of `fragment` among the start offsets in
    /// `window`. Offsets are absolute positions in `reference`. The scan stops
    /// at the first start offset where the fragment no longer fits.
    fn scan_window(&self, fragment: &[u8], reference: &[u8], window: Range<usize>) -> ScanHit;

    /// Find the best placement of `fragment` anywhere in `search_space`.
    fn scan(&self, fragment: &[u8], search_space: &[u8]) -> ScanHit {
        self.scan_window(fragment, search_space, 0..search_space.len())
    }
}

/// Exhaustive scanner: every start offset is compared symbol by symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceScanner;

impl MismatchScanner for BruteForceScanner {
    fn scan_window(&self, fragment: &[u8], reference: &[u8], window: Range<usize>) -> ScanHit {
        let mut best = ScanHit::unplaced(fragment.len());
        for start in window {
            let Some(target) = reference
                .get(start..)
                .and_then(|x| x.get(..fragment.len()))
            else {
                break;
            };
            let n = count_mismatches(fragment, target);
            // Strict comparison: ties keep the lowest offset.
            if n < best.mismatches {
                best = ScanHit {
                    mismatches: n,
                    offset: Some(start),
                };
            }
        }
        best
    }
}

/// Best placement of `fragment` in `search_space` using the exhaustive scanner.
pub fn scan(fragment: &[u8], search_space: &[u8]) -> ScanHit {
    BruteForceScanner.scan(fragment, search_space)
}

/// Windowed form of [`scan`], see [`MismatchScanner::scan_window`].
pub fn scan_window(fragment: &[u8], reference: &[u8], window: Range<usize>) -> ScanHit {
    BruteForceScanner.scan_window(fragment, reference, window)
}

fn count_mismatches(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use readset::utils::hamming_distance;

    fn random_seq(rng: &mut StdRng, len: usize) -> Vec<u8> {
        (0..len).map(|_| b"ACGT"[rng.random_range(0..4usize)]).collect()
    }

    #[test]
    fn test_exact_match() {
        let hit = scan(b"GATT", b"CCCCGATTCC");
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(4) });

        // Repeated occurrences report the first one.
        let hit = scan(b"ACGT", b"TTACGTACGTACGT");
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(2) });
    }

    #[test]
    fn test_tie_breaks_to_lowest_offset() {
        // Every offset of "AGCC" is one mismatch away from "AC".
        let hit = scan(b"AC", b"AGCC");
        assert_eq!(hit, ScanHit { mismatches: 1, offset: Some(0) });

        let hit = scan(b"TTTT", b"AAAAAAAA");
        assert_eq!(hit, ScanHit { mismatches: 4, offset: Some(0) });
    }

    #[test]
    fn test_last_offset_is_scanned() {
        let hit = scan(b"GG", b"AAAGG");
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(3) });

        let hit = scan(b"ACGT", b"ACGT");
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(0) });
    }

    #[test]
    fn test_fragment_longer_than_search_space() {
        let hit = scan(b"ACGTACGT", b"ACGT");
        assert_eq!(hit, ScanHit::unplaced(8));
        assert_eq!(hit.mismatches, 9);
        assert_eq!(hit.signed_offset(), -1);
        assert!(!hit.is_placed());
    }

    #[test]
    fn test_scan_window() {
        let reference = b"AAAAAAAAAACGTAAAAAACGT";
        // Window offsets are absolute.
        let hit = scan_window(b"CGT", reference, 5..15);
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(10) });

        // Upstream matches are not visible from a downstream window.
        let hit = scan_window(b"CGT", reference, 13..17);
        assert_eq!(hit, ScanHit { mismatches: 3, offset: Some(13) });

        // The window is clipped at the reference end.
        let hit = scan_window(b"CGT", reference, 19..40);
        assert_eq!(hit, ScanHit { mismatches: 0, offset: Some(19) });
        let hit = scan_window(b"CGT", reference, 20..40);
        assert_eq!(hit, ScanHit::unplaced(3));
        let hit = scan_window(b"CGT", reference, 100..140);
        assert_eq!(hit, ScanHit::unplaced(3));
    }

    #[test]
    fn test_against_oracle() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..500 {
            let ref_len = rng.random_range(1..40usize);
            let frag_len = rng.random_range(1..=ref_len);
            let reference = random_seq(&mut rng, ref_len);
            let fragment = random_seq(&mut rng, frag_len);

            let distances = (0..=ref_len - frag_len)
                .map(|i| hamming_distance(&fragment, &reference[i..i + frag_len]).unwrap())
                .collect::<Vec<_>>();
            let min = *distances.iter().min().unwrap();
            let first = distances.iter().position(|&d| d == min).unwrap();

            let hit = scan(&fragment, &reference);
            assert_eq!(hit.mismatches, min);
            assert_eq!(hit.offset, Some(first));
            assert!(first + frag_len <= ref_len);
        }
    }
}

use super::scanner::{BruteForceScanner, MismatchScanner, ScanHit};
use crate::error::{Error, Result};
use crate::opts::AlignerOpts;
use crate::progress::ProgressObserver;
use crate::qc::AlignQC;

use bstr::ByteSlice;
use log::{debug, info, warn};
use readset::ReadPair;

/// Placements of the two fragments of a read pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentResult {
    pub front: ScanHit,
    pub back: ScanHit,
}

impl AlignmentResult {
    pub fn total_mismatches(&self) -> usize {
        self.front.mismatches + self.back.mismatches
    }

    pub fn front_offset(&self) -> Option<usize> {
        self.front.offset
    }

    pub fn back_offset(&self) -> Option<usize> {
        self.back.offset
    }

    /// `[front_offset, back_offset]`, -1 for a fragment that was not placed.
    pub fn location(&self) -> [i64; 2] {
        [self.front.signed_offset(), self.back.signed_offset()]
    }

    /// Distance from the front offset to the back offset.
    pub fn insert_distance(&self) -> Option<usize> {
        Some(self.back.offset? - self.front.offset?)
    }
}

/// A read pair as it lies on the reference: the front fragment and the
/// reoriented back fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedPair {
    pub front: Vec<u8>,
    pub back: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Accepted {
        result: AlignmentResult,
        pair: OrientedPair,
    },
    /// Both fragments were searched but the total number of mismatches is not
    /// below the threshold.
    Rejected(AlignmentResult),
    /// The front fragment had too many mismatches for a back search.
    EarlyTerminated(AlignmentResult),
}

impl PairOutcome {
    pub fn result(&self) -> &AlignmentResult {
        match self {
            PairOutcome::Accepted { result, .. } => result,
            PairOutcome::Rejected(result) => result,
            PairOutcome::EarlyTerminated(result) => result,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PairOutcome::Accepted { .. })
    }
}

/// Accepted alignments and their oriented read pairs. The two lists have the
/// same length and are indexed identically, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentSet {
    locations: Vec<AlignmentResult>,
    read_pairs: Vec<OrientedPair>,
}

impl AlignmentSet {
    fn push(&mut self, result: AlignmentResult, pair: OrientedPair) {
        self.locations.push(result);
        self.read_pairs.push(pair);
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn locations(&self) -> &[AlignmentResult] {
        &self.locations
    }

    pub fn read_pairs(&self) -> &[OrientedPair] {
        &self.read_pairs
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&AlignmentResult, &OrientedPair)> + '_ {
        self.locations.iter().zip(self.read_pairs.iter())
    }

    pub fn into_parts(self) -> (Vec<AlignmentResult>, Vec<OrientedPair>) {
        (self.locations, self.read_pairs)
    }
}

/// Places read pairs on a reference: the front fragment anywhere, the back
/// fragment in a window downstream of the front placement.
#[derive(Debug, Clone)]
pub struct PairAligner<S = BruteForceScanner> {
    opts: AlignerOpts,
    scanner: S,
}

impl PairAligner<BruteForceScanner> {
    pub fn new(opts: AlignerOpts) -> Result<Self> {
        Self::with_scanner(opts, BruteForceScanner)
    }
}

impl<S: MismatchScanner> PairAligner<S> {
    pub fn with_scanner(opts: AlignerOpts, scanner: S) -> Result<Self> {
        opts.validate()?;
        Ok(Self { opts, scanner })
    }

    pub fn opts(&self) -> &AlignerOpts {
        &self.opts
    }

    /// Align a single pair. The pair is assumed to be valid for `reference`,
    /// degenerate inputs produce unplaced hits instead of errors.
    pub fn align_pair(&self, pair: &ReadPair, reference: &[u8]) -> PairOutcome {
        let front = self.scanner.scan(&pair.front, reference);

        let Some(front_offset) = front.offset.filter(|_| front.mismatches < self.opts.early_exit_mismatches)
        else {
            let result = AlignmentResult {
                front,
                back: ScanHit { mismatches: 0, offset: None },
            };
            return PairOutcome::EarlyTerminated(result);
        };

        let back_fragment = self.opts.back_orientation.orient(&pair.back);
        let window = front_offset.saturating_add(self.opts.back_window.start)
            ..front_offset.saturating_add(self.opts.back_window.end);
        let back = self.scanner.scan_window(&back_fragment, reference, window);

        let result = AlignmentResult { front, back };
        if result.total_mismatches() < self.opts.threshold {
            PairOutcome::Accepted {
                result,
                pair: OrientedPair {
                    front: pair.front.clone(),
                    back: back_fragment,
                },
            }
        } else {
            PairOutcome::Rejected(result)
        }
    }

    /// Align all pairs in input order and collect the accepted ones.
    pub fn align(&self, read_pairs: &[ReadPair], reference: &[u8]) -> Result<(AlignmentSet, AlignQC)> {
        self.align_with_observer(read_pairs, reference, &mut ())
    }

    pub fn align_with_observer<O: ProgressObserver>(
        &self,
        read_pairs: &[ReadPair],
        reference: &[u8],
        observer: &mut O,
    ) -> Result<(AlignmentSet, AlignQC)> {
        validate_input(read_pairs, reference)?;
        if read_pairs.is_empty() {
            warn!("No read pairs to align");
        }
        info!(
            "Aligning {} read pairs against a reference of {} bases...",
            read_pairs.len(),
            reference.len()
        );

        let mut alignments = AlignmentSet::default();
        let mut qc = AlignQC::default();
        observer.on_start(read_pairs.len());
        for (i, pair) in read_pairs.iter().enumerate() {
            let outcome = self.align_pair(pair, reference);
            qc.add(&outcome);
            observer.on_pair(i, &outcome);
            match outcome {
                PairOutcome::Accepted { result, pair } => {
                    debug!(
                        "Pair {} accepted at {:?} with {} mismatches",
                        i,
                        result.location(),
                        result.total_mismatches()
                    );
                    alignments.push(result, pair);
                }
                PairOutcome::Rejected(result) => debug!(
                    "Pair {} rejected: {} mismatches at {:?}",
                    i,
                    result.total_mismatches(),
                    result.location()
                ),
                PairOutcome::EarlyTerminated(result) => debug!(
                    "Pair {} ({}) skipped: front has {} mismatches",
                    i,
                    pair.front.as_bstr(),
                    result.front.mismatches
                ),
            }
        }
        observer.on_finish(&qc);

        info!("Matched {} read pairs", alignments.len());
        Ok((alignments, qc))
    }
}

fn validate_input(read_pairs: &[ReadPair], reference: &[u8]) -> Result<()> {
    if reference.is_empty() {
        return Err(Error::InvalidInput("reference is empty".to_string()));
    }
    for (i, pair) in read_pairs.iter().enumerate() {
        if pair.front.is_empty() || pair.back.is_empty() {
            return Err(Error::InvalidInput(format!(
                "read pair {} has an empty fragment",
                i
            )));
        }
        let longest = pair.front.len().max(pair.back.len());
        if longest > reference.len() {
            return Err(Error::InvalidInput(format!(
                "read pair {} has a fragment of {} bases, longer than the reference ({} bases)",
                i,
                longest,
                reference.len()
            )));
        }
    }
    Ok(())
}

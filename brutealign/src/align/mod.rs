mod pair_aligner;
mod scanner;

pub use pair_aligner::{AlignmentResult, AlignmentSet, OrientedPair, PairAligner, PairOutcome};
pub use scanner::{scan, scan_window, BruteForceScanner, MismatchScanner, ScanHit};

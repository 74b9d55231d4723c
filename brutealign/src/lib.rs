pub mod align;
pub mod error;
pub mod io;
pub mod opts;
pub mod progress;
pub mod qc;
pub mod report;

pub use align::{AlignmentResult, AlignmentSet, OrientedPair, PairAligner, PairOutcome};
pub use error::{Error, Result};
pub use opts::{AlignerOpts, BackOrientation};

//! Input data for paired-read alignment: a single reference sequence and a
//! list of read pairs, loaded from line oriented text files.

mod reads;
mod reference;
pub mod utils;

pub use reads::{read_pairs, ReadPair, ReadPairReader, ReadPairs};
pub use reference::Reference;

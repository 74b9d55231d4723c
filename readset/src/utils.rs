use anyhow::{bail, Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gzip" | "gz" => Ok(Compression::Gzip),
            "zstd" | "zstandard" | "zst" => Ok(Compression::Zstd),
            _ => Err(format!("unsupported compression: {}", s)),
        }
    }
}

impl Compression {
    /// Guess the compression from the file extension.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        match path.as_ref().extension()?.to_str()? {
            "gz" => Some(Compression::Gzip),
            "zst" => Some(Compression::Zstd),
            _ => None,
        }
    }
}

/// Open a file, possibly compressed. Supports gzip and zstd.
pub fn open_file<P: AsRef<Path>>(file: P) -> Result<Box<dyn BufRead>> {
    let path = file.as_ref();
    let compression = detect_compression(path)?;
    let handle = File::open(path).with_context(|| format!("cannot open file: {}", path.display()))?;
    let reader: Box<dyn BufRead> = match compression {
        Some(Compression::Gzip) => Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(handle))),
        Some(Compression::Zstd) => Box::new(BufReader::new(
            zstd::stream::read::Decoder::new(handle)
                .with_context(|| format!("cannot decode zstd file: {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(handle)),
    };
    Ok(reader)
}

/// Determine the file compression type. Gzip is detected from the magic
/// bytes, zstd from the `.zst` extension.
fn detect_compression(path: &Path) -> Result<Option<Compression>> {
    let file = File::open(path).with_context(|| format!("cannot open file: {}", path.display()))?;
    if flate2::read::MultiGzDecoder::new(file).header().is_some() {
        Ok(Some(Compression::Gzip))
    } else if Compression::from_extension(path) == Some(Compression::Zstd) {
        Ok(Some(Compression::Zstd))
    } else {
        Ok(None)
    }
}

pub fn hamming_distance(seq1: &[u8], seq2: &[u8]) -> Result<usize> {
    if seq1.len() != seq2.len() {
        bail!(
            "sequences must be of the same length: {} != {}",
            seq1.len(),
            seq2.len()
        );
    }
    Ok(seq1
        .iter()
        .zip(seq2.iter())
        .filter(|(a, b)| a != b)
        .count())
}

pub fn reverse(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().copied().collect()
}

/// Reverse complement. Symbols outside of ACGT are kept as they are.
pub fn rev_compl(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&x| match x {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            b'a' => b't',
            b't' => b'a',
            b'c' => b'g',
            b'g' => b'c',
            _ => x,
        })
        .collect()
}

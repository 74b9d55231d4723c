use crate::utils::{open_file, rev_compl, reverse};

use anyhow::{bail, Context, Result};
use bstr::ByteSlice;
use itertools::Itertools;
use std::io::BufRead;
use std::path::Path;

/// A pair of sequencing fragments. `back` is stored as sequenced, i.e. it has
/// not been reversed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    pub front: Vec<u8>,
    pub back: Vec<u8>,
}

impl ReadPair {
    pub fn new<A: Into<Vec<u8>>, B: Into<Vec<u8>>>(front: A, back: B) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    pub fn reversed_back(&self) -> Vec<u8> {
        reverse(&self.back)
    }

    pub fn rev_compl_back(&self) -> Vec<u8> {
        rev_compl(&self.back)
    }
}

impl std::fmt::Display for ReadPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.front.as_bstr(), self.back.as_bstr())
    }
}

/// Reader of comma separated read pairs, one pair per line.
pub struct ReadPairReader {
    reader: Box<dyn BufRead>,
    line_no: usize,
    buf: String,
}

impl ReadPairReader {
    pub fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_file(path)?))
    }

    /// Read the next pair, skipping headers and blank lines. Returns `None` at
    /// the end of input.
    pub fn read_pair(&mut self) -> Result<Option<ReadPair>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() || line.starts_with('>') {
                continue;
            }
            return parse_pair(line)
                .with_context(|| format!("invalid read pair at line {}", self.line_no))
                .map(Some);
        }
    }

    pub fn records(&mut self) -> ReadPairs<'_> {
        ReadPairs { inner: self }
    }
}

pub struct ReadPairs<'a> {
    inner: &'a mut ReadPairReader,
}

impl<'a> Iterator for ReadPairs<'a> {
    type Item = Result<ReadPair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.read_pair().transpose()
    }
}

fn parse_pair(line: &str) -> Result<ReadPair> {
    let Some((front, back)) = line.split(',').map(str::trim).collect_tuple() else {
        bail!("expecting two comma separated fragments, found: {}", line);
    };
    if front.is_empty() || back.is_empty() {
        bail!("fragments must not be empty: {}", line);
    }
    Ok(ReadPair::new(front, back))
}

/// Load all read pairs from a file, possibly compressed.
pub fn read_pairs<P: AsRef<Path>>(path: P) -> Result<Vec<ReadPair>> {
    let path = path.as_ref();
    ReadPairReader::from_path(path)?
        .records()
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("cannot read pairs from: {}", path.display()))
}

use crate::utils::open_file;

use anyhow::{bail, Context, Result};
use bstr::ByteSlice;
use log::debug;
use std::io::BufRead;
use std::ops::Deref;
use std::path::Path;

/// A single reference sequence. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    name: Option<String>,
    sequence: Vec<u8>,
}

impl Deref for Reference {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.sequence
    }
}

impl AsRef<[u8]> for Reference {
    fn as_ref(&self) -> &[u8] {
        &self.sequence
    }
}

impl From<&str> for Reference {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl Reference {
    pub fn new(sequence: Vec<u8>) -> Self {
        Self { name: None, sequence }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_file(path)?;
        Self::from_reader(reader).with_context(|| format!("cannot read reference: {}", path.display()))
    }

    /// Parse a reference. Lines starting with '>' are headers; the first
    /// header names the reference, the remaining lines are concatenated.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut name = None;
        let mut sequence = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if let Some(header) = line.strip_prefix('>') {
                if name.is_none() {
                    name = Some(header.trim().to_string());
                }
                continue;
            }
            sequence.extend_from_slice(line.as_bytes());
        }
        if sequence.is_empty() {
            bail!("reference sequence is empty");
        }
        debug!(
            "Loaded reference {} ({} bases)",
            name.as_deref().unwrap_or("<unnamed>"),
            sequence.len()
        );
        Ok(Self { name, sequence })
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sequence.as_bstr())
    }
}

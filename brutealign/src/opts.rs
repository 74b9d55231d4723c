use crate::error::{Error, Result};

use readset::utils::{rev_compl, reverse};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// How the back fragment is turned around before it is searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackOrientation {
    /// Reverse the symbols without complementing them.
    #[default]
    Reverse,
    ReverseComplement,
}

impl BackOrientation {
    pub fn orient(&self, back: &[u8]) -> Vec<u8> {
        match self {
            BackOrientation::Reverse => reverse(back),
            BackOrientation::ReverseComplement => rev_compl(back),
        }
    }
}

impl std::fmt::Display for BackOrientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackOrientation::Reverse => write!(f, "reverse"),
            BackOrientation::ReverseComplement => write!(f, "reverse-complement"),
        }
    }
}

/// Parameters of the pair aligner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignerOpts {
    /// A pair is accepted if the sum of front and back mismatches is strictly
    /// below this value.
    pub threshold: usize,
    /// Skip the back search when the best front placement has at least this
    /// many mismatches.
    pub early_exit_mismatches: usize,
    /// Start offsets of the back fragment, relative to the front offset.
    pub back_window: Range<usize>,
    pub back_orientation: BackOrientation,
}

impl Default for AlignerOpts {
    fn default() -> Self {
        Self {
            threshold: 7,
            early_exit_mismatches: 10,
            back_window: 130..170,
            back_orientation: BackOrientation::Reverse,
        }
    }
}

impl AlignerOpts {
    /// Read options from a YAML file. Missing fields take their default values.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml_str = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        let opts: Self = serde_yaml::from_str(&yaml_str)
            .map_err(|e| Error::InvalidOpts(format!("{}: {}", path.display(), e)))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_early_exit_mismatches(mut self, mismatches: usize) -> Self {
        self.early_exit_mismatches = mismatches;
        self
    }

    pub fn with_back_window(mut self, window: Range<usize>) -> Self {
        self.back_window = window;
        self
    }

    pub fn with_back_orientation(mut self, orientation: BackOrientation) -> Self {
        self.back_orientation = orientation;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidOpts(
                "threshold must be at least 1, otherwise no pair can be accepted".to_string(),
            ));
        }
        if self.back_window.start >= self.back_window.end {
            return Err(Error::InvalidOpts(format!(
                "back window is empty: {}..{}",
                self.back_window.start, self.back_window.end
            )));
        }
        Ok(())
    }
}

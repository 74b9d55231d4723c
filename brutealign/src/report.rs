//! Text reports of the accepted alignments: a view of the reads laid out
//! under the reference, and a table of their locations.

use crate::align::AlignmentSet;

use anyhow::{bail, Result};
use bstr::ByteSlice;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOpts {
    /// Number of reference symbols per report line.
    pub line_length: usize,
}

impl Default for ReportOpts {
    fn default() -> Self {
        Self { line_length: 100 }
    }
}

impl ReportOpts {
    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }
}

/// Write the reference in blocks of `line_length` symbols, each followed by
/// the fragments whose offset falls inside the block, padded to their column.
pub fn write_aligned_reads<W: Write>(
    writer: &mut W,
    reference: &[u8],
    alignments: &AlignmentSet,
    opts: &ReportOpts,
) -> Result<()> {
    if opts.line_length == 0 {
        bail!("line length must be positive");
    }

    // Front fragments sort before back fragments at the same offset.
    let placements = alignments
        .iter()
        .flat_map(|(result, pair)| {
            [
                result.front_offset().map(|x| (x, 0, pair.front.as_slice())),
                result.back_offset().map(|x| (x, 1, pair.back.as_slice())),
            ]
        })
        .flatten()
        .sorted_by_key(|(offset, order, _)| (*offset, *order))
        .collect::<Vec<_>>();

    writeln!(writer, "# {} aligned read pairs", alignments.len())?;
    let mut placements = placements.into_iter().peekable();
    for (i, line) in reference.chunks(opts.line_length).enumerate() {
        let start = i * opts.line_length;
        let end = start + line.len();
        writeln!(writer, "Reference index: {}", start)?;
        writeln!(writer, "Reference: {}", line.as_bstr())?;
        while let Some((offset, _, fragment)) = placements.next_if(|(offset, _, _)| *offset < end) {
            writeln!(
                writer,
                "Read:      {}{}",
                " ".repeat(offset - start),
                fragment.as_bstr()
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write one tab separated row per accepted pair. Unplaced fragments have an
/// offset of -1.
pub fn write_locations<W: Write>(writer: &mut W, alignments: &AlignmentSet) -> Result<()> {
    writeln!(
        writer,
        "front_offset\tback_offset\tfront_mismatches\tback_mismatches\tfront\tback"
    )?;
    for (result, pair) in alignments.iter() {
        let [front_offset, back_offset] = result.location();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            front_offset,
            back_offset,
            result.front.mismatches,
            result.back.mismatches,
            pair.front.as_bstr(),
            pair.back.as_bstr()
        )?;
    }
    Ok(())
}

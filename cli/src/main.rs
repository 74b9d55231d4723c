use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use brutealign::{
    io::{open_file_for_write, Compression},
    progress::{LogProgress, ProgressBarObserver},
    qc::Metrics,
    report::{write_aligned_reads, write_locations, ReportOpts},
    AlignerOpts, BackOrientation, PairAligner,
};
use readset::{read_pairs, Reference};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Progress {
    Bar,
    Log,
    #[value(name = "none")]
    Quiet,
}

/// Align paired reads to a reference by exhaustive mismatch scanning.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Read pairs, one `front,back` pair per line. May be gzip or zstd compressed.
    #[arg(long)]
    reads: PathBuf,

    /// Reference sequence. Header lines starting with '>' are skipped.
    #[arg(long)]
    reference: PathBuf,

    /// Output file of the reads laid out under the reference.
    #[arg(long, short)]
    output: PathBuf,

    /// Output table of the accepted alignment locations.
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Output file of run metrics in JSON.
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// YAML file of aligner options. Command line options take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept a pair if front plus back mismatches is below this value.
    #[arg(long)]
    threshold: Option<usize>,

    /// Skip the back search if the front has at least this many mismatches.
    #[arg(long)]
    early_exit: Option<usize>,

    /// First back start offset, relative to the front offset.
    #[arg(long)]
    window_start: Option<usize>,

    /// End (exclusive) of the back start offsets, relative to the front offset.
    #[arg(long)]
    window_end: Option<usize>,

    /// Reverse complement the back fragment instead of only reversing it.
    #[arg(long)]
    reverse_complement: bool,

    /// Number of reference symbols per line in the output.
    #[arg(long, default_value_t = 100)]
    line_length: usize,

    /// Compression of the output files. Inferred from the extension if omitted.
    #[arg(long)]
    compression: Option<Compression>,

    #[arg(long)]
    compression_level: Option<u32>,

    #[arg(long, value_enum, default_value_t = Progress::Bar)]
    progress: Progress,
}

impl Cli {
    fn aligner_opts(&self) -> Result<AlignerOpts> {
        let mut opts = match &self.config {
            Some(path) => AlignerOpts::from_path(path)?,
            None => AlignerOpts::default(),
        };
        if let Some(threshold) = self.threshold {
            opts = opts.with_threshold(threshold);
        }
        if let Some(early_exit) = self.early_exit {
            opts = opts.with_early_exit_mismatches(early_exit);
        }
        let window = self.window_start.unwrap_or(opts.back_window.start)
            ..self.window_end.unwrap_or(opts.back_window.end);
        opts = opts.with_back_window(window);
        if self.reverse_complement {
            opts = opts.with_back_orientation(BackOrientation::ReverseComplement);
        }
        opts.validate()?;
        Ok(opts)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let opts = cli.aligner_opts()?;
    info!("brutealign v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "threshold: {}, early exit: {}, back window: {}..{}, back orientation: {}",
        opts.threshold,
        opts.early_exit_mismatches,
        opts.back_window.start,
        opts.back_window.end,
        opts.back_orientation,
    );

    let reference = Reference::from_path(&cli.reference)?;
    info!(
        "Loaded reference {} ({} bases)",
        reference.name().unwrap_or("<unnamed>"),
        reference.len()
    );
    let pairs = read_pairs(&cli.reads)?;
    info!("Loaded {} read pairs from {}", pairs.len(), cli.reads.display());

    let aligner = PairAligner::new(opts)?;
    let (alignments, qc) = match cli.progress {
        Progress::Bar => {
            aligner.align_with_observer(&pairs, &reference, &mut ProgressBarObserver::default())?
        }
        Progress::Log => aligner.align_with_observer(&pairs, &reference, &mut LogProgress::default())?,
        Progress::Quiet => aligner.align(&pairs, &reference)?,
    };

    info!("Writing aligned reads to {}", cli.output.display());
    let mut writer = open_file_for_write(&cli.output, cli.compression, cli.compression_level)?;
    let report_opts = ReportOpts::default().with_line_length(cli.line_length);
    write_aligned_reads(&mut writer, &reference, &alignments, &report_opts)?;
    writer.flush()?;

    if let Some(output) = &cli.locations {
        info!("Writing alignment locations to {}", output.display());
        let mut writer = open_file_for_write(output, cli.compression, cli.compression_level)?;
        write_locations(&mut writer, &alignments)?;
        writer.flush()?;
    }

    let mut metrics = Metrics::default();
    qc.report(&mut metrics);
    if let Some(output) = &cli.metrics {
        std::fs::write(output, metrics.to_json()?)
            .with_context(|| format!("cannot write metrics: {}", output.display()))?;
    }
    for (key, value) in metrics.iter() {
        info!("{}: {}", key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let base = ["brutealign", "--reads", "r.txt", "--reference", "ref.txt", "-o", "out.txt"];
        Cli::try_parse_from(base.iter().chain(args)).unwrap()
    }

    #[test]
    fn test_default_opts() {
        let cli = parse(&[]);
        assert_eq!(cli.aligner_opts().unwrap(), AlignerOpts::default());
        assert_eq!(cli.progress, Progress::Bar);
        assert_eq!(cli.line_length, 100);
    }

    #[test]
    fn test_override_opts() {
        let cli = parse(&[
            "--threshold", "4", "--early-exit", "6", "--window-end", "200",
            "--reverse-complement", "--progress", "none", "--compression", "gzip",
        ]);
        let opts = cli.aligner_opts().unwrap();
        assert_eq!(opts.threshold, 4);
        assert_eq!(opts.early_exit_mismatches, 6);
        assert_eq!(opts.back_window, 130..200);
        assert_eq!(opts.back_orientation, BackOrientation::ReverseComplement);
        assert_eq!(cli.progress, Progress::Quiet);
        assert_eq!(cli.compression, Some(Compression::Gzip));
    }

    #[test]
    fn test_invalid_window() {
        let cli = parse(&["--window-start", "200"]);
        assert!(cli.aligner_opts().is_err());
    }
}

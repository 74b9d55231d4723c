use crate::align::PairOutcome;
use crate::qc::AlignQC;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::time::Instant;

/// Receives notifications while read pairs are being aligned.
pub trait ProgressObserver {
    fn on_start(&mut self, _total: usize) {}

    fn on_pair(&mut self, _index: usize, _outcome: &PairOutcome) {}

    fn on_finish(&mut self, _qc: &AlignQC) {}
}

impl ProgressObserver for () {}

/// Logs the elapsed and the estimated remaining time every `interval` pairs.
#[derive(Debug)]
pub struct LogProgress {
    interval: usize,
    total: usize,
    start: Instant,
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(50)
    }
}

impl LogProgress {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            total: 0,
            start: Instant::now(),
        }
    }

    /// Minutes elapsed and estimated minutes remaining after `count` pairs.
    fn estimate(&self, count: usize) -> (f64, f64) {
        let elapsed = self.start.elapsed().as_secs_f64() / 60.0;
        let remaining = elapsed / count as f64 * self.total.saturating_sub(count) as f64;
        (elapsed, remaining)
    }
}

impl ProgressObserver for LogProgress {
    fn on_start(&mut self, total: usize) {
        self.total = total;
        self.start = Instant::now();
    }

    fn on_pair(&mut self, index: usize, _outcome: &PairOutcome) {
        let count = index + 1;
        if count % self.interval == 0 {
            let (elapsed, remaining) = self.estimate(count);
            info!(
                "{} read pairs aligned in {:.3} minutes, approximately {:.3} minutes remaining",
                count, elapsed, remaining
            );
        }
    }

    fn on_finish(&mut self, qc: &AlignQC) {
        let (elapsed, _) = self.estimate(self.total.max(1));
        info!(
            "Aligned {} read pairs in {:.3} minutes",
            qc.sequenced(),
            elapsed
        );
    }
}

/// Terminal progress bar.
#[derive(Default)]
pub struct ProgressBarObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed}] {bar:40.cyan/blue} {human_pos:>7}/{human_len:7} pairs (eta: {eta})",
        ) {
            bar.set_style(style);
        }
        self.bar = Some(bar);
    }

    fn on_pair(&mut self, _index: usize, _outcome: &PairOutcome) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_finish(&mut self, _qc: &AlignQC) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{AlignmentResult, ScanHit};

    fn rejected() -> PairOutcome {
        PairOutcome::Rejected(AlignmentResult {
            front: ScanHit { mismatches: 5, offset: Some(0) },
            back: ScanHit { mismatches: 5, offset: Some(130) },
        })
    }

    #[test]
    fn test_log_progress_estimate() {
        let mut progress = LogProgress::new(0);
        assert_eq!(progress.interval, 1);
        progress.on_start(100);
        for i in 0..100 {
            progress.on_pair(i, &rejected());
        }
        let (elapsed, remaining) = progress.estimate(100);
        assert!(elapsed >= 0.0);
        assert_eq!(remaining, 0.0);
        progress.on_finish(&AlignQC::default());
    }

    #[test]
    fn test_progress_bar() {
        let mut progress = ProgressBarObserver::default();
        progress.on_start(3);
        for i in 0..3 {
            progress.on_pair(i, &rejected());
        }
        assert_eq!(progress.bar.as_ref().map(|x| x.position()), Some(3));
        progress.on_finish(&AlignQC::default());
        assert!(progress.bar.is_none());
    }
}

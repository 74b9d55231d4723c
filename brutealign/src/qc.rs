use crate::align::PairOutcome;

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Display;
use std::ops::{Deref, DerefMut};

/// Named run statistics, kept in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metrics(IndexMap<String, f64>);

impl From<IndexMap<String, f64>> for Metrics {
    fn from(map: IndexMap<String, f64>) -> Self {
        Metrics(map)
    }
}

impl From<Metrics> for IndexMap<String, f64> {
    fn from(val: Metrics) -> Self {
        val.0
    }
}

impl Deref for Metrics {
    type Target = IndexMap<String, f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Metrics {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in &self.0 {
            writeln!(f, "{}\t{}", key, value)?;
        }
        Ok(())
    }
}

impl Metrics {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counters collected while aligning read pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlignQC {
    sequenced: u64,
    accepted: u64,
    rejected: u64,
    early_terminated: u64,
    accepted_mismatches: u64,
    insert_distance_sum: u64,
    num_insert_distances: u64,
}

impl AlignQC {
    pub fn add(&mut self, outcome: &PairOutcome) {
        self.sequenced += 1;
        match outcome {
            PairOutcome::Accepted { result, .. } => {
                self.accepted += 1;
                self.accepted_mismatches += result.total_mismatches() as u64;
                if let Some(d) = result.insert_distance() {
                    self.insert_distance_sum += d as u64;
                    self.num_insert_distances += 1;
                }
            }
            PairOutcome::Rejected(_) => self.rejected += 1,
            PairOutcome::EarlyTerminated(_) => self.early_terminated += 1,
        }
    }

    pub fn combine(&mut self, other: &Self) {
        self.sequenced += other.sequenced;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.early_terminated += other.early_terminated;
        self.accepted_mismatches += other.accepted_mismatches;
        self.insert_distance_sum += other.insert_distance_sum;
        self.num_insert_distances += other.num_insert_distances;
    }

    pub fn sequenced(&self) -> u64 {
        self.sequenced
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn early_terminated(&self) -> u64 {
        self.early_terminated
    }

    /// Fraction of read pairs that passed the mismatch threshold.
    pub fn frac_accepted(&self) -> f64 {
        self.accepted as f64 / self.sequenced as f64
    }

    pub fn report(&self, metric: &mut Metrics) {
        metric.insert("sequenced_read_pairs".to_string(), self.sequenced as f64);
        metric.insert("accepted_read_pairs".to_string(), self.accepted as f64);
        metric.insert("rejected_read_pairs".to_string(), self.rejected as f64);
        metric.insert(
            "early_terminated_read_pairs".to_string(),
            self.early_terminated as f64,
        );
        if self.sequenced > 0 {
            metric.insert("frac_accepted".to_string(), self.frac_accepted());
            metric.insert(
                "frac_early_terminated".to_string(),
                self.early_terminated as f64 / self.sequenced as f64,
            );
        }
        if self.accepted > 0 {
            metric.insert(
                "mean_mismatches_accepted".to_string(),
                self.accepted_mismatches as f64 / self.accepted as f64,
            );
        }
        if self.num_insert_distances > 0 {
            metric.insert(
                "mean_insert_distance".to_string(),
                self.insert_distance_sum as f64 / self.num_insert_distances as f64,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{AlignmentResult, OrientedPair, ScanHit};

    fn result(front: (usize, usize), back: (usize, Option<usize>)) -> AlignmentResult {
        AlignmentResult {
            front: ScanHit { mismatches: front.0, offset: Some(front.1) },
            back: ScanHit { mismatches: back.0, offset: back.1 },
        }
    }

    fn accepted(result: AlignmentResult) -> PairOutcome {
        PairOutcome::Accepted {
            result,
            pair: OrientedPair { front: b"A".to_vec(), back: b"A".to_vec() },
        }
    }

    #[test]
    fn test_report() {
        let mut qc = AlignQC::default();
        qc.add(&accepted(result((1, 10), (2, Some(150)))));
        qc.add(&accepted(result((0, 20), (1, Some(150)))));
        qc.add(&PairOutcome::Rejected(result((4, 0), (4, Some(140)))));
        qc.add(&PairOutcome::EarlyTerminated(result((12, 0), (0, None))));

        let mut metrics = Metrics::default();
        qc.report(&mut metrics);
        assert_eq!(metrics["sequenced_read_pairs"], 4.0);
        assert_eq!(metrics["accepted_read_pairs"], 2.0);
        assert_eq!(metrics["rejected_read_pairs"], 1.0);
        assert_eq!(metrics["frac_accepted"], 0.5);
        assert_eq!(metrics["frac_early_terminated"], 0.25);
        assert_eq!(metrics["mean_mismatches_accepted"], 2.0);
        assert_eq!(metrics["mean_insert_distance"], 135.0);
        assert_eq!(metrics.keys().next().unwrap(), "sequenced_read_pairs");
    }

    #[test]
    fn test_empty_report() {
        let mut metrics = Metrics::default();
        AlignQC::default().report(&mut metrics);
        assert_eq!(metrics.len(), 4);
        assert!(metrics.values().all(|x| *x == 0.0));
        assert_eq!(
            metrics.to_string().lines().next(),
            Some("sequenced_read_pairs\t0")
        );
    }

    #[test]
    fn test_combine_and_json() {
        let mut a = AlignQC::default();
        a.add(&accepted(result((0, 0), (0, Some(130)))));
        let mut b = AlignQC::default();
        b.add(&PairOutcome::Rejected(result((5, 0), (5, Some(130)))));
        a.combine(&b);
        assert_eq!(a.sequenced(), 2);
        assert_eq!(a.rejected(), 1);

        let mut metrics = Metrics::default();
        a.report(&mut metrics);
        let json: serde_json::Value = serde_json::from_str(&metrics.to_json().unwrap()).unwrap();
        assert_eq!(json["accepted_read_pairs"], 1.0);
    }
}

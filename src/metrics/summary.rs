// src/metrics/summary.rs
use super::{format_labels, Collector, Desc};
use crate::constants::{SUMMARY_QUANTILES, SUMMARY_WINDOW};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Point-in-time view of one summary series.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySnapshot {
    pub count: u64,
    pub sum: f64,
    /// `(quantile, value)` pairs over the recent observation window.
    pub quantiles: Vec<(f64, f64)>,
}

#[derive(Default)]
struct SummaryState {
    count: u64,
    sum: f64,
    window: VecDeque<f64>,
}

impl SummaryState {
    fn observe(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if self.window.len() == SUMMARY_WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(value);
    }

    fn snapshot(&self) -> SummarySnapshot {
        let mut sorted: Vec<f64> = self.window.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        SummarySnapshot {
            count: self.count,
            sum: self.sum,
            quantiles: SUMMARY_QUANTILES
                .iter()
                .map(|&q| (q, percentile(&sorted, q)))
                .collect(),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted.len() - 1) as f64 * p) as usize;
    sorted[idx]
}

/// A family of summaries, one per label-value set.
///
/// Count and sum are exact; quantiles cover the last
/// [`SUMMARY_WINDOW`] observations of each series.
pub struct SummaryVec {
    desc: Desc,
    series: DashMap<Vec<String>, Mutex<SummaryState>>,
}

impl SummaryVec {
    pub(super) fn new(desc: Desc) -> Self {
        Self {
            desc,
            series: DashMap::new(),
        }
    }

    pub fn observe(&self, label_values: &[&str], value: f64) {
        let key = self.desc.key(label_values);
        if let Some(state) = self.series.get(&key) {
            state.lock().observe(value);
            return;
        }
        self.series
            .entry(key)
            .or_default()
            .lock()
            .observe(value);
    }

    pub fn snapshot(&self, label_values: &[&str]) -> Option<SummarySnapshot> {
        let key = self.desc.key(label_values);
        self.series.get(&key).map(|state| state.lock().snapshot())
    }
}

impl Collector for SummaryVec {
    fn encode(&self, out: &mut String) {
        let mut series: Vec<(Vec<String>, SummarySnapshot)> = self
            .series
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().lock().snapshot()))
            .collect();
        if series.is_empty() {
            return;
        }
        series.sort_by(|a, b| a.0.cmp(&b.0));

        let name = &self.desc.name;
        let label_names = &self.desc.label_names;
        self.desc.write_header(out, "summary");
        for (values, snapshot) in series {
            for (q, value) in &snapshot.quantiles {
                let q = q.to_string();
                out.push_str(&format!(
                    "{}{} {}\n",
                    name,
                    format_labels(label_names, &values, Some(("quantile", q.as_str()))),
                    value
                ));
            }
            let labels = format_labels(label_names, &values, None);
            out.push_str(&format!("{}_sum{} {}\n", name, labels, snapshot.sum));
            out.push_str(&format!("{}_count{} {}\n", name, labels, snapshot.count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(labels: Vec<&'static str>) -> SummaryVec {
        SummaryVec::new(Desc {
            name: "test_latency".to_string(),
            help: "Latency.".to_string(),
            label_names: labels,
        })
    }

    #[test]
    fn count_and_sum_are_exact() {
        let summary = summary(vec!["method"]);
        for v in [1.0, 2.0, 3.0, 4.0] {
            summary.observe(&["count"], v);
        }

        let snapshot = summary.snapshot(&["count"]).unwrap();
        assert_eq!(snapshot.count, 4);
        assert_eq!(snapshot.sum, 10.0);
        assert!(summary.snapshot(&["uppercase"]).is_none());
    }

    #[test]
    fn quantiles_use_recent_window() {
        let summary = summary(vec![]);
        for v in 1..=100 {
            summary.observe(&[], v as f64);
        }

        let snapshot = summary.snapshot(&[]).unwrap();
        assert_eq!(
            snapshot.quantiles,
            vec![(0.5, 50.0), (0.9, 90.0), (0.99, 99.0)]
        );
    }

    #[test]
    fn window_evicts_oldest_but_keeps_totals() {
        let summary = summary(vec![]);
        for _ in 0..SUMMARY_WINDOW {
            summary.observe(&[], 1000.0);
        }
        for _ in 0..SUMMARY_WINDOW {
            summary.observe(&[], 1.0);
        }

        let snapshot = summary.snapshot(&[]).unwrap();
        assert_eq!(snapshot.count, 2 * SUMMARY_WINDOW as u64);
        assert_eq!(snapshot.sum, 1001.0 * SUMMARY_WINDOW as f64);
        assert!(snapshot.quantiles.iter().all(|&(_, v)| v == 1.0));
    }

    #[test]
    fn unlabeled_encoding() {
        let summary = summary(vec![]);
        summary.observe(&[], 5.0);

        let mut out = String::new();
        summary.encode(&mut out);
        assert_eq!(
            out,
            "# HELP test_latency Latency.\n\
             # TYPE test_latency summary\n\
             test_latency{quantile=\"0.5\"} 5\n\
             test_latency{quantile=\"0.9\"} 5\n\
             test_latency{quantile=\"0.99\"} 5\n\
             test_latency_sum 5\n\
             test_latency_count 1\n"
        );
    }
}

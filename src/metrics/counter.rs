// src/metrics/counter.rs
use super::{format_labels, Collector, Desc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A family of monotonically increasing counters, one per label-value set.
///
/// Each series is an `AtomicU64`; concurrent increments on the same series
/// never lose updates.
pub struct CounterVec {
    desc: Desc,
    cells: DashMap<Vec<String>, AtomicU64>,
}

impl CounterVec {
    pub(super) fn new(desc: Desc) -> Self {
        Self {
            desc,
            cells: DashMap::new(),
        }
    }

    pub fn inc(&self, label_values: &[&str]) {
        self.add(label_values, 1);
    }

    pub fn add(&self, label_values: &[&str], value: u64) {
        let key = self.desc.key(label_values);
        if let Some(cell) = self.cells.get(&key) {
            cell.fetch_add(value, Ordering::Relaxed);
            return;
        }
        self.cells
            .entry(key)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of one series; zero if it was never incremented.
    pub fn get(&self, label_values: &[&str]) -> u64 {
        let key = self.desc.key(label_values);
        self.cells
            .get(&key)
            .map(|cell| cell.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum over every series of the family.
    pub fn total(&self) -> u64 {
        self.cells
            .iter()
            .map(|cell| cell.value().load(Ordering::Relaxed))
            .sum()
    }
}

impl Collector for CounterVec {
    fn encode(&self, out: &mut String) {
        let mut series: Vec<(Vec<String>, u64)> = self
            .cells
            .iter()
            .map(|cell| (cell.key().clone(), cell.value().load(Ordering::Relaxed)))
            .collect();
        if series.is_empty() {
            return;
        }
        series.sort();

        self.desc.write_header(out, "counter");
        for (values, count) in series {
            out.push_str(&format!(
                "{}{} {}\n",
                self.desc.name,
                format_labels(&self.desc.label_names, &values, None),
                count
            ));
        }
    }
}

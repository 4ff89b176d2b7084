// src/metrics/mod.rs
//! In-process metrics with Prometheus text exposition.
//!
//! A [`Registry`] is constructed explicitly and handed to whoever records
//! into it; there is no process-global default registry. Families are
//! internally synchronized so recording never needs an outer lock:
//!
//! - [`CounterVec`]: monotonically increasing counters keyed by label values
//! - [`SummaryVec`]: count, sum and sliding-window quantiles keyed by label values
//!
//! [`Registry::gather`] renders every registered family in the text format
//! scraped from the metrics route.

mod counter;
mod summary;

pub use counter::CounterVec;
pub use summary::{SummarySnapshot, SummaryVec};

use crate::types::MetricName;
use parking_lot::RwLock;
use std::sync::Arc;

/// A metric family that can render itself in the exposition format.
pub trait Collector: Send + Sync {
    fn encode(&self, out: &mut String);
}

/// Name, help text and label keys shared by every series of a family.
#[derive(Debug, Clone)]
struct Desc {
    name: String,
    help: String,
    label_names: Vec<&'static str>,
}

impl Desc {
    fn write_header(&self, out: &mut String, kind: &str) {
        out.push_str(&format!("# HELP {} {}\n", self.name, escape_help(&self.help)));
        out.push_str(&format!("# TYPE {} {}\n", self.name, kind));
    }

    fn key(&self, label_values: &[&str]) -> Vec<String> {
        debug_assert_eq!(
            label_values.len(),
            self.label_names.len(),
            "label cardinality mismatch for {}",
            self.name
        );
        label_values.iter().map(|v| v.to_string()).collect()
    }
}

/// Owner of all metric families for one service instance.
pub struct Registry {
    namespace: MetricName,
    subsystem: MetricName,
    collectors: RwLock<Vec<Arc<dyn Collector>>>,
}

impl Registry {
    pub fn new(namespace: MetricName, subsystem: MetricName) -> Self {
        Self {
            namespace,
            subsystem,
            collectors: RwLock::new(Vec::new()),
        }
    }

    /// Fully-qualified metric name: `<namespace>_<subsystem>_<name>`.
    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}_{}_{}", self.namespace, self.subsystem, name)
    }

    /// Registers a counter family with the given label keys.
    pub fn counter_vec(
        &self,
        name: &str,
        help: &str,
        label_names: &[&'static str],
    ) -> Arc<CounterVec> {
        let counter = Arc::new(CounterVec::new(self.desc(name, help, label_names)));
        self.collectors.write().push(counter.clone());
        counter
    }

    /// Registers a summary family with the given label keys.
    ///
    /// Pass an empty slice for an unlabeled summary and observe it with `&[]`.
    pub fn summary_vec(
        &self,
        name: &str,
        help: &str,
        label_names: &[&'static str],
    ) -> Arc<SummaryVec> {
        let summary = Arc::new(SummaryVec::new(self.desc(name, help, label_names)));
        self.collectors.write().push(summary.clone());
        summary
    }

    /// Renders every registered family, in registration order.
    pub fn gather(&self) -> String {
        let mut out = String::new();
        for collector in self.collectors.read().iter() {
            collector.encode(&mut out);
        }
        out
    }

    fn desc(&self, name: &str, help: &str, label_names: &[&'static str]) -> Desc {
        Desc {
            name: self.qualified_name(name),
            help: help.to_string(),
            label_names: label_names.to_vec(),
        }
    }
}

/// Formats `{k="v",...}` for one series, or nothing when there are no labels.
fn format_labels(names: &[&str], values: &[String], extra: Option<(&str, &str)>) -> String {
    let mut pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect();
    if let Some((k, v)) = extra {
        pairs.push(format!("{}=\"{}\"", k, escape_label_value(v)));
    }

    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new(
            MetricName::new("my_group").unwrap(),
            MetricName::new("string_service").unwrap(),
        )
    }

    #[test]
    fn qualified_names_join_namespace_and_subsystem() {
        assert_eq!(
            registry().qualified_name("request_count"),
            "my_group_string_service_request_count"
        );
    }

    #[test]
    fn gather_renders_families_in_registration_order() {
        let registry = registry();
        let requests = registry.counter_vec("request_count", "Number of requests received.", &["method"]);
        let results = registry.summary_vec("count_result", "The result of each count method.", &[]);

        requests.inc(&["count"]);
        results.observe(&[], 5.0);

        let text = registry.gather();
        let counter_at = text.find("# TYPE my_group_string_service_request_count counter").unwrap();
        let summary_at = text.find("# TYPE my_group_string_service_count_result summary").unwrap();
        assert!(counter_at < summary_at);
        assert!(text.contains("my_group_string_service_request_count{method=\"count\"} 1\n"));
        assert!(text.contains("my_group_string_service_count_result_count 1\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let labels = format_labels(&["input"], &["a\"b\\c\nd".to_string()], None);
        assert_eq!(labels, "{input=\"a\\\"b\\\\c\\nd\"}");
    }

    #[test]
    fn no_labels_renders_nothing() {
        assert_eq!(format_labels(&[], &[], None), "");
        assert_eq!(
            format_labels(&[], &[], Some(("quantile", "0.5"))),
            "{quantile=\"0.5\"}"
        );
    }
}

//! Minimal metrics registry for the admin endpoints.
//!
//! Counter and histogram types with dynamic labels backed by `DashMap`. Labels
//! are flattened into sorted key vectors to keep deterministic ordering.
//! Histogram buckets are fixed in microseconds to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            if labels.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
            }
        }
    }
}

// Fixed buckets in microseconds: 10us .. 100ms
const BUCKETS_MICROS: [u64; 9] = [10, 50, 100, 500, 1_000, 5_000, 10_000, 50_000, 100_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Render in Prometheus text exposition format (unit: microseconds).
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };
            let braced = if labels.is_empty() {
                String::new()
            } else {
                format!("{{{}}}", labels)
            };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{} {}", name, braced, sum);
            let _ = writeln!(out, "{}_count{} {}", name, braced, count);
        }
    }
}

#[derive(Default)]
pub struct AdminMetrics {
    pub requests: CounterVec,
    pub render_duration: HistogramVec, // In Microseconds
}

impl AdminMetrics {
    /// Render all registered metrics plus any extra lines provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.requests.render("statscope_admin_requests_total", &mut out);
        self.render_duration.render("statscope_expression_render_micros", &mut out);
        for (k, v) in extra {
            let _ = writeln!(out, "{} {}", k, v);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_histogram_keeps_braces() {
        let h = HistogramVec::default();
        h.observe(&[("endpoint", "expressions")], Duration::from_micros(20));

        let mut out = String::new();
        h.render("render_micros", &mut out);
        assert!(out.contains("render_micros_bucket{endpoint=\"expressions\",le=\"50\"} 1"));
        assert!(out.contains("render_micros_sum{endpoint=\"expressions\"} 20"));
        assert!(out.contains("render_micros_count{endpoint=\"expressions\"} 1"));
    }

    #[test]
    fn unlabelled_counter_has_no_braces() {
        let c = CounterVec::default();
        c.add(&[], 3);

        let mut out = String::new();
        c.render("hits_total", &mut out);
        assert_eq!(out, "# TYPE hits_total counter\nhits_total 3\n");
    }

    #[test]
    fn counter_labels_are_order_independent() {
        let c = CounterVec::default();
        c.inc(&[("endpoint", "dtab"), ("code", "200")]);
        c.inc(&[("code", "200"), ("endpoint", "dtab")]);
        assert_eq!(c.get(&[("endpoint", "dtab"), ("code", "200")]), 2);
    }

    #[test]
    fn render_includes_histogram_and_extras() {
        let m = AdminMetrics::default();
        m.requests.inc(&[("endpoint", "expressions")]);
        m.render_duration.observe(&[], Duration::from_micros(75));

        let out = m.render(&[("statscope_registered_expressions", 3)]);
        assert!(out.contains("statscope_admin_requests_total{endpoint=\"expressions\"} 1"));
        assert!(out.contains("statscope_expression_render_micros_bucket{le=\"50\"} 0"));
        assert!(out.contains("statscope_expression_render_micros_bucket{le=\"100\"} 1"));
        assert!(out.contains("statscope_expression_render_micros_sum 75\n"));
        assert!(out.contains("statscope_expression_render_micros_count 1\n"));
        assert!(!out.contains("{}"));
        assert!(out.contains("statscope_registered_expressions 3"));
    }
}

//! Stats label formatting.
//!
//! Histogram statistic names (`latency.p99`, `latency_99_0_percentile`) must
//! match what the process exports on its other metrics surfaces, so the
//! translator always goes through a `StatsFormatter` instead of building
//! label text itself.

use serde::Deserialize;

use crate::expr::Component;

/// Label and naming conventions for histogram statistics.
pub trait StatsFormatter: Send + Sync {
    fn label_percentile(&self, p: f64) -> String;
    fn label_min(&self) -> &'static str;
    fn label_max(&self) -> &'static str;
    fn label_average(&self) -> &'static str;
    fn label_sum(&self) -> &'static str;
    fn label_count(&self) -> &'static str;

    /// Join a flattened histogram name with one statistic label.
    fn histo_name(&self, name: &str, label: &str) -> String;

    /// Label for any histogram component.
    fn label(&self, component: Component) -> String {
        match component {
            Component::Percentile(p) => self.label_percentile(p.value()),
            Component::Min => self.label_min().to_string(),
            Component::Max => self.label_max().to_string(),
            Component::Avg => self.label_average().to_string(),
            Component::Sum => self.label_sum().to_string(),
            Component::Count => self.label_count().to_string(),
        }
    }
}

/// `name.p99` style. Default.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonsMetrics;

impl StatsFormatter for CommonsMetrics {
    /// `p` scaled to basis points. A trailing "00" after the first two
    /// digits is dropped, so 0.99 is `p99` but 0.999 is `p9990`.
    fn label_percentile(&self, p: f64) -> String {
        let label = format!("p{}", (p * 10_000.0).round() as u64);
        if label.len() > 3 && &label[3..] == "00" {
            label[..3].to_string()
        } else {
            label
        }
    }

    fn label_min(&self) -> &'static str {
        "min"
    }

    fn label_max(&self) -> &'static str {
        "max"
    }

    fn label_average(&self) -> &'static str {
        "avg"
    }

    fn label_sum(&self) -> &'static str {
        "sum"
    }

    fn label_count(&self) -> &'static str {
        "count"
    }

    fn histo_name(&self, name: &str, label: &str) -> String {
        format!("{name}.{label}")
    }
}

/// `name_99_0_percentile` style.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonsStats;

impl StatsFormatter for CommonsStats {
    fn label_percentile(&self, p: f64) -> String {
        format!("{:?}_percentile", p * 100.0).replace('.', "_")
    }

    fn label_min(&self) -> &'static str {
        "min"
    }

    fn label_max(&self) -> &'static str {
        "max"
    }

    fn label_average(&self) -> &'static str {
        "avg"
    }

    fn label_sum(&self) -> &'static str {
        "sum"
    }

    fn label_count(&self) -> &'static str {
        "count"
    }

    fn histo_name(&self, name: &str, label: &str) -> String {
        format!("{name}_{label}")
    }
}

/// Formatter selection (config value).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsFormat {
    #[default]
    CommonsMetrics,
    CommonsStats,
}

impl StatsFormat {
    pub fn formatter(self) -> &'static dyn StatsFormatter {
        static COMMONS_METRICS: CommonsMetrics = CommonsMetrics;
        static COMMONS_STATS: CommonsStats = CommonsStats;
        match self {
            StatsFormat::CommonsMetrics => &COMMONS_METRICS,
            StatsFormat::CommonsStats => &COMMONS_STATS,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::expr::Percentile;

    #[test]
    fn commons_metrics_percentile_labels() {
        let f = CommonsMetrics;
        assert_eq!(f.label_percentile(0.5), "p50");
        assert_eq!(f.label_percentile(0.9), "p90");
        assert_eq!(f.label_percentile(0.95), "p95");
        assert_eq!(f.label_percentile(0.99), "p99");
        assert_eq!(f.label_percentile(0.999), "p9990");
        assert_eq!(f.label_percentile(0.9999), "p9999");
    }

    #[test]
    fn commons_metrics_joins_with_dot() {
        let f = CommonsMetrics;
        let label = f.label(Component::Percentile(Percentile::new(0.99).unwrap()));
        assert_eq!(f.histo_name("latency", &label), "latency.p99");
        assert_eq!(f.histo_name("latency", &f.label(Component::Avg)), "latency.avg");
    }

    #[test]
    fn aggregate_labels() {
        let f = CommonsMetrics;
        assert_eq!(f.label(Component::Min), "min");
        assert_eq!(f.label(Component::Max), "max");
        assert_eq!(f.label(Component::Avg), "avg");
        assert_eq!(f.label(Component::Sum), "sum");
        assert_eq!(f.label(Component::Count), "count");
    }

    #[test]
    fn commons_stats_style() {
        let f = CommonsStats;
        assert_eq!(f.label_percentile(0.99), "99_0_percentile");
        assert_eq!(f.label_percentile(0.5), "50_0_percentile");
        assert_eq!(f.histo_name("latency", "99_0_percentile"), "latency_99_0_percentile");
    }

    #[test]
    fn format_selection() {
        assert_eq!(StatsFormat::default(), StatsFormat::CommonsMetrics);
        assert_eq!(StatsFormat::CommonsStats.formatter().histo_name("a", "max"), "a_max");
    }
}

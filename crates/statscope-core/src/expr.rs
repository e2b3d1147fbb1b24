//! Metric expression tree.
//!
//! Children are owned (`Box`/`Vec`), so a tree is always finite and acyclic.
//! Fallible constructors (`Percentile::new`, `FunctionCall::new`,
//! `Expression::histogram_component`) reject malformed nodes up front, which
//! keeps rendering total.

use crate::error::{Result, StatscopeError};
use crate::identity::{MetricIdentity, MetricKind};

/// A percentile in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentile(f64);

impl Percentile {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&p) {
            return Err(StatscopeError::BadRequest(format!(
                "percentile must be in [0, 1), got {p}"
            )));
        }
        Ok(Self(p))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// One scalar statistic extracted from a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component {
    Min,
    Max,
    Avg,
    Sum,
    Count,
    Percentile(Percentile),
}

/// Named operation over a non-empty, ordered argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    name: String,
    args: Vec<Expression>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expression>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StatscopeError::BadRequest("function name must not be empty".into()));
        }
        if args.is_empty() {
            return Err(StatscopeError::BadRequest(format!(
                "function {name} needs at least one argument"
            )));
        }
        Ok(Self { name, args })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Reference to one base metric.
    Metric(MetricIdentity),
    /// One statistic of a histogram metric.
    HistogramComponent(MetricIdentity, Component),
    Constant(f64),
    Function(FunctionCall),
    /// Explicitly absent expression.
    None,
}

impl Expression {
    pub fn metric(id: MetricIdentity) -> Self {
        Expression::Metric(id)
    }

    pub fn constant(v: f64) -> Self {
        Expression::Constant(v)
    }

    /// Histogram statistic leaf; `id` must be declared as a histogram.
    pub fn histogram_component(id: MetricIdentity, component: Component) -> Result<Self> {
        if id.kind() != MetricKind::Histogram {
            return Err(StatscopeError::BadRequest(format!(
                "{:?} is a {}, histogram components need a histogram",
                id.segments(),
                id.kind().as_str()
            )));
        }
        Ok(Expression::HistogramComponent(id, component))
    }

    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Result<Self> {
        FunctionCall::new(name, args).map(Expression::Function)
    }

    /// Every metric identity referenced by this tree, in depth-first order.
    pub fn metrics(&self) -> Vec<&MetricIdentity> {
        let mut out = Vec::new();
        self.collect_metrics(&mut out);
        out
    }

    fn collect_metrics<'a>(&'a self, out: &mut Vec<&'a MetricIdentity>) {
        match self {
            Expression::Metric(id) | Expression::HistogramComponent(id, _) => out.push(id),
            Expression::Function(call) => {
                for arg in call.args() {
                    arg.collect_metrics(out);
                }
            }
            Expression::Constant(_) | Expression::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn counter(name: &str) -> MetricIdentity {
        MetricIdentity::new([name], MetricKind::Counter).unwrap()
    }

    #[test]
    fn percentile_range_is_half_open() {
        assert!(Percentile::new(0.0).is_ok());
        assert!(Percentile::new(0.9999).is_ok());
        assert!(Percentile::new(1.0).is_err());
        assert!(Percentile::new(-0.1).is_err());
        assert!(Percentile::new(f64::NAN).is_err());
    }

    #[test]
    fn function_requires_args() {
        let err = Expression::function("plus", vec![]).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
        assert!(Expression::function("", vec![Expression::None]).is_err());
    }

    #[test]
    fn histogram_component_requires_histogram() {
        let err = Expression::histogram_component(counter("requests"), Component::Max);
        assert!(err.is_err());

        let latency = MetricIdentity::new(["latency"], MetricKind::Histogram).unwrap();
        assert!(Expression::histogram_component(latency, Component::Max).is_ok());
    }

    #[test]
    fn metrics_are_collected_depth_first() {
        let e = Expression::function(
            "divide",
            vec![
                Expression::metric(counter("success")),
                Expression::function(
                    "plus",
                    vec![
                        Expression::metric(counter("success")),
                        Expression::metric(counter("failures")),
                    ],
                )
                .unwrap(),
            ],
        )
        .unwrap();

        let names: Vec<String> = e.metrics().iter().map(|m| m.flat_name('/')).collect();
        assert_eq!(names, vec!["success", "success", "failures"]);
    }
}

//! Expression trees as written in config.
//!
//! Metric leaves name a segment path; `resolve` looks each path up in the
//! metric catalog and produces a validated core `Expression`.

use serde::Deserialize;
use statscope_core::catalog::MetricCatalog;
use statscope_core::error::{Result, StatscopeError};
use statscope_core::{Component, Expression, MetricIdentity, Percentile};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ExprSpec {
    Metric(Vec<String>),
    HistogramComponent {
        metric: Vec<String>,
        component: ComponentSpec,
    },
    Constant(f64),
    Function {
        name: String,
        args: Vec<ExprSpec>,
    },
    None,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSpec {
    Min,
    Max,
    Avg,
    Sum,
    Count,
    Percentile(f64),
}

impl ComponentSpec {
    fn resolve(self) -> Result<Component> {
        Ok(match self {
            ComponentSpec::Min => Component::Min,
            ComponentSpec::Max => Component::Max,
            ComponentSpec::Avg => Component::Avg,
            ComponentSpec::Sum => Component::Sum,
            ComponentSpec::Count => Component::Count,
            ComponentSpec::Percentile(p) => Component::Percentile(Percentile::new(p)?),
        })
    }
}

impl ExprSpec {
    pub fn resolve(&self, catalog: &MetricCatalog) -> Result<Expression> {
        match self {
            ExprSpec::Metric(path) => Ok(Expression::metric(lookup(catalog, path)?)),
            ExprSpec::HistogramComponent { metric, component } => {
                Expression::histogram_component(lookup(catalog, metric)?, component.resolve()?)
            }
            ExprSpec::Constant(v) => {
                if !v.is_finite() {
                    return Err(StatscopeError::BadRequest(format!(
                        "constant must be finite, got {v}"
                    )));
                }
                Ok(Expression::constant(*v))
            }
            ExprSpec::Function { name, args } => {
                let args = args
                    .iter()
                    .map(|a| a.resolve(catalog))
                    .collect::<Result<Vec<_>>>()?;
                Expression::function(name.clone(), args)
            }
            ExprSpec::None => Ok(Expression::None),
        }
    }
}

fn lookup(catalog: &MetricCatalog, path: &[String]) -> Result<MetricIdentity> {
    catalog.resolve(path).map_err(|_| {
        StatscopeError::BadRequest(format!("expression references undeclared metric {path:?}"))
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use statscope_core::MetricKind;

    fn catalog() -> MetricCatalog {
        let mut c = MetricCatalog::new();
        c.declare(["success"], MetricKind::Counter).unwrap();
        c.declare(["latency"], MetricKind::Histogram).unwrap();
        c
    }

    fn parse(yaml: &str) -> ExprSpec {
        let de = serde_yaml::Deserializer::from_str(yaml);
        serde_yaml::with::singleton_map_recursive::deserialize(de).unwrap()
    }

    #[test]
    fn resolves_nested_function() {
        let spec = parse(
            r#"
function:
  name: multiply
  args:
    - constant: 100
    - metric: [success]
"#,
        );
        let e = spec.resolve(&catalog()).unwrap();
        let Expression::Function(call) = e else { panic!("expected function") };
        assert_eq!(call.name(), "multiply");
        assert_eq!(call.args().len(), 2);
        assert_eq!(call.args()[0], Expression::Constant(100.0));
    }

    #[test]
    fn resolves_histogram_percentile() {
        let spec = parse(
            r#"
histogram_component:
  metric: [latency]
  component: { percentile: 0.99 }
"#,
        );
        assert!(matches!(
            spec.resolve(&catalog()).unwrap(),
            Expression::HistogramComponent(_, Component::Percentile(_))
        ));
    }

    #[test]
    fn none_is_a_plain_string() {
        assert!(matches!(parse("none").resolve(&catalog()).unwrap(), Expression::None));
    }

    #[test]
    fn rejects_bad_trees() {
        let c = catalog();
        let unknown = parse("metric: [nope]");
        assert_eq!(unknown.resolve(&c).unwrap_err().client_code().as_str(), "BAD_REQUEST");

        let not_histo = parse("histogram_component: { metric: [success], component: max }");
        assert!(not_histo.resolve(&c).is_err());

        let bad_p =
            parse("histogram_component: { metric: [latency], component: { percentile: 1.0 } }");
        assert!(bad_p.resolve(&c).is_err());

        let empty = parse("function: { name: plus, args: [] }");
        assert!(empty.resolve(&c).is_err());
    }
}

//! Expression schema: a named, labelled derived metric.
//!
//! Schemas are built once at registration time and only read afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatscopeError};
use crate::expr::Expression;

/// Which side of a threshold is healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Health bounds attached to an expression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bounds {
    #[default]
    Unbounded,
    Monotone {
        direction: Direction,
        bad_threshold: f64,
        good_threshold: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lower_bound_inclusive: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        upper_bound_exclusive: Option<f64>,
    },
}

impl Bounds {
    pub fn validate(&self) -> Result<()> {
        let Bounds::Monotone {
            direction,
            bad_threshold,
            good_threshold,
            lower_bound_inclusive,
            upper_bound_exclusive,
        } = self
        else {
            return Ok(());
        };

        if !bad_threshold.is_finite() || !good_threshold.is_finite() {
            return Err(StatscopeError::BadRequest("bounds thresholds must be finite".into()));
        }
        let ordered = match direction {
            Direction::HigherIsBetter => bad_threshold <= good_threshold,
            Direction::LowerIsBetter => good_threshold <= bad_threshold,
        };
        if !ordered {
            return Err(StatscopeError::BadRequest(format!(
                "bounds thresholds out of order for {direction:?}: bad={bad_threshold} good={good_threshold}"
            )));
        }
        if let (Some(lo), Some(hi)) = (lower_bound_inclusive, upper_bound_exclusive) {
            if lo >= hi {
                return Err(StatscopeError::BadRequest(format!(
                    "bounds range is empty: [{lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Display unit. Serialised as a lowercase string; unknown strings are custom units.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    #[default]
    Unspecified,
    Percentage,
    Requests,
    Milliseconds,
    Seconds,
    Bytes,
    Kilobytes,
    Megabytes,
    Gigabytes,
    Custom(String),
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "unspecified" => Unit::Unspecified,
            "percentage" => Unit::Percentage,
            "requests" => Unit::Requests,
            "milliseconds" => Unit::Milliseconds,
            "seconds" => Unit::Seconds,
            "bytes" => Unit::Bytes,
            "kilobytes" => Unit::Kilobytes,
            "megabytes" => Unit::Megabytes,
            "gigabytes" => Unit::Gigabytes,
            _ => Unit::Custom(s),
        }
    }
}

impl From<Unit> for String {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Unspecified => "unspecified".into(),
            Unit::Percentage => "percentage".into(),
            Unit::Requests => "requests".into(),
            Unit::Milliseconds => "milliseconds".into(),
            Unit::Seconds => "seconds".into(),
            Unit::Bytes => "bytes".into(),
            Unit::Kilobytes => "kilobytes".into(),
            Unit::Megabytes => "megabytes".into(),
            Unit::Gigabytes => "gigabytes".into(),
            Unit::Custom(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Server,
    #[default]
    NoRoleSpecified,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Server => "server",
            Role::NoRoleSpecified => "no_role_specified",
        }
    }
}

/// Identifying labels of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SchemaLabels {
    #[serde(default)]
    pub process_path: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Free-form labels.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SchemaLabels {
    /// Flatten into a single string map. Well-known keys win over `extra`.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut out = self.extra.clone();
        if let Some(p) = &self.process_path {
            out.insert("process_path".into(), p.clone());
        }
        if let Some(s) = &self.service_name {
            out.insert("service_name".into(), s.clone());
        }
        out.insert("role".into(), self.role.as_str().into());
        out
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionSchema {
    name: String,
    namespace: Vec<String>,
    labels: SchemaLabels,
    expr: Expression,
    bounds: Bounds,
    description: String,
    unit: Unit,
}

impl ExpressionSchema {
    pub fn builder(name: impl Into<String>, expr: Expression) -> ExpressionSchemaBuilder {
        ExpressionSchemaBuilder {
            name: name.into(),
            namespace: Vec::new(),
            labels: SchemaLabels::default(),
            expr,
            bounds: Bounds::default(),
            description: String::new(),
            unit: Unit::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// Namespace joined with `:`, the form used by the `namespace` query filter.
    pub fn namespace_key(&self) -> String {
        self.namespace.join(":")
    }

    pub fn labels(&self) -> &SchemaLabels {
        &self.labels
    }

    pub fn expr(&self) -> &Expression {
        &self.expr
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }
}

pub struct ExpressionSchemaBuilder {
    name: String,
    namespace: Vec<String>,
    labels: SchemaLabels,
    expr: Expression,
    bounds: Bounds,
    description: String,
    unit: Unit,
}

impl ExpressionSchemaBuilder {
    pub fn namespace(mut self, namespace: Vec<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn labels(mut self, labels: SchemaLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn build(self) -> Result<ExpressionSchema> {
        if self.name.is_empty() {
            return Err(StatscopeError::BadRequest("expression name must not be empty".into()));
        }
        if self.namespace.iter().any(|s| s.is_empty()) {
            return Err(StatscopeError::BadRequest(format!(
                "expression {} has an empty namespace segment",
                self.name
            )));
        }
        self.bounds.validate()?;

        Ok(ExpressionSchema {
            name: self.name,
            namespace: self.namespace,
            labels: self.labels,
            expr: self.expr,
            bounds: self.bounds,
            description: self.description,
            unit: self.unit,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn monotone_bounds_serialize_with_kind_tag() {
        let b = Bounds::Monotone {
            direction: Direction::HigherIsBetter,
            bad_threshold: 99.5,
            good_threshold: 99.97,
            lower_bound_inclusive: None,
            upper_bound_exclusive: None,
        };
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["kind"], "monotone");
        assert_eq!(v["direction"], "higher_is_better");
        assert!(v.get("lower_bound_inclusive").is_none());

        let u = serde_json::to_value(Bounds::Unbounded).unwrap();
        assert_eq!(u, serde_json::json!({"kind": "unbounded"}));
    }

    #[test]
    fn threshold_order_follows_direction() {
        let lower = Bounds::Monotone {
            direction: Direction::LowerIsBetter,
            bad_threshold: 500.0,
            good_threshold: 100.0,
            lower_bound_inclusive: Some(0.0),
            upper_bound_exclusive: None,
        };
        assert!(lower.validate().is_ok());

        let flipped = Bounds::Monotone {
            direction: Direction::HigherIsBetter,
            bad_threshold: 500.0,
            good_threshold: 100.0,
            lower_bound_inclusive: None,
            upper_bound_exclusive: None,
        };
        assert!(flipped.validate().is_err());
    }

    #[test]
    fn unit_strings() {
        assert_eq!(serde_json::to_value(Unit::Percentage).unwrap(), "percentage");
        assert_eq!(Unit::from("widgets".to_string()), Unit::Custom("widgets".into()));
        assert_eq!(String::from(Unit::Custom("widgets".into())), "widgets");
    }

    #[test]
    fn labels_flatten_to_map() {
        let mut labels = SchemaLabels {
            service_name: Some("web".into()),
            role: Role::Server,
            ..Default::default()
        };
        labels.extra.insert("team".into(), "infra".into());

        let m = labels.to_map();
        assert_eq!(m.get("service_name").map(String::as_str), Some("web"));
        assert_eq!(m.get("role").map(String::as_str), Some("server"));
        assert_eq!(m.get("team").map(String::as_str), Some("infra"));
        assert!(!m.contains_key("process_path"));
    }

    #[test]
    fn builder_validates() {
        assert!(ExpressionSchema::builder("", Expression::None).build().is_err());
        assert!(ExpressionSchema::builder("x", Expression::None)
            .namespace(vec!["a".into(), "".into()])
            .build()
            .is_err());

        let s = ExpressionSchema::builder("x", Expression::None)
            .namespace(vec!["tenant".into(), "a".into()])
            .description("d")
            .build()
            .unwrap();
        assert_eq!(s.namespace_key(), "tenant:a");
        assert_eq!(s.unit(), &Unit::Unspecified);
    }
}

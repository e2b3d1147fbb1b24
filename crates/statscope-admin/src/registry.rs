//! Registered expression schemas, kept in registration order.

use statscope_core::schema::ExpressionSchema;

#[derive(Debug, Default)]
pub struct ExpressionRegistry {
    schemas: Vec<ExpressionSchema>,
}

impl ExpressionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a schema. Duplicate `(namespace, name)` pairs are kept but logged.
    pub fn register(&mut self, schema: ExpressionSchema) {
        let dup = self
            .schemas
            .iter()
            .any(|s| s.name() == schema.name() && s.namespace() == schema.namespace());
        if dup {
            tracing::warn!(
                name = %schema.name(),
                namespace = %schema.namespace_key(),
                "expression registered twice"
            );
        }
        tracing::debug!(
            name = %schema.name(),
            metrics = schema.expr().metrics().len(),
            "expression registered"
        );
        self.schemas.push(schema);
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpressionSchema> {
        self.schemas.iter()
    }

    /// Exact-match filtering by name and by `:`-joined namespace.
    ///
    /// An empty filter list does not constrain; with both empty every schema
    /// is returned in registration order.
    pub fn filter<'a>(
        &'a self,
        names: &'a [String],
        namespaces: &'a [String],
    ) -> impl Iterator<Item = &'a ExpressionSchema> + 'a {
        self.schemas.iter().filter(move |s| {
            let name_ok = names.is_empty() || names.iter().any(|n| n == s.name());
            let ns_ok = namespaces.is_empty() || {
                let key = s.namespace_key();
                namespaces.iter().any(|n| *n == key)
            };
            name_ok && ns_ok
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use statscope_core::Expression;

    fn schema(name: &str, ns: &[&str]) -> ExpressionSchema {
        ExpressionSchema::builder(name, Expression::None)
            .namespace(ns.iter().map(|s| s.to_string()).collect())
            .build()
            .unwrap()
    }

    fn registry() -> ExpressionRegistry {
        let mut r = ExpressionRegistry::new();
        r.register(schema("success_rate", &["tenant", "a"]));
        r.register(schema("latency", &[]));
        r.register(schema("success_rate", &["tenant", "b"]));
        r
    }

    fn names<'a>(it: impl Iterator<Item = &'a ExpressionSchema>) -> Vec<String> {
        it.map(|s| format!("{}@{}", s.name(), s.namespace_key())).collect()
    }

    #[test]
    fn no_filters_returns_everything_in_order() {
        let r = registry();
        assert_eq!(
            names(r.filter(&[], &[])),
            vec!["success_rate@tenant:a", "latency@", "success_rate@tenant:b"]
        );
    }

    #[test]
    fn name_filter_is_exact() {
        let r = registry();
        let n = vec!["success_rate".to_string()];
        assert_eq!(
            names(r.filter(&n, &[])),
            vec!["success_rate@tenant:a", "success_rate@tenant:b"]
        );

        let partial = vec!["success".to_string()];
        assert_eq!(r.filter(&partial, &[]).count(), 0);
    }

    #[test]
    fn namespace_filter_matches_joined_key() {
        let r = registry();
        let ns = vec!["tenant:b".to_string()];
        assert_eq!(names(r.filter(&[], &ns)), vec!["success_rate@tenant:b"]);

        let prefix_only = vec!["tenant".to_string()];
        assert_eq!(r.filter(&[], &prefix_only).count(), 0);
    }

    #[test]
    fn both_filters_must_match() {
        let r = registry();
        let n = vec!["latency".to_string()];
        let ns = vec!["tenant:a".to_string()];
        assert_eq!(r.filter(&n, &ns).count(), 0);

        let root = vec![String::new()];
        assert_eq!(names(r.filter(&n, &root)), vec!["latency@"]);
    }
}

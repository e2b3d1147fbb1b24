//! statscope core: metric expression model, stats formatting, and the
//! expression-to-query translator.
//!
//! This crate carries no transport or runtime dependencies. The admin server
//! builds on it, but the translator is a plain function over an immutable
//! tree and can be reused anywhere a query string for a derived metric is
//! needed.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Invalid trees are rejected when they are built, so rendering never fails.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod error;
pub mod expr;
pub mod format;
pub mod identity;
pub mod rate;
pub mod schema;
pub mod translate;

/// Shared result type.
pub use error::{Result, StatscopeError};
pub use expr::{Component, Expression, FunctionCall, Percentile};
pub use format::{CommonsMetrics, CommonsStats, StatsFormat, StatsFormatter};
pub use identity::{MetricIdentity, MetricKind};
pub use translate::Translator;

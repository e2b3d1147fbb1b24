//! Lightweight in-process metrics for the admin server itself.
//!
//! Counters and a latency histogram are stored as atomics and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;

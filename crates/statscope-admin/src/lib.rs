//! statscope admin library entry.
//!
//! Wires config, the metric catalog, the expression registry, and the
//! delegation table into an axum router. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod dtab;
pub mod error;
pub mod obs;
pub mod ops;
pub mod registry;
pub mod router;

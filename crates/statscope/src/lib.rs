//! Top-level facade crate for statscope.
//!
//! Re-exports the expression model and the admin server so users can depend on a single crate.

pub mod core {
    pub use statscope_core::*;
}

pub mod admin {
    pub use statscope_admin::*;
}

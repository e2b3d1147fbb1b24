//! Admin config loader (strict parsing).

pub mod expr;
pub mod schema;

use std::fs;

use statscope_core::error::{Result, StatscopeError};

pub use expr::{ComponentSpec, ExprSpec};
pub use schema::{AdminConfig, AdminSection, ExpressionDecl, MetricDecl};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "STATSCOPE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "statscope.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<AdminConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| StatscopeError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AdminConfig> {
    let cfg: AdminConfig = serde_yaml::from_str(s)
        .map_err(|e| StatscopeError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

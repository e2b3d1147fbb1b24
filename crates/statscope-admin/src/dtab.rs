//! Delegation table (dtab): ordered prefix rewrite rules.
//!
//! Textual form: `/prefix => /dst; /other => /x`. Whitespace around entries
//! and arrows is ignored; empty entries (e.g. a trailing `;`) are skipped.

use std::fmt;

use statscope_core::error::{Result, StatscopeError};

/// One rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dentry {
    pub prefix: String,
    pub dst: String,
}

impl fmt::Display for Dentry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=>{}", self.prefix, self.dst)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dtab {
    dentries: Vec<Dentry>,
}

impl Dtab {
    pub fn parse(s: &str) -> Result<Self> {
        let mut dentries = Vec::new();
        for raw in s.split(';') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (prefix, dst) = raw.split_once("=>").ok_or_else(|| {
                StatscopeError::BadRequest(format!("invalid dentry: {raw} (expected prefix=>dst)"))
            })?;
            dentries.push(Dentry {
                prefix: path(prefix.trim(), raw)?,
                dst: path(dst.trim(), raw)?,
            });
        }
        Ok(Self { dentries })
    }

    pub fn dentries(&self) -> &[Dentry] {
        &self.dentries
    }

    pub fn is_empty(&self) -> bool {
        self.dentries.is_empty()
    }

    /// Entries rendered as `prefix=>dst`, in table order.
    pub fn show(&self) -> Vec<String> {
        self.dentries.iter().map(ToString::to_string).collect()
    }
}

fn path(p: &str, entry: &str) -> Result<String> {
    if !p.starts_with('/') {
        return Err(StatscopeError::BadRequest(format!(
            "dentry path must start with '/': {p:?} in {entry}"
        )));
    }
    if p.chars().any(char::is_whitespace) {
        return Err(StatscopeError::BadRequest(format!(
            "dentry path must not contain whitespace: {p:?} in {entry}"
        )));
    }
    Ok(p.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn parses_in_order() {
        let d = Dtab::parse("/s => /#/io.l5d.fs ; /svc=>/s;").unwrap();
        assert_eq!(d.show(), vec!["/s=>/#/io.l5d.fs", "/svc=>/s"]);
    }

    #[test]
    fn empty_table() {
        assert!(Dtab::parse("").unwrap().is_empty());
        assert!(Dtab::parse("  ;  ").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(Dtab::parse("/a -> /b").is_err());
        assert!(Dtab::parse("a => /b").is_err());
        assert!(Dtab::parse("/a => /b c").is_err());
    }
}

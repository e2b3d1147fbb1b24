//! Expression-to-query translator.
//!
//! Renders an expression tree as a single-line call in a small functional
//! query language, e.g. `multiply(100.0,divide(rate(success),plus(rate(success),rate(failures))))`.
//!
//! Rules:
//! - `Metric`: segments joined by the separator; counters become `rate(name)`
//!   when the rate flag is set. Gauges and histograms are never wrapped.
//! - `HistogramComponent`: `formatter.histo_name(name, label)`, never wrapped.
//! - `Constant`: shortest round-trip float text (`100` renders as `100.0`).
//! - `Function`: `name(arg,arg,...)`, arguments rendered with the same flag.
//! - `None`: `null`.

use std::fmt::Write;

use crate::expr::Expression;
use crate::format::StatsFormatter;
use crate::identity::MetricKind;

/// Borrowed formatting settings for one or more translations.
///
/// Holds no mutable state; a single translator can be shared across threads.
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    formatter: &'a dyn StatsFormatter,
    separator: char,
}

impl<'a> Translator<'a> {
    pub fn new(formatter: &'a dyn StatsFormatter, separator: char) -> Self {
        Self { formatter, separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Render `expr`. `should_rate` is resolved once per request by the caller.
    pub fn translate(&self, expr: &Expression, should_rate: bool) -> String {
        let mut out = String::new();
        self.write_expr(expr, should_rate, &mut out);
        out
    }

    fn write_expr(&self, expr: &Expression, should_rate: bool, out: &mut String) {
        match expr {
            Expression::Metric(id) => {
                let name = id.flat_name(self.separator);
                if should_rate && id.kind() == MetricKind::Counter {
                    let _ = write!(out, "rate({name})");
                } else {
                    out.push_str(&name);
                }
            }
            Expression::HistogramComponent(id, component) => {
                let name = id.flat_name(self.separator);
                let label = self.formatter.label(*component);
                out.push_str(&self.formatter.histo_name(&name, &label));
            }
            Expression::Constant(v) => write_constant(*v, out),
            Expression::Function(call) => {
                out.push_str(call.name());
                out.push('(');
                for (i, arg) in call.args().iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_expr(arg, should_rate, out);
                }
                out.push(')');
            }
            Expression::None => out.push_str("null"),
        }
    }
}

/// Shortest round-trip float text with at least one fractional digit, so
/// `100` is `100.0` and `1e16` is `1.0e16`.
fn write_constant(v: f64, out: &mut String) {
    let text = format!("{v:?}");
    if !v.is_finite() || text.contains('.') {
        out.push_str(&text);
        return;
    }
    match text.find('e') {
        Some(exp) => {
            out.push_str(&text[..exp]);
            out.push_str(".0");
            out.push_str(&text[exp..]);
        }
        None => {
            out.push_str(&text);
            out.push_str(".0");
        }
    }
}

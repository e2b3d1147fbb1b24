//! Per-request rate decision.
//!
//! Counters are wrapped in `rate(...)` only when the client asks for it and
//! the metrics source does not already latch (pre-rate) its counters.

/// Truthy query value. Only the exact, case-sensitive strings `"true"` and
/// `"1"` count; this matching is a wire contract shared with existing clients.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some("1"))
}

/// Resolve the rate flag once for a whole request.
pub fn should_rate(latching_style: Option<&str>, counters_latched: bool) -> bool {
    is_truthy(latching_style) && !counters_latched
}

//! Symbolic observation intervals.
//!
//! Expressions use the six-field cron format (`sec min hour dom month dow`)
//! accepted by the scheduler. Resolution never fails: anything that is not a
//! known name is handed to the scheduler verbatim, which rejects it there if
//! it does not parse.

/// Known interval names and their cron expressions.
const INTERVALS: &[(&str, &str)] = &[
    ("minutely", "0 * * * * *"),
    ("hourly", "0 0 * * * *"),
    ("daily", "0 0 0 * * *"),
    ("midnight", "0 0 0 * * *"),
    ("weekly", "0 0 0 * * SUN"),
    ("monthly", "0 0 0 1 * *"),
    ("6h", "0 0 */6 * * *"),
    ("2h", "0 0 */2 * * *"),
];

/// Map a symbolic interval to its cron expression, or pass `interval`
/// through unchanged when it is not a known name.
#[must_use]
pub fn resolve_interval(interval: &str) -> String {
    INTERVALS
        .iter()
        .find(|(name, _)| *name == interval)
        .map_or_else(|| interval.to_string(), |(_, expr)| (*expr).to_string())
}

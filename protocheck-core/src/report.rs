//! Report rendering - the check failure message, plaintext and JSON.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::checker::Analysis;

/// Failure outcome of a check: one or more non-ignored types are unused.
///
/// `Display` renders the report protoc shows the user, one line per type:
///
/// ```text
/// unused message: 'pkg.Unused'
/// unused message: 'pkg.Unused.Nested'
/// ```
///
/// Lines are joined with `\n` and there is no trailing newline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", Lines(.names))]
pub struct UnusedTypes {
    /// Fully-qualified names in report order
    pub names: Vec<String>,
}

impl UnusedTypes {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Each report line, in order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.names.iter().map(|n| format!("unused message: '{}'", n))
    }
}

struct Lines<'a>(&'a [String]);

impl fmt::Display for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "unused message: '{}'", name)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    unused: &'a [String],
    stats: JsonStats,
}

#[derive(Serialize)]
struct JsonStats {
    declared_types: usize,
    reachable_types: usize,
    unused_types: usize,
    ignored_types: usize,
    root_count: usize,
}

/// Renders an analysis in plain text format.
pub fn render_plain(analysis: &Analysis) -> String {
    if analysis.unused.is_empty() {
        return "No unused messages found.".to_string();
    }
    let mut out = format!("UNUSED TYPES ({}):", analysis.unused.len());
    for line in UnusedTypes::new(analysis.unused.clone()).lines() {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

/// Renders an analysis in JSON format.
pub fn render_json(analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        unused: &analysis.unused,
        stats: JsonStats {
            declared_types: analysis.declared_count,
            reachable_types: analysis.reachable.len(),
            unused_types: analysis.unused.len(),
            ignored_types: analysis.ignored_count(),
            root_count: analysis.roots.len(),
        },
    })
}

/// Prints an analysis in plain text format.
pub fn print_plain(analysis: &Analysis) {
    println!("{}", render_plain(analysis));
}

/// Prints an analysis in JSON format.
///
/// Falls back to a bare list if serialization fails.
pub fn print_json(analysis: &Analysis) {
    match render_json(analysis) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::warn!(error = %e, "JSON serialization failed");
            println!("{{\"unused\": {:?}}}", analysis.unused);
        }
    }
}

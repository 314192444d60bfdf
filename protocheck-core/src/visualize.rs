//! Graphviz DOT visualization for the type graph.

use crate::detect::find_unused;
use crate::graph::build_type_graph;
use crate::schema::SchemaTree;
use std::collections::HashSet;
use std::fmt::Write;

/// Generate a Graphviz DOT representation of the type graph.
///
/// - reachable types are lightgreen
/// - unused types are lightcoral
/// - unreachable map entries (never reported) are lightgray
/// - enums are ellipses, map entries dashed
/// - edges are field references between declared types
pub fn generate_dot(tree: &SchemaTree, reachable: &HashSet<String>) -> String {
    // ~80 bytes per node + 150 bytes header/footer
    let mut dot = String::with_capacity(tree.declared_count() * 80 + 150);

    if let Err(e) = write_dot_content(&mut dot, tree, reachable) {
        tracing::error!(error = %e, "failed to generate DOT string");
        return "digraph protocheck {\n}\n".to_string();
    }

    dot
}

fn write_dot_content(
    dot: &mut String,
    tree: &SchemaTree,
    reachable: &HashSet<String>,
) -> std::fmt::Result {
    let reachable: HashSet<&str> = reachable.iter().map(String::as_str).collect();
    let unused: HashSet<&str> = find_unused(tree, &reachable).into_iter().collect();
    let color = |name: &str| {
        if unused.contains(name) {
            "lightcoral"
        } else if reachable.contains(name) {
            "lightgreen"
        } else {
            "lightgray"
        }
    };

    writeln!(dot, "digraph protocheck {{")?;
    writeln!(dot, "  rankdir=LR;")?;
    writeln!(
        dot,
        "  node [shape=box, style=filled, fontname=\"JetBrains Mono\"];"
    )?;
    writeln!(dot)?;

    // 1. NODES
    let mut result = Ok(());
    tree.for_each_message(|m| {
        if result.is_err() {
            return;
        }
        let style = if m.map_entry { ", style=\"filled,dashed\"" } else { "" };
        result = writeln!(
            dot,
            "  \"{}\" [fillcolor={}{}];",
            m.full_name,
            color(m.full_name.as_str()),
            style
        );
    });
    result?;
    tree.for_each_enum(|e| {
        if result.is_err() {
            return;
        }
        result = writeln!(
            dot,
            "  \"{}\" [shape=ellipse, fillcolor={}];",
            e.full_name,
            color(e.full_name.as_str())
        );
    });
    result?;

    writeln!(dot)?;

    // 2. EDGES (undeclared targets never made it into the graph)
    for (from, to, _) in build_type_graph(tree).all_edges() {
        writeln!(dot, "  \"{}\" -> \"{}\";", from, to)?;
    }

    writeln!(dot, "}}")?;
    Ok(())
}

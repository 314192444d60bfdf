//! Type graph construction and reachability analysis using BFS.
//!
//! Nodes are declared messages and enums (every nesting level, map entries
//! included); edges go from a message to the types its fields reference.
//! Enums have no outgoing edges and are leaves.
//!
//! Performance characteristics:
//! - Graph build: O(|V| + |E|) where V = declared types, E = field references
//! - Multi-source reachability: O(|V| + |E|) single traversal, cycle-safe

use crate::detect::find_unused;
use crate::schema::SchemaTree;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Builds the type graph from the schema tree.
///
/// References to types that are not declared in the tree produce no edge.
pub fn build_type_graph(tree: &SchemaTree) -> DiGraphMap<&str, ()> {
    let mut g = DiGraphMap::new();

    // 1. Add all nodes
    tree.for_each_message(|m| {
        g.add_node(m.full_name.as_str());
    });
    tree.for_each_enum(|e| {
        g.add_node(e.full_name.as_str());
    });

    // 2. Add all edges (field references)
    tree.for_each_message(|m| {
        for target in m.referenced_types() {
            if g.contains_node(target) {
                g.add_edge(m.full_name.as_str(), target, ());
            } else {
                debug!(from = %m.full_name, to = %target, "field references undeclared type");
            }
        }
    });

    g
}

/// Marks every type reachable from the RPC input and output types.
///
/// Reachability flows only along message -> field edges. Enums are leaves,
/// and nesting alone never makes a type reachable. A root that is not
/// declared in the tree is logged and dropped. Each type enters the frontier
/// once, so self-referencing and mutually recursive messages are walked a
/// single time.
pub fn reachable_from_roots<'a>(
    g: &DiGraphMap<&'a str, ()>,
    roots: impl IntoIterator<Item = &'a str>,
) -> HashSet<&'a str> {
    let mut reachable = HashSet::new();
    let mut frontier: VecDeque<&'a str> = roots
        .into_iter()
        .filter(|&root| {
            if !g.contains_node(root) {
                warn!(root = %root, "RPC type not found in schema tree");
                return false;
            }
            reachable.insert(root)
        })
        .collect();

    while let Some(ty) = frontier.pop_front() {
        frontier.extend(g.neighbors(ty).filter(|&field_type| reachable.insert(field_type)));
    }

    debug!(reachable = reachable.len(), types = g.node_count(), "reachability computed");
    reachable
}

/// Export the type graph in visualizer-compatible JSON format.
///
/// `unused` matches [`find_unused`] before ignore filters: map entries and
/// the types nested in them are never flagged, even when unreachable.
///
/// ```json
/// {
///   "nodes": [{ "id": 0, "name": "pkg.Type", "kind": "message", "reachable": true, "unused": false }],
///   "edges": [{ "from": 0, "to": 1 }]
/// }
/// ```
pub fn type_graph_to_json(
    tree: &SchemaTree,
    g: &DiGraphMap<&str, ()>,
    reachable: &HashSet<&str>,
) -> serde_json::Value {
    let unused: HashSet<&str> = find_unused(tree, reachable).into_iter().collect();

    // Declaration order keeps ids stable across runs
    let mut kinds: Vec<(&str, &str)> = Vec::with_capacity(g.node_count());
    tree.for_each_message(|m| {
        kinds.push((m.full_name.as_str(), if m.map_entry { "map_entry" } else { "message" }));
    });
    tree.for_each_enum(|e| kinds.push((e.full_name.as_str(), "enum")));

    let mut name_to_id: HashMap<&str, usize> = HashMap::with_capacity(kinds.len());
    let mut nodes = Vec::with_capacity(kinds.len());
    for (name, kind) in kinds {
        if name_to_id.contains_key(name) {
            continue;
        }
        let id = name_to_id.len();
        name_to_id.insert(name, id);
        nodes.push(serde_json::json!({
            "id": id,
            "name": name,
            "kind": kind,
            "reachable": reachable.contains(name),
            "unused": unused.contains(name),
        }));
    }

    let mut edges: Vec<(usize, usize)> = g
        .all_edges()
        .filter_map(|(from, to, _)| Some((*name_to_id.get(from)?, *name_to_id.get(to)?)))
        .collect();
    edges.sort_unstable();
    let edges: Vec<serde_json::Value> = edges
        .into_iter()
        .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
        .collect();

    serde_json::json!({
        "nodes": nodes,
        "edges": edges,
        "stats": {
            "total_types": name_to_id.len(),
            "total_edges": edges.len(),
            "unused_types": unused.len(),
        }
    })
}

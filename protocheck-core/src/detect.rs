//! Unused type detection.

use crate::schema::{Message, SchemaTree};
use std::collections::HashSet;

/// Finds declared types that are not present in the reachable set.
///
/// Order is deterministic: files in input order; within a file, each
/// top-level message subtree depth-first (message, its nested enums, then its
/// nested messages), followed by the file's top-level enums.
///
/// Map entries are skipped along with everything nested inside them.
/// Reachability is checked at every level independently, so a nested type
/// can be unused under a reachable parent and the other way around.
pub fn find_unused<'a>(tree: &'a SchemaTree, reachable: &HashSet<&str>) -> Vec<&'a str> {
    let mut unused = Vec::new();
    for file in &tree.files {
        for message in &file.messages {
            collect_unused(message, reachable, &mut unused);
        }
        unused.extend(
            file.enums
                .iter()
                .map(|e| e.full_name.as_str())
                .filter(|name| !reachable.contains(name)),
        );
    }
    unused
}

fn collect_unused<'a>(message: &'a Message, reachable: &HashSet<&str>, out: &mut Vec<&'a str>) {
    if !reachable.contains(message.full_name.as_str()) {
        out.push(&message.full_name);
    }
    out.extend(
        message
            .enums
            .iter()
            .map(|e| e.full_name.as_str())
            .filter(|name| !reachable.contains(name)),
    );
    for nested in message.messages.iter().filter(|m| !m.map_entry) {
        collect_unused(nested, reachable, out);
    }
}

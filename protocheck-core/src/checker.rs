//! Builder API for running the unused-type check.
//!
//! ```rust,ignore
//! use protocheck_core::prelude::*;
//!
//! Checker::new(&tree)
//!     .ignore_packages(["google"])
//!     .ignore_messages(["api.v1.Legacy"])
//!     .check()?;
//! ```

use std::collections::HashSet;

use tracing::info;

use crate::detect::find_unused;
use crate::filter::IgnoreFilter;
use crate::graph::{build_type_graph, reachable_from_roots};
use crate::report::UnusedTypes;
use crate::schema::SchemaTree;

/// Configures and runs the check over one schema tree.
///
/// The tree is never mutated; each call to [`Checker::analyze`] starts from
/// scratch, so repeated calls give identical results.
#[derive(Debug, Clone)]
pub struct Checker<'a> {
    tree: &'a SchemaTree,
    filter: IgnoreFilter,
}

impl<'a> Checker<'a> {
    pub fn new(tree: &'a SchemaTree) -> Self {
        Self {
            tree,
            filter: IgnoreFilter::default(),
        }
    }

    /// Add fully-qualified type names that are never reported.
    pub fn ignore_messages(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.filter.messages.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add package prefixes whose types are never reported.
    pub fn ignore_packages(mut self, packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.filter.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    /// Replace the whole filter.
    pub fn with_filter(mut self, filter: IgnoreFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run the analysis and return all intermediate results.
    pub fn analyze(&self) -> Analysis {
        // 1. Roots: every RPC input and output
        let roots: Vec<&str> = self.tree.roots().collect();

        // 2. Build graph and find reachable
        let graph = build_type_graph(self.tree);
        let reachable = reachable_from_roots(&graph, roots.iter().copied());

        // 3. Find unused, then drop ignored
        let unfiltered = find_unused(self.tree, &reachable);
        let unused = self.filter.apply(unfiltered.clone());

        info!(
            roots = roots.len(),
            declared = graph.node_count(),
            reachable = reachable.len(),
            unused = unused.len(),
            ignored = unfiltered.len() - unused.len(),
            "schema check finished"
        );

        Analysis {
            roots: roots.into_iter().map(String::from).collect(),
            reachable: reachable.into_iter().map(String::from).collect(),
            declared_count: self.tree.declared_count(),
            unfiltered: unfiltered.into_iter().map(String::from).collect(),
            unused: unused.into_iter().map(String::from).collect(),
        }
    }

    /// Succeeds when no non-ignored type is unused.
    pub fn check(&self) -> Result<(), UnusedTypes> {
        self.analyze().into_result()
    }
}

/// Result of running the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// RPC input and output type names, in declaration order
    pub roots: Vec<String>,
    /// Types reachable from the roots
    pub reachable: HashSet<String>,
    /// Declared messages and enums at every nesting level
    pub declared_count: usize,
    /// Unused types before ignore filters
    pub unfiltered: Vec<String>,
    /// Unused types after ignore filters, in report order
    pub unused: Vec<String>,
}

impl Analysis {
    pub fn has_unused(&self) -> bool {
        !self.unused.is_empty()
    }

    /// Number of unused types suppressed by ignore filters.
    pub fn ignored_count(&self) -> usize {
        self.unfiltered.len() - self.unused.len()
    }

    pub fn into_result(self) -> Result<(), UnusedTypes> {
        if self.unused.is_empty() {
            Ok(())
        } else {
            Err(UnusedTypes::new(self.unused))
        }
    }
}

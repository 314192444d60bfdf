//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use protocheck_core::prelude::*;
//! ```

pub use crate::checker::{Analysis, Checker};
pub use crate::descriptor::{ensure_language_packages, tree_from_files, PackageSource};
pub use crate::error::{CheckerError, CheckerResult};
pub use crate::filter::IgnoreFilter;
pub use crate::params::PluginParams;
pub use crate::report::UnusedTypes;
pub use crate::schema::SchemaTree;

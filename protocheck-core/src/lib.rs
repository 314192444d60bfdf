//! protocheck-core: unused protobuf message and enum detection
//!
//! Given a set of `.proto` files, finds every declared message and enum that
//! cannot be reached from any RPC method input or output, and reports it.
//! Intended to run as a protoc plugin stage that fails the build when the
//! schema carries dead types.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use protocheck_core::prelude::*;
//!
//! let tree = tree_from_files(&request.proto_file);
//! if let Err(unused) = Checker::new(&tree).ignore_packages(["google"]).check() {
//!     eprintln!("{}", unused);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`schema`]: In-memory schema tree (files, services, messages, enums)
//! - [`descriptor`]: Conversion from prost-types descriptors
//! - [`graph`]: Type graph construction and reachability analysis
//! - [`detect`]: Unused type detection
//! - [`filter`]: Exact-name and package-prefix ignore rules
//! - [`checker`]: Builder API composing the whole check
//! - [`report`]: Failure report and plain/JSON rendering
//! - [`params`]: protoc plugin parameter parsing
//! - [`config`]: protocheck.toml loading
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `dot` (default): Enable Graphviz DOT export of the type graph

pub mod checker;
pub mod config;
pub mod descriptor;
pub mod detect;
pub mod error;
pub mod filter;
pub mod graph;
pub mod logging;
pub mod params;
pub mod prelude;
pub mod report;
pub mod schema;

#[cfg(feature = "dot")]
pub mod visualize;

// Error types
pub use error::{CheckerError, CheckerResult, IoResultExt};

// Builder API
pub use checker::{Analysis, Checker};

// Configuration
pub use config::{find_config, load_config, CheckerConfig, OutputConfig, CONFIG_FILE};
pub use params::PluginParams;

// Descriptor conversion
pub use descriptor::{
    decode_descriptor_set, ensure_language_packages, tree_from_files, PackageSource,
};

// Core detection
pub use detect::find_unused;
pub use filter::IgnoreFilter;

// Graph building
pub use graph::{build_type_graph, reachable_from_roots, type_graph_to_json};

// Logging
pub use logging::init_structured_logging;

// Reporting
pub use report::{print_json, print_plain, render_json, render_plain, UnusedTypes};

// Schema model
pub use schema::{Enum, Field, Message, Method, SchemaFile, SchemaTree, Service};

#[cfg(feature = "dot")]
pub use visualize::generate_dot;

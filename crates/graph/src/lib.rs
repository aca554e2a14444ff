//! # typescan graph
//!
//! Relationship graph over the types found by a classpath-style scan.
//!
//! ## Features
//!
//! - **Relation index** - class, interface and tag relations with their inverses
//! - **Closure queries** - sub/super classes, interfaces, implementors, tags and meta-tags
//! - **Whitelist filtering** - external types hidden unless the scan allows them
//! - **Diagram export** - Graphviz DOT with per-kind node styles and typed edges
//!
//! ## Architecture
//!
//! ```text
//! TypeRecord[] (from the scanner)
//!     │
//!     ├──> Graph Builder
//!     │      ├─ Phase 1: one node per record
//!     │      └─ Phase 2: wire relations by name (typed edges)
//!     │
//!     ├──> Type Graph (petgraph)
//!     │      ├─ Nodes: records (standard, interface, tag)
//!     │      └─ Edges: extends, implements, tagged-by, type refs, ...
//!     │
//!     ├──> Closure Queries
//!     │      └─ sorted, duplicate-free name lists
//!     │
//!     └──> Dot Exporter
//!            └─ DOT text for a visible node set
//! ```
//!
//! ## Example
//!
//! ```rust
//! use typescan_graph::{ScanConfig, TypeGraph, TypeRecord};
//!
//! let records = vec![
//!     TypeRecord::interface("Flyer"),
//!     TypeRecord::interface("Swimmer").extends_interface("Flyer"),
//!     TypeRecord::standard("Duck").implements("Swimmer"),
//! ];
//! let graph = typescan_graph::GraphBuilder::new(ScanConfig::default())
//!     .unwrap()
//!     .build_from_records(records)
//!     .unwrap();
//!
//! assert_eq!(graph.names_of_classes_implementing("Flyer"), vec!["Duck"]);
//! ```

mod builder;
mod config;
mod error;
mod export;
mod graph;
mod label;
mod query;
mod style;
mod types;

pub use builder::GraphBuilder;
pub use config::{DiagramConfig, ScanConfig, DEFAULT_ROOT_TYPE};
pub use error::{GraphError, Result};
pub use export::DotExporter;
pub use graph::TypeGraph;
pub use label::{html_encode, PARAM_WRAP_WIDTH};
pub use style::{EdgeStyle, NodeStyle, Rgb, HEADER_DARKNESS};
pub use types::{
    modifiers_str, AttributeInfo, Modifier, ParameterInfo, RelationKind, RoutineInfo, TagArgument,
    TagUse, TypeKind, TypeRecord, TypeRef, CONSTRUCTOR_NAME, STATIC_INITIALIZER_NAME,
};

pub use petgraph::Direction;

use crate::builder::GraphBuilder;
use crate::config::ScanConfig;
use crate::error::Result;
use crate::types::{RelationKind, TypeKind, TypeRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Relation index over the scanned types
///
/// Records live as node weights in a directed graph; every direct relation
/// is one typed edge from carrier to target, so each inverse relation is the
/// incoming side of the same edge and the two can never disagree. The graph
/// is read-only once built.
#[derive(Debug)]
pub struct TypeGraph {
    /// Directed graph (carrier -> target, typed by relation)
    pub(crate) graph: DiGraph<TypeRecord, RelationKind>,

    /// Type name -> NodeIndex mapping for fast lookup
    pub(crate) name_index: HashMap<String, NodeIndex>,

    /// Type name -> origin identifiers (only for records that carried some)
    pub(crate) origins: HashMap<String, Vec<String>>,

    pub(crate) config: ScanConfig,
}

impl TypeGraph {
    pub(crate) fn empty(config: ScanConfig) -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
            origins: HashMap::new(),
            config,
        }
    }

    /// Build the index from a name -> record mapping
    pub fn build(records: HashMap<String, TypeRecord>, config: ScanConfig) -> Result<Self> {
        GraphBuilder::new(config)?.build(records)
    }

    /// Build the index from a JSON document holding either an object keyed by
    /// type name or an array of records
    pub fn from_json(json: &str, config: ScanConfig) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let builder = GraphBuilder::new(config)?;
        if value.is_array() {
            let records: Vec<TypeRecord> = serde_json::from_value(value)?;
            builder.build_from_records(records)
        } else {
            let records: HashMap<String, TypeRecord> = serde_json::from_value(value)?;
            builder.build(records)
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Look up a record by name, regardless of visibility
    pub fn record(&self, name: &str) -> Option<&TypeRecord> {
        self.find_node(name).map(|idx| &self.graph[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All records, sorted by name; with `include_external == false` every
    /// external record is left out
    pub fn all_records(&self, include_external: bool) -> Vec<&TypeRecord> {
        let mut records: Vec<_> = self
            .graph
            .node_weights()
            .filter(|r| include_external || !r.is_external)
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Records visible under the scan config's whitelist rule
    pub fn records(&self) -> Vec<&TypeRecord> {
        self.all_records(self.config.enable_external_types)
    }

    /// Origin identifiers recorded for a type
    pub fn origins_of(&self, name: &str) -> Option<&[String]> {
        self.origins.get(name).map(Vec::as_slice)
    }

    /// Type name -> origin identifiers
    pub fn type_origins(&self) -> &HashMap<String, Vec<String>> {
        &self.origins
    }

    /// Direct superclass, if it is in the index
    pub fn direct_superclass(&self, name: &str) -> Option<&TypeRecord> {
        self.direct(name, RelationKind::Extends, Direction::Outgoing)
            .into_iter()
            .next()
    }

    pub fn direct_subclasses(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::Extends, Direction::Incoming)
    }

    pub fn directly_implemented_interfaces(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::Implements, Direction::Outgoing)
    }

    pub fn implementing_classes(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::Implements, Direction::Incoming)
    }

    pub fn direct_superinterfaces(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::ExtendsInterface, Direction::Outgoing)
    }

    pub fn direct_subinterfaces(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::ExtendsInterface, Direction::Incoming)
    }

    pub fn direct_tags(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::TaggedBy, Direction::Outgoing)
    }

    pub fn tagged_types(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::TaggedBy, Direction::Incoming)
    }

    pub fn direct_meta_tags(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::MetaTaggedBy, Direction::Outgoing)
    }

    pub fn types_with_this_as_meta_tag(&self, name: &str) -> Vec<&TypeRecord> {
        self.direct(name, RelationKind::MetaTaggedBy, Direction::Incoming)
    }

    /// Directly related records over one relation, sorted by name
    pub fn direct(&self, name: &str, kind: RelationKind, direction: Direction) -> Vec<&TypeRecord> {
        let Some(idx) = self.find_node(name) else {
            return Vec::new();
        };
        let mut related: Vec<_> = self
            .neighbors(idx, kind, direction)
            .map(|n| &self.graph[n])
            .collect();
        related.sort_by(|a, b| a.name.cmp(&b.name));
        related.dedup_by(|a, b| a.name == b.name);
        related
    }

    pub(crate) fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    /// Nodes one edge of `kind` away in the given direction
    pub(crate) fn neighbors(
        &self,
        node: NodeIndex,
        kind: RelationKind,
        direction: Direction,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(node, direction)
            .filter(move |e| *e.weight() == kind)
            .map(move |e| match direction {
                Direction::Outgoing => e.target(),
                Direction::Incoming => e.source(),
            })
    }

    pub(crate) fn is_root(&self, node: NodeIndex) -> bool {
        self.graph[node].name == self.config.root_type
    }

    /// External records are only visible when the scan config allows them
    pub(crate) fn is_visible(&self, node: NodeIndex) -> bool {
        self.config.enable_external_types || !self.graph[node].is_external
    }

    pub(crate) fn kind_of(&self, node: NodeIndex) -> TypeKind {
        self.graph[node].kind
    }
}

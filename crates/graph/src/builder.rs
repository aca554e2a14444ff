use crate::config::ScanConfig;
use crate::error::{GraphError, Result};
use crate::graph::TypeGraph;
use crate::types::{RelationKind, TypeKind, TypeRecord};
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap};

/// Wires scanned records into a [`TypeGraph`]
pub struct GraphBuilder {
    config: ScanConfig,
}

impl GraphBuilder {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// Build graph from a name -> record mapping
    pub fn build(&self, records: HashMap<String, TypeRecord>) -> Result<TypeGraph> {
        let mut entries: Vec<_> = records.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut ordered = Vec::with_capacity(entries.len());
        for (key, record) in entries {
            if key != record.name {
                return Err(GraphError::invalid_record(format!(
                    "key '{key}' does not match record name '{}'",
                    record.name
                )));
            }
            ordered.push(record);
        }
        self.assemble(ordered)
    }

    /// Build graph from a list of records (names must be unique)
    pub fn build_from_records(&self, mut records: Vec<TypeRecord>) -> Result<TypeGraph> {
        records.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(dup) = records.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(GraphError::invalid_record(format!(
                "duplicate record '{}'",
                dup[0].name
            )));
        }
        self.assemble(records)
    }

    fn assemble(&self, records: Vec<TypeRecord>) -> Result<TypeGraph> {
        let mut graph = TypeGraph::empty(self.config.clone());

        // Phase 1: one node per record, in whatever order they arrived
        for record in records {
            if record.name.is_empty() {
                return Err(GraphError::invalid_record("record with empty name"));
            }
            if !record.origins.is_empty() {
                graph
                    .origins
                    .insert(record.name.clone(), record.origins.clone());
            }
            let name = record.name.clone();
            let idx = graph.graph.add_node(record);
            graph.name_index.insert(name, idx);
        }

        // Phase 2: re-attach cross-references now that every node exists
        let nodes: Vec<NodeIndex> = graph.graph.node_indices().collect();
        for idx in nodes {
            let relations = direct_relations(&graph.graph[idx]);
            for (kind, target) in relations {
                link(&mut graph, idx, kind, &target);
            }
        }

        log::info!(
            "Built type graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}

/// Every direct relation a record declares, as (relation, target name)
fn direct_relations(record: &TypeRecord) -> Vec<(RelationKind, String)> {
    let mut relations = Vec::new();

    if let Some(superclass) = &record.superclass {
        relations.push((RelationKind::Extends, superclass.clone()));
    }
    for interface in &record.interfaces {
        relations.push((RelationKind::Implements, interface.clone()));
    }
    for interface in &record.superinterfaces {
        relations.push((RelationKind::ExtendsInterface, interface.clone()));
    }

    let tag_relation = match record.kind {
        TypeKind::Tag => RelationKind::MetaTaggedBy,
        TypeKind::Standard | TypeKind::Interface => RelationKind::TaggedBy,
    };
    for tag in &record.tags {
        relations.push((tag_relation, tag.name.clone()));
    }

    let attribute_tags: BTreeSet<_> = record
        .attributes
        .iter()
        .flat_map(|a| a.tags.iter().map(|t| t.name.clone()))
        .collect();
    relations.extend(
        attribute_tags
            .into_iter()
            .map(|t| (RelationKind::AttributeTaggedBy, t)),
    );

    let routine_tags: BTreeSet<_> = record
        .routines
        .iter()
        .flat_map(|r| r.tags.iter().map(|t| t.name.clone()))
        .collect();
    relations.extend(
        routine_tags
            .into_iter()
            .map(|t| (RelationKind::RoutineTaggedBy, t)),
    );

    relations.extend(
        record
            .attribute_referenced_type_names()
            .into_iter()
            .map(|t| (RelationKind::AttributeTypeRef, t)),
    );
    relations.extend(
        record
            .routine_referenced_type_names()
            .into_iter()
            .map(|t| (RelationKind::RoutineTypeRef, t)),
    );

    relations
}

/// Which (carrier, target) kinds a relation may connect
fn kinds_fit(kind: RelationKind, from: TypeKind, to: TypeKind) -> bool {
    use TypeKind::{Interface, Standard, Tag};
    match kind {
        RelationKind::Extends => from == Standard && to == Standard,
        RelationKind::Implements => from == Standard && to == Interface,
        RelationKind::ExtendsInterface => from == Interface && to == Interface,
        RelationKind::TaggedBy => from != Tag && to == Tag,
        RelationKind::MetaTaggedBy => from == Tag && to == Tag,
        RelationKind::AttributeTaggedBy | RelationKind::RoutineTaggedBy => to == Tag,
        RelationKind::AttributeTypeRef | RelationKind::RoutineTypeRef => true,
    }
}

fn link(graph: &mut TypeGraph, from: NodeIndex, kind: RelationKind, target: &str) {
    let Some(to) = graph.find_node(target) else {
        // Type references routinely name primitives' boxes, JDK types etc.
        log::debug!(
            "{:?} from {} names unknown type {target}, dropped",
            kind,
            graph.graph[from].name
        );
        return;
    };

    let (from_kind, to_kind) = (graph.kind_of(from), graph.kind_of(to));
    if !kinds_fit(kind, from_kind, to_kind) {
        log::warn!(
            "{:?} from {} ({:?}) to {} ({:?}) doesn't fit the type kinds, dropped",
            kind,
            graph.graph[from].name,
            from_kind,
            target,
            to_kind
        );
        return;
    }

    let exists = graph
        .graph
        .edges_connecting(from, to)
        .any(|e| *e.weight() == kind);
    if !exists {
        graph.graph.add_edge(from, to, kind);
    }
}

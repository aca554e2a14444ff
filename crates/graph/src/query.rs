//! Transitive closure queries.
//!
//! Every listing returns a sorted, duplicate-free `Vec<String>`. Unknown
//! names yield an empty list. The root type and (under strict whitelisting)
//! external types never appear in a result.

use crate::graph::TypeGraph;
use crate::types::{RelationKind, TypeKind};
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{BTreeSet, HashSet, VecDeque};

impl TypeGraph {
    /// Names of all types, interfaces and tags
    pub fn names_of_all_types(&self) -> Vec<String> {
        self.names_of_kind(None)
    }

    /// Names of all standard (non-interface, non-tag) types
    pub fn names_of_all_standard_types(&self) -> Vec<String> {
        self.names_of_kind(Some(TypeKind::Standard))
    }

    pub fn names_of_all_interface_types(&self) -> Vec<String> {
        self.names_of_kind(Some(TypeKind::Interface))
    }

    pub fn names_of_all_tag_types(&self) -> Vec<String> {
        self.names_of_kind(Some(TypeKind::Tag))
    }

    /// All direct and indirect subclasses of a type
    pub fn names_of_subclasses_of(&self, name: &str) -> Vec<String> {
        self.closure_of(name, RelationKind::Extends, Direction::Incoming)
    }

    /// All superclasses of a type, up to (not including) the root type
    pub fn names_of_superclasses_of(&self, name: &str) -> Vec<String> {
        self.closure_of(name, RelationKind::Extends, Direction::Outgoing)
    }

    pub fn names_of_subinterfaces_of(&self, name: &str) -> Vec<String> {
        self.closure_of(name, RelationKind::ExtendsInterface, Direction::Incoming)
    }

    pub fn names_of_superinterfaces_of(&self, name: &str) -> Vec<String> {
        self.closure_of(name, RelationKind::ExtendsInterface, Direction::Outgoing)
    }

    /// Classes implementing an interface, directly or through one of its
    /// subinterfaces, together with all of their subclasses
    pub fn names_of_classes_implementing(&self, name: &str) -> Vec<String> {
        let Some(start) = self.find_node(name) else {
            return Vec::new();
        };

        let interfaces = self.reachable([start], RelationKind::ExtendsInterface, Direction::Incoming);
        let implementors: Vec<_> = interfaces
            .iter()
            .flat_map(|&i| self.neighbors(i, RelationKind::Implements, Direction::Incoming))
            .collect();
        let classes = self.reachable(implementors, RelationKind::Extends, Direction::Incoming);

        self.collect_names(
            classes
                .into_iter()
                .filter(|&n| self.kind_of(n) == TypeKind::Standard),
        )
    }

    /// Non-tag types carrying the tag directly, or carrying some tag that
    /// transitively has it as a meta-tag
    pub fn names_of_types_with_tag(&self, tag_name: &str) -> Vec<String> {
        let Some(start) = self.find_node(tag_name) else {
            return Vec::new();
        };

        let tags = self.reachable([start], RelationKind::MetaTaggedBy, Direction::Incoming);
        self.collect_names(
            tags.iter()
                .flat_map(|&t| self.neighbors(t, RelationKind::TaggedBy, Direction::Incoming))
                .filter(|&n| self.kind_of(n) != TypeKind::Tag),
        )
    }

    /// Tags on a type, plus all of their meta-tags
    pub fn names_of_tags_on_type(&self, name: &str) -> Vec<String> {
        let Some(start) = self.find_node(name) else {
            return Vec::new();
        };

        let direct: Vec<_> = self
            .neighbors(start, RelationKind::TaggedBy, Direction::Outgoing)
            .chain(self.neighbors(start, RelationKind::MetaTaggedBy, Direction::Outgoing))
            .collect();
        let mut tags = self.reachable(direct, RelationKind::MetaTaggedBy, Direction::Outgoing);
        tags.remove(&start);
        self.collect_names(tags)
    }

    /// All meta-tags on a tag, transitively
    pub fn names_of_meta_tags_on_tag(&self, tag_name: &str) -> Vec<String> {
        self.closure_of(tag_name, RelationKind::MetaTaggedBy, Direction::Outgoing)
    }

    /// All tags carrying the meta-tag, transitively
    pub fn names_of_tags_with_meta_tag(&self, meta_tag_name: &str) -> Vec<String> {
        self.closure_of(meta_tag_name, RelationKind::MetaTaggedBy, Direction::Incoming)
    }

    /// Types declaring a routine directly tagged with `tag_name`
    pub fn names_of_types_with_routine_tag(&self, tag_name: &str) -> Vec<String> {
        self.collect_names(
            self.graph
                .node_indices()
                .filter(|&n| self.graph[n].has_routine_tag(tag_name)),
        )
    }

    /// Types declaring an attribute directly tagged with `tag_name`
    pub fn names_of_types_with_attribute_tag(&self, tag_name: &str) -> Vec<String> {
        self.collect_names(
            self.graph
                .node_indices()
                .filter(|&n| self.graph[n].has_attribute_tag(tag_name)),
        )
    }

    fn names_of_kind(&self, kind: Option<TypeKind>) -> Vec<String> {
        self.collect_names(
            self.graph
                .node_indices()
                .filter(|&n| kind.map_or(true, |k| self.kind_of(n) == k)),
        )
    }

    /// Transitive closure from a named node, excluding the node itself
    fn closure_of(&self, name: &str, kind: RelationKind, direction: Direction) -> Vec<String> {
        let Some(start) = self.find_node(name) else {
            return Vec::new();
        };
        let mut reached = self.reachable([start], kind, direction);
        reached.remove(&start);
        self.collect_names(reached)
    }

    /// Seeds plus everything reachable from them over one relation.
    ///
    /// The visited set keeps this finite on cyclic input.
    pub(crate) fn reachable(
        &self,
        seeds: impl IntoIterator<Item = NodeIndex>,
        kind: RelationKind,
        direction: Direction,
    ) -> HashSet<NodeIndex> {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        for seed in seeds {
            if visited.insert(seed) {
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current, kind, direction) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Sorted unique names, dropping the root type and hidden external types
    fn collect_names(&self, nodes: impl IntoIterator<Item = NodeIndex>) -> Vec<String> {
        nodes
            .into_iter()
            .filter(|&n| !self.is_root(n) && self.is_visible(n))
            .map(|n| self.graph[n].name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

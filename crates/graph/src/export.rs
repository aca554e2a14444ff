use crate::config::DiagramConfig;
use crate::graph::TypeGraph;
use crate::label::LabelRenderer;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write;

/// Renders a visible subset of a [`TypeGraph`] as a Graphviz DOT document
pub struct DotExporter<'g> {
    graph: &'g TypeGraph,
    config: &'g DiagramConfig,
}

/// Quote a node id for DOT
fn quote_id(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

impl<'g> DotExporter<'g> {
    pub fn new(graph: &'g TypeGraph, config: &'g DiagramConfig) -> Self {
        Self { graph, config }
    }

    /// Render the named types and every relation between two of them.
    ///
    /// Unknown names and the root type are skipped; an edge is only written
    /// when both of its endpoints are visible.
    pub fn render<I, S>(&self, visible: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut nodes: Vec<NodeIndex> = visible
            .into_iter()
            .filter_map(|name| self.graph.find_node(name.as_ref()))
            .filter(|&n| !self.graph.is_root(n))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        nodes.sort_by(|&a, &b| {
            let (ra, rb) = (&self.graph.graph[a], &self.graph.graph[b]);
            (ra.kind, &ra.name).cmp(&(rb.kind, &rb.name))
        });
        let visible: HashSet<NodeIndex> = nodes.iter().copied().collect();

        let mut buf = String::new();
        self.header(&mut buf);

        let labels = LabelRenderer {
            scan: self.graph.config(),
            diagram: self.config,
        };
        for &node in &nodes {
            let record = &self.graph.graph[node];
            let style = record.kind.node_style();
            buf.push_str(&quote_id(&record.name));
            let _ = write!(
                buf,
                "[shape={},style=filled,fillcolor=\"{}\",label=",
                style.shape, style.fill
            );
            labels.render(record, style.header_background(), &mut buf);
            buf.push_str("];\n");
        }

        buf.push('\n');
        for &node in &nodes {
            let mut edges: Vec<_> = self
                .graph
                .graph
                .edges_directed(node, Direction::Outgoing)
                .filter(|e| visible.contains(&e.target()))
                .map(|e| (*e.weight(), e.target()))
                .collect();
            edges.sort_by(|a, b| {
                (a.0, &self.graph.graph[a.1].name).cmp(&(b.0, &self.graph.graph[b.1].name))
            });

            for (kind, target) in edges {
                let style = kind.edge_style();
                let (from, to) = if style.reversed {
                    (target, node)
                } else {
                    (node, target)
                };
                let _ = writeln!(
                    buf,
                    "  {} -> {} [{}]",
                    quote_id(&self.graph.graph[from].name),
                    quote_id(&self.graph.graph[to].name),
                    style.attributes
                );
            }
        }

        buf.push('}');
        buf
    }

    fn header(&self, buf: &mut String) {
        buf.push_str("digraph {\n");
        let _ = writeln!(buf, "size=\"{},{}\";", self.config.width, self.config.height);
        buf.push_str("layout=dot;\n");
        buf.push_str("rankdir=\"BT\";\n");
        buf.push_str("overlap=false;\n");
        buf.push_str("splines=true;\n");
        buf.push_str("pack=true;\n");
        buf.push_str("graph [fontname = \"Courier, Regular\"]\n");
        buf.push_str("node [fontname = \"Courier, Regular\"]\n");
        buf.push_str("edge [fontname = \"Courier, Regular\"]\n");
    }
}

impl TypeGraph {
    /// Every standard, interface and tag type that passes the whitelist rule,
    /// without the root type
    pub fn default_visible_set(&self) -> BTreeSet<String> {
        self.graph
            .node_indices()
            .filter(|&n| self.is_visible(n) && !self.is_root(n))
            .map(|n| self.graph[n].name.clone())
            .collect()
    }

    /// DOT document for the whole visible graph
    pub fn generate_dot(&self, config: &DiagramConfig) -> String {
        DotExporter::new(self, config).render(self.default_visible_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::types::{AttributeInfo, RoutineInfo, TagUse, TypeRecord};
    use crate::GraphBuilder;

    fn build(config: ScanConfig, records: Vec<TypeRecord>) -> TypeGraph {
        GraphBuilder::new(config)
            .unwrap()
            .build_from_records(records)
            .unwrap()
    }

    fn zoo() -> TypeGraph {
        build(
            ScanConfig::default(),
            vec![
                TypeRecord::standard("java.lang.Object"),
                TypeRecord::standard("zoo.Animal").extends("java.lang.Object"),
                TypeRecord::standard("zoo.Dog")
                    .extends("zoo.Animal")
                    .implements("zoo.Pet")
                    .tagged("zoo.Friendly")
                    .attribute(AttributeInfo::new("owner", "zoo.Person"))
                    .routine(RoutineInfo::new("bark", "void").tag(TagUse::new("zoo.Loud"))),
                TypeRecord::standard("zoo.Person"),
                TypeRecord::interface("zoo.Pet").extends_interface("zoo.Named"),
                TypeRecord::interface("zoo.Named"),
                TypeRecord::tag_type("zoo.Friendly").tagged("zoo.Trait"),
                TypeRecord::tag_type("zoo.Trait"),
                TypeRecord::tag_type("zoo.Loud"),
                TypeRecord::standard("ext.Vet").external().attribute(AttributeInfo::new("patient", "zoo.Dog")),
            ],
        )
    }

    #[test]
    fn test_full_document() {
        let dot = zoo().generate_dot(&DiagramConfig::default());

        assert!(dot.starts_with("digraph {\nsize=\"10,10\";\nlayout=dot;\nrankdir=\"BT\";\n"));
        assert!(dot.ends_with('}'));

        assert!(dot.contains("\"zoo.Dog\"[shape=box,style=filled,fillcolor=\"#fff2b6\",label=<"));
        assert!(dot.contains("\"zoo.Pet\"[shape=diamond,style=filled,fillcolor=\"#b6e7ff\",label=<"));
        assert!(dot.contains("\"zoo.Loud\"[shape=oval,style=filled,fillcolor=\"#f3c9ff\",label=<"));

        assert!(dot.contains("  \"zoo.Dog\" -> \"zoo.Animal\" [arrowhead=empty, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Dog\" -> \"zoo.Pet\" [arrowhead=diamond, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Pet\" -> \"zoo.Named\" [arrowhead=odiamond, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Dog\" -> \"zoo.Friendly\" [arrowhead=dot, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Friendly\" -> \"zoo.Trait\" [arrowhead=invdot, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Dog\" -> \"zoo.Loud\" [arrowhead=odot, arrowsize=2.5]\n"));
        assert!(dot.contains("  \"zoo.Person\" -> \"zoo.Dog\" [arrowtail=obox, arrowsize=2.5, dir=back]\n"));
    }

    #[test]
    fn test_root_and_external_never_rendered() {
        let dot = zoo().generate_dot(&DiagramConfig::default());
        assert!(!dot.contains("java.lang.Object"));
        assert!(!dot.contains("ext.Vet"));
    }

    #[test]
    fn test_edges_need_both_endpoints_visible() {
        let graph = zoo();
        let dot = DotExporter::new(&graph, &DiagramConfig::default()).render(["zoo.Dog", "zoo.Pet"]);

        assert!(dot.contains("\"zoo.Dog\" -> \"zoo.Pet\""));
        assert!(!dot.contains("zoo.Animal"));
        assert!(!dot.contains("zoo.Named"));
        assert_eq!(dot.matches(" -> ").count(), 1);
    }

    #[test]
    fn test_empty_visible_set() {
        let graph = zoo();
        let dot = DotExporter::new(&graph, &DiagramConfig::default()).render(Vec::<String>::new());
        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.ends_with("\n\n}"));
        assert!(!dot.contains("->"));
        assert!(!dot.contains("label="));
    }

    #[test]
    fn test_render_is_deterministic() {
        let graph = zoo();
        let config = DiagramConfig::hierarchy_only();
        assert_eq!(graph.generate_dot(&config), graph.generate_dot(&config));
        assert!(!graph.generate_dot(&config).contains("ROUTINES"));
    }

    #[test]
    fn test_quote_id_escapes() {
        assert_eq!(quote_id("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}

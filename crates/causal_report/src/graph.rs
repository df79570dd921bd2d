//! Causal graph description and the two text renderings derived from it:
//! Mermaid diagram statements and the plain-text specification block.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex_lite::Regex;

use crate::label::{format_label, sanitize_id};

/// Line terminator inside the diagram text. Mermaid receives the literal
/// two-character escape rather than a newline so the text survives being
/// embedded in the report template unchanged.
pub const MERMAID_LINE_BREAK: &str = "\\n";

pub const MERMAID_HEADER: &str = "graph TD";

static LEGACY_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->|<-").expect("legacy arrow regex"));

static LEGACY_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z](?:\?|')?)\s*\((.*?)\)").expect("legacy node regex")
});

/// Graph portion of a case record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSpec {
    /// Short identifier -> descriptive name, in document order.
    pub variable_mapping: IndexMap<String, String>,
    /// Directed causal edges `(from, to)`.
    pub edge_pairs: Vec<(String, String)>,
    /// Confounding edges; orientation carries no meaning.
    pub bidirected_pairs: Vec<(String, String)>,
}

impl GraphSpec {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variable_mapping.is_empty()
            && self.edge_pairs.is_empty()
            && self.bidirected_pairs.is_empty()
    }

    /// Formatted display label, falling back to the raw id when unmapped.
    #[must_use]
    pub fn label_for(&self, id: &str) -> String {
        let name = self.variable_mapping.get(id).map_or(id, String::as_str);
        format_label(name)
    }

    /// Parses the free-text notation used by older case files, e.g.
    /// `A (rain) -> B (wet grass), C (sprinkler) -> B (wet grass)`.
    ///
    /// Comma-separated paths, each a chain of nodes joined by `->` or `<-`.
    /// A node written as `X (name)` contributes `X -> name` to the mapping
    /// (first occurrence wins); any other node text is used as a bare id.
    #[must_use]
    pub fn parse_legacy(text: &str) -> Self {
        let mut graph = Self::default();

        for path in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut nodes = Vec::new();
            let mut arrows = Vec::new();
            let mut cursor = 0;
            for found in LEGACY_ARROW.find_iter(path) {
                nodes.push(&path[cursor..found.start()]);
                arrows.push(found.as_str());
                cursor = found.end();
            }
            nodes.push(&path[cursor..]);

            let ids: Vec<String> = nodes
                .iter()
                .map(|node| graph.register_legacy_node(node))
                .collect();

            for (index, arrow) in arrows.iter().enumerate() {
                let (left, right) = (&ids[index], &ids[index + 1]);
                if left.is_empty() || right.is_empty() {
                    continue;
                }
                let edge = if *arrow == "->" {
                    (left.clone(), right.clone())
                } else {
                    (right.clone(), left.clone())
                };
                graph.edge_pairs.push(edge);
            }
        }

        graph
    }

    fn register_legacy_node(&mut self, node: &str) -> String {
        match LEGACY_NODE.captures(node) {
            Some(caps) => {
                let id = caps[1].to_string();
                self.variable_mapping
                    .entry(id.clone())
                    .or_insert_with(|| caps[2].trim().to_string());
                id
            }
            None => node.trim().to_string(),
        }
    }

    fn node(&self, id: &str) -> String {
        format!("{}[\"{}\"]", sanitize_id(id), self.label_for(id))
    }
}

/// Mermaid flowchart statements: a header, one `-->` line per directed edge
/// and one dashed `<-.->` line per bidirected edge, each in input order.
#[must_use]
pub fn build_diagram(graph: &GraphSpec) -> String {
    let mut diagram = String::from(MERMAID_HEADER);
    diagram.push_str(MERMAID_LINE_BREAK);

    for (from, to) in &graph.edge_pairs {
        diagram.push_str(&format!(
            "    {} --> {}{MERMAID_LINE_BREAK}",
            graph.node(from),
            graph.node(to)
        ));
    }
    for (left, right) in &graph.bidirected_pairs {
        diagram.push_str(&format!(
            "    {} <-.-> {}{MERMAID_LINE_BREAK}",
            graph.node(left),
            graph.node(right)
        ));
    }

    diagram
}

/// Human-readable summary of the graph. The `Bidirectional:` line only
/// appears when there is at least one bidirected pair.
#[must_use]
pub fn build_spec_text(graph: &GraphSpec) -> String {
    let variables = graph
        .variable_mapping
        .iter()
        .map(|(id, name)| format!("{id} ({name})"))
        .collect::<Vec<_>>()
        .join(", ");
    let edges = graph
        .edge_pairs
        .iter()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![format!("Variables: {variables}"), format!("Edges: {edges}")];
    if !graph.bidirected_pairs.is_empty() {
        let bidirected = graph
            .bidirected_pairs
            .iter()
            .map(|(left, right)| format!("{left} <---> {right}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Bidirectional: {bidirected}"));
    }
    lines.join("\n")
}

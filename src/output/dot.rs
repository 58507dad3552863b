//! Graphviz DOT export
//!
//! Builds a `petgraph` digraph mirroring the page graph and prints it with
//! per-node and per-edge style attributes.

use crate::output::style::StyledGraph;
use crate::output::traits::{OutputResult, Renderer, RunMetadata};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use std::path::Path;

/// Writes `<stem>.dot`
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn render(&self, graph: &StyledGraph, meta: &RunMetadata, path: &Path) -> OutputResult<()> {
        let mut dot = format!(
            "// sitegraph crawl of {} (depth {}) at {}\n",
            meta.root_url,
            meta.max_depth,
            meta.finished_at.to_rfc3339()
        );
        dot.push_str(&format_dot(graph));
        std::fs::write(path, dot)?;
        Ok(())
    }
}

/// Formats a styled graph as a Graphviz digraph
///
/// Nodes are labelled with their URL; fill color, size and tooltip follow the
/// node's styling. The root is drawn with a double outline.
pub fn format_dot(graph: &StyledGraph) -> String {
    let mut digraph: DiGraph<String, String> =
        DiGraph::with_capacity(graph.nodes.len(), graph.edges.len());

    let indices: Vec<_> = graph
        .nodes
        .iter()
        .map(|node| digraph.add_node(node.url.clone()))
        .collect();

    for edge in &graph.edges {
        digraph.add_edge(indices[edge.from], indices[edge.to], String::new());
    }

    let edge_attrs = |_, edge: EdgeReference<'_, String>| {
        let styled = &graph.edges[edge.id().index()];
        format!(
            "color=\"{}\" penwidth={:.2} arrowhead=none ",
            styled.color.hex_with_alpha(),
            styled.width
        )
    };
    let node_attrs = |_, (index, _): (NodeIndex, &String)| {
        let node = &graph.nodes[index.index()];
        let peripheries = if node.index == graph.root { 2 } else { 1 };
        format!(
            "style=filled fillcolor=\"{}\" color=\"{}\" width={:.2} height={:.2} peripheries={} tooltip=\"{} ({}, degree {})\" ",
            node.fill.hex(),
            node.stroke.hex(),
            node.size,
            node.size,
            peripheries,
            escape(&node.url),
            node.state,
            node.degree
        )
    };

    let dot = Dot::with_attr_getters(&digraph, &[Config::EdgeNoLabel], &edge_attrs, &node_attrs);

    dot.to_string()
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

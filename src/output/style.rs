//! Visual styling derived from graph connectivity
//!
//! Every node is weighted by its degree (inbound plus outbound links). The
//! weight drives node size and a four-stop heat color; edges take the heat
//! of their better-connected endpoint.

use crate::graph::{NodeIndex, PageGraph};
use crate::state::PageState;

/// Heat gradient stops, from cold to hot
const HEAT_STOPS: [Rgba; 4] = [
    Rgba::rgb(0x44, 0x88, 0xFF),
    Rgba::rgb(0x00, 0xFF, 0x00),
    Rgba::rgb(0xFF, 0xFF, 0x00),
    Rgba::rgb(0xFF, 0x00, 0x00),
];

pub const MIN_NODE_SIZE: f64 = 0.75;
pub const MAX_NODE_SIZE: f64 = 2.5;
pub const EDGE_ALPHA: u8 = 120;
pub const EDGE_WIDTH: f64 = 0.05;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbbaa`
    pub fn hex_with_alpha(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Alpha as a fraction in [0, 1]
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Maps a normalized value onto the heat gradient
///
/// Values are clamped to [0, 1]. Channels between two stops are linearly
/// interpolated and truncated, so 1.0 yields exactly the last stop.
///
/// # Examples
///
/// ```
/// use sitegraph::output::heat_color;
///
/// assert_eq!(heat_color(0.0).hex(), "#4488ff");
/// assert_eq!(heat_color(1.0).hex(), "#ff0000");
/// ```
pub fn heat_color(value: f64) -> Rgba {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    let last = HEAT_STOPS.len() - 1;

    if value >= 1.0 {
        return HEAT_STOPS[last];
    }

    let scaled = value * last as f64;
    let lower = scaled.floor() as usize;
    let fraction = scaled - lower as f64;
    let (from, to) = (HEAT_STOPS[lower], HEAT_STOPS[lower + 1]);

    let mix = |a: u8, b: u8| (f64::from(a) * (1.0 - fraction) + f64::from(b) * fraction) as u8;

    Rgba::rgb(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b))
}

/// Per-node degree (in-degree plus out-degree), indexed by node
pub fn degrees(graph: &PageGraph) -> Vec<usize> {
    let mut degrees = vec![0; graph.len()];

    for (from, to) in graph.edges() {
        degrees[from] += 1;
        degrees[to] += 1;
    }

    degrees
}

/// Node size for a normalized degree
pub fn node_size(weight: f64) -> f64 {
    MIN_NODE_SIZE + (MAX_NODE_SIZE - MIN_NODE_SIZE) * weight.clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct StyledNode {
    pub index: NodeIndex,
    pub url: String,
    pub depth: u32,
    pub state: PageState,
    /// Why expansion failed, for error states
    pub error: Option<String>,
    pub degree: usize,
    /// Degree normalized by the graph's maximum degree
    pub weight: f64,
    pub size: f64,
    pub fill: Rgba,
    pub stroke: Rgba,
}

#[derive(Debug, Clone)]
pub struct StyledEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    /// Larger endpoint degree normalized by the graph's maximum degree
    pub weight: f64,
    pub color: Rgba,
    pub width: f64,
}

/// A finished page graph with styling applied, ready for rendering
#[derive(Debug, Clone)]
pub struct StyledGraph {
    pub root: NodeIndex,
    pub nodes: Vec<StyledNode>,
    pub edges: Vec<StyledEdge>,
    /// Largest node degree, floored at 1
    pub max_degree: usize,
}

impl StyledGraph {
    /// Computes degrees, sizes and colors for every node and edge
    ///
    /// Both size and fill come from the node's own normalized degree, so hubs
    /// are large and hot. Sizing a node inversely to its parent's degree, so
    /// that children of a hub shrink, is the common alternative; it is not
    /// used here because a node can have several parents.
    pub fn new(graph: &PageGraph, root: NodeIndex) -> Self {
        let degrees = degrees(graph);
        let max_degree = degrees.iter().copied().max().unwrap_or(0).max(1);
        let normalized = |degree: usize| degree as f64 / max_degree as f64;

        let nodes = graph
            .nodes()
            .map(|(url, node)| {
                let degree = degrees[node.index()];
                let weight = normalized(degree);
                StyledNode {
                    index: node.index(),
                    url: url.to_string(),
                    depth: node.depth(),
                    state: node.state(),
                    error: node.error().map(str::to_string),
                    degree,
                    weight,
                    size: node_size(weight),
                    fill: heat_color(weight),
                    stroke: Rgba::rgb(0, 0, 0),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(from, to)| {
                let weight = normalized(degrees[from].max(degrees[to]));
                StyledEdge {
                    from,
                    to,
                    weight,
                    color: heat_color(weight).with_alpha(EDGE_ALPHA),
                    width: EDGE_WIDTH,
                }
            })
            .collect();

        Self {
            root,
            nodes,
            edges,
            max_degree,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

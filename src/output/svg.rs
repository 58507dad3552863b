//! SVG export with a force-directed layout
//!
//! Positions come from a Fruchterman-Reingold simulation seeded with a
//! deterministic spiral, so the same graph always produces the same drawing.

use crate::output::style::StyledGraph;
use crate::output::traits::{OutputError, OutputResult, Renderer, RunMetadata};
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::Path;

/// Pixels per unit of node size and edge width
const UNIT: f64 = 8.0;
const MAX_MARGIN: f64 = 40.0;

/// A node's position on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Writes `<stem>.svg`
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    pub width: f64,
    pub height: f64,
    pub iterations: usize,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1200.0,
            iterations: 300,
        }
    }
}

impl Renderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(&self, graph: &StyledGraph, meta: &RunMetadata, path: &Path) -> OutputResult<()> {
        let positions = layout(graph, self.width, self.height, self.iterations);
        tracing::debug!("Laid out {} nodes for SVG", positions.len());

        let svg = self.draw(graph, meta, &positions)?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

impl SvgRenderer {
    fn draw(
        &self,
        graph: &StyledGraph,
        meta: &RunMetadata,
        positions: &[Position],
    ) -> OutputResult<String> {
        let mut content = String::new();
        let fmt_err = |e: std::fmt::Error| OutputError::Format(e.to_string());

        writeln!(
            content,
            "  <title>sitegraph: {} (depth {})</title>",
            escape_xml(&meta.root_url),
            meta.max_depth
        )
        .map_err(fmt_err)?;

        content.push_str("  <g id=\"edges\">\n");
        for edge in &graph.edges {
            let (from, to) = (positions[edge.from], positions[edge.to]);
            writeln!(
                content,
                "    <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-opacity=\"{:.3}\" stroke-width=\"{:.2}\"/>",
                from.x,
                from.y,
                to.x,
                to.y,
                edge.color.hex(),
                edge.color.opacity(),
                edge.width * UNIT
            )
            .map_err(fmt_err)?;
        }
        content.push_str("  </g>\n");

        content.push_str("  <g id=\"nodes\">\n");
        for node in &graph.nodes {
            let position = positions[node.index];
            let stroke_width = if node.index == graph.root { 2.0 } else { 0.5 };
            writeln!(
                content,
                "    <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"><title>{} ({}, degree {})</title></circle>",
                position.x,
                position.y,
                node.size * UNIT,
                node.fill.hex(),
                node.stroke.hex(),
                stroke_width,
                escape_xml(&node.url),
                node.state,
                node.degree
            )
            .map_err(fmt_err)?;
        }
        content.push_str("  </g>");

        Ok(self.wrap_svg(&content))
    }

    fn wrap_svg(&self, content: &str) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">
  <rect width="100%" height="100%" fill="#ffffff"/>
{}
</svg>
"##,
            self.width, self.height, self.width, self.height, content
        )
    }
}

/// Computes node positions with the Fruchterman-Reingold algorithm
///
/// Nodes start on a golden-angle spiral around the center; each iteration
/// applies pairwise repulsion `k²/d` and attraction `d²/k` along edges, with
/// displacement capped by a linearly cooling temperature. Positions are kept
/// inside the canvas with a margin.
pub fn layout(graph: &StyledGraph, width: f64, height: f64, iterations: usize) -> Vec<Position> {
    let n = graph.nodes.len();
    if n == 0 {
        return Vec::new();
    }

    let margin = MAX_MARGIN.min(width.min(height) / 4.0);
    let (cx, cy) = (width / 2.0, height / 2.0);

    if n == 1 {
        return vec![Position { x: cx, y: cy }];
    }

    let usable_w = width - 2.0 * margin;
    let usable_h = height - 2.0 * margin;
    let k = (usable_w * usable_h / n as f64).sqrt();
    let spread = usable_w.min(usable_h) / 2.0;

    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let mut positions: Vec<Position> = (0..n)
        .map(|i| {
            let radius = spread * ((i as f64 + 0.5) / n as f64).sqrt();
            let angle = i as f64 * golden_angle;
            Position {
                x: cx + radius * angle.cos(),
                y: cy + radius * angle.sin(),
            }
        })
        .collect();

    let initial_temperature = usable_w.min(usable_h) / 10.0;

    for step in 0..iterations {
        let temperature = initial_temperature * (1.0 - step as f64 / iterations as f64);
        let mut displacement = vec![(0.0f64, 0.0f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);

                displacement[i].0 += fx;
                displacement[i].1 += fy;
                displacement[j].0 -= fx;
                displacement[j].1 -= fy;
            }
        }

        for edge in &graph.edges {
            if edge.from == edge.to {
                continue;
            }
            let dx = positions[edge.from].x - positions[edge.to].x;
            let dy = positions[edge.from].y - positions[edge.to].y;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);

            displacement[edge.from].0 -= fx;
            displacement[edge.from].1 -= fy;
            displacement[edge.to].0 += fx;
            displacement[edge.to].1 += fy;
        }

        for (position, (dx, dy)) in positions.iter_mut().zip(displacement) {
            let length = (dx * dx + dy * dy).sqrt();
            if length > 0.0 {
                let capped = length.min(temperature);
                position.x += dx / length * capped;
                position.y += dy / length * capped;
            }
            position.x = position.x.clamp(margin, width - margin);
            position.y = position.y.clamp(margin, height - margin);
        }
    }

    positions
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

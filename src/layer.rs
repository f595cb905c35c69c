//! Terminal particle layer.
//!
//! `ParticleLayer` is the container particle nodes are attached to. It keeps
//! only particle nodes; the rest of the scene is drawn by other widgets into
//! the same frame buffer, and rendering the layer overwrites only the cells
//! under live particles.

use crate::particles::ParticleKind;
use crate::sink::RenderSink;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use std::collections::BTreeMap;

/// Handle to a node in a [`ParticleLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Visual state of one particle node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleNode {
    pub kind: ParticleKind,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

/// Nodes fainter than this are not drawn.
const MIN_VISIBLE_OPACITY: f64 = 0.05;

/// Render sink backed by a terminal buffer.
#[derive(Debug, Clone)]
pub struct ParticleLayer {
    nodes: BTreeMap<NodeId, ParticleNode>,
    next_id: u64,
    /// World units covered by one terminal cell (horizontal, vertical).
    cell_size: (f64, f64),
    created: u64,
    removed: u64,
    stale_removals: u64,
}

impl Default for ParticleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleLayer {
    /// A layer where one world unit maps to one cell.
    pub fn new() -> Self {
        Self::with_cell_size(1.0, 1.0)
    }

    pub fn with_cell_size(width: f64, height: f64) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            cell_size: (width, height),
            created: 0,
            removed: 0,
            stale_removals: 0,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&ParticleNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Attached nodes, oldest first.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ParticleNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total nodes ever attached.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total nodes detached.
    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Removals of nodes that were not attached (double release).
    pub fn stale_removals(&self) -> u64 {
        self.stale_removals
    }

    /// Map a world position to a cell inside `area`, if it lands there.
    fn cell_for(&self, area: Rect, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / self.cell_size.0).floor();
        let row = (y / self.cell_size.1).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        if col >= area.width as f64 || row >= area.height as f64 {
            return None;
        }
        Some((area.x + col as u16, area.y + row as u16))
    }
}

impl RenderSink for ParticleLayer {
    type Handle = NodeId;

    fn create(&mut self, kind: ParticleKind, x: f64, y: f64, scale: f64) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.nodes.insert(
            id,
            ParticleNode {
                kind,
                x,
                y,
                opacity: 1.0,
                scale,
            },
        );
        id
    }

    fn update(&mut self, handle: &NodeId, x: f64, y: f64, opacity: f64) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.x = x;
            node.y = y;
            node.opacity = opacity;
        }
    }

    fn destroy(&mut self, handle: NodeId) {
        if self.nodes.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            self.stale_removals += 1;
            tracing::warn!(node = handle.0, "removed a particle node that was not attached");
        }
    }
}

/// Glyph for a node: larger dust reads as a dot, fresh impacts as a spark.
pub fn glyph(node: &ParticleNode) -> char {
    match node.kind {
        ParticleKind::Dust if node.scale >= 0.75 => '•',
        ParticleKind::Dust => '·',
        ParticleKind::Impact if node.opacity > 0.5 => '✦',
        ParticleKind::Impact => '*',
    }
}

/// Base colour for a kind, dimmed toward black as the node fades.
pub fn color(node: &ParticleNode) -> Color {
    let (r, g, b) = match node.kind {
        ParticleKind::Dust => (150.0, 120.0, 90.0),
        ParticleKind::Impact => (255.0, 170.0, 60.0),
    };
    let fade = node.opacity.clamp(0.0, 1.0);
    Color::Rgb(
        (r * fade).round() as u8,
        (g * fade).round() as u8,
        (b * fade).round() as u8,
    )
}

impl Widget for &ParticleLayer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for node in self.nodes.values() {
            if node.opacity < MIN_VISIBLE_OPACITY {
                continue;
            }
            if let Some((x, y)) = self.cell_for(area, node.x, node.y) {
                buf.get_mut(x, y).set_char(glyph(node)).set_fg(color(node));
            }
        }
    }
}

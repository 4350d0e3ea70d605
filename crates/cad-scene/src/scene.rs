//! Displayed scene state.
//!
//! [`Scene`] owns the primitives currently handed to the renderer and
//! [`Overlay`] owns the highlight/selection outline drawn on top. Both are
//! replaced wholesale, never patched.

use cad_core::{BoundingBox, PartTag};
use glam::Vec3;

use crate::config::LineStyle;
use crate::primitive::{MaterialKind, PolylinePrimitive, RenderPrimitive};

/// Primitives of the loaded assembly plus visibility toggles.
#[derive(Debug, Clone)]
pub struct Scene {
    primitives: Vec<RenderPrimitive>,
    bounds: BoundingBox,
    show_faces: bool,
    show_edges: bool,
    edge_style: LineStyle,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            bounds: BoundingBox::empty(),
            show_faces: true,
            show_edges: true,
            edge_style: LineStyle::default(),
        }
    }

    /// Replace all primitives.
    pub fn replace(&mut self, primitives: Vec<RenderPrimitive>) {
        self.bounds = primitives
            .iter()
            .map(RenderPrimitive::world_bounds)
            .filter(BoundingBox::is_valid)
            .fold(BoundingBox::empty(), |acc, b| acc.union(&b));
        self.primitives = primitives;
        tracing::debug!("Scene now has {} primitives", self.primitives.len());
    }

    /// Remove all primitives.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.bounds = BoundingBox::empty();
    }

    /// All primitives in build order.
    pub fn primitives(&self) -> &[RenderPrimitive] {
        &self.primitives
    }

    /// True if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// World bounds of everything in the scene (invalid when empty).
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Primitives that pass the face/edge visibility toggles.
    pub fn visible_primitives(&self) -> impl Iterator<Item = (usize, &RenderPrimitive)> {
        self.primitives.iter().enumerate().filter(|(_, p)| {
            if p.is_mesh() {
                self.show_faces
            } else {
                self.show_edges
            }
        })
    }

    /// Show or hide face fill.
    pub fn set_faces_visible(&mut self, visible: bool) {
        self.show_faces = visible;
    }

    /// Show or hide edge wireframes.
    pub fn set_edges_visible(&mut self, visible: bool) {
        self.show_edges = visible;
    }

    /// Whether face fill is shown.
    pub fn faces_visible(&self) -> bool {
        self.show_faces
    }

    /// Whether edge wireframes are shown.
    pub fn edges_visible(&self) -> bool {
        self.show_edges
    }

    /// Style the renderer draws edge polylines with.
    pub fn edge_style(&self) -> LineStyle {
        self.edge_style
    }

    /// Change the edge polyline style.
    pub fn set_edge_style(&mut self, style: LineStyle) {
        self.edge_style = style;
    }

    /// Tag of a primitive reported by the renderer's hit test.
    ///
    /// Hidden primitives cannot be hit.
    pub fn tag_of(&self, primitive_index: usize) -> Option<PartTag> {
        self.visible_primitives()
            .find(|(i, _)| *i == primitive_index)
            .map(|(_, p)| p.tag())
    }
}

/// Highlight or selection outline shown over the scene.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    outline: Option<PolylinePrimitive>,
    style: LineStyle,
    revision: u64,
}

impl Overlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the outline. Every call is one rebuild.
    pub fn show(
        &mut self,
        tag: PartTag,
        points: Vec<Vec3>,
        material: MaterialKind,
        style: LineStyle,
    ) {
        self.outline = Some(PolylinePrimitive {
            name: "SelectionOutline".to_string(),
            points,
            material,
            tag,
        });
        self.style = style;
        self.revision += 1;
    }

    /// Redraw the current outline with another style; no-op when empty.
    pub fn restyle(&mut self, style: LineStyle) {
        if self.outline.is_some() && self.style != style {
            self.style = style;
            self.revision += 1;
        }
    }

    /// Remove the outline; clearing an empty overlay is not a rebuild.
    pub fn clear(&mut self) {
        if self.outline.take().is_some() {
            self.revision += 1;
        }
    }

    /// Current outline.
    pub fn outline(&self) -> Option<&PolylinePrimitive> {
        self.outline.as_ref()
    }

    /// Style of the current outline.
    pub fn style(&self) -> Option<LineStyle> {
        self.outline.as_ref().map(|_| self.style)
    }

    /// Tag of the outlined element.
    pub fn tag(&self) -> Option<PartTag> {
        self.outline.as_ref().map(|o| o.tag)
    }

    /// Number of rebuilds so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

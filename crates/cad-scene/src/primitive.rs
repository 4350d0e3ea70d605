//! Render primitives handed to the rendering backend.

use cad_core::{BoundingBox, MeshVertex, PartTag};
use glam::{Mat4, Vec3};

/// Material reference of a primitive.
///
/// Surfaces and edges use distinct materials so face fill and edge
/// wireframe visibility can be toggled independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Face fill with its resolved RGBA color.
    Surface {
        /// Resolved face color (face, else part, else default).
        color: [f32; 4],
    },
    /// Face boundary wireframe.
    Edge,
    /// Transient hover outline.
    Highlight,
    /// Committed selection outline.
    Selection,
}

/// Triangle mesh of one face.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPrimitive {
    /// Debug name, `"{part}_Face{j}_Mesh"`.
    pub name: String,
    /// Vertices in part-local space.
    pub vertices: Vec<MeshVertex>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    /// Fill material.
    pub material: MaterialKind,
    /// World transform applied at render time; `None` means identity.
    pub transform: Option<Mat4>,
    /// Element this primitive was produced from.
    pub tag: PartTag,
}

impl MeshPrimitive {
    /// World-space bounds of the mesh.
    pub fn world_bounds(&self) -> BoundingBox {
        let local = BoundingBox::from_points(self.vertices.iter().map(MeshVertex::position));
        match &self.transform {
            Some(transform) => local.transform(transform),
            None => local,
        }
    }
}

/// Disconnected line segment list (two points per segment), already in
/// world space.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    /// Debug name, `"{part}_Face{j}_EdgeLines"` for face edges.
    pub name: String,
    /// Segment end points, transform baked in.
    pub points: Vec<Vec3>,
    /// Line material.
    pub material: MaterialKind,
    /// Element this primitive was produced from.
    pub tag: PartTag,
}

impl PolylinePrimitive {
    /// Number of two-point segments.
    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }
}

/// A primitive of the displayed scene.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPrimitive {
    /// Face fill.
    Mesh(MeshPrimitive),
    /// Face edges.
    Polyline(PolylinePrimitive),
}

impl RenderPrimitive {
    /// Tag of the element the primitive belongs to.
    pub fn tag(&self) -> PartTag {
        match self {
            RenderPrimitive::Mesh(mesh) => mesh.tag,
            RenderPrimitive::Polyline(line) => line.tag,
        }
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        match self {
            RenderPrimitive::Mesh(mesh) => &mesh.name,
            RenderPrimitive::Polyline(line) => &line.name,
        }
    }

    /// Material reference.
    pub fn material(&self) -> MaterialKind {
        match self {
            RenderPrimitive::Mesh(mesh) => mesh.material,
            RenderPrimitive::Polyline(line) => line.material,
        }
    }

    /// True for face fill primitives.
    pub fn is_mesh(&self) -> bool {
        matches!(self, RenderPrimitive::Mesh(_))
    }

    /// True for edge wireframe primitives.
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            RenderPrimitive::Polyline(PolylinePrimitive {
                material: MaterialKind::Edge,
                ..
            })
        )
    }

    /// World-space bounds.
    pub fn world_bounds(&self) -> BoundingBox {
        match self {
            RenderPrimitive::Mesh(mesh) => mesh.world_bounds(),
            RenderPrimitive::Polyline(line) => BoundingBox::from_points(line.points.iter().copied()),
        }
    }
}

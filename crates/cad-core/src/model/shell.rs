//! Shell and face definitions

use serde::{Deserialize, Serialize};

use crate::constants::{EDGE_PAIR_STRIDE, TRIANGLE_STRIDE, VERTEX_STRIDE};

use super::CadCurve;

/// A B-rep shell: the face set of one solid, shared by every part that
/// references its index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadShell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub faces: Vec<CadFace>,
}

impl CadShell {
    pub fn new(faces: Vec<CadFace>) -> Self {
        Self {
            id: None,
            name: None,
            faces,
        }
    }

    /// Total vertices over all faces
    pub fn vertex_count(&self) -> usize {
        self.faces.iter().map(CadFace::vertex_count).sum()
    }

    /// Total triangles over all faces
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(CadFace::triangle_count).sum()
    }
}

/// One bounded surface patch: triangulated mesh plus interpolated boundary edges.
///
/// Mesh and edge data are independent; either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadFace {
    /// Interleaved position(3) + normal(3) + uv(2) floats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_buffer: Option<Vec<f32>>,
    /// Three indices per triangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triangle_indices: Option<Vec<u32>>,
    /// (start point, point count) pairs into `edge_positions`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_indices: Option<Vec<u32>>,
    /// Three floats per edge point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_positions: Option<Vec<f32>>,
    /// Color override (RGBA)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_area: Option<f32>,
    /// One length per edge pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_lengths: Option<Vec<f32>>,
    /// One curve per edge pair, where the importer could describe it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_curves: Vec<Option<CadCurve>>,
}

impl CadFace {
    /// Both vertex and triangle data are present
    pub fn has_mesh(&self) -> bool {
        self.vertex_buffer.is_some() && self.triangle_indices.is_some()
    }

    /// Both the edge table and the edge position buffer are present
    pub fn has_edges(&self) -> bool {
        self.edge_indices.is_some() && self.edge_positions.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer
            .as_ref()
            .map_or(0, |b| b.len() / VERTEX_STRIDE)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_indices
            .as_ref()
            .map_or(0, |t| t.len() / TRIANGLE_STRIDE)
    }

    /// Number of edge pairs in the edge table
    pub fn edge_count(&self) -> usize {
        self.edge_indices
            .as_ref()
            .map_or(0, |e| e.len() / EDGE_PAIR_STRIDE)
    }

    /// Length of the edge addressed by an even edge-table offset
    pub fn edge_length(&self, pair_index: usize) -> Option<f32> {
        self.edge_lengths
            .as_ref()?
            .get(pair_index / EDGE_PAIR_STRIDE)
            .copied()
    }
}

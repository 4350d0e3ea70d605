//! Global constants for cad-core

/// Floats per interleaved vertex (position 3 + normal 3 + uv 2)
pub const VERTEX_STRIDE: usize = 8;

/// Indices per triangle
pub const TRIANGLE_STRIDE: usize = 3;

/// Entries per edge table pair (start point, point count)
pub const EDGE_PAIR_STRIDE: usize = 2;

/// Floats per edge position
pub const EDGE_POINT_STRIDE: usize = 3;

/// Number of floats in an importer transform (row-major 3x4)
pub const TRANSFORM_LEN: usize = 12;

/// Maximum per-element deviation for a matrix to count as identity
pub const IDENTITY_EPSILON: f32 = 1e-6;

/// Default color for faces without an override and parts without a color (gray, RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Current assembly document format version
pub const DOCUMENT_VERSION: u32 = 1;

//! Flat buffer decoding
//!
//! Faces arrive from the importer as flat `f32` / `u32` arrays. This module
//! turns them into structured vertices and into edge line segments.
//!
//! Edges are always emitted as a disconnected segment list (two points per
//! segment), never as a strip: neighbouring faces share topological edges
//! and must not be joined into one connected polyline.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::constants::{EDGE_PAIR_STRIDE, EDGE_POINT_STRIDE, TRIANGLE_STRIDE, VERTEX_STRIDE};
use crate::model::CadFace;

/// Buffer decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed {buffer} buffer: length {len} is not a multiple of {stride}")]
    MalformedBuffer {
        buffer: &'static str,
        len: usize,
        stride: usize,
    },
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

/// Decoded face vertex, laid out exactly like one 8-float record of the
/// importer's vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Decode an interleaved vertex buffer (8 floats per vertex).
pub fn decode_vertices(buffer: &[f32]) -> Result<Vec<MeshVertex>, DecodeError> {
    if buffer.len() % VERTEX_STRIDE != 0 {
        return Err(DecodeError::MalformedBuffer {
            buffer: "vertex",
            len: buffer.len(),
            stride: VERTEX_STRIDE,
        });
    }

    bytemuck::try_cast_slice::<f32, MeshVertex>(buffer)
        .map(<[MeshVertex]>::to_vec)
        .map_err(|_| DecodeError::MalformedBuffer {
            buffer: "vertex",
            len: buffer.len(),
            stride: VERTEX_STRIDE,
        })
}

/// Validate a triangle index buffer against the number of decoded vertices.
pub fn decode_triangles(indices: &[u32], vertex_count: usize) -> Result<Vec<u32>, DecodeError> {
    if indices.len() % TRIANGLE_STRIDE != 0 {
        return Err(DecodeError::MalformedBuffer {
            buffer: "triangle index",
            len: indices.len(),
            stride: TRIANGLE_STRIDE,
        });
    }

    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(DecodeError::IndexOutOfRange {
            what: "triangle vertex",
            index: bad as usize,
            len: vertex_count,
        });
    }

    Ok(indices.to_vec())
}

/// Number of points needed to draw every edge as separate two-point segments.
///
/// A pair with `count` points contributes `count - 1` segments; pairs with
/// fewer than two points contribute nothing. A trailing unpaired entry is
/// ignored.
pub fn count_edge_points(edge_indices: &[u32]) -> usize {
    edge_indices
        .chunks_exact(EDGE_PAIR_STRIDE)
        .map(|pair| segment_count(pair[1]) * 2)
        .sum()
}

fn segment_count(point_count: u32) -> usize {
    (point_count as usize).saturating_sub(1)
}

/// Decode all edges of a face into a segment list, optionally transforming
/// every point. Returns an empty list when the face has no edge data.
pub fn decode_edge_segments(
    face: &CadFace,
    transform: Option<&Mat4>,
) -> Result<Vec<Vec3>, DecodeError> {
    let (Some(edge_indices), Some(positions)) = (&face.edge_indices, &face.edge_positions) else {
        return Ok(Vec::new());
    };

    check_edge_buffers(edge_indices, positions)?;

    let mut points = Vec::with_capacity(count_edge_points(edge_indices));
    for pair in edge_indices.chunks_exact(EDGE_PAIR_STRIDE) {
        push_segments(pair[0], pair[1], positions, transform, &mut points)?;
    }

    debug_assert_eq!(points.len(), count_edge_points(edge_indices));
    Ok(points)
}

/// Decode one edge of a face.
///
/// `pair_index` is the even offset of the pair in the edge table (edge `n`
/// lives at `2 * n`).
pub fn decode_single_edge(
    face: &CadFace,
    pair_index: usize,
    transform: Option<&Mat4>,
) -> Result<Vec<Vec3>, DecodeError> {
    let (Some(edge_indices), Some(positions)) = (&face.edge_indices, &face.edge_positions) else {
        return Err(DecodeError::IndexOutOfRange {
            what: "edge pair",
            index: pair_index,
            len: 0,
        });
    };

    check_edge_buffers(edge_indices, positions)?;

    if pair_index % EDGE_PAIR_STRIDE != 0 || pair_index + 1 >= edge_indices.len() {
        return Err(DecodeError::IndexOutOfRange {
            what: "edge pair",
            index: pair_index,
            len: edge_indices.len(),
        });
    }

    let (start, count) = (edge_indices[pair_index], edge_indices[pair_index + 1]);
    let mut points = Vec::with_capacity(segment_count(count) * 2);
    push_segments(start, count, positions, transform, &mut points)?;
    Ok(points)
}

fn check_edge_buffers(edge_indices: &[u32], positions: &[f32]) -> Result<(), DecodeError> {
    if edge_indices.len() % EDGE_PAIR_STRIDE != 0 {
        return Err(DecodeError::MalformedBuffer {
            buffer: "edge index",
            len: edge_indices.len(),
            stride: EDGE_PAIR_STRIDE,
        });
    }
    if positions.len() % EDGE_POINT_STRIDE != 0 {
        return Err(DecodeError::MalformedBuffer {
            buffer: "edge position",
            len: positions.len(),
            stride: EDGE_POINT_STRIDE,
        });
    }
    Ok(())
}

/// Emit points `k, k+1` for every `k` in `[start, start + count - 1)`.
fn push_segments(
    start: u32,
    count: u32,
    positions: &[f32],
    transform: Option<&Mat4>,
    out: &mut Vec<Vec3>,
) -> Result<(), DecodeError> {
    let segments = segment_count(count);
    if segments == 0 {
        return Ok(());
    }

    let start = start as usize;
    let point_len = positions.len() / EDGE_POINT_STRIDE;
    let last = start + segments;
    if last >= point_len {
        return Err(DecodeError::IndexOutOfRange {
            what: "edge point",
            index: last,
            len: point_len,
        });
    }

    let point = |k: usize| {
        let p = Vec3::from_slice(&positions[k * EDGE_POINT_STRIDE..(k + 1) * EDGE_POINT_STRIDE]);
        match transform {
            Some(m) => m.transform_point3(p),
            None => p,
        }
    };

    for k in start..last {
        out.push(point(k));
        out.push(point(k + 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Edge buffer where point `k` is `(k, 10k, 100k)`
    fn numbered_points(count: usize) -> Vec<f32> {
        (0..count)
            .flat_map(|k| {
                let k = k as f32;
                [k, k * 10.0, k * 100.0]
            })
            .collect()
    }

    fn point(k: usize) -> Vec3 {
        let k = k as f32;
        Vec3::new(k, k * 10.0, k * 100.0)
    }

    fn edge_face(edge_indices: Vec<u32>, point_count: usize) -> CadFace {
        CadFace {
            edge_indices: Some(edge_indices),
            edge_positions: Some(numbered_points(point_count)),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_vertices() {
        let buffer = [
            1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.25, 0.75, //
            4.0, 5.0, 6.0, 0.0, 1.0, 0.0, 0.5, 0.5,
        ];
        let vertices = decode_vertices(&buffer).unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[0].uv, [0.25, 0.75]);
        assert_eq!(vertices[1].position(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_decode_vertices_malformed() {
        let buffer = vec![0.0; 17];
        let err = decode_vertices(&buffer).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedBuffer {
                buffer: "vertex",
                len: 17,
                stride: 8
            }
        );
    }

    #[test]
    fn test_decode_vertices_empty() {
        assert!(decode_vertices(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_triangles() {
        assert_eq!(decode_triangles(&[0, 1, 2], 3).unwrap(), vec![0, 1, 2]);
        assert!(matches!(
            decode_triangles(&[0, 1], 3),
            Err(DecodeError::MalformedBuffer { .. })
        ));
        assert!(matches!(
            decode_triangles(&[0, 1, 3], 3),
            Err(DecodeError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_count_edge_points() {
        assert_eq!(count_edge_points(&[0, 3, 9, 2]), 6);
        assert_eq!(count_edge_points(&[]), 0);
        assert_eq!(count_edge_points(&[4, 1, 5, 0]), 0);
    }

    #[test]
    fn test_decode_edge_segments_two_pairs() {
        let face = edge_face(vec![0, 3, 9, 2], 12);
        let points = decode_edge_segments(&face, None).unwrap();
        assert_eq!(
            points,
            vec![point(0), point(1), point(1), point(2), point(9), point(10)]
        );
    }

    #[test]
    fn test_segment_count_matches_point_count() {
        let face = edge_face(vec![0, 5, 5, 2, 7, 4], 11);
        let points = decode_edge_segments(&face, Some(&Mat4::IDENTITY)).unwrap();
        assert_eq!(points.len(), count_edge_points(&[0, 5, 5, 2, 7, 4]));

        // Each segment connects consecutive buffer points
        for segment in points[..8].chunks_exact(2) {
            assert_eq!(segment[1].x - segment[0].x, 1.0);
        }
    }

    #[test]
    fn test_decode_edge_segments_transformed() {
        let face = edge_face(vec![0, 2], 2);
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0));
        let points = decode_edge_segments(&face, Some(&m)).unwrap();
        assert_eq!(points, vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 10.0, 105.0)]);
    }

    #[test]
    fn test_decode_edge_segments_missing_data() {
        let mut face = edge_face(vec![0, 2], 2);
        face.edge_positions = None;
        assert!(decode_edge_segments(&face, None).unwrap().is_empty());

        let mut face = edge_face(vec![0, 2], 2);
        face.edge_indices = None;
        assert!(decode_edge_segments(&face, None).unwrap().is_empty());
    }

    #[test]
    fn test_decode_edge_segments_malformed() {
        let face = edge_face(vec![0, 2, 1], 3);
        assert!(matches!(
            decode_edge_segments(&face, None),
            Err(DecodeError::MalformedBuffer { buffer: "edge index", .. })
        ));

        let mut face = edge_face(vec![0, 2], 2);
        face.edge_positions = Some(vec![0.0; 7]);
        assert!(matches!(
            decode_edge_segments(&face, None),
            Err(DecodeError::MalformedBuffer { buffer: "edge position", .. })
        ));
    }

    #[test]
    fn test_decode_edge_segments_out_of_range() {
        let face = edge_face(vec![9, 2], 10);
        assert!(matches!(
            decode_edge_segments(&face, None),
            Err(DecodeError::IndexOutOfRange { index: 10, len: 10, .. })
        ));
    }

    #[test]
    fn test_decode_single_edge() {
        let face = edge_face(vec![0, 3, 9, 2], 12);
        assert_eq!(
            decode_single_edge(&face, 2, None).unwrap(),
            vec![point(9), point(10)]
        );
        assert_eq!(decode_single_edge(&face, 0, None).unwrap().len(), 4);
    }

    #[test]
    fn test_decode_single_edge_invalid_index() {
        let face = edge_face(vec![0, 3, 9, 2], 12);
        for bad in [1, 4, 6] {
            assert!(matches!(
                decode_single_edge(&face, bad, None),
                Err(DecodeError::IndexOutOfRange { what: "edge pair", .. })
            ));
        }
    }

    #[test]
    fn test_decode_single_edge_without_edge_data() {
        for bad in [0, 6] {
            assert_eq!(
                decode_single_edge(&CadFace::default(), bad, None),
                Err(DecodeError::IndexOutOfRange {
                    what: "edge pair",
                    index: bad,
                    len: 0
                })
            );
        }

        let mut face = edge_face(vec![0, 2], 2);
        face.edge_positions = None;
        assert!(decode_single_edge(&face, 0, None).is_err());
    }
}

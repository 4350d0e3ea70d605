//! World-space outlines of selected elements and camera framing.
//!
//! An outline is the edge geometry of the tagged element as a segment list:
//! the whole subtree for a part, every face for a shell, one face, or one
//! edge. Transforms are composed the same way the builder composes them, so
//! an outline lies exactly on the displayed edges.

use cad_core::{
    BoundingBox, CadAssembly, CadShell, DecodeError, PartId, PartTag, SubObject, TransformCache,
    compose, decode_edge_segments, decode_single_edge, local_transform,
};
use glam::{Mat4, Vec3};

/// Edge segments outlining the tagged element, in world space.
///
/// Unknown parts, missing shells and missing faces yield an empty outline.
/// Inside a part subtree, faces with malformed edge buffers are left out;
/// out-of-range indices are reported.
///
/// `transforms` must have been resolved for `assembly`.
pub fn selection_outline(
    assembly: &CadAssembly,
    transforms: &TransformCache,
    tag: PartTag,
) -> Result<Vec<Vec3>, DecodeError> {
    if assembly.part(tag.part).is_none() {
        return Ok(Vec::new());
    }
    let world = transforms.world_transform_opt(tag.part);

    match tag.sub {
        SubObject::None => {
            let mut points = Vec::new();
            if let Some(part) = assembly.part(tag.part) {
                collect_shell(assembly.shell_of(tag.part), world, &mut points)?;
                for &child in &part.children {
                    collect_subtree(assembly, child, world, &mut points)?;
                }
            }
            Ok(points)
        }
        SubObject::Shell => {
            let mut points = Vec::new();
            collect_shell(assembly.shell_of(tag.part), world, &mut points)?;
            Ok(points)
        }
        SubObject::Face { face, edge } => {
            let Some(face) = assembly
                .shell_of(tag.part)
                .and_then(|shell| shell.faces.get(face))
            else {
                return Ok(Vec::new());
            };
            match edge {
                None => decode_edge_segments(face, world.as_ref()),
                Some(pair_index) => decode_single_edge(face, pair_index, world.as_ref()),
            }
        }
    }
}

fn collect_subtree(
    assembly: &CadAssembly,
    id: PartId,
    inherited: Option<Mat4>,
    points: &mut Vec<Vec3>,
) -> Result<(), DecodeError> {
    let Some(part) = assembly.part(id) else {
        return Ok(());
    };
    let world = compose(inherited, local_transform(part));

    collect_shell(assembly.shell_of(id), world, points)?;
    for &child in &part.children {
        collect_subtree(assembly, child, world, points)?;
    }
    Ok(())
}

fn collect_shell(
    shell: Option<&CadShell>,
    world: Option<Mat4>,
    points: &mut Vec<Vec3>,
) -> Result<(), DecodeError> {
    let Some(shell) = shell else {
        return Ok(());
    };

    for face in &shell.faces {
        match decode_edge_segments(face, world.as_ref()) {
            Ok(segments) => points.extend(segments),
            Err(DecodeError::MalformedBuffer { .. }) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Camera target and distance that bring a region into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingTarget {
    /// Point the camera orbits around.
    pub center: Vec3,
    /// Camera distance from the center.
    pub distance: f32,
}

impl FramingTarget {
    /// Frame a whole scene: twice the bounds diagonal.
    pub fn fit(bounds: &BoundingBox) -> Option<Self> {
        bounds.is_valid().then(|| Self {
            center: bounds.center(),
            distance: bounds.diagonal_length() * 2.0,
        })
    }

    /// Frame one selected object for a camera with the given field of view.
    pub fn zoom(bounds: &BoundingBox, fov_degrees: f32) -> Option<Self> {
        bounds.is_valid().then(|| Self {
            center: bounds.center(),
            distance: bounds.diagonal_length() * fov_degrees.to_radians().tan() * 2.0,
        })
    }

    /// Frame an outline; `None` for an empty one.
    pub fn for_points(points: &[Vec3], fov_degrees: f32) -> Option<Self> {
        Self::zoom(&BoundingBox::from_points(points.iter().copied()), fov_degrees)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cad_core::{CadFace, CadPart};

    use super::*;

    fn edge_face(x: f32) -> CadFace {
        CadFace {
            edge_indices: Some(vec![0, 2, 1, 2]),
            edge_positions: Some(vec![x, 0.0, 0.0, x, 1.0, 0.0, x, 1.0, 1.0]),
            ..Default::default()
        }
    }

    fn outline(assembly: &CadAssembly, tag: PartTag) -> Result<Vec<Vec3>, DecodeError> {
        selection_outline(assembly, &TransformCache::new(assembly), tag)
    }

    fn translation(x: f32, y: f32, z: f32) -> [f32; 12] {
        [1.0, 0.0, 0.0, x, 0.0, 1.0, 0.0, y, 0.0, 0.0, 1.0, z]
    }

    /// root (translated) -> leaf (translated, two faces) -> nested leaf
    fn assembly() -> (CadAssembly, PartId, PartId, PartId) {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![edge_face(0.0), edge_face(2.0)]));
        let root = assembly.add_root(CadPart::group("root").with_transform(translation(0.0, 0.0, 10.0)));
        let leaf = assembly
            .add_child(root, CadPart::leaf("leaf", shell).with_transform(translation(100.0, 0.0, 0.0)))
            .unwrap();
        let nested = assembly.add_child(leaf, CadPart::leaf("nested", shell)).unwrap();
        (assembly, root, leaf, nested)
    }

    #[test]
    fn test_part_outline_covers_subtree() {
        let (assembly, root, leaf, _) = assembly();
        // Two parts, two faces each, two segments per face
        assert_eq!(outline(&assembly, PartTag::part(root)).unwrap().len(), 16);
        assert_eq!(outline(&assembly, PartTag::part(leaf)).unwrap().len(), 16);
    }

    #[test]
    fn test_shell_outline_uses_part_transform() {
        let (assembly, _, leaf, _) = assembly();
        let points = outline(&assembly, PartTag::shell(leaf)).unwrap();
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], Vec3::new(100.0, 0.0, 10.0));
    }

    #[test]
    fn test_face_and_edge_outline() {
        let (assembly, _, _, nested) = assembly();
        let face = outline(&assembly, PartTag::face(nested, 1)).unwrap();
        assert_eq!(face.len(), 4);
        assert_eq!(face[0], Vec3::new(102.0, 0.0, 10.0));

        let edge = outline(&assembly, PartTag::edge(nested, 1, 2)).unwrap();
        assert_eq!(edge, vec![Vec3::new(102.0, 1.0, 10.0), Vec3::new(102.0, 1.0, 11.0)]);
    }

    #[test]
    fn test_outline_matches_world_transform() {
        let (assembly, _, _, nested) = assembly();
        let world = assembly.world_transform(nested);
        let points = outline(&assembly, PartTag::face(nested, 0)).unwrap();
        assert_eq!(points[1], world.transform_point3(Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_missing_targets_are_empty() {
        let (assembly, root, leaf, _) = assembly();
        assert!(outline(&assembly, PartTag::face(leaf, 9)).unwrap().is_empty());
        assert!(outline(&assembly, PartTag::shell(root)).unwrap().is_empty());
        assert!(
            outline(&assembly, PartTag::part(PartId::new(42)))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_invalid_edge_index_is_reported() {
        let (assembly, _, leaf, _) = assembly();
        assert!(outline(&assembly, PartTag::edge(leaf, 0, 3)).is_err());
    }

    #[test]
    fn test_framing_target() {
        let bounds = BoundingBox::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        let fit = FramingTarget::fit(&bounds).unwrap();
        assert_eq!(fit.center, Vec3::new(1.5, 2.0, 0.0));
        assert_relative_eq!(fit.distance, 10.0);

        let zoom = FramingTarget::zoom(&bounds, 45.0).unwrap();
        assert_relative_eq!(zoom.distance, 10.0, epsilon = 1e-5);

        assert_eq!(FramingTarget::for_points(&[], 45.0), None);
        assert!(FramingTarget::fit(&BoundingBox::empty()).is_none());
    }
}

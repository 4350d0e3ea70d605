//! World transform resolution
//!
//! Matrices follow glam's column-vector convention: a part's world transform
//! is `parent_world * local`, and points are mapped with
//! [`Mat4::transform_point3`]. Absent and near-identity local transforms are
//! skipped instead of multiplied in, so an importer matrix that is identity
//! up to rounding never introduces drift into world coordinates.
//!
//! Every path that accumulates transforms (the resolver, the cache, the
//! primitive builder) goes through [`compose`], which keeps them
//! bit-identical to each other.

use glam::{Mat4, Vec4};

use crate::constants::{IDENTITY_EPSILON, TRANSFORM_LEN};
use crate::model::{CadAssembly, CadPart, PartId};

/// Convert an importer transform (row-major 3x4, translation in the last
/// column) into a `Mat4`.
pub fn read_matrix(values: &[f32; TRANSFORM_LEN]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(values[0], values[4], values[8], 0.0),
        Vec4::new(values[1], values[5], values[9], 0.0),
        Vec4::new(values[2], values[6], values[10], 0.0),
        Vec4::new(values[3], values[7], values[11], 1.0),
    )
}

/// True if every element is within [`IDENTITY_EPSILON`] of the identity.
pub fn is_identity(matrix: &Mat4) -> bool {
    matrix.abs_diff_eq(Mat4::IDENTITY, IDENTITY_EPSILON)
}

/// The part's own transform, or `None` when absent or numerically identity.
pub fn local_transform(part: &CadPart) -> Option<Mat4> {
    part.transform
        .as_ref()
        .map(read_matrix)
        .filter(|m| !is_identity(m))
}

/// Compose an inherited transform with a local one; `None` means identity.
pub fn compose(parent: Option<Mat4>, local: Option<Mat4>) -> Option<Mat4> {
    match (parent, local) {
        (parent, None) => parent,
        (None, Some(local)) => Some(local),
        (Some(parent), Some(local)) => Some(parent * local),
    }
}

impl CadAssembly {
    /// World transform of a part, or `None` when the whole ancestor chain is
    /// free of (non-identity) transforms.
    pub fn world_transform_opt(&self, id: PartId) -> Option<Mat4> {
        let mut chain: Vec<PartId> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);

        chain
            .into_iter()
            .filter_map(|p| self.part(p))
            .fold(None, |acc, part| compose(acc, local_transform(part)))
    }

    /// World transform of a part: product of all local transforms from the
    /// root down to the part.
    pub fn world_transform(&self, id: PartId) -> Mat4 {
        self.world_transform_opt(id).unwrap_or(Mat4::IDENTITY)
    }
}

/// World transforms of every part of one loaded assembly, resolved in a
/// single depth-first pass.
///
/// The assembly never changes after load, so the table stays valid until the
/// next load. Lookups return the same values as
/// [`CadAssembly::world_transform_opt`].
#[derive(Debug, Clone, Default)]
pub struct TransformCache {
    /// Indexed by [`PartId::index`]; `None` = identity
    worlds: Vec<Option<Mat4>>,
}

impl TransformCache {
    pub fn new(assembly: &CadAssembly) -> Self {
        let mut worlds = vec![None; assembly.part_count()];
        for id in assembly.parts_depth_first() {
            let Some(part) = assembly.part(id) else {
                continue;
            };
            let inherited = part
                .parent
                .and_then(|parent| worlds.get(parent.index()).copied().flatten());
            if let Some(slot) = worlds.get_mut(id.index()) {
                *slot = compose(inherited, local_transform(part));
            }
        }
        Self { worlds }
    }

    /// Number of parts covered
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// World transform of a part; `None` for identity or an unknown part
    pub fn world_transform_opt(&self, id: PartId) -> Option<Mat4> {
        self.worlds.get(id.index()).copied().flatten()
    }

    pub fn world_transform(&self, id: PartId) -> Mat4 {
        self.world_transform_opt(id).unwrap_or(Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn translation(x: f32, y: f32, z: f32) -> [f32; 12] {
        [1.0, 0.0, 0.0, x, 0.0, 1.0, 0.0, y, 0.0, 0.0, 1.0, z]
    }

    fn rotation_z_90() -> [f32; 12] {
        [0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    }

    #[test]
    fn test_read_matrix_translation() {
        let m = read_matrix(&translation(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_read_matrix_rotation() {
        let m = read_matrix(&rotation_z_90());
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_near_identity_is_elided() {
        let mut values = translation(0.0, 0.0, 0.0);
        values[0] += 1e-7;
        values[3] = 1e-7;
        let part = CadPart::group("p").with_transform(values);
        assert!(local_transform(&part).is_none());
    }

    #[test]
    fn test_compose_skips_missing() {
        let t = Mat4::from_translation(Vec3::X);
        assert_eq!(compose(None, None), None);
        assert_eq!(compose(Some(t), None), Some(t));
        assert_eq!(compose(None, Some(t)), Some(t));
        assert_eq!(compose(Some(t), Some(t)), Some(t * t));
    }

    #[test]
    fn test_world_transform_parent_then_local() {
        let mut assembly = CadAssembly::new();
        let root = assembly.add_root(CadPart::group("root").with_transform(rotation_z_90()));
        let child = assembly
            .add_child(
                root,
                CadPart::group("child").with_transform(translation(1.0, 0.0, 0.0)),
            )
            .unwrap();

        // Translate first, then rotate by the parent
        let p = assembly.world_transform(child).transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_chained_equals_direct() {
        let mut assembly = CadAssembly::new();
        let a = assembly.add_root(CadPart::group("a").with_transform(rotation_z_90()));
        let b = assembly
            .add_child(a, CadPart::group("b").with_transform(translation(0.3, 0.1, 7.0)))
            .unwrap();
        let c = assembly
            .add_child(b, CadPart::group("c").with_transform(translation(-2.0, 0.5, 1.0)))
            .unwrap();

        let chained = compose(
            assembly.world_transform_opt(b),
            local_transform(&assembly[c]),
        );
        assert_eq!(chained, assembly.world_transform_opt(c));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let mut assembly = CadAssembly::new();
        let a = assembly.add_root(CadPart::group("a").with_transform(rotation_z_90()));
        let b = assembly
            .add_child(a, CadPart::group("b").with_transform(translation(0.3, 0.1, 7.0)))
            .unwrap();

        let first = assembly.world_transform(b);
        let second = assembly.world_transform(b);
        assert_eq!(first.to_cols_array(), second.to_cols_array());
    }

    #[test]
    fn test_identity_chain_has_no_transform() {
        let mut values = translation(0.0, 0.0, 0.0);
        values[5] = 1.0 - 1e-7;
        let mut assembly = CadAssembly::new();
        let a = assembly.add_root(CadPart::group("a").with_transform(values));
        let b = assembly.add_child(a, CadPart::group("b")).unwrap();
        assert_eq!(assembly.world_transform_opt(b), None);
        assert_eq!(assembly.world_transform(b), Mat4::IDENTITY);
    }

    #[test]
    fn test_cache_matches_direct() {
        let mut assembly = CadAssembly::new();
        let a = assembly.add_root(CadPart::group("a").with_transform(rotation_z_90()));
        let b = assembly
            .add_child(a, CadPart::group("b").with_transform(translation(0.3, 0.1, 7.0)))
            .unwrap();
        let c = assembly.add_child(b, CadPart::group("c")).unwrap();

        let cache = TransformCache::new(&assembly);
        assert_eq!(cache.len(), 3);
        for id in [c, b, a, c] {
            assert_eq!(cache.world_transform_opt(id), assembly.world_transform_opt(id));
        }
        assert_eq!(cache.world_transform_opt(PartId::new(9)), None);
        assert!(TransformCache::default().is_empty());
    }
}

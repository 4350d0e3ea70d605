//! Render primitive generation.
//!
//! Walks the part forest depth-first, carrying the accumulated world
//! transform down the tree so every node composes its transform exactly once.
//! Output order is roots in order, each subtree depth-first with a part's
//! shell faces before its children and faces in shell order.

use cad_core::{
    CadAssembly, CadFace, CadPart, DecodeError, PartId, PartTag, compose, decode_edge_segments,
    decode_triangles, decode_vertices, local_transform,
};
use glam::Mat4;

use crate::config::BuildConfig;
use crate::primitive::{MaterialKind, MeshPrimitive, PolylinePrimitive, RenderPrimitive};

/// Errors that abort a whole build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// An index stored in the assembly (shell, triangle vertex, edge point)
    /// points outside its buffer.
    #[error("Structural corruption in part {part}: {detail}")]
    StructuralCorruption {
        /// Part whose data is corrupt.
        part: PartId,
        /// What was out of range.
        detail: String,
    },
}

/// Counters collected during a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Parts visited.
    pub parts: usize,
    /// Mesh primitives emitted.
    pub meshes: usize,
    /// Edge polyline primitives emitted.
    pub polylines: usize,
    /// Face primitives dropped because of a malformed buffer.
    pub skipped_faces: usize,
}

impl BuildStats {
    #[cfg(feature = "parallel")]
    fn merge(&mut self, other: &BuildStats) {
        self.parts += other.parts;
        self.meshes += other.meshes;
        self.polylines += other.polylines;
        self.skipped_faces += other.skipped_faces;
    }
}

/// Result of a successful build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    /// Primitives in emission order.
    pub primitives: Vec<RenderPrimitive>,
    /// Build counters.
    pub stats: BuildStats,
}

/// Builds render primitives for one assembly.
pub struct PrimitiveBuilder<'a> {
    assembly: &'a CadAssembly,
    config: &'a BuildConfig,
}

impl<'a> PrimitiveBuilder<'a> {
    /// Create a builder over a loaded assembly.
    pub fn new(assembly: &'a CadAssembly, config: &'a BuildConfig) -> Self {
        Self { assembly, config }
    }

    /// Build primitives for every root part.
    ///
    /// Malformed face buffers are skipped (and logged); out-of-range indices
    /// abort the build and no primitives are returned.
    pub fn build(&self) -> Result<BuildOutput, BuildError> {
        let mut output = BuildOutput::default();
        for &root in self.assembly.root_parts() {
            self.visit(root, None, &mut output)?;
        }
        log_stats(&output.stats);
        Ok(output)
    }

    /// Same output as [`build`](Self::build), with root subtrees built on the
    /// rayon pool and concatenated in root order.
    #[cfg(feature = "parallel")]
    pub fn build_parallel(&self) -> Result<BuildOutput, BuildError> {
        use rayon::prelude::*;

        let per_root: Vec<Result<BuildOutput, BuildError>> = self
            .assembly
            .root_parts()
            .par_iter()
            .map(|&root| {
                let mut output = BuildOutput::default();
                self.visit(root, None, &mut output)?;
                Ok(output)
            })
            .collect();

        let mut output = BuildOutput::default();
        for subtree in per_root {
            let subtree = subtree?;
            output.primitives.extend(subtree.primitives);
            output.stats.merge(&subtree.stats);
        }
        log_stats(&output.stats);
        Ok(output)
    }

    fn visit(
        &self,
        id: PartId,
        inherited: Option<Mat4>,
        output: &mut BuildOutput,
    ) -> Result<(), BuildError> {
        let part = self
            .assembly
            .part(id)
            .ok_or_else(|| corruption(id, "part does not exist".to_string()))?;
        let world = compose(inherited, local_transform(part));
        output.stats.parts += 1;

        if let Some(shell_index) = part.shell_index {
            let shell = self.assembly.shell(shell_index).ok_or_else(|| {
                corruption(
                    id,
                    format!(
                        "shell index {shell_index} out of range ({} shells)",
                        self.assembly.shells().len()
                    ),
                )
            })?;

            for (face_index, face) in shell.faces.iter().enumerate() {
                self.emit_face(id, part, face_index, face, world, output)?;
            }
        }

        for &child in &part.children {
            self.visit(child, world, output)?;
        }
        Ok(())
    }

    fn emit_face(
        &self,
        id: PartId,
        part: &CadPart,
        face_index: usize,
        face: &CadFace,
        world: Option<Mat4>,
        output: &mut BuildOutput,
    ) -> Result<(), BuildError> {
        let label = part.label().unwrap_or("Part");
        let tag = PartTag::face(id, face_index);

        if let (Some(buffer), Some(indices)) = (&face.vertex_buffer, &face.triangle_indices) {
            let decoded = decode_vertices(buffer).and_then(|vertices| {
                let indices = decode_triangles(indices, vertices.len())?;
                Ok((vertices, indices))
            });

            if let Some((vertices, indices)) =
                recover(decoded, id, face_index, &mut output.stats)?
            {
                let color = face
                    .color
                    .or(part.color)
                    .unwrap_or(self.config.default_color);
                output.primitives.push(RenderPrimitive::Mesh(MeshPrimitive {
                    name: format!("{label}_Face{face_index}_Mesh"),
                    vertices,
                    indices,
                    material: MaterialKind::Surface { color },
                    transform: world,
                    tag,
                }));
                output.stats.meshes += 1;
            }
        }

        if self.config.generate_edges && face.has_edges() {
            let decoded = decode_edge_segments(face, world.as_ref());
            if let Some(points) = recover(decoded, id, face_index, &mut output.stats)?
                && !points.is_empty()
            {
                output.primitives.push(RenderPrimitive::Polyline(PolylinePrimitive {
                    name: format!("{label}_Face{face_index}_EdgeLines"),
                    points,
                    material: MaterialKind::Edge,
                    tag,
                }));
                output.stats.polylines += 1;
            }
        }

        Ok(())
    }
}

/// Build primitives for an assembly with the given configuration.
pub fn build(assembly: &CadAssembly, config: &BuildConfig) -> Result<BuildOutput, BuildError> {
    PrimitiveBuilder::new(assembly, config).build()
}

/// Malformed buffers drop the primitive; range errors are fatal.
fn recover<T>(
    result: Result<T, DecodeError>,
    part: PartId,
    face_index: usize,
    stats: &mut BuildStats,
) -> Result<Option<T>, BuildError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ DecodeError::MalformedBuffer { .. }) => {
            tracing::warn!("Skipping face {} of part {}: {}", face_index, part, err);
            stats.skipped_faces += 1;
            Ok(None)
        }
        Err(err @ DecodeError::IndexOutOfRange { .. }) => {
            Err(corruption(part, format!("face {face_index}: {err}")))
        }
    }
}

fn corruption(part: PartId, detail: String) -> BuildError {
    BuildError::StructuralCorruption { part, detail }
}

fn log_stats(stats: &BuildStats) {
    tracing::debug!(
        parts = stats.parts,
        meshes = stats.meshes,
        polylines = stats.polylines,
        skipped_faces = stats.skipped_faces,
        "Built scene primitives"
    );
}

#[cfg(test)]
mod tests {
    use cad_core::{CadShell, SubObject};
    use glam::Vec3;

    use super::*;

    /// Unit square face with a single edge along x
    fn square_face() -> CadFace {
        let mut vertex_buffer = Vec::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            vertex_buffer.extend_from_slice(&[x, y, 0.0, 0.0, 0.0, 1.0, x, y]);
        }
        CadFace {
            vertex_buffer: Some(vertex_buffer),
            triangle_indices: Some(vec![0, 1, 2, 0, 2, 3]),
            edge_indices: Some(vec![0, 2]),
            edge_positions: Some(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            ..Default::default()
        }
    }

    fn translation(x: f32, y: f32, z: f32) -> [f32; 12] {
        [1.0, 0.0, 0.0, x, 0.0, 1.0, 0.0, y, 0.0, 0.0, 1.0, z]
    }

    fn polylines(output: &BuildOutput) -> Vec<&PolylinePrimitive> {
        output
            .primitives
            .iter()
            .filter_map(|p| match p {
                RenderPrimitive::Polyline(line) => Some(line),
                RenderPrimitive::Mesh(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_group_with_two_leaves() {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face()]));
        let group = assembly.add_root(CadPart::group("group"));
        let a = assembly.add_child(group, CadPart::leaf("a", shell)).unwrap();
        let b = assembly.add_child(group, CadPart::leaf("b", shell)).unwrap();

        let output = build(&assembly, &BuildConfig::default()).unwrap();

        assert_eq!(output.stats.meshes, 2);
        assert_eq!(output.stats.polylines, 2);
        assert_eq!(output.primitives.len(), 4);
        assert!(output.primitives.iter().all(|p| p.tag().part != group));
        assert!(polylines(&output).iter().all(|l| l.points.len() == 2));

        let tags: Vec<_> = output.primitives.iter().map(|p| p.tag()).collect();
        assert_eq!(
            tags,
            vec![
                PartTag::face(a, 0),
                PartTag::face(a, 0),
                PartTag::face(b, 0),
                PartTag::face(b, 0)
            ]
        );
        assert_eq!(output.primitives[0].name(), "a_Face0_Mesh");
        assert_eq!(output.primitives[1].name(), "a_Face0_EdgeLines");
    }

    #[test]
    fn test_malformed_face_is_skipped() {
        let mut broken = square_face();
        broken.vertex_buffer = Some(vec![0.0; 17]);

        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![broken, square_face()]));
        let leaf = assembly.add_root(CadPart::leaf("leaf", shell));

        let output = build(&assembly, &BuildConfig::default()).unwrap();

        assert_eq!(output.stats.skipped_faces, 1);
        assert_eq!(output.stats.meshes, 1);
        // The broken face keeps its edges; only its mesh is dropped
        assert_eq!(output.stats.polylines, 2);
        let mesh_tags: Vec<_> = output
            .primitives
            .iter()
            .filter(|p| p.is_mesh())
            .map(|p| p.tag())
            .collect();
        assert_eq!(mesh_tags, vec![PartTag::face(leaf, 1)]);
    }

    #[test]
    fn test_shell_index_out_of_range() {
        let mut assembly = CadAssembly::new();
        for _ in 0..3 {
            assembly.add_shell(CadShell::new(vec![square_face()]));
        }
        let root = assembly.add_root(CadPart::group("root"));
        assembly.add_child(root, CadPart::leaf("ok", 0)).unwrap();
        let bad = assembly.add_child(root, CadPart::leaf("bad", 5)).unwrap();

        let err = build(&assembly, &BuildConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::StructuralCorruption { part, .. } if part == bad
        ));
    }

    #[test]
    fn test_edge_pair_past_buffer_is_fatal() {
        let mut face = square_face();
        face.edge_indices = Some(vec![1, 4]);

        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![face]));
        assembly.add_root(CadPart::leaf("leaf", shell));

        assert!(build(&assembly, &BuildConfig::default()).is_err());
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face(), square_face()]));
        let root = assembly.add_root(
            CadPart::group("root").with_transform([
                0.0, -1.0, 0.0, 3.0, 1.0, 0.0, 0.0, 0.5, 0.0, 0.0, 1.0, -2.0,
            ]),
        );
        assembly
            .add_child(root, CadPart::leaf("a", shell).with_transform(translation(0.1, 0.2, 0.3)))
            .unwrap();

        let config = BuildConfig::default();
        assert_eq!(build(&assembly, &config), build(&assembly, &config));
    }

    #[test]
    fn test_near_identity_keeps_positions_exact() {
        let mut values = translation(0.0, 0.0, 0.0);
        values[0] = 1.0 + 1e-7;
        values[7] = 1e-7;

        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face()]));
        assembly.add_root(CadPart::leaf("leaf", shell).with_transform(values));

        let output = build(&assembly, &BuildConfig::default()).unwrap();
        let RenderPrimitive::Mesh(mesh) = &output.primitives[0] else {
            panic!("expected mesh first");
        };
        assert_eq!(mesh.transform, None);
        assert_eq!(polylines(&output)[0].points, vec![Vec3::ZERO, Vec3::X]);
    }

    #[test]
    fn test_shared_shell_distinct_transforms() {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face()]));
        let root = assembly.add_root(CadPart::group("root").with_transform(translation(0.0, 0.0, 1.0)));
        assembly
            .add_child(root, CadPart::leaf("left", shell).with_transform(translation(-5.0, 0.0, 0.0)))
            .unwrap();
        assembly
            .add_child(root, CadPart::leaf("right", shell).with_transform(translation(5.0, 0.0, 0.0)))
            .unwrap();

        let output = build(&assembly, &BuildConfig::default()).unwrap();
        let lines = polylines(&output);
        assert_eq!(lines[0].points[0], Vec3::new(-5.0, 0.0, 1.0));
        assert_eq!(lines[1].points[0], Vec3::new(5.0, 0.0, 1.0));

        let world = assembly.world_transform_opt(PartId::new(2));
        let RenderPrimitive::Mesh(mesh) = &output.primitives[2] else {
            panic!("expected mesh");
        };
        assert_eq!(mesh.transform, world);
    }

    #[test]
    fn test_color_resolution() {
        let mut colored = square_face();
        colored.color = Some([1.0, 0.0, 0.0, 1.0]);

        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![colored, square_face()]));
        let root = assembly.add_root(CadPart::group("root"));
        assembly
            .add_child(root, CadPart::leaf("painted", shell).with_color([0.0, 0.0, 1.0, 1.0]))
            .unwrap();
        assembly.add_child(root, CadPart::leaf("plain", shell)).unwrap();

        let output = build(&assembly, &BuildConfig::default()).unwrap();
        let colors: Vec<_> = output
            .primitives
            .iter()
            .filter_map(|p| match p.material() {
                MaterialKind::Surface { color } => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(
            colors,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 0.0, 0.0, 1.0],
                [0.5, 0.5, 0.5, 1.0]
            ]
        );
    }

    #[test]
    fn test_edges_disabled() {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face()]));
        assembly.add_root(CadPart::leaf("leaf", shell));

        let config = BuildConfig {
            generate_edges: false,
            ..Default::default()
        };
        let output = build(&assembly, &config).unwrap();
        assert_eq!(output.stats.polylines, 0);
        assert!(output.primitives.iter().all(RenderPrimitive::is_mesh));
    }

    #[test]
    fn test_empty_node_renders_nothing() {
        let mut assembly = CadAssembly::new();
        let root = assembly.add_root(CadPart::group("root"));
        assembly.add_child(root, CadPart::group("empty")).unwrap();

        let output = build(&assembly, &BuildConfig::default()).unwrap();
        assert!(output.primitives.is_empty());
        assert_eq!(output.stats.parts, 2);
    }

    #[test]
    fn test_face_without_edges_has_mesh_only() {
        let mut face = square_face();
        face.edge_positions = None;

        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![face]));
        let leaf = assembly.add_root(CadPart::leaf("leaf", shell));

        let output = build(&assembly, &BuildConfig::default()).unwrap();
        assert_eq!(output.primitives.len(), 1);
        assert_eq!(
            output.primitives[0].tag().sub,
            SubObject::Face {
                face: 0,
                edge: None
            }
        );
        assert_eq!(output.primitives[0].tag().part, leaf);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let mut assembly = CadAssembly::new();
        let shell = assembly.add_shell(CadShell::new(vec![square_face(), square_face()]));
        for i in 0..8 {
            let root = assembly.add_root(
                CadPart::group(format!("root{i}")).with_transform(translation(i as f32, 0.0, 0.0)),
            );
            for j in 0..3 {
                assembly
                    .add_child(
                        root,
                        CadPart::leaf(format!("leaf{j}"), shell)
                            .with_transform(translation(0.0, j as f32, 0.0)),
                    )
                    .unwrap();
            }
        }

        let config = BuildConfig::default();
        let builder = PrimitiveBuilder::new(&assembly, &config);
        assert_eq!(builder.build_parallel(), builder.build());
    }
}

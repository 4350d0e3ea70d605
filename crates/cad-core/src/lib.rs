//! CAD assembly core
//!
//! In-memory model of an imported CAD assembly (a forest of parts that
//! reference shared B-rep shells) together with the two leaf algorithms
//! everything else is built on:
//!
//! - [`transform`] - world transform resolution along the ancestor chain
//! - [`decode`] - flat vertex / edge buffer decoding
//!
//! The remaining modules describe loaded data for humans ([`info`],
//! [`report`]) and move assemblies across the load boundary ([`document`]).

pub mod bounds;
pub mod constants;
pub mod decode;
pub mod document;
pub mod info;
pub mod model;
pub mod report;
pub mod tag;
pub mod transform;

pub use bounds::BoundingBox;
pub use decode::{
    DecodeError, MeshVertex, count_edge_points, decode_edge_segments, decode_single_edge,
    decode_triangles, decode_vertices,
};
pub use document::{ImportError, from_ron_str, load_assembly, save_assembly, to_ron_string};
pub use info::{CurveInfo, describe, describe_curve};
pub use model::{
    AssemblyError, CadAssembly, CadCurve, CadFace, CadPart, CadShell, CurveKind, PartId,
};
pub use report::AssemblyReport;
pub use tag::{PartTag, SubObject};
pub use transform::{TransformCache, compose, is_identity, local_transform, read_matrix};

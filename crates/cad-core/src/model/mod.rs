//! Imported CAD assembly model
//!
//! Parts live in an arena owned by [`CadAssembly`] and refer to each other
//! through [`PartId`]s; shells live in a flat list and are shared by index.
//! Nothing here holds a reference cycle, yet every part can still walk up to
//! its root through the parent back-reference.

pub(crate) mod assembly;
mod curve;
mod part;
mod shell;

pub use assembly::CadAssembly;
pub use curve::{CadCurve, CurveKind};
pub use part::{CadPart, PartId};
pub use shell::{CadFace, CadShell};

/// Structural problems detected while assembling or validating the part forest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("Part not found: {0}")]
    PartNotFound(PartId),
    #[error("Part {parent} lists child {child}, which does not exist")]
    ChildOutOfRange { parent: PartId, child: PartId },
    #[error("Part already has a parent: {0}")]
    AlreadyHasParent(PartId),
    #[error("Root part has a parent: {0}")]
    RootHasParent(PartId),
    #[error("Part is listed as a root more than once: {0}")]
    DuplicateRoot(PartId),
    #[error("Orphaned part (not reachable from any root): {0}")]
    OrphanedPart(PartId),
}

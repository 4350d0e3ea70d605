//! Part (hierarchy node) definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::constants::TRANSFORM_LEN;

/// Arena index of a part inside its [`CadAssembly`](super::CadAssembly).
///
/// Ids are identities: two parts with identical content still have distinct
/// ids, and comparing ids is how the rest of the crate asks "is this the same
/// part".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(usize);

impl PartId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the assembly tree.
///
/// A part is either a group (no shell, some children) or a leaf that
/// references a shared shell. A part with neither is valid and renders
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier assigned by the importer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local transform as imported: row-major 3x4, translation in the last column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f32; TRANSFORM_LEN]>,
    /// Index into [`CadAssembly::shells`](super::CadAssembly::shells); `None` for group nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_index: Option<usize>,
    /// Part-level color (RGBA), used by faces without their own color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 4]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PartId>,
    /// Back-reference, rebuilt by the owning assembly
    #[serde(skip)]
    pub parent: Option<PartId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_area: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

impl CadPart {
    /// Create a group node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Create a leaf node referencing a shared shell
    pub fn leaf(name: impl Into<String>, shell_index: usize) -> Self {
        Self {
            name: Some(name.into()),
            shell_index: Some(shell_index),
            ..Default::default()
        }
    }

    /// Builder-style local transform
    pub fn with_transform(mut self, transform: [f32; TRANSFORM_LEN]) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builder-style part color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_shell(&self) -> bool {
        self.shell_index.is_some()
    }

    /// No children and no shell
    pub fn is_empty_node(&self) -> bool {
        !self.has_children() && !self.has_shell()
    }

    /// Name, falling back to the importer id
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }
}

//! Assembly: shared shell pool plus the part forest

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

use super::{AssemblyError, CadPart, CadShell, PartId};

/// Raw assembly data for (de)serialization; parent links are not stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AssemblyData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub shells: Vec<CadShell>,
    #[serde(default)]
    pub parts: Vec<CadPart>,
    #[serde(default)]
    pub root_parts: Vec<PartId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

/// An imported CAD document.
///
/// Created once per load and immutable afterwards; the `add_*` methods exist
/// for the producer side (importer adapters, document loading, tests).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "AssemblyData", try_from = "AssemblyData")]
pub struct CadAssembly {
    pub name: Option<String>,
    shells: Vec<CadShell>,
    parts: Vec<CadPart>,
    root_parts: Vec<PartId>,
    /// Overall bounds reported by the importer
    pub bounds: Option<BoundingBox>,
}

impl From<CadAssembly> for AssemblyData {
    fn from(assembly: CadAssembly) -> Self {
        Self {
            name: assembly.name,
            shells: assembly.shells,
            parts: assembly.parts,
            root_parts: assembly.root_parts,
            bounds: assembly.bounds,
        }
    }
}

impl TryFrom<AssemblyData> for CadAssembly {
    type Error = AssemblyError;

    fn try_from(data: AssemblyData) -> Result<Self, Self::Error> {
        let mut assembly = Self {
            name: data.name,
            shells: data.shells,
            parts: data.parts,
            root_parts: data.root_parts,
            bounds: data.bounds,
        };
        assembly.rebuild_parents()?;
        assembly.validate()?;
        Ok(assembly)
    }
}

impl Index<PartId> for CadAssembly {
    type Output = CadPart;

    /// Panics for ids that do not belong to this assembly.
    fn index(&self, id: PartId) -> &CadPart {
        &self.parts[id.index()]
    }
}

impl CadAssembly {
    /// Create an empty assembly
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shells(&self) -> &[CadShell] {
        &self.shells
    }

    pub fn parts(&self) -> &[CadPart] {
        &self.parts
    }

    pub fn root_parts(&self) -> &[PartId] {
        &self.root_parts
    }

    pub fn part(&self, id: PartId) -> Option<&CadPart> {
        self.parts.get(id.index())
    }

    pub fn shell(&self, index: usize) -> Option<&CadShell> {
        self.shells.get(index)
    }

    /// Shell referenced by a part. `None` both for group nodes and for
    /// out-of-range indices; builders that must tell the two apart check
    /// `shell_index` themselves.
    pub fn shell_of(&self, id: PartId) -> Option<&CadShell> {
        self.part(id)?.shell_index.and_then(|i| self.shell(i))
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Add a shell to the shared pool, returning its index
    pub fn add_shell(&mut self, shell: CadShell) -> usize {
        self.shells.push(shell);
        self.shells.len() - 1
    }

    /// Add a top-level part
    pub fn add_root(&mut self, mut part: CadPart) -> PartId {
        let id = PartId::new(self.parts.len());
        part.parent = None;
        part.children.clear();
        self.parts.push(part);
        self.root_parts.push(id);
        id
    }

    /// Add a part as the last child of `parent`
    pub fn add_child(&mut self, parent: PartId, mut part: CadPart) -> Result<PartId, AssemblyError> {
        if parent.index() >= self.parts.len() {
            return Err(AssemblyError::PartNotFound(parent));
        }

        let id = PartId::new(self.parts.len());
        part.parent = Some(parent);
        part.children.clear();
        self.parts.push(part);
        self.parts[parent.index()].children.push(id);
        Ok(id)
    }

    /// Ancestors of a part, nearest first (the part itself excluded)
    pub fn ancestors(&self, id: PartId) -> impl Iterator<Item = PartId> + '_ {
        std::iter::successors(self.part(id).and_then(|p| p.parent), move |current| {
            self.part(*current).and_then(|p| p.parent)
        })
    }

    /// All parts in depth-first order from all roots
    pub fn parts_depth_first(&self) -> Vec<PartId> {
        let mut result = Vec::with_capacity(self.parts.len());
        for &root in &self.root_parts {
            self.collect_depth_first(root, &mut result);
        }
        result
    }

    fn collect_depth_first(&self, id: PartId, result: &mut Vec<PartId>) {
        result.push(id);
        if let Some(part) = self.part(id) {
            for &child in &part.children {
                self.collect_depth_first(child, result);
            }
        }
    }

    /// Rebuild parent back-references from the child lists
    fn rebuild_parents(&mut self) -> Result<(), AssemblyError> {
        for part in &mut self.parts {
            part.parent = None;
        }

        for index in 0..self.parts.len() {
            let parent = PartId::new(index);
            for child_pos in 0..self.parts[index].children.len() {
                let child = self.parts[index].children[child_pos];
                let Some(child_part) = self.parts.get_mut(child.index()) else {
                    return Err(AssemblyError::ChildOutOfRange { parent, child });
                };
                if child_part.parent.is_some() {
                    return Err(AssemblyError::AlreadyHasParent(child));
                }
                child_part.parent = Some(parent);
            }
        }
        Ok(())
    }

    /// Validate the part forest: roots exist and have no parent, every part
    /// is reachable from exactly one root path.
    ///
    /// Shell indices are deliberately not checked here; an out-of-range
    /// shell index is reported when the scene is built.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        let mut seen = vec![false; self.parts.len()];

        for &root in &self.root_parts {
            let part = self.part(root).ok_or(AssemblyError::PartNotFound(root))?;
            if part.parent.is_some() {
                return Err(AssemblyError::RootHasParent(root));
            }
            if seen[root.index()] {
                return Err(AssemblyError::DuplicateRoot(root));
            }

            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if std::mem::replace(&mut seen[id.index()], true) {
                    continue;
                }
                for &child in &self[id].children {
                    if child.index() >= self.parts.len() {
                        return Err(AssemblyError::ChildOutOfRange { parent: id, child });
                    }
                    stack.push(child);
                }
            }
        }

        match seen.iter().position(|s| !s) {
            Some(orphan) => Err(AssemblyError::OrphanedPart(PartId::new(orphan))),
            None => Ok(()),
        }
    }
}

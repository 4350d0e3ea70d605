//! Part tree mirroring the assembly hierarchy
//!
//! One node per part, plus one "Shell" node under every shell-bearing part.
//! Face, wire, edge and curve nodes below a shell are only materialized when
//! the shell is expanded; [`PartTree::find`] searches materialized nodes only.

use cad_core::{CadAssembly, CadCurve, PartId, PartTag, SubObject};

/// Index of a node in the [`PartTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeNodeId(usize);

impl TreeNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a tree node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Part,
    Shell,
    Face,
    Wire,
    Edge,
    Curve,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: String,
    pub kind: NodeKind,
    /// Element selected when this node is selected. Curve nodes carry the
    /// tag of their edge.
    pub tag: PartTag,
    pub parent: Option<TreeNodeId>,
    pub children: Vec<TreeNodeId>,
    pub expanded: bool,
}

/// Tree of UI nodes with deferred face expansion and a single selection
#[derive(Debug, Clone, Default)]
pub struct PartTree {
    nodes: Vec<TreeNode>,
    roots: Vec<TreeNodeId>,
    selected: Option<TreeNodeId>,
}

impl PartTree {
    /// Build part and shell nodes for a loaded assembly
    pub fn build(assembly: &CadAssembly) -> Self {
        let mut tree = Self::default();
        for &root in assembly.root_parts() {
            tree.add_part(assembly, None, root);
        }
        tracing::debug!("Part tree built with {} nodes", tree.nodes.len());
        tree
    }

    fn add_part(&mut self, assembly: &CadAssembly, parent: Option<TreeNodeId>, id: PartId) {
        let Some(part) = assembly.part(id) else {
            return;
        };

        let label = match part.label() {
            Some(label) => label.to_string(),
            None => match parent {
                Some(parent) => format!("Part_{}", self.nodes[parent.0].children.len()),
                None => "Part".to_string(),
            },
        };

        let node = self.push(
            parent,
            TreeNode {
                label,
                kind: NodeKind::Part,
                tag: PartTag::part(id),
                parent,
                children: Vec::new(),
                expanded: part.has_children(),
            },
        );

        if part.has_shell() {
            self.push(
                Some(node),
                TreeNode {
                    label: "Shell".to_string(),
                    kind: NodeKind::Shell,
                    tag: PartTag::shell(id),
                    parent: Some(node),
                    children: Vec::new(),
                    expanded: false,
                },
            );
        }

        for &child in &part.children {
            self.add_part(assembly, Some(node), child);
        }
    }

    fn push(&mut self, parent: Option<TreeNodeId>, node: TreeNode) -> TreeNodeId {
        let id = TreeNodeId(self.nodes.len());
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: TreeNodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn roots(&self) -> &[TreeNodeId] {
        &self.roots
    }

    /// Number of materialized nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand a node, materializing face nodes the first time a shell (or the
    /// part owning it) is expanded. Returns true if nodes were created.
    pub fn ensure_expanded(&mut self, assembly: &CadAssembly, id: TreeNodeId) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        node.expanded = true;

        let shell_node = match self.nodes[id.0].kind {
            NodeKind::Shell => Some(id),
            NodeKind::Part => self.nodes[id.0]
                .children
                .iter()
                .copied()
                .find(|&c| self.nodes[c.0].kind == NodeKind::Shell),
            _ => None,
        };

        match shell_node {
            Some(shell_node) => self.materialize_faces(assembly, shell_node),
            None => false,
        }
    }

    /// Expand every node, materializing all faces
    pub fn expand_all(&mut self, assembly: &CadAssembly) {
        let mut index = 0;
        while index < self.nodes.len() {
            match self.nodes[index].kind {
                NodeKind::Part | NodeKind::Shell => {
                    self.ensure_expanded(assembly, TreeNodeId(index));
                }
                _ => self.nodes[index].expanded = true,
            }
            index += 1;
        }
    }

    fn materialize_faces(&mut self, assembly: &CadAssembly, shell_node: TreeNodeId) -> bool {
        if !self.nodes[shell_node.0].children.is_empty() {
            return false;
        }
        let part = self.nodes[shell_node.0].tag.part;
        let Some(shell) = assembly.shell_of(part) else {
            return false;
        };

        for (face_index, face) in shell.faces.iter().enumerate() {
            let tag = PartTag::face(part, face_index);
            let face_node = self.push_child(shell_node, "Face", NodeKind::Face, tag);
            if face.edge_curves.is_empty() {
                continue;
            }

            let wire = self.push_child(face_node, "Wire", NodeKind::Wire, tag);
            for (i, curve) in face.edge_curves.iter().enumerate() {
                let tag = PartTag::edge(part, face_index, i * 2);
                let edge = self.push_child(wire, "Edge", NodeKind::Edge, tag);
                if let Some(curve) = curve {
                    self.push_child(edge, curve.kind.type_name(), NodeKind::Curve, tag);
                }
            }
        }

        tracing::debug!(
            "Expanded shell of part {} into {} faces",
            part,
            shell.faces.len()
        );
        true
    }

    fn push_child(
        &mut self,
        parent: TreeNodeId,
        label: &str,
        kind: NodeKind,
        tag: PartTag,
    ) -> TreeNodeId {
        self.push(
            Some(parent),
            TreeNode {
                label: label.to_string(),
                kind,
                tag,
                parent: Some(parent),
                children: Vec::new(),
                expanded: false,
            },
        )
    }

    /// Find the node of a part, or of one of its faces.
    ///
    /// The face is searched only below the part's node and only among
    /// materialized nodes; an unexpanded shell yields `None`.
    pub fn find(&self, part: PartId, face: Option<usize>) -> Option<TreeNodeId> {
        let part_node =
            self.find_in(&self.roots, &|n| n.kind == NodeKind::Part && n.tag.part == part)?;

        match face {
            None => Some(part_node),
            Some(face) => self.find_in(&self.nodes[part_node.0].children, &|n| {
                n.kind == NodeKind::Face && n.tag == PartTag::face(part, face)
            }),
        }
    }

    /// Depth-first search for the first node carrying `tag`
    pub fn find_tag(&self, tag: PartTag) -> Option<TreeNodeId> {
        self.find_in(&self.roots, &|n| n.tag == tag && n.kind != NodeKind::Curve)
    }

    fn find_in(
        &self,
        ids: &[TreeNodeId],
        predicate: &dyn Fn(&TreeNode) -> bool,
    ) -> Option<TreeNodeId> {
        for &id in ids {
            let node = &self.nodes[id.0];
            if predicate(node) {
                return Some(id);
            }
            if let Some(found) = self.find_in(&node.children, predicate) {
                return Some(found);
            }
        }
        None
    }

    /// Expand every ancestor of a node so it becomes visible
    pub fn expand_ancestors(&mut self, id: TreeNodeId) {
        let mut current = self.nodes.get(id.0).and_then(|n| n.parent);
        while let Some(parent) = current {
            let node = &mut self.nodes[parent.0];
            node.expanded = true;
            current = node.parent;
        }
    }

    pub fn select(&mut self, id: Option<TreeNodeId>) {
        self.selected = id.filter(|id| id.0 < self.nodes.len());
    }

    pub fn selected(&self) -> Option<TreeNodeId> {
        self.selected
    }

    pub fn selected_tag(&self) -> Option<PartTag> {
        self.selected.and_then(|id| self.node(id)).map(|n| n.tag)
    }

    /// Locate, expand to and select the node of a part or face.
    pub fn reveal(
        &mut self,
        assembly: &CadAssembly,
        part: PartId,
        face: Option<usize>,
    ) -> Option<TreeNodeId> {
        if face.is_some() {
            let part_node = self.find(part, None)?;
            self.ensure_expanded(assembly, part_node);
        }

        let found = self.find(part, face)?;
        self.expand_ancestors(found);
        self.select(Some(found));
        Some(found)
    }

    /// Curve shown by a curve node
    pub fn curve_of<'a>(&self, assembly: &'a CadAssembly, id: TreeNodeId) -> Option<&'a CadCurve> {
        let node = self.node(id).filter(|n| n.kind == NodeKind::Curve)?;
        let SubObject::Face {
            face,
            edge: Some(pair_index),
        } = node.tag.sub
        else {
            return None;
        };
        assembly
            .shell_of(node.tag.part)?
            .faces
            .get(face)?
            .edge_curves
            .get(pair_index / 2)?
            .as_ref()
    }

    /// Labels with indentation, visible (expanded) nodes only
    pub fn outline_text(&self) -> String {
        let mut text = String::new();
        for &root in &self.roots {
            self.write_outline(root, 0, &mut text);
        }
        text
    }

    fn write_outline(&self, id: TreeNodeId, depth: usize, text: &mut String) {
        let node = &self.nodes[id.0];
        text.push_str(&format!("{:indent$}{}\n", "", node.label, indent = depth * 2));
        if node.expanded {
            for &child in &node.children {
                self.write_outline(child, depth + 1, text);
            }
        }
    }
}

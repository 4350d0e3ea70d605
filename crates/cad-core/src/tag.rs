//! Selection tags attached to render primitives and tree nodes

use crate::model::PartId;

/// Which part of a [`CadPart`](crate::CadPart) a tag refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubObject {
    /// The whole part (including its subtree)
    #[default]
    None,
    /// The part's shell
    Shell,
    /// One face of the part's shell, optionally narrowed to one edge.
    ///
    /// `edge` is the even offset of the edge pair in the face's edge table.
    Face { face: usize, edge: Option<usize> },
}

/// Identifies a logical CAD element: a part plus an optional sub-object.
///
/// Every render primitive and every tree node carries one, so a pick result
/// maps back to the model without any search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartTag {
    pub part: PartId,
    pub sub: SubObject,
}

impl PartTag {
    pub fn part(part: PartId) -> Self {
        Self {
            part,
            sub: SubObject::None,
        }
    }

    pub fn shell(part: PartId) -> Self {
        Self {
            part,
            sub: SubObject::Shell,
        }
    }

    pub fn face(part: PartId, face: usize) -> Self {
        Self {
            part,
            sub: SubObject::Face { face, edge: None },
        }
    }

    pub fn edge(part: PartId, face: usize, pair_index: usize) -> Self {
        Self {
            part,
            sub: SubObject::Face {
                face,
                edge: Some(pair_index),
            },
        }
    }

    /// Face index for face and edge tags
    pub fn face_index(&self) -> Option<usize> {
        match self.sub {
            SubObject::Face { face, .. } => Some(face),
            SubObject::None | SubObject::Shell => None,
        }
    }

    /// The same face without the edge narrowing
    pub fn without_edge(self) -> Self {
        match self.sub {
            SubObject::Face { face, .. } => Self::face(self.part, face),
            _ => self,
        }
    }
}

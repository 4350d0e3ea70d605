//! Interaction layer for the CAD assembly viewer.
//!
//! - [`tree`] - part tree with lazily materialized face/edge/curve nodes
//! - [`highlight`] - hover/selection state machine, independent of any UI toolkit
//! - [`session`] - one loaded assembly and the display state derived from it

pub mod config;
pub mod highlight;
pub mod session;
pub mod tree;

pub use config::{ConfigError, InteractionConfig, ViewerConfig};
pub use highlight::{Effect, HighlightController, HighlightState, ViewerEvent};
pub use session::{Viewer, ViewerError};
pub use tree::{NodeKind, PartTree, TreeNode, TreeNodeId};

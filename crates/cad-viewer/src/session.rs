//! Viewer session
//!
//! Owns everything that belongs to one loaded assembly (scene primitives,
//! outline overlay, part tree, highlight controller) and applies controller
//! effects to them. All of it is replaced on load and dropped on clear.

use std::path::Path;

use cad_core::{
    CadAssembly, ImportError, PartTag, TransformCache, describe, describe_curve, load_assembly,
};
use cad_scene::{
    BuildError, BuildStats, FramingTarget, MaterialKind, Overlay, PrimitiveBuilder, Scene,
    selection_outline,
};

use crate::config::ViewerConfig;
use crate::highlight::{Effect, HighlightController, HighlightState, ViewerEvent};
use crate::tree::{NodeKind, PartTree, TreeNodeId};

/// Session errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ViewerError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Build failed: {0}")]
    Build(#[from] BuildError),
}

/// One viewer: the loaded assembly and its derived display state
pub struct Viewer {
    config: ViewerConfig,
    assembly: Option<CadAssembly>,
    transforms: TransformCache,
    scene: Scene,
    overlay: Overlay,
    tree: PartTree,
    controller: HighlightController,
    selection_actions: bool,
    info_text: Option<String>,
    camera_request: Option<FramingTarget>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let controller = HighlightController::new(&config.interaction);
        Self {
            config,
            assembly: None,
            transforms: TransformCache::default(),
            scene: Scene::new(),
            overlay: Overlay::new(),
            tree: PartTree::default(),
            controller,
            selection_actions: false,
            info_text: None,
            camera_request: None,
        }
    }

    /// Load an assembly document from disk.
    ///
    /// The previous assembly is discarded even when loading fails.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<BuildStats, ViewerError> {
        self.clear();
        let assembly = load_assembly(path)?;
        self.load(assembly)
    }

    /// Display an assembly, replacing whatever was loaded.
    ///
    /// On a build error nothing is displayed.
    pub fn load(&mut self, assembly: CadAssembly) -> Result<BuildStats, ViewerError> {
        self.clear();

        let builder = PrimitiveBuilder::new(&assembly, &self.config.build);
        #[cfg(feature = "parallel")]
        let output = builder.build_parallel()?;
        #[cfg(not(feature = "parallel"))]
        let output = builder.build()?;

        self.scene.replace(output.primitives);
        self.scene.set_edge_style(self.config.overlay.edge_style());
        self.transforms = TransformCache::new(&assembly);
        self.tree = PartTree::build(&assembly);
        self.camera_request = FramingTarget::fit(&self.scene.bounds());
        tracing::info!(
            "Loaded assembly {:?} ({} parts)",
            assembly.name.as_deref().unwrap_or(""),
            assembly.part_count()
        );
        self.assembly = Some(assembly);
        Ok(output.stats)
    }

    /// Drop the assembly and everything derived from it
    pub fn clear(&mut self) {
        self.assembly = None;
        self.transforms = TransformCache::default();
        self.scene.clear();
        self.overlay.clear();
        self.tree = PartTree::default();
        self.controller.reset();
        self.selection_actions = false;
        self.info_text = None;
        self.camera_request = None;
    }

    /// Feed one input event through the highlight controller
    pub fn handle(&mut self, event: ViewerEvent) {
        if self.assembly.is_none() {
            return;
        }
        for effect in self.controller.handle(event) {
            self.apply(effect);
        }
    }

    /// Select a node in the part tree (as if clicked in the tree)
    pub fn select_tree_node(&mut self, node: TreeNodeId) {
        let Some((tag, kind)) = self.tree.node(node).map(|n| (n.tag, n.kind)) else {
            return;
        };
        self.tree.select(Some(node));
        self.handle(ViewerEvent::TreeSelected { tag: Some(tag) });

        if kind == NodeKind::Curve
            && let Some(assembly) = &self.assembly
            && let Some(curve) = self.tree.curve_of(assembly, node)
        {
            self.info_text = Some(describe_curve(curve));
        }
    }

    /// Expand a tree node, materializing face nodes on first expansion
    pub fn expand_tree_node(&mut self, node: TreeNodeId) -> bool {
        match &self.assembly {
            Some(assembly) => self.tree.ensure_expanded(assembly, node),
            None => false,
        }
    }

    /// Switch edge and outline colors to the light theme
    pub fn apply_light_theme(&mut self) {
        self.config.apply_light_theme();
        self.scene.set_edge_style(self.config.overlay.edge_style());

        let selected = self
            .overlay
            .outline()
            .is_some_and(|o| o.material == MaterialKind::Selection);
        self.overlay.restyle(self.config.overlay.outline_style(selected));
    }

    /// Map a hit-tested primitive back to its element
    pub fn pick(&self, primitive_index: Option<usize>) -> Option<PartTag> {
        primitive_index.and_then(|i| self.scene.tag_of(i))
    }

    fn apply(&mut self, effect: Effect) {
        let Some(assembly) = &self.assembly else {
            return;
        };

        match effect {
            Effect::ShowOutline { tag, selected } => {
                let material = if selected {
                    MaterialKind::Selection
                } else {
                    MaterialKind::Highlight
                };
                let style = self.config.overlay.outline_style(selected);
                match selection_outline(assembly, &self.transforms, tag) {
                    Ok(points) if !points.is_empty() => {
                        self.overlay.show(tag, points, material, style)
                    }
                    Ok(_) => self.overlay.clear(),
                    Err(err) => {
                        tracing::warn!("Cannot outline {:?}: {}", tag, err);
                        self.overlay.clear();
                    }
                }
                self.info_text = describe(assembly, tag);
            }
            Effect::ClearOutline => {
                self.overlay.clear();
                self.info_text = None;
            }
            Effect::FocusTreeNode { part, face } => {
                if self.tree.reveal(assembly, part, face).is_none() {
                    tracing::debug!("No tree node for part {} face {:?}", part, face);
                }
            }
            Effect::ClearTreeSelection => self.tree.select(None),
            Effect::ZoomToSelection => {
                let Some(tag) = self.tree.selected_tag() else {
                    return;
                };
                match selection_outline(assembly, &self.transforms, tag) {
                    Ok(points) => {
                        if let Some(target) =
                            FramingTarget::for_points(&points, self.config.camera.fov_degrees)
                        {
                            self.camera_request = Some(target);
                        }
                    }
                    Err(err) => tracing::warn!("Cannot zoom to {:?}: {}", tag, err),
                }
            }
            Effect::FitAll => {
                let bounds = match assembly.bounds.filter(|b| b.is_valid()) {
                    Some(bounds) => bounds,
                    None => self.scene.bounds(),
                };
                self.camera_request = FramingTarget::fit(&bounds);
            }
            Effect::SetSelectionActions(enabled) => self.selection_actions = enabled,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn assembly(&self) -> Option<&CadAssembly> {
        self.assembly.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Scene access for the face/edge visibility toggles
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn tree(&self) -> &PartTree {
        &self.tree
    }

    pub fn state(&self) -> HighlightState {
        self.controller.state()
    }

    /// Whether deselect and zoom-to-object are available
    pub fn selection_actions_enabled(&self) -> bool {
        self.selection_actions
    }

    /// Description of the outlined element
    pub fn info_text(&self) -> Option<&str> {
        self.info_text.as_deref()
    }

    /// Latest camera framing request, left for the camera controller to pick up
    pub fn camera_request(&self) -> Option<FramingTarget> {
        self.camera_request
    }

    pub fn take_camera_request(&mut self) -> Option<FramingTarget> {
        self.camera_request.take()
    }
}

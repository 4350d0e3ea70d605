//! Highlight / selection state machine
//!
//! Hovering highlights a part (or, with the face modifier, a single face);
//! a click commits the highlight as the selection. The controller only
//! decides; it returns [`Effect`]s that the viewer session applies to the
//! overlay, the part tree and the camera.

use std::time::{Duration, Instant};

use cad_core::{PartId, PartTag, SubObject};

use crate::config::InteractionConfig;

/// Interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Idle,
    /// Transient hover outline
    Highlighted { part: PartId, face: Option<usize> },
    /// Committed selection
    Selected { tag: PartTag },
}

/// Input events, with hit-test results already resolved to tags
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    PointerMove {
        hit: Option<PartTag>,
        face_modifier: bool,
    },
    PointerUp {
        hit: Option<PartTag>,
        face_modifier: bool,
        at: Instant,
    },
    /// Explicit deselect gesture (Escape)
    Deselect { at: Instant },
    CameraDragStarted,
    CameraDragEnded,
    /// A node was selected in the part tree
    TreeSelected { tag: Option<PartTag> },
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Rebuild the overlay with the outline of `tag`
    ShowOutline { tag: PartTag, selected: bool },
    ClearOutline,
    /// Expand the tree to the node of a part or face and select it
    FocusTreeNode { part: PartId, face: Option<usize> },
    ClearTreeSelection,
    ZoomToSelection,
    FitAll,
    /// Enable or disable the deselect / zoom-to-object actions
    SetSelectionActions(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    None,
    Active,
    /// Drag end reported; the pointer-up that released it is still pending
    JustEnded,
}

/// Owns the [`HighlightState`] and the timing needed for double gestures
#[derive(Debug, Clone, Default)]
pub struct HighlightController {
    state: HighlightState,
    /// Last committed selection, restored when the hover highlight goes away
    committed: Option<PartTag>,
    last_pointer_up: Option<Instant>,
    last_deselect: Option<Instant>,
    drag: DragState,
    double_click: Duration,
    double_deselect: Duration,
}

impl HighlightController {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            double_click: config.double_click(),
            double_deselect: config.double_deselect(),
            ..Default::default()
        }
    }

    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Selection that stays in place underneath hover highlights
    pub fn committed(&self) -> Option<PartTag> {
        self.committed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::None
    }

    /// Forget everything (new assembly loaded)
    pub fn reset(&mut self) {
        *self = Self {
            double_click: self.double_click,
            double_deselect: self.double_deselect,
            ..Default::default()
        };
    }

    /// Apply one event and return the effects to perform, in order.
    pub fn handle(&mut self, event: ViewerEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            ViewerEvent::CameraDragStarted => self.drag = DragState::Active,
            ViewerEvent::CameraDragEnded => {
                if self.drag == DragState::Active {
                    self.drag = DragState::JustEnded;
                }
            }
            ViewerEvent::PointerMove { hit, face_modifier } => {
                if self.drag == DragState::None {
                    self.hover(hit, face_modifier, &mut effects);
                }
            }
            ViewerEvent::PointerUp {
                hit,
                face_modifier,
                at,
            } => {
                // The release of a camera drag, whether or not the drag end
                // was reported first
                if self.drag != DragState::None {
                    self.drag = DragState::None;
                    return effects;
                }
                self.pointer_up(hit, face_modifier, at, &mut effects);
            }
            ViewerEvent::Deselect { at } => self.deselect(at, &mut effects),
            ViewerEvent::TreeSelected { tag: Some(tag) } => {
                self.committed = Some(tag);
                self.state = HighlightState::Selected { tag };
                effects.push(Effect::ShowOutline {
                    tag,
                    selected: true,
                });
                effects.push(Effect::SetSelectionActions(true));
            }
            ViewerEvent::TreeSelected { tag: None } => {
                if self.committed.is_some() || self.state != HighlightState::Idle {
                    self.clear_selection(&mut effects);
                }
            }
        }

        if !effects.is_empty() {
            tracing::debug!("{:?} -> {:?}", event, self.state);
        }
        effects
    }

    fn hover(&mut self, hit: Option<PartTag>, face_modifier: bool, effects: &mut Vec<Effect>) {
        let target = match (hit, face_modifier) {
            (None, _) => None,
            (Some(tag), false) => Some((tag.part, None)),
            (Some(tag), true) => match tag.sub {
                SubObject::Face { face, .. } => Some((tag.part, Some(face))),
                SubObject::None | SubObject::Shell => None,
            },
        };

        match target {
            Some((part, face)) => self.highlight(part, face, effects),
            None => self.clear_highlight(effects),
        }
    }

    fn highlight(&mut self, part: PartId, face: Option<usize>, effects: &mut Vec<Effect>) {
        let tag = target_tag(part, face);
        match self.state {
            HighlightState::Highlighted {
                part: current_part,
                face: current_face,
            } if current_part == part && current_face == face => return,
            HighlightState::Selected { tag: selected } if selected == tag => return,
            _ => {}
        }

        self.state = HighlightState::Highlighted { part, face };
        effects.push(Effect::ShowOutline {
            tag,
            selected: false,
        });
    }

    /// Drop the hover outline, falling back to the committed selection
    fn clear_highlight(&mut self, effects: &mut Vec<Effect>) {
        if !matches!(self.state, HighlightState::Highlighted { .. }) {
            return;
        }

        match self.committed {
            Some(tag) => {
                self.state = HighlightState::Selected { tag };
                effects.push(Effect::ShowOutline {
                    tag,
                    selected: true,
                });
            }
            None => {
                self.state = HighlightState::Idle;
                effects.push(Effect::ClearOutline);
            }
        }
    }

    fn pointer_up(
        &mut self,
        hit: Option<PartTag>,
        face_modifier: bool,
        at: Instant,
        effects: &mut Vec<Effect>,
    ) {
        if let Some(last) = self.last_pointer_up
            && at.saturating_duration_since(last) < self.double_click
        {
            effects.push(Effect::ZoomToSelection);
            return;
        }
        self.last_pointer_up = Some(at);

        self.hover(hit, face_modifier, effects);

        match self.state {
            HighlightState::Highlighted { part, face } => {
                let tag = target_tag(part, face);
                self.state = HighlightState::Selected { tag };
                self.committed = Some(tag);
                effects.push(Effect::ShowOutline {
                    tag,
                    selected: true,
                });
                effects.push(Effect::FocusTreeNode { part, face });
                effects.push(Effect::SetSelectionActions(true));
            }
            // Click on the already selected element
            HighlightState::Selected { .. } if hit.is_some() => {}
            _ => self.clear_selection(effects),
        }
    }

    fn deselect(&mut self, at: Instant, effects: &mut Vec<Effect>) {
        if let Some(last) = self.last_deselect
            && at.saturating_duration_since(last) < self.double_deselect
        {
            self.last_deselect = None;
            effects.push(Effect::FitAll);
            return;
        }

        self.clear_selection(effects);
        self.last_deselect = Some(at);
    }

    fn clear_selection(&mut self, effects: &mut Vec<Effect>) {
        self.state = HighlightState::Idle;
        self.committed = None;
        effects.push(Effect::ClearOutline);
        effects.push(Effect::ClearTreeSelection);
        effects.push(Effect::SetSelectionActions(false));
    }
}

fn target_tag(part: PartId, face: Option<usize>) -> PartTag {
    match face {
        Some(face) => PartTag::face(part, face),
        None => PartTag::part(part),
    }
}

//! Render primitive generation and selection overlays for CAD assemblies.
//!
//! This crate turns a loaded [`cad_core::CadAssembly`] into tagged render
//! primitives and computes the world-space outlines used for highlighting and
//! camera framing. It stops at the renderer boundary: primitives are plain
//! data for a rendering backend to upload.

pub mod builder;
pub mod config;
pub mod outline;
pub mod primitive;
pub mod scene;

pub use builder::{BuildError, BuildOutput, BuildStats, PrimitiveBuilder, build};
pub use config::{BuildConfig, CameraConfig, LineStyle, OverlayConfig};
pub use outline::{FramingTarget, selection_outline};
pub use primitive::{MaterialKind, MeshPrimitive, PolylinePrimitive, RenderPrimitive};
pub use scene::{Overlay, Scene};

//! # Skinning Engine
//!
//! A real-time skeletal skinning subsystem built with Rust.
//!
//! ## Features
//!
//! - **Hardware skinning**: publishes per-frame bone counts and matrix
//!   references onto the target geometry for shader-side blending
//! - **Software skinning**: CPU-side weighted matrix blending (affine for
//!   positions, delta transform for normals) with per-frame re-upload
//! - **Scene integration**: typed attach/detach and frame-begin signals
//!   with explicit subscription handles
//! - **Deterministic time**: injected clock abstraction for testable
//!   animation clocks
//!
//! ## Architecture Design
//!
//! The skinning component consumes externally sampled bone matrices; it
//! does not model bone hierarchies or interpolate keyframes. Rendering
//! context creation and draw submission stay outside, behind the
//! [`render::RenderContext`] upload seam.
//!
//! ## Modules
//!
//! - [`core`]: Error types and clock abstraction
//! - [`config`]: TOML-backed skinning configuration
//! - [`render`]: Render context seam, vertex buffers and geometry
//! - [`scene`]: Node graph, surfaces, scene managers and event signals
//! - [`animation`]: Skin data, bone vertex buffer and the skinning component

/// Core functionality: errors and time sources
pub mod core;
/// Configuration system
pub mod config;
/// Render context, vertex buffers and geometry
pub mod render;
/// Scene graph and event signals
pub mod scene;
/// Skin data and the skinning component
pub mod animation;

pub use crate::animation::{Skin, SkinMethod, Skinning};
pub use crate::config::SkinningConfig;
pub use crate::core::{Clock, ManualClock, SkinningError, SkinningResult, SystemClock};
pub use crate::render::{Geometry, HeadlessContext, RenderContext, VertexBuffer};
pub use crate::scene::{NodeId, SceneGraph, Surface};

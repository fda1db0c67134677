//! # Graphics Module
//!
//! - **Camera** ([`camera`]) - free-flying perspective camera and its key
//!   bindings
//! - **Geometry** ([`geometry`]) - procedural meshes
//! - **Rendering** ([`rendering`]) - the [`Renderer`](rendering::Renderer)
//!   seam and its wgpu implementation
//! - **Resources** ([`resources`]) - shader programs, mesh buffers and
//!   other GPU objects
//! - **Scene** ([`scene`]) - meshes, model loading, light and the scene
//!   drawn each frame
//! - **Transform** ([`transform`]) - position, rotation and scale to a
//!   model matrix

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod transform;

pub use rendering::RenderEngine;
pub use transform::Transform;

//! # Scene Module
//!
//! CPU-side geometry, model loading, and the per-frame scene that ties a
//! shader program, a model, a camera and a light together.
//!
//! ## Key Components
//!
//! - [`Vertex3D`] - vertex layout shared by every mesh
//! - [`MeshData`] - a sub-mesh before upload
//! - [`ModelLoader`] - Wavefront OBJ import through `tobj`
//! - [`Model`] - uploaded meshes plus a transform
//! - [`Scene`] - what the frame loop draws

pub mod light;
pub mod loader;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::Light;
pub use loader::ModelLoader;
pub use mesh::MeshData;
pub use model::Model;
pub use scene::Scene;
pub use vertex::Vertex3D;

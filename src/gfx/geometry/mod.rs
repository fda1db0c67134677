//! # Procedural Geometry Generation
//!
//! Shapes generated in code instead of loaded from model files. The only
//! one needed so far is the UV sphere used for billiard balls.
//!
//! ```rust
//! use baize::gfx::geometry::generate_sphere;
//!
//! let ball = generate_sphere(0.028575, 36, 18);
//! assert_eq!(ball.vertex_count(), 37 * 19);
//! ```

pub mod primitives;

pub use primitives::*;

//! Object placement in world space
//!
//! A [`Transform`] keeps raw position, Euler rotation and scale, and caches
//! the model matrix built from them. Setters only touch the raw fields; the
//! matrix is rebuilt on [`Transform::update`], so a frame sees one
//! consistent matrix no matter how many setters ran before it.

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vector3<f32>,
    /// Euler angles in degrees, applied X then Y then Z.
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    model_matrix: Matrix4<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Create an identity transform
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            model_matrix: Matrix4::identity(),
        }
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    /// Set uniform scale
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// Set non-uniform scale
    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }

    /// Set Euler rotation in degrees
    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Rebuild the model matrix from the current fields.
    ///
    /// `_delta_time` is unused; it keeps the same update signature as the
    /// camera so the render loop can drive both the same way.
    pub fn update(&mut self, _delta_time: f32) {
        self.model_matrix = compose_trs(self.position, self.rotation, self.scale);
    }

    /// The matrix as of the last [`update`](Self::update).
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model_matrix
    }
}

/// `T * Rx * Ry * Rz * S`
fn compose_trs(
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    let t = Matrix4::from_translation(position);
    let rx = Matrix4::from_angle_x(Deg(rotation.x));
    let ry = Matrix4::from_angle_y(Deg(rotation.y));
    let rz = Matrix4::from_angle_z(Deg(rotation.z));
    let s = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    t * rx * ry * rz * s // Order matters
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform as _};

    fn assert_close(a: Point3<f32>, b: Point3<f32>) {
        assert!(
            (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5 && (a.z - b.z).abs() < 1e-5,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_default_matrix_is_identity() {
        let transform = Transform::new();
        assert_eq!(transform.model_matrix(), Matrix4::identity());
    }

    #[test]
    fn test_setters_do_not_recompute() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(1.0, 2.0, 3.0));
        transform.set_uniform_scale(4.0);
        transform.set_rotation(Vector3::new(0.0, 90.0, 0.0));

        assert_eq!(transform.model_matrix(), Matrix4::identity());
        assert_eq!(transform.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale(), Vector3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_update_composes_translate_rotate_scale() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(10.0, 0.0, 0.0));
        transform.set_rotation(Vector3::new(0.0, 0.0, 90.0));
        transform.set_scale(Vector3::new(2.0, 1.0, 1.0));
        transform.update(0.016);

        // Scale first (x doubled), then rotate 90 degrees about Z, then translate.
        let p = transform.model_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_close(p, Point3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let mut transform = Transform::new();
        transform.set_rotation(Vector3::new(90.0, 90.0, 0.0));
        transform.update(0.0);

        let expected = Matrix4::from_angle_x(Deg(90.0)) * Matrix4::from_angle_y(Deg(90.0));
        assert_eq!(transform.model_matrix(), expected);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut transform = Transform::new();
        transform.set_position(Vector3::new(-1.0, 0.5, 3.0));
        transform.update(0.0);
        let first = transform.model_matrix();
        transform.update(1.0);
        assert_eq!(first, transform.model_matrix());
    }
}

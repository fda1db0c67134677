use cgmath::{InnerSpace, Matrix4, Vector3};

/// Vectors shorter than this are treated as zero-length.
const DEGENERATE_LENGTH2: f32 = 1e-12;

/// Normalizes `v`, or returns `fallback` when `v` has (near) zero length.
pub fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    let length2 = v.magnitude2();
    if length2 > DEGENERATE_LENGTH2 && length2.is_finite() {
        v / length2.sqrt()
    } else {
        fallback
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees_range() {
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(0.0), 0.0);

        let tiny = wrap_degrees(-1e-6);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_normalize_or_falls_back_on_zero() {
        let fallback = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(normalize_or(Vector3::new(0.0, 0.0, 0.0), fallback), fallback);

        let n = normalize_or(Vector3::new(0.0, 3.0, 4.0), fallback);
        assert!((n.magnitude() - 1.0).abs() < 1e-6);
        assert!((n.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_array_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let a = convert_matrix4_to_array(m);
        assert_eq!(a[3], [1.0, 2.0, 3.0, 1.0]);
    }
}

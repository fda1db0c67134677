use cgmath::{InnerSpace, Vector3};

use super::vertex::Vertex3D;

/// CPU-side triangle mesh, ready to hand to a renderer for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex3D>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// Overwrites every vertex normal with the area-weighted average of the
    /// faces sharing it.
    pub fn recompute_normals(&mut self) {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.position).collect();
        let normals = smooth_normals(&positions, &self.indices);
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = normal;
        }
    }
}

/// Per-vertex normals averaged over adjacent faces.
///
/// Face normals are not normalized before accumulation, so larger faces
/// weigh more. Vertices that belong to no (non-degenerate) face get +Y.
/// Triangles referencing out-of-range vertices are skipped.
pub fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }

        let v0 = Vector3::from(positions[i0]);
        let v1 = Vector3::from(positions[i1]);
        let v2 = Vector3::from(positions[i2]);
        let face_normal = (v1 - v0).cross(v2 - v0);

        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .map(|sum| {
            if sum.magnitude2() > f32::EPSILON {
                sum.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_quad_normals_point_up() {
        // Counter-clockwise seen from +Y
        let positions = [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
        ];
        let indices = [0, 1, 2, 0, 2, 3];

        for normal in smooth_normals(&positions, &indices) {
            assert!((normal[1] - 1.0).abs() < 1e-6, "{:?}", normal);
        }
    }

    #[test]
    fn test_shared_vertex_is_averaged_and_unit() {
        // Two faces meeting at a right angle along the X axis
        let positions = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
        ];
        let indices = [0, 1, 2, 0, 1, 3];
        let normals = smooth_normals(&positions, &indices);

        let shared = Vector3::from(normals[0]);
        assert!((shared.magnitude() - 1.0).abs() < 1e-6);
        assert!(shared.y > 0.0 && shared.z > 0.0);
    }

    #[test]
    fn test_unreferenced_vertex_defaults_up() {
        let positions = [[0.0, 0.0, 0.0], [5.0, 5.0, 5.0]];
        let normals = smooth_normals(&positions, &[0, 0, 0, 0, 1, 7]);
        assert_eq!(normals[1], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_recompute_normals_and_counts() {
        let vertices = vec![
            Vertex3D::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]),
            Vertex3D::new([1.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]),
            Vertex3D::new([0.0, 1.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]),
        ];
        let mut mesh = MeshData::new("tri", vertices, vec![0, 1, 2]);
        mesh.recompute_normals();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }
}

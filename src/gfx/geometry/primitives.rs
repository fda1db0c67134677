//! # Primitive Shape Generation
//!
//! Generated shapes come with outward normals, UVs in `[0, 1]` and
//! counter-clockwise winding seen from outside.

use std::f32::consts::PI;

use crate::gfx::scene::{MeshData, Vertex3D};

pub const MIN_SECTORS: u32 = 3;
pub const MIN_STACKS: u32 = 2;

/// Generate a UV sphere centered at the origin.
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `sectors` - Number of longitude slices, at least 3
/// * `stacks` - Number of latitude bands, at least 2
///
/// Vertices run from the north pole (+Y) down, `sectors + 1` per ring so
/// the UV seam has its own column. The pole bands emit one triangle per
/// sector instead of a degenerate quad.
pub fn generate_sphere(radius: f32, sectors: u32, stacks: u32) -> MeshData {
    let sectors = sectors.max(MIN_SECTORS);
    let stacks = stacks.max(MIN_STACKS);

    let sector_step = 2.0 * PI / sectors as f32;
    let stack_step = PI / stacks as f32;

    let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        // pi/2 at the north pole to -pi/2 at the south pole
        let stack_angle = PI / 2.0 - i as f32 * stack_step;
        let (sin_stack, cos_stack) = stack_angle.sin_cos();

        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let (sin_sector, cos_sector) = sector_angle.sin_cos();

            let normal = [cos_stack * cos_sector, sin_stack, cos_stack * sin_sector];
            let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            let tex_coord = [j as f32 / sectors as f32, i as f32 / stacks as f32];
            vertices.push(Vertex3D::new(position, tex_coord, normal));
        }
    }

    let mut indices = Vec::with_capacity((sectors * (stacks - 1) * 6) as usize);
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1); // current ring
        let mut k2 = k1 + sectors + 1; // next ring down

        for _ in 0..sectors {
            if i != 0 {
                indices.extend_from_slice(&[k1, k1 + 1, k2]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[k1 + 1, k2 + 1, k2]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    MeshData::new("sphere", vertices, indices)
}

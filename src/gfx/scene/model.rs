use crate::gfx::transform::Transform;

/// One placeable object made of one or more uploaded meshes.
///
/// `M` is the renderer's mesh handle; the model owns every handle and
/// releases them together when dropped.
pub struct Model<M> {
    meshes: Vec<M>,
    pub transform: Transform,
}

impl<M> Model<M> {
    pub fn new(meshes: Vec<M>) -> Self {
        Self {
            meshes,
            transform: Transform::new(),
        }
    }

    pub fn meshes(&self) -> &[M] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn update(&mut self, delta_time: f32) {
        self.transform.update(delta_time);
    }
}

use cgmath::Vector3;

use crate::config::AppConfig;
use crate::error::InitError;
use crate::gfx::camera::Camera;
use crate::gfx::rendering::{DrawUniforms, Renderer, ScenePass};

use super::light::Light;
use super::loader::ModelLoader;
use super::model::Model;

/// Everything drawn each frame: the shader program, the model, the camera
/// looking at it and the light shining on it.
///
/// Field order is release order: the program goes before the meshes.
pub struct Scene<R: Renderer + ?Sized> {
    pub shader: R::Shader,
    pub model: Model<R::Mesh>,
    pub camera: Camera,
    pub light: Light,
}

impl<R: Renderer + ?Sized> Scene<R> {
    /// Loads and compiles the shader program, then loads and uploads the
    /// model. Anything acquired before a failure is released on return.
    pub fn load(
        renderer: &mut R,
        config: &AppConfig,
        viewport: (u32, u32),
    ) -> Result<Self, InitError> {
        let sources = config.shader.load()?;
        let shader = renderer.compile_shader(&sources)?;

        let mesh_data = ModelLoader::new().load_source(&config.model)?;
        let meshes = mesh_data
            .iter()
            .map(|mesh| renderer.upload_mesh(mesh))
            .collect::<Result<Vec<_>, _>>()?;
        let model = Model::new(meshes);

        let mut camera = Camera::new(
            viewport.0 as f32,
            viewport.1 as f32,
            config.camera.near,
            config.camera.far,
        );
        camera.set_position(Vector3::from(config.camera.position));

        log::info!(
            "Scene ready: {} mesh(es), camera at {:?}",
            model.mesh_count(),
            config.camera.position
        );

        Ok(Self {
            shader,
            model,
            camera,
            light: config.light,
        })
    }

    pub fn update(&mut self, delta_time: f32) {
        self.model.update(delta_time);
        self.camera.update(delta_time);
    }

    /// One draw call per mesh, each carrying the full set of uniforms.
    pub fn scene_pass(&self, clear_color: [f32; 4]) -> ScenePass<'_, R> {
        let uniforms = DrawUniforms::new(
            &self.camera,
            self.model.transform.model_matrix(),
            &self.light,
        );

        let mut pass = ScenePass::new(clear_color);
        for mesh in self.model.meshes() {
            pass.push(&self.shader, mesh, uniforms);
        }
        pass
    }
}

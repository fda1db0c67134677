use std::io::BufRead;
use std::path::Path;

use crate::error::ModelError;
use crate::gfx::geometry::generate_sphere;

use super::mesh::MeshData;
use super::vertex::Vertex3D;
use crate::config::ModelSource;

/// Turns Wavefront OBJ files into [`MeshData`], one per sub-mesh.
///
/// Faces are triangulated and positions, UVs and normals share a single
/// index. Material libraries are never read.
pub struct ModelLoader {
    options: tobj::LoadOptions,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLoader {
    pub fn new() -> Self {
        Self {
            options: tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        }
    }

    /// Produces the meshes for any configured model source.
    pub fn load_source(&self, source: &ModelSource) -> Result<Vec<MeshData>, ModelError> {
        match source {
            ModelSource::File(path) => self.load(path),
            ModelSource::Sphere {
                radius,
                sectors,
                stacks,
            } => Ok(vec![generate_sphere(*radius, *sectors, *stacks)]),
        }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<MeshData>, ModelError> {
        log::info!("Loading model {}", path.display());
        let (models, _materials) =
            tobj::load_obj(path, &self.options).map_err(|source| ModelError::Import {
                path: path.to_path_buf(),
                source,
            })?;
        self.convert(path, models)
    }

    /// Parses OBJ text from `reader`. `path` is only used for naming and
    /// error reporting.
    pub fn load_from_reader(
        &self,
        reader: &mut impl BufRead,
        path: &Path,
    ) -> Result<Vec<MeshData>, ModelError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &self.options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|source| ModelError::Import {
            path: path.to_path_buf(),
            source,
        })?;
        self.convert(path, models)
    }

    fn convert(&self, path: &Path, models: Vec<tobj::Model>) -> Result<Vec<MeshData>, ModelError> {
        let meshes: Vec<MeshData> = models
            .into_iter()
            .filter_map(|model| {
                let mesh = convert_mesh(model);
                if mesh.is_empty() {
                    log::debug!("Skipping empty sub-mesh '{}'", mesh.name);
                    None
                } else {
                    Some(mesh)
                }
            })
            .collect();

        if meshes.is_empty() {
            return Err(ModelError::Empty {
                path: path.to_path_buf(),
            });
        }

        log::info!(
            "Loaded {} mesh(es), {} triangles from {}",
            meshes.len(),
            meshes.iter().map(MeshData::triangle_count).sum::<usize>(),
            path.display()
        );
        Ok(meshes)
    }
}

fn convert_mesh(model: tobj::Model) -> MeshData {
    let tobj::Model { mesh, name } = model;
    let vertex_count = mesh.positions.len() / 3;

    let has_normals = mesh.normals.len() == mesh.positions.len();
    let has_tex_coords = mesh.texcoords.len() == vertex_count * 2;

    let vertices = (0..vertex_count)
        .map(|i| {
            let position = [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ];
            let tex_coord = if has_tex_coords {
                [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            let normal = if has_normals {
                [
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                ]
            } else {
                [0.0, 0.0, 0.0]
            };
            Vertex3D::new(position, tex_coord, normal)
        })
        .collect();

    let mut data = MeshData::new(name, vertices, mesh.indices);
    if !has_normals && !data.is_empty() {
        log::debug!("Mesh '{}' has no normals, computing smooth normals", data.name);
        data.recompute_normals();
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn load_str(source: &str) -> Result<Vec<MeshData>, ModelError> {
        ModelLoader::new().load_from_reader(&mut Cursor::new(source), Path::new("test.obj"))
    }

    #[test]
    fn test_quad_is_triangulated_with_computed_normals() {
        let obj = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let meshes = load_str(obj).unwrap();
        assert_eq!(meshes.len(), 1);

        let mesh = &meshes[0];
        assert_eq!(mesh.name, "quad");
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.tex_coord, [0.0, 0.0]);
            assert!((vertex.normal[2] - 1.0).abs() < 1e-6, "{:?}", vertex.normal);
        }
    }

    #[test]
    fn test_file_normals_and_uvs_are_kept() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 0 -1
vt 0.25 0.5
vt 1 0
vt 0 1
vn 0 1 0
f 1/1/1 2/2/1 3/3/1
";
        let meshes = load_str(obj).unwrap();
        let mesh = &meshes[0];
        assert_eq!(mesh.vertices[0].tex_coord, [0.25, 0.5]);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_sub_meshes_are_split() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
o first
f 1 2 3
o second
f 1 3 4
";
        let meshes = load_str(obj).unwrap();
        let names: Vec<&str> = meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let err = load_str("# nothing here\n").unwrap_err();
        assert!(matches!(err, ModelError::Empty { ref path } if path == Path::new("test.obj")));
    }

    #[test]
    fn test_missing_file_is_an_import_error() {
        let path = PathBuf::from("does/not/exist.obj");
        let err = ModelLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Import { .. }));
    }

    #[test]
    fn test_sphere_source_needs_no_file() {
        let source = ModelSource::Sphere {
            radius: 0.5,
            sectors: 8,
            stacks: 4,
        };
        let meshes = ModelLoader::new().load_source(&source).unwrap();
        assert_eq!(meshes.len(), 1);
        assert!(!meshes[0].is_empty());
    }
}

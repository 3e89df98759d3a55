use std::{io, path::Path};

use anyhow::{anyhow, bail, Context};
use glam::Vec3;
use obj::{Group, IndexTuple, Obj, ObjData, Object, SimplePolygon};

/// Flat triangle soup: one position per vertex, and three indices per face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub verts: Box<[Vec3]>,
    pub indices: Box<[u32]>,
}

impl TriMesh {
    pub fn new(verts: impl Into<Box<[Vec3]>>, indices: impl Into<Box<[u32]>>) -> Self {
        Self {
            verts: verts.into(),
            indices: indices.into(),
        }
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }

    /// Load a mesh, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let mesh = match ext.as_deref() {
            Some("obj") => Self::from_obj(path)?,
            Some("gltf") | Some("glb") => Self::from_gltf(path)?,
            _ => bail!("Unsupported mesh format {:?}", path),
        };

        log::info!(
            "Loaded {:?} with {} verts and {} faces",
            path,
            mesh.vert_count(),
            mesh.face_count()
        );

        Ok(mesh)
    }

    pub fn from_gltf(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let (doc, buffers, _) =
            gltf::import(path).with_context(|| format!("Failed to import {:?}", path))?;

        let mesh = doc.meshes().next().context("GLTF contains no meshes")?;
        let p = mesh
            .primitives()
            .next()
            .context("GLTF mesh contains no primitives")?;

        let reader = p.reader(|buffer| Some(&buffers[buffer.index()]));

        let verts: Box<[Vec3]> = reader
            .read_positions()
            .context("GLTF primitive has no positions")?
            .map(Vec3::from)
            .collect();

        let indices: Box<[u32]> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // Non-indexed primitives are plain triangle lists
            None => (0..verts.len() as u32).collect(),
        };

        Ok(TriMesh { verts, indices })
    }

    pub fn from_obj(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let obj = Obj::load(path).map_err(|e| anyhow!("Failed to load {:?}: {:?}", path, e))?;

        Ok(Self::from_obj_data(&obj.data))
    }

    pub fn from_obj_buf(input: impl io::Read) -> anyhow::Result<Self> {
        let data = ObjData::load_buf(input).map_err(|e| anyhow!("Failed to parse obj: {:?}", e))?;

        Ok(Self::from_obj_data(&data))
    }

    /// Collect every polygon of every group, fan triangulating anything larger than a triangle.
    pub fn from_obj_data(data: &ObjData) -> Self {
        let mut indices = Vec::new();
        let mut skipped = 0;

        for poly in data
            .objects
            .iter()
            .flat_map(|o| o.groups.iter())
            .flat_map(|g| g.polys.iter())
        {
            let corners = &poly.0;

            if corners.len() < 3 {
                skipped += 1;
                continue;
            }

            let root = corners[0].0 as u32;
            for w in corners[1..].windows(2) {
                indices.extend_from_slice(&[root, w[0].0 as u32, w[1].0 as u32]);
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} polygons with fewer than 3 corners");
        }

        TriMesh {
            verts: data.position.iter().copied().map(Vec3::from).collect(),
            indices: indices.into(),
        }
    }

    pub fn to_obj_data(&self, name: &str) -> ObjData {
        let mut obj = ObjData::default();

        obj.position = self.verts.iter().map(|v| v.to_array()).collect();

        let mut group = Group::new("0".to_string());

        for t in self.indices.chunks_exact(3) {
            group.polys.push(SimplePolygon(
                [
                    IndexTuple(t[0] as _, None, None),
                    IndexTuple(t[1] as _, None, None),
                    IndexTuple(t[2] as _, None, None),
                ]
                .to_vec(),
            ))
        }

        let mut object = Object::new(name.to_owned());

        object.groups.push(group);

        obj.objects.push(object);

        obj
    }

    pub fn save_obj(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");

        self.to_obj_data(name)
            .save(path)
            .map_err(|e| anyhow!("Failed to save {:?}: {:?}", path, e))
    }
}

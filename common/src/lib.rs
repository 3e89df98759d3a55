mod primitives;
mod tri_mesh;

pub use tri_mesh::TriMesh;

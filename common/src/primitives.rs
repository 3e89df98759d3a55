use glam::Vec3;

use crate::TriMesh;

impl TriMesh {
    /// Unit cube spanning `[0, 1]^3`, two outward facing triangles per side.
    pub fn cube() -> Self {
        let verts = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
        .map(Vec3::from);

        #[rustfmt::skip]
        let indices: [u32; 36] = [
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            1, 2, 6, 1, 6, 5, // +x
            2, 3, 7, 2, 7, 6, // +y
            3, 0, 4, 3, 4, 7, // -x
        ];

        TriMesh::new(verts.to_vec(), indices.to_vec())
    }

    /// Flat `n` x `n` quad grid in the XZ plane, with a small height field so not every plane is identical.
    pub fn grid(n: u32) -> Self {
        let n = n.max(1);
        let row = n + 1;

        let mut verts = Vec::with_capacity((row * row) as usize);
        for z in 0..row {
            for x in 0..row {
                let (fx, fz) = (x as f32 / n as f32, z as f32 / n as f32);
                let y = 0.1 * (fx * 6.0).sin() * (fz * 4.0).cos();
                verts.push(Vec3::new(fx, y, fz));
            }
        }

        let mut indices = Vec::with_capacity((n * n * 6) as usize);
        for z in 0..n {
            for x in 0..n {
                let a = z * row + x;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        TriMesh::new(verts, indices)
    }
}

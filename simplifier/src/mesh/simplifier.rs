use std::{collections::HashSet, mem};

use common::TriMesh;
use glam::Vec3;

use super::{
    pair::{collect_pairs, PairID, Placement, VertexPair},
    pair_queue::PairQueue,
    plane::Plane,
    quadric::Quadric,
    vertex::VertID,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimplifyError {
    #[error("Index {index} at position {position} is out of range for {vertex_count} vertices")]
    InvalidIndex {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Index list of length {len} does not describe whole triangles")]
    IncompleteTriangle { len: usize },
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct SimplifyConfig {
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Face count is at or below the target.
    Done,
    /// Ran out of pairs to contract before reaching the target.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyReport {
    pub outcome: RunOutcome,
    /// Face count after the run.
    pub face_count: usize,
    pub contractions: usize,
    /// Sum of the costs of every contraction performed.
    pub introduced_error: f64,
}

/// Greedy quadric error edge contraction over a flat triangle list.
///
/// Faces are found by scanning the index list, there is no adjacency structure to keep in sync.
/// Vertices are never removed, only left unreferenced by `indices` once merged away.
#[derive(Clone)]
pub struct MeshSimplifier {
    config: SimplifyConfig,
    verts: Vec<Vec3>,
    indices: Vec<u32>,
    quadrics: Vec<Quadric>,
    pairs: Vec<VertexPair>,
    queue: PairQueue,
}

/// Check every index of `indices` refers to a vertex, and that it is made of whole triangles.
pub fn validate(vertex_count: usize, indices: &[u32]) -> Result<(), SimplifyError> {
    if indices.len() % 3 != 0 {
        return Err(SimplifyError::IncompleteTriangle { len: indices.len() });
    }

    match indices
        .iter()
        .position(|&i| i as usize >= vertex_count)
    {
        Some(position) => Err(SimplifyError::InvalidIndex {
            position,
            index: indices[position],
            vertex_count,
        }),
        None => Ok(()),
    }
}

fn triangle_plane(verts: &[Vec3], tri: &[u32]) -> Option<Plane> {
    Plane::from_three_points(
        verts[tri[0] as usize].as_dvec3(),
        verts[tri[1] as usize].as_dvec3(),
        verts[tri[2] as usize].as_dvec3(),
    )
}

/// Generate error matrix Q for `vert`, the sum of Kp for all planes p of triangles around it.
/// Triangles without a normal contribute nothing.
pub fn vertex_quadric(vert: VertID, verts: &[Vec3], indices: &[u32]) -> Quadric {
    let mut q = Quadric::IDENTITY;

    for tri in indices.chunks_exact(3) {
        if !tri.contains(&vert.0) {
            continue;
        }
        if let Some(plane) = triangle_plane(verts, tri) {
            q += plane.fundamental_error_quadric();
        }
    }

    q
}

/// [vertex_quadric] for every vertex at once, in a single pass over the triangles.
pub fn build_quadrics(verts: &[Vec3], indices: &[u32]) -> Vec<Quadric> {
    let mut quadrics = vec![Quadric::IDENTITY; verts.len()];

    for tri in indices.chunks_exact(3) {
        let Some(plane) = triangle_plane(verts, tri) else {
            continue;
        };
        let kp = plane.fundamental_error_quadric();

        for (i, &v) in tri.iter().enumerate() {
            // A triangle only counts once per vertex
            if !tri[..i].contains(&v) {
                quadrics[v as usize] += kp;
            }
        }
    }

    quadrics
}

impl MeshSimplifier {
    pub fn new(
        verts: impl Into<Vec<Vec3>>,
        indices: impl Into<Vec<u32>>,
    ) -> Result<Self, SimplifyError> {
        Self::with_config(verts, indices, SimplifyConfig::default())
    }

    pub fn with_config(
        verts: impl Into<Vec<Vec3>>,
        indices: impl Into<Vec<u32>>,
        config: SimplifyConfig,
    ) -> Result<Self, SimplifyError> {
        let mut simplifier = MeshSimplifier {
            config,
            verts: Vec::new(),
            indices: Vec::new(),
            quadrics: Vec::new(),
            pairs: Vec::new(),
            queue: PairQueue::default(),
        };

        simplifier.reload(verts, indices)?;

        Ok(simplifier)
    }

    pub fn from_tri_mesh(mesh: &TriMesh, config: SimplifyConfig) -> Result<Self, SimplifyError> {
        Self::with_config(&mesh.verts[..], &mesh.indices[..], config)
    }

    /// Replace the mesh and rebuild all derived state. On error, the current mesh is kept.
    pub fn reload(
        &mut self,
        verts: impl Into<Vec<Vec3>>,
        indices: impl Into<Vec<u32>>,
    ) -> Result<(), SimplifyError> {
        let verts = verts.into();
        let indices = indices.into();

        validate(verts.len(), &indices)?;

        self.verts = verts;
        self.indices = indices;

        self.quadrics = build_quadrics(&self.verts, &self.indices);

        self.pairs = collect_pairs(&self.indices);
        for pair in &mut self.pairs {
            pair.evaluate(&self.verts, &self.quadrics, self.config.placement);
        }

        self.queue.rebuild(&self.pairs);

        log::debug!(
            "Loaded {} verts, {} faces, {} candidate pairs",
            self.vertex_count(),
            self.face_count(),
            self.pairs.len()
        );

        Ok(())
    }

    /// Contract pairs in order of increasing cost until at most `target_face_count` faces remain.
    pub fn run(&mut self, target_face_count: usize) -> SimplifyReport {
        let start_faces = self.face_count();
        let mut contractions = 0;
        let mut introduced_error = 0.0;

        while self.face_count() > target_face_count {
            let Some((pid, cost)) = self.queue.pop_min() else {
                log::warn!(
                    "Ran out of pairs at {} faces, short of target {target_face_count}",
                    self.face_count()
                );

                return SimplifyReport {
                    outcome: RunOutcome::Exhausted,
                    face_count: self.face_count(),
                    contractions,
                    introduced_error,
                };
            };

            self.contract(pid);

            contractions += 1;
            introduced_error += cost;
        }

        if contractions > 0 {
            log::info!(
                "Simplified {start_faces} -> {} faces with {contractions} contractions. Introduced error of {introduced_error}",
                self.face_count()
            );
        }

        SimplifyReport {
            outcome: RunOutcome::Done,
            face_count: self.face_count(),
            contractions,
            introduced_error,
        }
    }

    /// Merge `second` of the pair into `first`, then repair triangles, pairs and the queue.
    fn contract(&mut self, pid: PairID) {
        let pair = self.pairs.remove(pid.0);
        let (keep, drop) = (pair.first, pair.second);

        self.quadrics[keep.id()] = pair.quadric;
        self.verts[keep.id()] = pair.target.as_vec3();

        // Triangles holding both ends collapse to a line
        let mut collapsed = Vec::new();
        let mut indices = Vec::with_capacity(self.indices.len());

        for tri in self.indices.chunks_exact(3) {
            if tri.contains(&keep.0) && tri.contains(&drop.0) {
                collapsed.push([tri[0], tri[1], tri[2]]);
            } else {
                indices.extend(tri.iter().map(|&i| if i == drop.0 { keep.0 } else { i }));
            }
        }

        log::trace!(
            "Contracted {drop} into {keep} at {}, cost {}, removing {} faces",
            pair.target,
            pair.cost,
            collapsed.len()
        );

        self.indices = indices;

        let placement = self.config.placement;
        let verts = &self.verts;
        let quadrics = &self.quadrics;
        let mut seen = HashSet::with_capacity(self.pairs.len());

        let pairs: Vec<_> = mem::take(&mut self.pairs)
            .into_iter()
            // Edges of a collapsed triangle away from `keep` now duplicate one of its edges
            .filter(|p| p.contains(keep) || !collapsed.iter().any(|tri| p.within(tri)))
            .filter_map(|mut p| {
                if !p.replace(drop, keep) || !seen.insert(p.key()) {
                    return None;
                }
                if p.contains(keep) {
                    p.evaluate(verts, quadrics, placement);
                }
                Some(p)
            })
            .collect();

        self.pairs = pairs;
        self.queue.rebuild(&self.pairs);

        #[cfg(feature = "debug")]
        self.assert_valid();
    }

    /// Panic if the index list, pair set or queue have drifted out of step.
    #[cfg(any(test, feature = "debug"))]
    pub fn assert_valid(&self) {
        assert_eq!(self.indices.len() % 3, 0);
        assert!(self.indices.iter().all(|&i| (i as usize) < self.verts.len()));
        assert_eq!(self.quadrics.len(), self.verts.len());
        assert_eq!(self.queue.len(), self.pairs.len());

        let mut keys = HashSet::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            assert_ne!(pair.first, pair.second, "Pair collapsed to a single vertex");
            assert!(keys.insert(pair.key()), "Duplicate pair {:?}", pair.key());
        }
    }

    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.verts
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Owned copies of the current vertex and index arrays.
    pub fn snapshot(&self) -> (Vec<Vec3>, Vec<u32>) {
        (self.verts.clone(), self.indices.clone())
    }

    pub fn to_tri_mesh(&self) -> TriMesh {
        TriMesh::new(self.verts.clone(), self.indices.clone())
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn quadric(&self, vert: VertID) -> &Quadric {
        &self.quadrics[vert.id()]
    }

    pub fn quadrics(&self) -> &[Quadric] {
        &self.quadrics
    }

    /// Every remaining candidate pair with its cached cost, in pair set order.
    pub fn pair_costs(&self) -> impl Iterator<Item = (VertID, VertID, f64)> + '_ {
        self.pairs.iter().map(|p| (p.first, p.second, p.cost))
    }

    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn log_pairs(&self) {
        for (i, (a, b, cost)) in self.pair_costs().enumerate() {
            log::debug!("Pair {i}: ({a}, {b}) cost {cost}");
        }
    }

    pub fn log_faces(&self) {
        for (i, [a, b, c]) in self.faces().enumerate() {
            log::debug!("Face {i}: {a} {b} {c}");
        }
    }
}

use std::collections::HashSet;

use glam::DVec3;

use super::{quadric::Quadric, vertex::VertID};

/// Where a contracted pair places its surviving vertex.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Midpoint of the two endpoints.
    #[default]
    Midpoint,
    /// Minimiser of the combined quadric, falling back to the midpoint when it is singular.
    Optimal,
}

/// Index of a pair inside the current pair set.
#[derive(Default, Hash, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PairID(pub usize);

/// Unordered candidate for contraction. `first` survives the contraction, `second` is merged into it.
#[derive(Debug, Clone, Copy)]
pub struct VertexPair {
    pub first: VertID,
    pub second: VertID,
    pub quadric: Quadric,
    pub target: DVec3,
    pub cost: f64,
}

impl PartialEq for VertexPair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for VertexPair {}

impl VertexPair {
    /// Pair with no cost yet evaluated.
    pub fn new(first: VertID, second: VertID) -> Self {
        debug_assert_ne!(first, second, "Pair bridges a single vertex");

        VertexPair {
            first,
            second,
            quadric: Quadric::ZERO,
            target: DVec3::ZERO,
            cost: 0.0,
        }
    }

    /// Order independent identity of the pair.
    pub fn key(&self) -> [VertID; 2] {
        [self.first.min(self.second), self.first.max(self.second)]
    }

    pub fn contains(&self, v: VertID) -> bool {
        self.first == v || self.second == v
    }

    /// Both endpoints lie in the triangle `tri`.
    pub fn within(&self, tri: &[u32]) -> bool {
        tri.contains(&self.first.0) && tri.contains(&self.second.0)
    }

    /// Refresh combined quadric, target and cost from the current endpoint state.
    pub fn evaluate(&mut self, verts: &[glam::Vec3], quadrics: &[Quadric], placement: Placement) {
        let q = &quadrics[self.first.id()] + &quadrics[self.second.id()];

        let a = verts[self.first.id()].as_dvec3();
        let b = verts[self.second.id()].as_dvec3();
        let midpoint = (a + b) / 2.0;

        let target = match placement {
            Placement::Midpoint => midpoint,
            Placement::Optimal => q.optimal_point().unwrap_or(midpoint),
        };

        self.quadric = q;
        self.target = target;
        self.cost = q.quadric_error(target);
    }

    /// Rename `from` to `to`. Returns `false` if the pair collapsed into a single vertex.
    pub fn replace(&mut self, from: VertID, to: VertID) -> bool {
        if self.first == from {
            self.first = to;
        }
        if self.second == from {
            self.second = to;
        }
        self.first != self.second
    }
}

/// Every distinct edge of the triangle list, in first seen order and orientation.
pub fn collect_pairs(indices: &[u32]) -> Vec<VertexPair> {
    let mut seen = HashSet::with_capacity(indices.len());
    let mut pairs = Vec::with_capacity(indices.len() / 2);

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(VertID);

        for (x, y) in [(a, b), (b, c), (c, a)] {
            if x == y {
                continue;
            }

            let pair = VertexPair::new(x, y);
            if seen.insert(pair.key()) {
                pairs.push(pair);
            }
        }
    }

    pairs
}

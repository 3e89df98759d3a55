use glam::{DVec3, DVec4};

use super::quadric::Quadric;

/// Plane `ax + by + cz + d = 0`, with `(a, b, c)` of unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane(pub DVec4);

impl Plane {
    /// Plane through a triangle, or `None` if the triangle has no area and so no normal.
    pub fn from_three_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let ab = b - a;
        let ac = c - a;

        let normal = ab.cross(ac).try_normalize()?;

        Some(Self::from_normal_and_point(normal, a))
    }

    pub fn from_normal_and_point(norm: DVec3, p: DVec3) -> Self {
        let d = -p.dot(norm);

        Plane(norm.extend(d))
    }

    /// The fundamental error quadric `K_p`, such that `v^T K_p v` = `sqr distance v <-> p`
    /// Properties: Additive, Symmetric.
    pub fn fundamental_error_quadric(self) -> Quadric {
        let p = self.0;
        let (a, b, c, d) = p.into();

        // Do `p p^T`
        Quadric(glam::DMat4::from_cols(a * p, b * p, c * p, d * p))
    }

    pub fn normal(&self) -> DVec3 {
        self.0.truncate()
    }

    pub fn signed_distance(&self, point: DVec3) -> f64 {
        point.dot(self.normal()) + self.0.w
    }
}

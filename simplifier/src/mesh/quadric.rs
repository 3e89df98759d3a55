use std::ops;

use glam::{DMat3, DMat4, DVec3};

/// Below this, the positional block of a quadric is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-10;

/// Quadric type. Internally a DMat4.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Quadric(pub DMat4);

impl ops::Add for &Quadric {
    type Output = Quadric;

    fn add(self, rhs: Self) -> Self::Output {
        Quadric(self.0 + rhs.0)
    }
}

impl ops::Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Self) -> Self::Output {
        Quadric(self.0 + rhs.0)
    }
}

impl ops::Mul<f64> for Quadric {
    type Output = Quadric;

    fn mul(self, rhs: f64) -> Self::Output {
        Quadric(self.0 * rhs)
    }
}

impl ops::AddAssign<Self> for Quadric {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Quadric {
    /// Starting accumulator for every vertex, before any planes are added.
    pub const IDENTITY: Quadric = Quadric(DMat4::IDENTITY);

    pub const ZERO: Quadric = Quadric(DMat4::ZERO);

    /// Calculate error from Q and vertex, `v^T K_p v`
    pub fn quadric_error(&self, v: DVec3) -> f64 {
        let v = v.extend(1.0);
        v.dot(self.0 * v)
    }

    pub fn is_symmetric(&self, epsilon: f64) -> bool {
        let cols = self.0.to_cols_array_2d();

        (0..4).all(|i| (0..4).all(|j| (cols[i][j] - cols[j][i]).abs() <= epsilon))
    }

    /// Point minimising `v^T Q v`, found by solving `A v = -b` where `A` is the upper-left 3x3 block.
    /// `None` when that block is singular.
    pub fn optimal_point(&self) -> Option<DVec3> {
        let a = DMat3::from_mat4(self.0);
        let det = a.determinant();

        if det.abs() < SINGULAR_EPSILON {
            return None;
        }

        let b = self.0.w_axis.truncate();
        let v = a.inverse() * -b;

        v.is_finite().then_some(v)
    }
}

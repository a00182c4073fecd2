// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Quat, Vec3};

/// Row‑major 3×3 matrix, used here for mesh orientations.
///
/// Rotations are orthonormal, so [`Mat3::transpose`] doubles as the inverse
/// when moving a vector from the world frame into a mesh's local frame.
///
/// # Examples
/// ```
/// use core::f64::consts::FRAC_PI_2;
/// use haptic_core::math::{Mat3, Vec3};
/// let r = Mat3::rotation_z(FRAC_PI_2);
/// let v = r.transform(&Vec3::UNIT_X);
/// assert!((v.y() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3 {
    rows: [[f64; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0], // row 0
                [0.0, 1.0, 0.0], // row 1
                [0.0, 0.0, 1.0], // row 2
            ],
        }
    }

    /// Creates a matrix from row-major data.
    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Builds a matrix whose columns are `c0`, `c1` and `c2`.
    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::new([
            [c0.x(), c1.x(), c2.x()],
            [c0.y(), c1.y(), c2.y()],
            [c0.z(), c1.z(), c2.z()],
        ])
    }

    /// Returns the matrix as row-major data.
    pub fn to_rows(self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// Returns column `idx` as a vector.
    pub fn column(&self, idx: usize) -> Vec3 {
        let c = idx.min(2);
        Vec3::new(self.rows[0][c], self.rows[1][c], self.rows[2][c])
    }

    /// Builds a rotation matrix around the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            [1.0, 0.0, 0.0],
            [0.0, c, -s],
            [0.0, s, c],
        ])
    }

    /// Builds a rotation matrix around the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            [c, 0.0, s],
            [0.0, 1.0, 0.0],
            [-s, 0.0, c],
        ])
    }

    /// Builds a rotation matrix around the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            [c, -s, 0.0],
            [s, c, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Builds a rotation matrix from an axis and angle in radians.
    ///
    /// A zero-length axis yields the identity rotation.
    pub fn rotation_axis_angle(axis: Vec3, angle: f64) -> Self {
        Quat::from_axis_angle(axis, angle).to_mat3()
    }

    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        let r = &self.rows;
        Self::new([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }

    /// Multiplies the matrix with another matrix (`self * rhs`).
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[row][k] * rhs.rows[k][col]).sum();
            }
        }
        Self::new(out)
    }

    /// Applies the matrix to a vector (`self * v`).
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * v.x() + r[0][1] * v.y() + r[0][2] * v.z(),
            r[1][0] * v.x() + r[1][1] * v.y() + r[1][2] * v.z(),
            r[2][0] * v.x() + r[2][1] * v.y() + r[2][2] * v.z(),
        )
    }

    /// Applies the transposed matrix to a vector (`selfᵀ * v`).
    ///
    /// For rotations this is the inverse transform.
    pub fn transform_transposed(&self, v: &Vec3) -> Vec3 {
        Vec3::new(self.column(0).dot(v), self.column(1).dot(v), self.column(2).dot(v))
    }
}

impl From<[[f64; 3]; 3]> for Mat3 {
    fn from(value: [[f64; 3]; 3]) -> Self {
        Self { rows: value }
    }
}

impl core::ops::Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl core::ops::Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.transform(&rhs)
    }
}

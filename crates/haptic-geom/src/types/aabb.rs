// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use haptic_core::math::{Vec3, LARGE};

/// Axis-aligned bounding box in a mesh's local frame.
///
/// Invariants:
/// - Once anything has been enclosed, `min` components are less than or
///   equal to `max` components.
/// - An empty box is deliberately inverted (`min = +LARGE`, `max = -LARGE`)
///   so the first [`AxisAlignedBox::enclose_point`] always wins.
///
/// Center and extent are derived from the corners, so an empty box reports
/// `center = 0` and `extent = -LARGE` on every axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisAlignedBox {
    min: Vec3,
    max: Vec3,
}

impl Default for AxisAlignedBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl AxisAlignedBox {
    /// Returns an empty (inverted) box.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(LARGE),
            max: Vec3::splat(-LARGE),
        }
    }

    /// Constructs a box from its minimum and maximum corners.
    ///
    /// Corners are reordered per axis, so callers may pass them in any order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Builds a box centered at `center` with half-extents `extent`.
    #[must_use]
    pub fn from_center_extent(center: Vec3, extent: Vec3) -> Self {
        Self::from_corners(center - extent, center + extent)
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Returns `(min + max) / 2`.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max).scale(0.5)
    }

    /// Returns the half-extents `(max - min) / 2`.
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        (self.max - self.min).scale(0.5)
    }

    /// `true` until something has been enclosed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min.component(axis) > self.max.component(axis))
    }

    /// Resets the box to the empty (inverted) state.
    pub fn set_empty(&mut self) {
        *self = Self::empty();
    }

    /// Grows the box to include `point`.
    pub fn enclose_point(&mut self, point: &Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Sets this box to the smallest box containing both `a` and `b`.
    pub fn enclose_boxes(&mut self, a: &Self, b: &Self) {
        *self = a.union(b);
    }

    /// Returns the union of two boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Inflates the box by a uniform margin `m` on every face.
    #[must_use]
    pub fn inflated(&self, m: f64) -> Self {
        let delta = Vec3::splat(m);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Strict interior test: `point` must lie strictly inside on all axes.
    #[must_use]
    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| {
            let p = point.component(axis);
            p > self.min.component(axis) && p < self.max.component(axis)
        })
    }

    /// Inclusive containment test; points on a face count as inside.
    #[must_use]
    pub fn contains_inclusive(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| {
            let p = point.component(axis);
            p >= self.min.component(axis) && p <= self.max.component(axis)
        })
    }

    /// Axis of greatest extent: 0 = x, 1 = y, 2 = z.
    ///
    /// Ties go to the lower-numbered axis (x beats y beats z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x() >= e.y() && e.x() >= e.z() {
            0
        } else if e.y() >= e.z() {
            1
        } else {
            2
        }
    }

    /// Separating-axis overlap test, inclusive on faces.
    ///
    /// Returns `false` on the first axis where one box's lower bound exceeds
    /// the other's upper bound.
    #[must_use]
    pub fn intersect(a: &Self, b: &Self) -> bool {
        for axis in 0..3 {
            if a.min.component(axis) > b.max.component(axis) {
                return false;
            }
            if b.min.component(axis) > a.max.component(axis) {
                return false;
            }
        }
        true
    }

    /// Candidate-plane slab test for the segment `origin → end` (Woo).
    ///
    /// An origin inside the box (inclusive) hits immediately. Otherwise the
    /// candidate plane with the largest parametric distance is chosen (axes
    /// where the segment is parallel get `t = -1`; on equal `t` the lower
    /// axis wins) and the hit point is checked against the other two slabs.
    /// The parameter is not bounded by the segment length here; callers
    /// prune with the segment's own box first.
    #[must_use]
    pub fn hit_bounding_box(min: &Vec3, max: &Vec3, origin: &Vec3, end: &Vec3) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Quadrant {
            Left,
            Right,
            Middle,
        }

        let dir = *end - *origin;
        let mut inside = true;
        let mut quadrant = [Quadrant::Middle; 3];
        let mut candidate = [0.0_f64; 3];

        for axis in 0..3 {
            let o = origin.component(axis);
            if o < min.component(axis) {
                quadrant[axis] = Quadrant::Left;
                candidate[axis] = min.component(axis);
                inside = false;
            } else if o > max.component(axis) {
                quadrant[axis] = Quadrant::Right;
                candidate[axis] = max.component(axis);
                inside = false;
            }
        }

        if inside {
            return true;
        }

        let mut max_t = [-1.0_f64; 3];
        for axis in 0..3 {
            let d = dir.component(axis);
            if quadrant[axis] != Quadrant::Middle && d != 0.0 {
                max_t[axis] = (candidate[axis] - origin.component(axis)) / d;
            }
        }

        let mut which = 0;
        for axis in 1..3 {
            if max_t[which] < max_t[axis] {
                which = axis;
            }
        }

        if max_t[which] < 0.0 {
            return false;
        }

        for axis in 0..3 {
            if axis == which {
                continue;
            }
            let coord = origin.component(axis) + max_t[which] * dir.component(axis);
            if coord < min.component(axis) || coord > max.component(axis) {
                return false;
            }
        }
        true
    }
}

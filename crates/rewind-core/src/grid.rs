//! Continuous positions and the coordinate grid they snap to.
//!
//! Every authored position and direction passes through [`Grid::snap`]
//! so that conflict detection can compare cells exactly, without drift
//! accumulating across replays.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A 3-component position or displacement.
///
/// Positions produced by [`Grid::snap`] are exact multiples of the grid
/// step on every axis. Interpolated replay positions are not.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    /// Build a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance between two points.
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            return Vec3::ZERO;
        }
        self * (1.0 / len)
    }

    /// Linear interpolation from `a` to `b`; `t` is clamped to `[0, 1]`.
    pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        a + (b - a) * t
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Uniform square grid with a fixed step on every axis.
///
/// Stateless apart from the step; all methods are pure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    step: f32,
}

impl Grid {
    /// Create a grid with the given step.
    ///
    /// The step is validated by [`Rules::validate`](crate::Rules::validate);
    /// grids are normally obtained through [`Rules::grid`](crate::Rules::grid).
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    /// The grid step.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Round every component to the nearest multiple of the step.
    pub fn snap(&self, p: Vec3) -> Vec3 {
        Vec3::new(self.snap_axis(p.x), self.snap_axis(p.y), self.snap_axis(p.z))
    }

    fn snap_axis(&self, v: f32) -> f32 {
        // `+ 0.0` folds a negative zero into positive zero.
        (v / self.step).round() * self.step + 0.0
    }

    /// Whether two positions fall within half a step of each other.
    pub fn same_cell(&self, a: Vec3, b: Vec3) -> bool {
        a.distance(b) < self.step * 0.5
    }

    /// The one-cell displacement along `direction`.
    ///
    /// Used to interpret a raw push offset as exactly one cell, whatever
    /// its authored length. The zero vector maps to zero.
    pub fn cell_step(&self, direction: Vec3) -> Vec3 {
        self.snap(direction.normalized() * self.step)
    }

    /// The four orthogonal neighbours of `center` in the XY plane.
    ///
    /// Ordered right, left, up, down.
    pub fn neighbours4(&self, center: Vec3) -> [Vec3; 4] {
        let c = self.snap(center);
        let s = self.step;
        [
            c + Vec3::new(s, 0.0, 0.0),
            c + Vec3::new(-s, 0.0, 0.0),
            c + Vec3::new(0.0, s, 0.0),
            c + Vec3::new(0.0, -s, 0.0),
        ]
    }

    /// Every cell within `radius` cells of `center` on both XY axes,
    /// `center` included, in row-major order from the lowest corner.
    pub fn zone(&self, center: Vec3, radius: u32) -> Vec<Vec3> {
        let c = self.snap(center);
        let r = radius as i32;
        let side = (2 * radius + 1) as usize;
        let mut cells = Vec::with_capacity(side * side);
        for i in -r..=r {
            for j in -r..=r {
                cells.push(c + Vec3::new(i as f32 * self.step, j as f32 * self.step, 0.0));
            }
        }
        cells
    }

    /// Whether `target` lies inside [`zone`](Grid::zone)`(center, radius)`.
    pub fn in_zone(&self, center: Vec3, target: Vec3, radius: u32) -> bool {
        let d = self.snap(target) - self.snap(center);
        let limit = radius as f32 * self.step + self.step * 0.5;
        d.x.abs() < limit && d.y.abs() < limit && d.z.abs() < self.step * 0.5
    }
}

//! Mathematical types shared between generators.
//!
//! These are the canonical representations used by the turtle and the
//! voxel volume: real-valued positions, integer lattice points and
//! 3x3 rotation matrices.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component (up)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Rounds every component to the nearest lattice point.
    ///
    /// Halves round away from zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(self) -> NodePos {
        NodePos::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.z.round() as i32,
        )
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<NodePos> for Vec3 {
    #[allow(clippy::cast_precision_loss)]
    fn from(p: NodePos) -> Self {
        Self::new(p.x as f32, p.y as f32, p.z as f32)
    }
}

/// Integer lattice point - one voxel cell.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize,
    Deserialize,
)]
pub struct NodePos {
    /// X coordinate
    pub x: i32,
    /// Y coordinate (up)
    pub y: i32,
    /// Z coordinate
    pub z: i32,
}

impl NodePos {
    /// Creates a new lattice point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Component-wise offset.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Component-wise floor division (rounds toward negative infinity).
    #[inline]
    #[must_use]
    pub const fn div_euclid(self, d: i32) -> Self {
        Self::new(self.x.div_euclid(d), self.y.div_euclid(d), self.z.div_euclid(d))
    }

    /// Component-wise multiplication by a scalar.
    #[inline]
    #[must_use]
    pub const fn scale(self, s: i32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl std::ops::Add for NodePos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for NodePos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// 3x3 rotation matrix, column-major.
///
/// `m * v` transforms a vector from the local frame into the parent frame,
/// so `a * b` applies `b` first, in the local frame of `a`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    /// Image of the local X axis
    pub x_axis: Vec3,
    /// Image of the local Y axis
    pub y_axis: Vec3,
    /// Image of the local Z axis
    pub z_axis: Vec3,
}

impl Mat3 {
    /// Identity rotation
    pub const IDENTITY: Self = Self::from_cols(Vec3::X, Vec3::Y, Vec3::Z);

    /// Creates a matrix from its three columns.
    #[must_use]
    pub const fn from_cols(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self {
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// Right-handed rotation of `radians` about `axis`.
    ///
    /// The axis is expected to be unit length; it is not normalized here.
    /// Terms are evaluated in double precision and stored as `f32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::many_single_char_names)]
    pub fn from_axis_angle(axis: Vec3, radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (f64::from(axis.x), f64::from(axis.y), f64::from(axis.z));

        let col = |a: f64, b: f64, d: f64| Vec3::new(a as f32, b as f32, d as f32);
        Self::from_cols(
            col(t * x * x + c, t * x * y + s * z, t * x * z - s * y),
            col(t * x * y - s * z, t * y * y + c, t * y * z + s * x),
            col(t * x * z + s * y, t * y * z - s * x, t * z * z + c),
        )
    }

    /// Transforms a vector.
    #[must_use]
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        self.x_axis * v.x + self.y_axis * v.y + self.z_axis * v.z
    }

    /// Re-orthonormalizes the columns (Gram-Schmidt, X axis kept).
    #[must_use]
    pub fn renormalized(&self) -> Self {
        let x = self.x_axis.normalize_or_zero();
        let y = (self.y_axis - x * x.dot(self.y_axis)).normalize_or_zero();
        let z = x.cross(y);
        Self::from_cols(x, y, z)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(
            self.mul_vec3(rhs.x_axis),
            self.mul_vec3(rhs.y_axis),
            self.mul_vec3(rhs.z_axis),
        )
    }
}

impl std::ops::MulAssign for Mat3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

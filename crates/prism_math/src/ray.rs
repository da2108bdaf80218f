use crate::Vec3;

/// A half-line with an origin and a unit direction.
///
/// The direction is normalised on construction so that the parameter `t`
/// passed to [`Ray::at`] is always a true distance from the origin. Every
/// distance reported by an intersection test relies on that.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalising `direction`.
    ///
    /// A zero or non-finite direction produces a non-finite ray; callers that
    /// build directions from arithmetic should check [`Ray::is_finite`].
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether both the origin and direction hold finite values.
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite()
    }
}

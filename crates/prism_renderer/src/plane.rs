//! Infinite plane primitive.

use crate::Shape;
use prism_math::{solve3, Aabb, BoundingSphere, Ray, Vec2, Vec3};

/// Plane through `origin` spanned by two axes.
///
/// The normal is `axis1 x axis2`; local coordinates are measured in units of
/// each axis, so a checkerboard on a plane follows the axes' lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    origin: Vec3,
    axis1: Vec3,
    axis2: Vec3,
    normal: Vec3,
}

impl Plane {
    pub fn new(origin: Vec3, axis1: Vec3, axis2: Vec3) -> Self {
        Self {
            origin,
            axis1,
            axis2,
            normal: axis1.cross(axis2).normalize_or_zero(),
        }
    }

    /// Horizontal plane at height `z`, axes along +X and +Y.
    pub fn ground(z: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, z), Vec3::X, Vec3::Y)
    }
}

impl Shape for Plane {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let solution = solve3(self.axis1, self.axis2, -ray.direction, ray.origin - self.origin)?;
        (solution.z > 0.0).then_some(solution.z)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn local_coordinates(&self, point: Vec3) -> Vec2 {
        let offset = point - self.origin;
        Vec2::new(
            offset.dot(self.axis1) / self.axis1.length_squared(),
            offset.dot(self.axis2) / self.axis2.length_squared(),
        )
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::INFINITE
    }
}

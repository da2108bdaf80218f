//! Triangle primitive.
//!
//! Intersection solves the 3x3 barycentric system
//! `[v1 - v0, v2 - v0, -d] * (u, v, t) = origin - v0` directly.

use crate::Shape;
use prism_math::{solve3, Aabb, BoundingSphere, Ray, Vec2, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    normal: Vec3,
    /// In-plane frame used for local coordinates.
    tangent: Vec3,
    bitangent: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v0 - v1).cross(v0 - v2).normalize_or_zero();
        let tangent = (Self::centroid_of(v0, v1, v2) - v0).normalize_or_zero();
        let bitangent = tangent.cross(normal);
        Self {
            v0,
            v1,
            v2,
            normal,
            tangent,
            bitangent,
        }
    }

    fn centroid_of(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
        (v0 + v1 + v2) / 3.0
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn centroid(&self) -> Vec3 {
        Self::centroid_of(self.v0, self.v1, self.v2)
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let solution = solve3(
            self.v1 - self.v0,
            self.v2 - self.v0,
            -ray.direction,
            ray.origin - self.v0,
        )?;
        let (u, v, t) = (solution.x, solution.y, solution.z);
        let inside = u >= 0.0 && v >= 0.0 && u + v <= 1.0;
        (inside && t > 0.0).then_some(t)
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn local_coordinates(&self, point: Vec3) -> Vec2 {
        Vec2::new(self.tangent.dot(point), self.bitangent.dot(point))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::enclosing(&self.vertices())
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::around(self.centroid(), &self.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z);

        let t = triangle.intersect(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert!((ray.at(t) - Vec3::new(0.25, 0.25, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_triangle_miss() {
        let triangle = unit_triangle();

        // Outside the hypotenuse.
        assert!(triangle
            .intersect(&Ray::new(Vec3::new(0.8, 0.8, 1.0), -Vec3::Z))
            .is_none());
        // Behind the origin.
        assert!(triangle
            .intersect(&Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z))
            .is_none());
    }

    #[test]
    fn test_triangle_parallel_ray_is_singular() {
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);
        assert!(triangle.intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_normal_is_unit() {
        let triangle = unit_triangle();
        let n = triangle.normal(Vec3::ZERO);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.dot(Vec3::Z).abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_local_frame_is_orthonormal() {
        let triangle = Triangle::new(
            Vec3::new(1.0, 2.0, 0.5),
            Vec3::new(3.0, 2.5, 0.0),
            Vec3::new(2.0, 4.0, 1.0),
        );
        assert!(triangle.tangent.dot(triangle.normal).abs() < 1e-6);
        assert!(triangle.bitangent.dot(triangle.normal).abs() < 1e-6);
        assert!((triangle.bitangent.length() - 1.0).abs() < 1e-5);

        let a = triangle.local_coordinates(triangle.v0);
        let b = triangle.local_coordinates(triangle.centroid());
        assert!(((b - a).length() - (triangle.centroid() - triangle.v0).length()).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_bounds() {
        let triangle = unit_triangle();
        let bbox = triangle.bounding_box();
        assert_eq!(bbox.x.min, 0.0);
        assert_eq!(bbox.y.max, 1.0);

        let sphere = triangle.bounding_sphere();
        for v in triangle.vertices() {
            assert!(v.distance(sphere.center) <= sphere.radius + 1e-6);
        }
    }
}

//! Sphere primitive.

use crate::{Shape, TOLERANCE};
use prism_math::{Aabb, BoundingSphere, Ray, Vec2, Vec3};

/// A sphere given by centre and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        // Project the centre onto the ray, then step back half a chord.
        let t_proj = (self.center - ray.origin).dot(ray.direction);
        let closest = ray.at(t_proj);
        let sep_sq = (self.center - closest).length_squared();
        let radius_sq = self.radius * self.radius;
        if sep_sq > radius_sq {
            return None;
        }

        let half_chord = (radius_sq - sep_sq).sqrt();
        let near = t_proj - half_chord;
        if near > TOLERANCE {
            return Some(near);
        }
        let far = t_proj + half_chord;
        (far > TOLERANCE).then_some(far)
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    /// Azimuth around Z and polar angle from +Z, both in radians.
    fn local_coordinates(&self, point: Vec3) -> Vec2 {
        let v = point - self.center;
        let length = v.length();
        if length == 0.0 {
            return Vec2::ZERO;
        }
        let azimuth = v.y.atan2(v.x);
        let polar = (v.z / length).clamp(-1.0, 1.0).acos();
        Vec2::new(azimuth, polar)
    }

    fn bounding_box(&self) -> Aabb {
        let extent = Vec3::splat(self.radius);
        Aabb::from_points(self.center - extent, self.center + extent)
    }

    fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_sphere_hit_front() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);

        assert!(sphere.intersect(&Ray::new(Vec3::ZERO, Vec3::Y)).is_none());
        // Behind the origin.
        assert!(sphere.intersect(&Ray::new(Vec3::ZERO, Vec3::Z)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let t = sphere.intersect(&Ray::new(Vec3::ZERO, Vec3::X)).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_ray_leaving_surface_finds_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        // Starts on the near surface heading inwards.
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X);
        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-4);

        // Starts on the surface heading outwards.
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_normal_and_coordinates() {
        let sphere = Sphere::new(Vec3::new(1.0, 1.0, 1.0), 2.0);

        let n = sphere.normal(Vec3::new(1.0, 3.0, 1.0));
        assert!((n - Vec3::Y).length() < 1e-6);

        let uv = sphere.local_coordinates(Vec3::new(1.0, 3.0, 1.0));
        assert!((uv.x - FRAC_PI_2).abs() < 1e-5);
        assert!((uv.y - FRAC_PI_2).abs() < 1e-5);

        let bottom = sphere.local_coordinates(Vec3::new(1.0, 1.0, -1.0));
        assert!((bottom.y - PI).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_bounds() {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
        let bbox = sphere.bounding_box();
        assert_eq!(bbox.y.min, 1.0);
        assert_eq!(bbox.y.max, 3.0);
        assert_eq!(sphere.bounding_sphere(), BoundingSphere::new(Vec3::new(0.0, 2.0, 0.0), 1.0));
    }
}

use crate::{Interval, Ray, Vec3};

/// Relative and absolute slack added to bounding volumes before culling.
pub const BOUND_PADDING: f32 = 1e-4;

/// A sphere enclosing a surface, used for cheap ray rejection.
///
/// Unbounded surfaces use [`BoundingSphere::INFINITE`], which every ray hits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub const INFINITE: BoundingSphere = BoundingSphere {
        center: Vec3::ZERO,
        radius: f32::INFINITY,
    };

    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Sphere centred on `center` reaching the farthest of `points`.
    pub fn around(center: Vec3, points: &[Vec3]) -> Self {
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        Self::new(center, radius)
    }

    pub fn is_infinite(&self) -> bool {
        self.radius.is_infinite()
    }

    /// Whether the ray passes within the sphere at some distance in `ray_t`.
    ///
    /// Conservative: a ray that starts inside the sphere always hits, and the
    /// radius is padded by [`BOUND_PADDING`] so rounding never rejects a ray
    /// the enclosed shape would accept.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        if self.is_infinite() {
            return true;
        }
        let radius = self.radius * (1.0 + BOUND_PADDING) + BOUND_PADDING;
        let radius_sq = radius * radius;
        let to_center = self.center - ray.origin;
        if to_center.length_squared() <= radius_sq {
            return true;
        }

        // Separation measured from the closest point on the ray, exactly as an
        // exact sphere intersection measures it.
        let t_proj = to_center.dot(ray.direction);
        let sep_sq = (self.center - ray.at(t_proj)).length_squared();
        if sep_sq > radius_sq {
            return false;
        }
        let half_chord = (radius_sq - sep_sq).sqrt();
        t_proj + half_chord > ray_t.min && t_proj - half_chord < ray_t.max
    }
}

use crate::{Interval, Ray, Vec3, BOUND_PADDING};

/// Axis-aligned bounding box, one [`Interval`] per axis.
///
/// Surfaces precompute one at construction; unbounded surfaces such as planes
/// report [`Aabb::UNIVERSE`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Minimum extent along any axis, so flat primitives still have volume.
    pub const MIN_EXTENT: f32 = 1e-4;

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanned by two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box holding every point, or [`Aabb::EMPTY`] for none.
    pub fn enclosing(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::EMPTY;
        };
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::from_points(min, max)
    }

    /// Interval for an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: whether the ray passes through the box anywhere inside `ray_t`.
    ///
    /// Each slab is widened by [`BOUND_PADDING`] relative to its magnitude.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let extent = self.axis_interval(axis);
            let magnitude = extent.min.abs().max(extent.max.abs());
            let pad = if magnitude.is_finite() {
                BOUND_PADDING * (1.0 + magnitude)
            } else {
                0.0
            };
            let origin = ray.origin[axis];
            let inverse = 1.0 / ray.direction[axis];

            let mut t0 = (extent.min - pad - origin) * inverse;
            let mut t1 = (extent.max + pad - origin) * inverse;
            if inverse < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min drop a NaN operand, which covers rays lying in a slab face.
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Whether the box extends to infinity along some axis.
    pub fn is_unbounded(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .any(|i| i.min.is_infinite() || i.max.is_infinite())
    }

    fn pad_to_minimums(&mut self) {
        let delta = Self::MIN_EXTENT;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

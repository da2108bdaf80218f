//! Shape trait and the scene-owned [`Surface`] wrapper.

use prism_math::{Aabb, BoundingSphere, Ray, Vec2, Vec3};

/// Geometry a ray can hit.
pub trait Shape: Send + Sync {
    /// Distance along `ray` to the first hit in front of its origin.
    ///
    /// Implementations return `None` for misses, hits behind the origin and
    /// numerically singular configurations.
    fn intersect(&self, ray: &Ray) -> Option<f32>;

    /// Unit normal at a point on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// 2D coordinates of a surface point, used for material lookup.
    fn local_coordinates(&self, point: Vec3) -> Vec2;

    fn bounding_box(&self) -> Aabb;

    fn bounding_sphere(&self) -> BoundingSphere;
}

/// Index of a surface in its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) usize);

impl SurfaceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a material binding in its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) usize);

impl BindingId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A shape bound to a material lookup, with cached bounding volumes.
pub struct Surface {
    shape: Box<dyn Shape>,
    binding: BindingId,
    bbox: Aabb,
    bsphere: BoundingSphere,
}

impl Surface {
    pub(crate) fn new(shape: Box<dyn Shape>, binding: BindingId) -> Self {
        let bbox = shape.bounding_box();
        let bsphere = shape.bounding_sphere();
        Self {
            shape,
            binding,
            bbox,
            bsphere,
        }
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.shape.intersect(ray)
    }

    #[inline]
    pub fn normal(&self, point: Vec3) -> Vec3 {
        self.shape.normal(point)
    }

    #[inline]
    pub fn local_coordinates(&self, point: Vec3) -> Vec2 {
        self.shape.local_coordinates(point)
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }

    pub fn bounding_box(&self) -> &Aabb {
        &self.bbox
    }

    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bsphere
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("binding", &self.binding)
            .field("bbox", &self.bbox)
            .field("bsphere", &self.bsphere)
            .finish_non_exhaustive()
    }
}

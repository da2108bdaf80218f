//! Nearest-hit and occlusion queries over a set of surfaces.

use crate::shape::{Surface, SurfaceId};
use prism_math::{Interval, Ray};
use serde::{Deserialize, Serialize};

/// Minimum accepted hit distance; keeps secondary rays off their own surface.
pub const TOLERANCE: f32 = 1e-4;

/// Scale applied to a light distance so the light's own surface never shadows it.
pub const RELATIVE_TOLERANCE: f32 = 1.0 - TOLERANCE;

/// Which bounding volume, if any, is tested before a surface's exact
/// intersection. Every strategy returns the same hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullStrategy {
    #[default]
    None,
    BoundingSphere,
    BoundingBox,
}

impl CullStrategy {
    /// Whether `surface` can be hit by `ray` within `window`.
    #[inline]
    fn admits(self, surface: &Surface, ray: &Ray, window: Interval) -> bool {
        match self {
            CullStrategy::None => true,
            CullStrategy::BoundingSphere => surface.bounding_sphere().hit(ray, window),
            CullStrategy::BoundingBox => surface.bounding_box().hit(ray, window),
        }
    }
}

/// The closest accepted hit.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub id: SurfaceId,
    pub surface: &'a Surface,
    pub distance: f32,
}

/// Running state of a nearest-hit search.
///
/// A candidate is accepted only strictly inside the window, which starts at
/// `(TOLERANCE, inf)` and closes to `(TOLERANCE, best)` after each accepted
/// hit. Equal distances keep the first surface offered.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    hit: Option<Hit<'a>>,
    window: Interval,
}

impl<'a> Intersection<'a> {
    pub fn new() -> Self {
        Self {
            hit: None,
            window: Interval::above(TOLERANCE),
        }
    }

    /// Offer a candidate; returns whether it became the closest hit.
    pub fn offer(&mut self, id: SurfaceId, surface: &'a Surface, distance: f32) -> bool {
        if !self.window.surrounds(distance) {
            return false;
        }
        self.hit = Some(Hit {
            id,
            surface,
            distance,
        });
        self.window.max = distance;
        true
    }

    pub fn window(&self) -> Interval {
        self.window
    }

    pub fn hit(&self) -> Option<&Hit<'a>> {
        self.hit.as_ref()
    }

    pub fn into_hit(self) -> Option<Hit<'a>> {
        self.hit
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a scene's surfaces used for tracing and shadow tests.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceQuery<'a> {
    surfaces: &'a [Surface],
    cull: CullStrategy,
}

impl<'a> SurfaceQuery<'a> {
    pub fn new(surfaces: &'a [Surface], cull: CullStrategy) -> Self {
        Self { surfaces, cull }
    }

    pub fn surfaces(&self) -> &'a [Surface] {
        self.surfaces
    }

    pub fn cull(&self) -> CullStrategy {
        self.cull
    }

    /// Closest surface hit by `ray` beyond [`TOLERANCE`], scanning every surface.
    pub fn nearest(&self, ray: &Ray) -> Intersection<'a> {
        let mut intersection = Intersection::new();
        for (index, surface) in self.surfaces.iter().enumerate() {
            if !self.cull.admits(surface, ray, intersection.window()) {
                continue;
            }
            if let Some(distance) = surface.intersect(ray) {
                intersection.offer(SurfaceId(index), surface, distance);
            }
        }
        intersection
    }

    /// Whether any surface is hit strictly inside `window`.
    pub fn blocked(&self, ray: &Ray, window: Interval) -> bool {
        self.surfaces.iter().any(|surface| {
            self.cull.admits(surface, ray, window)
                && surface
                    .intersect(ray)
                    .is_some_and(|distance| window.surrounds(distance))
        })
    }
}

//! Recursive light transport.
//!
//! [`Tracer::evaluate`] maps a [`RayInfo`] to the spectral intensity leaving
//! the first surface it hits, as the sum of three terms:
//!
//! - direct diffuse lighting from every unoccluded light,
//! - a mirror bounce, traced recursively,
//! - one refracted sub-ray per refraction group, traced recursively.
//!
//! Recursion stops at `max_generations`.

use std::f32::consts::FRAC_1_PI;

use crate::intersection::CullStrategy;
use crate::{RayInfo, Scene, SurfaceQuery};
use prism_core::{Material, SpectralIntensity};
use prism_math::Vec3;

/// Default recursion bound.
pub const MAX_GENERATIONS: u32 = 10;

/// Coefficients at or below this on every active channel skip their term.
pub const CONTRIBUTION_THRESHOLD: f32 = 1e-3;

const INV_TWO_PI: f32 = 0.5 * FRAC_1_PI;

/// Evaluates transport against a frozen scene.
pub struct Tracer<'a> {
    scene: &'a Scene,
    query: SurfaceQuery<'a>,
    max_generations: u32,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            query: scene.query(CullStrategy::None),
            max_generations: MAX_GENERATIONS,
        }
    }

    pub fn with_max_generations(mut self, max_generations: u32) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn with_cull(mut self, cull: CullStrategy) -> Self {
        self.query = self.scene.query(cull);
        self
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn max_generations(&self) -> u32 {
        self.max_generations
    }

    /// Outgoing intensity along `task`'s ray.
    ///
    /// Zero once the generation bound is reached or when nothing is hit.
    pub fn evaluate(&self, task: &RayInfo) -> SpectralIntensity {
        let mut total = self.scene.spectrum().zeros();
        if task.generation >= self.max_generations {
            return total;
        }
        let Some(hit) = self.query.nearest(&task.ray).into_hit() else {
            return total;
        };

        let point = task.ray.at(hit.distance);
        let normal = hit.surface.normal(point);
        let Some(material) = self.scene.material_at(hit.surface, point) else {
            return total;
        };
        if !point.is_finite() || !normal.is_finite() {
            return total;
        }

        if material.diffusivity().exceeds_in(CONTRIBUTION_THRESHOLD, task.channels) {
            total += self.diffuse(point, normal, material, task);
        }
        if material.specularity().exceeds_in(CONTRIBUTION_THRESHOLD, task.channels) {
            total += self.specular(point, normal, material, task);
        }
        if material.transmissivity().exceeds_in(CONTRIBUTION_THRESHOLD, task.channels) {
            total += self.transmitted(point, normal, material, task);
        }
        total
    }

    /// Direct lighting: `sum(I * |n . l| / 2pi)` over visible lights.
    pub fn diffuse(&self, point: Vec3, normal: Vec3, material: &Material, task: &RayInfo) -> SpectralIntensity {
        let mut incoming = self.scene.spectrum().zeros();
        for light in self.scene.lights() {
            if !light.illuminates(point, &self.query) {
                continue;
            }
            let cos_theta = normal.dot(light.direction_from(point)).abs();
            incoming += light.intensity_at(point) * (cos_theta * INV_TWO_PI);
        }
        incoming.masked(task.channels) * *material.diffusivity()
    }

    fn specular(&self, point: Vec3, normal: Vec3, material: &Material, task: &RayInfo) -> SpectralIntensity {
        let bounce = task.reflected(point, reflect(task.ray.direction, normal));
        self.evaluate(&bounce) * *material.specularity()
    }

    fn transmitted(&self, point: Vec3, normal: Vec3, material: &Material, task: &RayInfo) -> SpectralIntensity {
        let mut sum = self.scene.spectrum().zeros();
        for group in material.groups() {
            let channels = group.mask & task.channels;
            if channels == 0 {
                continue;
            }
            let Some(direction) = refract(task.ray.direction, normal, task.medium, group.refractive_index) else {
                continue;
            };
            let child = task.refracted(point, direction, channels, group.refractive_index);
            sum += self.evaluate(&child);
        }
        sum * *material.transmissivity()
    }
}

// ===== Helper functions =====

/// Reflect `direction` about `normal`: `d - 2(d.n)n`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Snell refraction of a unit `direction` from index `n1` into index `n2`.
///
/// The normal may face either way; it is flipped to point along the
/// direction of travel. Returns `None` on total internal reflection or a
/// non-finite result.
pub fn refract(direction: Vec3, normal: Vec3, n1: f32, n2: f32) -> Option<Vec3> {
    let cos_in = normal.dot(direction);
    let (normal, cos_in) = if cos_in < 0.0 {
        (-normal, -cos_in)
    } else {
        (normal, cos_in)
    };

    let tangent = direction - normal * cos_in;
    let sin_in = tangent.length();
    if sin_in < 1e-6 {
        return direction.is_finite().then_some(direction);
    }

    let sin_out = sin_in * n1 / n2;
    if !(0.0..=1.0).contains(&sin_out) {
        return None;
    }
    let theta_out = sin_out.asin();
    let refracted = normal * theta_out.cos() + (tangent / sin_in) * sin_out;
    let refracted = refracted.normalize();
    refracted.is_finite().then_some(refracted)
}

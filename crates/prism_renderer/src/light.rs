//! Light sources.

use crate::intersection::{SurfaceQuery, RELATIVE_TOLERANCE, TOLERANCE};
use prism_core::SpectralIntensity;
use prism_math::{Interval, Ray, Vec3};

/// Something that illuminates surface points directly.
pub trait LightSource: Send + Sync {
    /// Unit vector from `point` towards the light.
    fn direction_from(&self, point: Vec3) -> Vec3;

    /// Intensity arriving at `point`, ignoring occlusion.
    fn intensity_at(&self, point: Vec3) -> SpectralIntensity;

    /// Whether `point` sees the light, via a shadow ray against `surfaces`.
    fn illuminates(&self, point: Vec3, surfaces: &SurfaceQuery<'_>) -> bool;

    /// Intensity at the source, before any falloff.
    fn emitted(&self) -> &SpectralIntensity;

    /// Channel count of the emitted intensity.
    fn channels(&self) -> usize {
        self.emitted().len()
    }
}

/// Isotropic point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    position: Vec3,
    luminosity: SpectralIntensity,
}

impl PointLight {
    pub fn new(position: Vec3, luminosity: SpectralIntensity) -> Self {
        Self {
            position,
            luminosity,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl LightSource for PointLight {
    fn direction_from(&self, point: Vec3) -> Vec3 {
        (self.position - point).normalize_or_zero()
    }

    /// `luminosity / r^2`, or zero when the point sits on the light.
    fn intensity_at(&self, point: Vec3) -> SpectralIntensity {
        let distance_sq = self.position.distance_squared(point);
        if distance_sq <= TOLERANCE * TOLERANCE {
            return SpectralIntensity::splat(self.luminosity.len(), 0.0);
        }
        self.luminosity / distance_sq
    }

    fn illuminates(&self, point: Vec3, surfaces: &SurfaceQuery<'_>) -> bool {
        let offset = self.position - point;
        let distance = offset.length();
        if distance <= TOLERANCE {
            return true;
        }
        let shadow = Ray::new(point, offset);
        !surfaces.blocked(&shadow, Interval::new(TOLERANCE, distance * RELATIVE_TOLERANCE))
    }

    fn emitted(&self) -> &SpectralIntensity {
        &self.luminosity
    }
}

/// Light arriving from a fixed direction with constant intensity, like the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    towards: Vec3,
    intensity: SpectralIntensity,
}

impl DirectionalLight {
    /// `towards` points from the scene to the light; it is normalised here.
    pub fn new(towards: Vec3, intensity: SpectralIntensity) -> Self {
        Self {
            towards: towards.normalize_or_zero(),
            intensity,
        }
    }
}

impl LightSource for DirectionalLight {
    fn direction_from(&self, _point: Vec3) -> Vec3 {
        self.towards
    }

    fn intensity_at(&self, _point: Vec3) -> SpectralIntensity {
        self.intensity
    }

    fn illuminates(&self, point: Vec3, surfaces: &SurfaceQuery<'_>) -> bool {
        if self.towards == Vec3::ZERO {
            return false;
        }
        let shadow = Ray::new(point, self.towards);
        !surfaces.blocked(&shadow, Interval::above(TOLERANCE))
    }

    fn emitted(&self) -> &SpectralIntensity {
        &self.intensity
    }
}

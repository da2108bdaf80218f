//! Ray-tracing tasks.

use prism_core::ChannelMask;
use prism_math::{Ray, Vec3};

/// Refractive index of the medium camera rays start in.
pub const VACUUM_INDEX: f32 = 1.0;

/// One unit of transport work: a ray plus the state it carries.
///
/// Tasks are never mutated; each bounce builds a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayInfo {
    pub ray: Ray,
    /// Channels this task still carries.
    pub channels: ChannelMask,
    /// Recursion depth, 0 for camera rays.
    pub generation: u32,
    /// Refractive index of the medium the ray travels through.
    pub medium: f32,
}

impl RayInfo {
    /// Camera ray in vacuum carrying `channels`.
    pub fn primary(ray: Ray, channels: ChannelMask) -> Self {
        Self {
            ray,
            channels,
            generation: 0,
            medium: VACUUM_INDEX,
        }
    }

    /// Mirror bounce: same channels and medium, one generation deeper.
    pub fn reflected(&self, origin: Vec3, direction: Vec3) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            channels: self.channels,
            generation: self.generation + 1,
            medium: self.medium,
        }
    }

    /// Transmitted sub-ray restricted to `channels`, now inside `medium`.
    pub fn refracted(&self, origin: Vec3, direction: Vec3, channels: ChannelMask, medium: f32) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            channels,
            generation: self.generation + 1,
            medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_task() {
        let task = RayInfo::primary(Ray::new(Vec3::ZERO, Vec3::X), 0b111);
        assert_eq!(task.generation, 0);
        assert_eq!(task.medium, VACUUM_INDEX);
        assert_eq!(task.channels, 0b111);
    }

    #[test]
    fn test_children_advance_generation() {
        let task = RayInfo::primary(Ray::new(Vec3::ZERO, Vec3::X), 0b111);

        let bounce = task.reflected(Vec3::X, -Vec3::X);
        assert_eq!(bounce.generation, 1);
        assert_eq!(bounce.channels, task.channels);
        assert_eq!(bounce.ray.origin, Vec3::X);

        let split = bounce.refracted(Vec3::X, Vec3::Y, 0b010, 1.5);
        assert_eq!(split.generation, 2);
        assert_eq!(split.channels, 0b010);
        assert_eq!(split.medium, 1.5);
        // The parent is untouched.
        assert_eq!(bounce.medium, VACUUM_INDEX);
    }
}

//! The scene arena: spectrum, materials, bindings, surfaces and lights.
//!
//! A scene is built up front and then only read while rendering. Surfaces
//! refer to bindings, and bindings to materials, by index handles that are
//! validated when the referring object is added.

use std::sync::Arc;

use thiserror::Error;

use crate::intersection::{CullStrategy, SurfaceQuery};
use crate::light::LightSource;
use crate::shape::{BindingId, Shape, Surface, SurfaceId};
use prism_core::{Material, MaterialBinding, MaterialId, Spectrum, Uniform};
use prism_math::Vec3;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("material {0:?} is not part of this scene")]
    UnknownMaterial(MaterialId),

    #[error("binding {0:?} is not part of this scene")]
    UnknownBinding(BindingId),

    #[error("{what} has {found} channels but the scene spectrum has {expected}")]
    ChannelMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} intensity in channel {channel} is negative or not finite")]
    InvalidIntensity { what: &'static str, channel: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Index of a light in its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

impl LightId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Everything the tracer reads.
pub struct Scene {
    spectrum: Arc<Spectrum>,
    materials: Vec<Material>,
    bindings: Vec<Box<dyn MaterialBinding>>,
    surfaces: Vec<Surface>,
    lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    pub fn new(spectrum: Arc<Spectrum>) -> Self {
        Self {
            spectrum,
            materials: Vec::new(),
            bindings: Vec::new(),
            surfaces: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn add_material(&mut self, material: Material) -> SceneResult<MaterialId> {
        let found = material.absorptivity().len();
        if found != self.spectrum.channels() {
            return Err(SceneError::ChannelMismatch {
                what: "material",
                expected: self.spectrum.channels(),
                found,
            });
        }
        self.materials.push(material);
        Ok(MaterialId::new(self.materials.len() - 1))
    }

    pub fn add_binding(&mut self, binding: impl MaterialBinding + 'static) -> SceneResult<BindingId> {
        if let Some(missing) = binding
            .materials()
            .into_iter()
            .find(|id| id.index() >= self.materials.len())
        {
            return Err(SceneError::UnknownMaterial(missing));
        }
        self.bindings.push(Box::new(binding));
        Ok(BindingId(self.bindings.len() - 1))
    }

    /// Add `material` and a uniform binding to it in one step.
    pub fn add_uniform(&mut self, material: Material) -> SceneResult<BindingId> {
        let id = self.add_material(material)?;
        self.add_binding(Uniform(id))
    }

    pub fn add_surface(&mut self, shape: impl Shape + 'static, binding: BindingId) -> SceneResult<SurfaceId> {
        if binding.index() >= self.bindings.len() {
            return Err(SceneError::UnknownBinding(binding));
        }
        self.surfaces.push(Surface::new(Box::new(shape), binding));
        log::debug!("Added surface {} with binding {}", self.surfaces.len() - 1, binding.index());
        Ok(SurfaceId(self.surfaces.len() - 1))
    }

    pub fn add_light(&mut self, light: impl LightSource + 'static) -> SceneResult<LightId> {
        if light.channels() != self.spectrum.channels() {
            return Err(SceneError::ChannelMismatch {
                what: "light",
                expected: self.spectrum.channels(),
                found: light.channels(),
            });
        }
        if let Some(channel) = light
            .emitted()
            .as_slice()
            .iter()
            .position(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(SceneError::InvalidIntensity {
                what: "light",
                channel,
            });
        }
        self.lights.push(Box::new(light));
        log::debug!("Added light {}", self.lights.len() - 1);
        Ok(LightId(self.lights.len() - 1))
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.index())
    }

    pub fn lights(&self) -> &[Box<dyn LightSource>] {
        &self.lights
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// Query over every surface with the given culling.
    pub fn query(&self, cull: CullStrategy) -> SurfaceQuery<'_> {
        SurfaceQuery::new(&self.surfaces, cull)
    }

    /// Material shown by `surface` at `point`.
    ///
    /// Returns `None` only for a surface from another scene.
    pub fn material_at(&self, surface: &Surface, point: Vec3) -> Option<&Material> {
        let binding = self.bindings.get(surface.binding().index())?;
        let id = binding.material_at(surface.local_coordinates(point));
        self.materials.get(id.index())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("channels", &self.spectrum.channels())
            .field("materials", &self.materials.len())
            .field("bindings", &self.bindings.len())
            .field("surfaces", &self.surfaces.len())
            .field("lights", &self.lights.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirectionalLight, PointLight, Sphere};
    use prism_core::Checkerboard;

    #[test]
    fn test_scene_handles() {
        let spectrum = Arc::new(Spectrum::rgb());
        let mut scene = Scene::new(spectrum.clone());

        let white = scene.add_material(Material::diffuse(&spectrum)).unwrap();
        let black = scene.add_material(Material::absorber(&spectrum)).unwrap();
        let board = scene.add_binding(Checkerboard::new(1.0, white, black)).unwrap();
        let ball = scene.add_surface(Sphere::new(Vec3::ZERO, 1.0), board).unwrap();

        assert_eq!(scene.materials().len(), 2);
        assert_eq!(scene.surfaces().len(), 1);
        assert_eq!(scene.surface(ball).unwrap().binding(), board);
        assert_eq!(scene.material(black), Some(&Material::absorber(&spectrum)));
    }

    #[test]
    fn test_scene_rejects_dangling_handles() {
        let spectrum = Arc::new(Spectrum::rgb());
        let mut scene = Scene::new(spectrum.clone());

        assert_eq!(
            scene.add_binding(Uniform(MaterialId::new(4))),
            Err(SceneError::UnknownMaterial(MaterialId::new(4)))
        );
        assert_eq!(
            scene.add_surface(Sphere::new(Vec3::ZERO, 1.0), BindingId(0)),
            Err(SceneError::UnknownBinding(BindingId(0)))
        );
    }

    #[test]
    fn test_scene_rejects_foreign_spectra() {
        let spectrum = Arc::new(Spectrum::rgb());
        let grey = Spectrum::greyscale();
        let mut scene = Scene::new(spectrum);

        assert!(matches!(
            scene.add_material(Material::diffuse(&grey)),
            Err(SceneError::ChannelMismatch { what: "material", .. })
        ));
        assert!(matches!(
            scene.add_light(PointLight::new(Vec3::Z, grey.splat(1.0))),
            Err(SceneError::ChannelMismatch { what: "light", .. })
        ));
    }

    #[test]
    fn test_scene_rejects_invalid_light_intensity() {
        let spectrum = Arc::new(Spectrum::rgb());
        let mut scene = Scene::new(spectrum.clone());

        assert_eq!(
            scene.add_light(PointLight::new(Vec3::Z, spectrum.splat(-50.0))),
            Err(SceneError::InvalidIntensity { what: "light", channel: 0 })
        );

        let mut values = spectrum.splat(10.0);
        values[2] = f32::NAN;
        assert_eq!(
            scene.add_light(DirectionalLight::new(Vec3::Z, values)),
            Err(SceneError::InvalidIntensity { what: "light", channel: 2 })
        );
        values[2] = f32::INFINITY;
        assert_eq!(
            scene.add_light(DirectionalLight::new(Vec3::Z, values)),
            Err(SceneError::InvalidIntensity { what: "light", channel: 2 })
        );
        assert!(scene.lights().is_empty());

        // Dark lights are allowed.
        assert!(scene.add_light(PointLight::new(Vec3::Z, spectrum.zeros())).is_ok());
    }

    #[test]
    fn test_material_at_follows_binding() {
        let spectrum = Arc::new(Spectrum::rgb());
        let mut scene = Scene::new(spectrum.clone());
        let white = scene.add_material(Material::diffuse(&spectrum)).unwrap();
        let mirror = scene.add_material(Material::mirror(&spectrum)).unwrap();
        let board = scene.add_binding(Checkerboard::new(1.0, white, mirror)).unwrap();
        let id = scene.add_surface(crate::Plane::ground(0.0), board).unwrap();
        let surface = scene.surface(id).unwrap();

        let at_origin = scene.material_at(surface, Vec3::new(0.5, 0.5, 0.0)).unwrap();
        assert_eq!(at_origin.specularity()[0], 1.0);
        let next_cell = scene.material_at(surface, Vec3::new(1.5, 0.5, 0.0)).unwrap();
        assert_eq!(next_cell.diffusivity()[0], 1.0);
    }
}

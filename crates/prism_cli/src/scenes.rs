//! Built-in demo scenes.

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;

use prism_core::{Checkerboard, Coefficients, Material, Spectrum};
use prism_math::Vec3;
use prism_renderer::{
    CameraSettings, DirectionalLight, Plane, PointLight, Scene, Sphere, Triangle,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Checkerboard ground with a grid of spheres under a sun.
    Spheres,
    /// A dispersive glass prism over a diffuse floor.
    Prism,
    /// A sphere between two facing mirrors.
    Mirrors,
}

/// Build `kind` for `spectrum`, along with the camera it is framed for.
pub fn build(kind: SceneKind, spectrum: &Arc<Spectrum>) -> Result<(Scene, CameraSettings)> {
    match kind {
        SceneKind::Spheres => spheres(spectrum),
        SceneKind::Prism => prism(spectrum),
        SceneKind::Mirrors => mirrors(spectrum),
    }
}

/// Glass whose refractive index rises linearly across the spectrum.
fn dispersive_glass(spectrum: &Spectrum, base: f32, spread: f32) -> Result<Material> {
    let mut raw = Coefficients::uniform(spectrum, 0.05, 0.0, 0.1, 0.85, base);
    let last = spectrum.channels().saturating_sub(1).max(1) as f32;
    for channel in 0..spectrum.channels() {
        raw.refractive_index[channel] = base + spread * channel as f32 / last;
    }
    Ok(Material::new(spectrum, raw)?)
}

fn checkerboard_ground(scene: &mut Scene, spectrum: &Spectrum, size: f32) -> Result<()> {
    let light = scene.add_material(Material::diffuse(spectrum))?;
    let dark = scene.add_material(Material::uniform(spectrum, 0.8, 0.2, 0.0, 0.0, 1.0)?)?;
    let board = scene.add_binding(Checkerboard::new(size, light, dark))?;
    scene.add_surface(Plane::ground(0.0), board)?;
    Ok(())
}

fn spheres(spectrum: &Arc<Spectrum>) -> Result<(Scene, CameraSettings)> {
    let mut scene = Scene::new(Arc::clone(spectrum));
    checkerboard_ground(&mut scene, spectrum, 2.0)?;

    let mut palette = vec![
        Material::diffuse(spectrum),
        Material::uniform(spectrum, 0.1, 0.6, 0.3, 0.0, 1.0)?,
        Material::mirror(spectrum),
        dispersive_glass(spectrum, 1.50, 0.06)?,
    ];
    for channel in 0..spectrum.channels() {
        palette.push(Material::tinted(spectrum, 1 << channel, 0.1, 0.7, 0.2, 0.0, 1.0)?);
    }
    let bindings = palette
        .into_iter()
        .map(|material| scene.add_uniform(material))
        .collect::<Result<Vec<_>, _>>()?;

    let mut next = bindings.iter().cycle();
    for row in 0..4 {
        for column in -3..=3 {
            let center = Vec3::new(row as f32 * 3.0, column as f32 * 3.0, 1.0);
            if let Some(&binding) = next.next() {
                scene.add_surface(Sphere::new(center, 1.0), binding)?;
            }
        }
    }

    scene.add_light(DirectionalLight::new(
        Vec3::new(-0.3, 0.5, 1.0),
        spectrum.splat(1400.0),
    ))?;

    let camera = CameraSettings::default()
        .with_position(Vec3::new(-12.0, 0.0, 7.0))
        .with_rotation(Vec3::new(0.0, 20.0, 0.0))
        .with_fov(70.0);
    Ok((scene, camera))
}

fn prism(spectrum: &Arc<Spectrum>) -> Result<(Scene, CameraSettings)> {
    let mut scene = Scene::new(Arc::clone(spectrum));

    let floor = scene.add_uniform(Material::diffuse(spectrum))?;
    scene.add_surface(Plane::ground(0.0), floor)?;

    // Triangular cross-section in XZ, extruded along Y.
    let glass = scene.add_uniform(dispersive_glass(spectrum, 1.45, 0.3)?)?;
    let section = [
        Vec3::new(-1.0, 0.0, 0.5),
        Vec3::new(1.0, 0.0, 0.5),
        Vec3::new(0.0, 0.0, 2.2),
    ];
    let near = section.map(|v| v - Vec3::Y * 2.0);
    let far = section.map(|v| v + Vec3::Y * 2.0);

    scene.add_surface(Triangle::new(near[0], near[1], near[2]), glass)?;
    scene.add_surface(Triangle::new(far[0], far[2], far[1]), glass)?;
    for i in 0..3 {
        let j = (i + 1) % 3;
        scene.add_surface(Triangle::new(near[i], far[i], far[j]), glass)?;
        scene.add_surface(Triangle::new(near[i], far[j], near[j]), glass)?;
    }

    scene.add_light(PointLight::new(Vec3::new(2.0, -3.0, 8.0), spectrum.splat(400.0)))?;

    let camera = CameraSettings::default()
        .with_position(Vec3::new(-7.0, 0.0, 2.5))
        .with_rotation(Vec3::new(0.0, 8.0, 0.0))
        .with_fov(60.0);
    Ok((scene, camera))
}

fn mirrors(spectrum: &Arc<Spectrum>) -> Result<(Scene, CameraSettings)> {
    let mut scene = Scene::new(Arc::clone(spectrum));
    checkerboard_ground(&mut scene, spectrum, 1.0)?;

    let mirror = scene.add_uniform(Material::uniform(spectrum, 0.1, 0.0, 0.9, 0.0, 1.0)?)?;
    // Facing mirrors at y = +-4, normals pointing at each other.
    scene.add_surface(Plane::new(Vec3::new(0.0, 4.0, 0.0), Vec3::X, Vec3::Z), mirror)?;
    scene.add_surface(Plane::new(Vec3::new(0.0, -4.0, 0.0), Vec3::Z, Vec3::X), mirror)?;

    let red = scene.add_uniform(Material::tinted(spectrum, 1, 0.2, 0.8, 0.0, 0.0, 1.0)?)?;
    scene.add_surface(Sphere::new(Vec3::new(4.0, 0.0, 1.0), 1.0), red)?;

    scene.add_light(PointLight::new(Vec3::new(2.0, 0.0, 5.0), spectrum.splat(300.0)))?;

    let camera = CameraSettings::default()
        .with_position(Vec3::new(-6.0, -1.5, 2.5))
        .with_rotation(Vec3::new(0.0, 8.0, 12.0))
        .with_fov(75.0);
    Ok((scene, camera))
}

//! `prism` - render a built-in scene to a PNG.

mod scenes;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use prism_core::Spectrum;
use prism_math::Vec3;
use prism_renderer::{render_scene, save_png, CullStrategy, RenderConfig, ToneMapping};

use scenes::SceneKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SpectrumKind {
    /// Red, green and blue.
    Rgb,
    /// Seven rainbow channels.
    Roygbiv,
    /// A single white channel.
    Grey,
}

impl SpectrumKind {
    fn build(self) -> Spectrum {
        match self {
            SpectrumKind::Rgb => Spectrum::rgb(),
            SpectrumKind::Roygbiv => Spectrum::roygbiv(),
            SpectrumKind::Grey => Spectrum::greyscale(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CullArg {
    None,
    Sphere,
    Box,
}

impl From<CullArg> for CullStrategy {
    fn from(arg: CullArg) -> Self {
        match arg {
            CullArg::None => CullStrategy::None,
            CullArg::Sphere => CullStrategy::BoundingSphere,
            CullArg::Box => CullStrategy::BoundingBox,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ToneArg {
    Linear,
    Gamma,
}

impl From<ToneArg> for ToneMapping {
    fn from(arg: ToneArg) -> Self {
        match arg {
            ToneArg::Linear => ToneMapping::Linear,
            ToneArg::Gamma => ToneMapping::Gamma,
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "prism", version, about = "Deterministic spectral ray tracer")]
struct Args {
    /// Built-in scene to render.
    #[arg(long, value_enum, default_value = "spheres")]
    scene: SceneKind,

    /// Channels carried by every ray.
    #[arg(long, value_enum, default_value = "rgb")]
    spectrum: SpectrumKind,

    /// Output PNG path.
    #[arg(long, short = 'o', default_value = "render.png")]
    output: PathBuf,

    /// JSON render configuration; other flags override its fields.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Horizontal resolution in pixels.
    #[arg(long)]
    resolution: Option<u32>,

    /// Width over height.
    #[arg(long)]
    aspect: Option<f32>,

    /// Horizontal field of view in degrees.
    #[arg(long)]
    fov: Option<f32>,

    /// Camera position.
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
    position: Option<Vec3>,

    /// Camera roll, pitch and yaw in degrees.
    #[arg(long, value_name = "R,P,Y", value_parser = parse_vec3, allow_hyphen_values = true)]
    rotation: Option<Vec3>,

    /// Worker threads [default: available parallelism].
    #[arg(long, short = 'j')]
    threads: Option<usize>,

    /// Maximum ray generations.
    #[arg(long)]
    generations: Option<u32>,

    /// Bounding volume tested before exact intersection.
    #[arg(long, value_enum)]
    cull: Option<CullArg>,

    /// Intensity to display mapping.
    #[arg(long, value_enum)]
    tone: Option<ToneArg>,
}

impl Args {
    /// Base configuration from `--config` or the scene defaults, with flags applied on top.
    fn render_config(&self, scene_camera: prism_renderer::CameraSettings) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => RenderConfig {
                camera: scene_camera,
                threads: std::thread::available_parallelism()
                    .unwrap_or(NonZeroUsize::MIN)
                    .get(),
                ..RenderConfig::default()
            },
        };

        let camera = &mut config.camera;
        if let Some(resolution) = self.resolution {
            camera.resolution = resolution;
        }
        if let Some(aspect) = self.aspect {
            camera.aspect_ratio = aspect;
        }
        if let Some(fov) = self.fov {
            camera.fov_degrees = fov;
        }
        if let Some(position) = self.position {
            camera.position = position;
        }
        if let Some(rotation) = self.rotation {
            camera.rotation_degrees = rotation;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(generations) = self.generations {
            config.max_generations = generations;
        }
        if let Some(cull) = self.cull {
            config.cull = cull.into();
        }
        if let Some(tone) = self.tone {
            config.tone_mapping = tone.into();
        }
        Ok(config)
    }
}

fn parse_vec3(text: &str) -> Result<Vec3, String> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected three comma-separated numbers, got {}", parts.len())),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let spectrum = Arc::new(args.spectrum.build());
    let (scene, scene_camera) = scenes::build(args.scene, &spectrum)
        .with_context(|| format!("building {:?} scene", args.scene))?;
    log::info!("Built {:?} scene: {:?}", args.scene, scene);

    let config = args.render_config(scene_camera)?;
    log::debug!("Render config: {:?}", config);

    let (camera, _stats) = render_scene(&scene, &config).context("rendering")?;
    save_png(&args.output, camera.canvas(), &spectrum, config.tone_mapping)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("-20, 0,7.5"), Ok(Vec3::new(-20.0, 0.0, 7.5)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn test_flags_override_scene_camera() {
        let args = Args::parse_from([
            "prism",
            "--resolution",
            "32",
            "--position",
            "-1,2,-3",
            "--threads",
            "3",
            "--cull",
            "box",
            "--tone",
            "gamma",
        ]);
        let scene_camera = prism_renderer::CameraSettings::default().with_fov(45.0);
        let config = args.render_config(scene_camera).unwrap();

        assert_eq!(config.camera.resolution, 32);
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.position, Vec3::new(-1.0, 2.0, -3.0));
        assert_eq!(config.threads, 3);
        assert_eq!(config.cull, CullStrategy::BoundingBox);
        assert_eq!(config.tone_mapping, ToneMapping::Gamma);
    }

    #[test]
    fn test_args_verify() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

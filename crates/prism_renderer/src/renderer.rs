//! Render scheduler.
//!
//! Workers repeatedly claim a pixel from the camera, evaluate its primary
//! ray and store the result in the camera's canvas until the camera reports
//! that every pixel has been handed out. One thread renders synchronously on
//! the caller's stack; more threads run as named scoped workers that are all
//! joined before returning.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intersection::CullStrategy;
use crate::output::ToneMapping;
use crate::{Camera, CameraSettings, PixelClaim, Scene, Tracer, MAX_GENERATIONS};

/// Errors raised while setting up or running a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("render needs at least one worker thread")]
    ZeroThreads,

    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("camera position and rotation must be finite")]
    InvalidPlacement,

    #[error("pixel {index} is outside a canvas of {len} pixels")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("pixel {index} was written twice")]
    DuplicateWrite { index: usize },

    #[error("failed to spawn render worker {worker}: {kind}")]
    Spawn {
        worker: usize,
        kind: std::io::ErrorKind,
    },

    #[error("render worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub camera: CameraSettings,
    /// Worker threads; 1 renders on the calling thread.
    pub threads: usize,
    /// Recursion bound for secondary rays.
    pub max_generations: u32,
    pub cull: CullStrategy,
    pub tone_mapping: ToneMapping,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            threads: 1,
            max_generations: MAX_GENERATIONS,
            cull: CullStrategy::None,
            tone_mapping: ToneMapping::Linear,
        }
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Pixels written.
    pub pixels: usize,
    pub threads: usize,
    pub elapsed: Duration,
    /// Largest channel value on the canvas.
    pub max_intensity: f32,
}

/// Render every pixel of `camera` with `threads` workers.
///
/// The scene behind `tracer` must not change while this runs, which the
/// shared borrow guarantees. Fails before any work starts if `threads` is
/// zero; otherwise reports the first worker failure once all have joined.
pub fn render(camera: &Camera, tracer: &Tracer<'_>, threads: usize) -> RenderResult<RenderStats> {
    if threads == 0 {
        return Err(RenderError::ZeroThreads);
    }

    let scene = tracer.scene();
    log::info!(
        "Rendering {}x{} with {} thread(s): {} surfaces, {} lights, {} channels",
        camera.width(),
        camera.height(),
        threads,
        scene.surfaces().len(),
        scene.lights().len(),
        scene.spectrum().channels()
    );

    let start = Instant::now();
    let pixels = if threads == 1 {
        run_worker(camera, tracer)?
    } else {
        render_pooled(camera, tracer, threads)?
    };
    let elapsed = start.elapsed();

    let max_intensity = camera.canvas().max_intensity();
    log::info!(
        "Rendered {} pixels in {:.2?} (max intensity {:.4})",
        pixels,
        elapsed,
        max_intensity
    );

    Ok(RenderStats {
        pixels,
        threads,
        elapsed,
        max_intensity,
    })
}

/// Build a camera from `config`, render `scene` into it and return both.
pub fn render_scene(scene: &Scene, config: &RenderConfig) -> RenderResult<(Camera, RenderStats)> {
    if config.threads == 0 {
        return Err(RenderError::ZeroThreads);
    }
    let camera = Camera::new(scene.spectrum(), &config.camera)?;
    let tracer = Tracer::new(scene)
        .with_max_generations(config.max_generations)
        .with_cull(config.cull);
    let stats = render(&camera, &tracer, config.threads)?;
    Ok((camera, stats))
}

fn render_pooled(camera: &Camera, tracer: &Tracer<'_>, threads: usize) -> RenderResult<usize> {
    thread::scope(|scope| -> RenderResult<usize> {
        let mut handles = Vec::with_capacity(threads);
        for worker in 0..threads {
            let handle = thread::Builder::new()
                .name(format!("prism-worker-{worker}"))
                .spawn_scoped(scope, move || run_worker(camera, tracer))
                .map_err(|err| RenderError::Spawn {
                    worker,
                    kind: err.kind(),
                })?;
            handles.push(handle);
        }

        let mut pixels = 0;
        let mut failure = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(count)) => {
                    log::debug!("Worker {} rendered {} pixels", worker, count);
                    pixels += count;
                }
                Ok(Err(err)) => {
                    failure.get_or_insert(err);
                }
                Err(_) => {
                    log::warn!("Render worker {} panicked", worker);
                    failure.get_or_insert(RenderError::WorkerPanicked { worker });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(pixels),
        }
    })
}

/// Claim, evaluate and store pixels until the camera is exhausted.
fn run_worker(camera: &Camera, tracer: &Tracer<'_>) -> RenderResult<usize> {
    let mut count = 0;
    while let PixelClaim::Pixel { index, task } = camera.spawn_ray() {
        let value = tracer.evaluate(&task);
        camera.canvas().write(index, value)?;
        count += 1;
    }
    Ok(count)
}

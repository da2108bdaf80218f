//! Prism renderer - CPU spectral ray tracing
//!
//! A deterministic Whitted-style tracer that carries a fixed set of spectral
//! channels through every bounce. Refraction splits rays into sub-rays per
//! refractive index, so dispersive materials separate colours.
//!
//! Typical use: build a [`Scene`], describe the shot with a [`RenderConfig`],
//! call [`render_scene`], then [`save_png`] the camera's canvas.

mod camera;
mod canvas;
mod intersection;
mod light;
mod output;
mod plane;
mod ray_info;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod transport;
mod triangle;

pub use camera::{Camera, CameraSettings, PixelClaim};
pub use canvas::Canvas;
pub use intersection::{CullStrategy, Hit, Intersection, SurfaceQuery, RELATIVE_TOLERANCE, TOLERANCE};
pub use light::{DirectionalLight, LightSource, PointLight};
pub use output::{
    linear_to_gamma, pixel_colour, save_png, to_rgba, OutputError, OutputResult, Rgba8, ToneMapping,
};
pub use plane::Plane;
pub use ray_info::{RayInfo, VACUUM_INDEX};
pub use renderer::{render, render_scene, RenderConfig, RenderError, RenderResult, RenderStats};
pub use scene::{LightId, Scene, SceneError, SceneResult};
pub use shape::{BindingId, Shape, Surface, SurfaceId};
pub use sphere::Sphere;
pub use transport::{reflect, refract, Tracer, CONTRIBUTION_THRESHOLD, MAX_GENERATIONS};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from prism_math
pub use prism_math::{Aabb, BoundingSphere, Interval, Ray, Vec2, Vec3};

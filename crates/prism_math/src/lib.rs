//! Prism math primitives.
//!
//! Re-exports `glam` and adds the small geometric types the tracer is built
//! on: rays with unit directions, open/closed intervals, axis-aligned boxes,
//! bounding spheres and a 3x3 solve that reports singular systems.

pub use glam::*;

mod aabb;
mod bounds;
mod interval;
mod linear;
mod ray;

pub use aabb::Aabb;
pub use bounds::{BoundingSphere, BOUND_PADDING};
pub use interval::Interval;
pub use linear::{rotation_from_degrees, solve3, SINGULAR_EPSILON};
pub use ray::Ray;

//! Prism Core - the spectral data model.
//!
//! This crate provides:
//!
//! - **Spectrum**: channel count and the display colour of each channel
//! - **SpectralIntensity**: per-channel intensity vectors with elementwise math
//! - **Material**: normalised optical coefficients and refraction groups
//! - **Bindings**: uniform and checkerboard material lookups by surface coordinate
//!
//! # Example
//!
//! ```
//! use prism_core::{Material, Spectrum};
//!
//! let spectrum = Spectrum::rgb();
//! let glossy = Material::uniform(&spectrum, 0.1, 0.6, 0.3, 0.0, 1.0).unwrap();
//! assert_eq!(glossy.groups().len(), 1);
//! ```

pub mod binding;
pub mod colour;
pub mod intensity;
pub mod material;
pub mod spectrum;

pub use binding::{Checkerboard, MaterialBinding, Uniform};
pub use colour::Colour;
pub use intensity::SpectralIntensity;
pub use material::{Coefficients, Material, MaterialError, MaterialId, MaterialResult, RefractionGroup};
pub use spectrum::{channels_in, ChannelMask, Spectrum, SpectrumError, SpectrumResult, MAX_CHANNELS};

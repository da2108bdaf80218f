//! Converting a finished canvas into a displayable image.
//!
//! Each channel is normalised by the canvas maximum, weighted by its display
//! colour and summed into RGB.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Canvas;
use prism_core::{Colour, SpectralIntensity, Spectrum};

/// Errors raised while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("canvas incomplete: {written} of {total} pixels written")]
    Incomplete { written: usize, total: usize },

    #[error("canvas has {canvas} channels but the spectrum has {spectrum}")]
    ChannelMismatch { canvas: usize, spectrum: usize },

    #[error("pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Mapping from normalised intensity to display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    #[default]
    Linear,
    /// Gamma 2.
    Gamma,
}

impl ToneMapping {
    #[inline]
    fn apply(self, normalised: f32) -> f32 {
        match self {
            ToneMapping::Linear => normalised.max(0.0),
            ToneMapping::Gamma => linear_to_gamma(normalised),
        }
    }
}

/// One 8-bit RGBA pixel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 255 };
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Display colour of one spectral value.
///
/// A non-positive `max_intensity` maps everything to black.
pub fn pixel_colour(
    value: &SpectralIntensity,
    colours: &[Colour],
    max_intensity: f32,
    tone: ToneMapping,
) -> Rgba8 {
    if max_intensity.is_nan() || max_intensity <= 0.0 {
        return Rgba8::BLACK;
    }

    let mut rgb = [0.0_f32; 3];
    for (&intensity, colour) in value.iter().zip(colours) {
        let weight = tone.apply(intensity / max_intensity);
        for (sum, component) in rgb.iter_mut().zip(colour.to_unit()) {
            *sum += weight * component;
        }
    }

    let [r, g, b] = rgb.map(|c| (255.0 * c.clamp(0.0, 1.0)) as u8);
    Rgba8 { r, g, b, a: 255 }
}

/// Convert the canvas to top-down RGBA8 bytes.
///
/// Canvas row 0 is the bottom of the view, so rows are flipped. Unwritten
/// pixels come out black.
pub fn to_rgba(canvas: &Canvas, spectrum: &Spectrum, tone: ToneMapping) -> OutputResult<Vec<u8>> {
    if canvas.channels() != spectrum.channels() {
        return Err(OutputError::ChannelMismatch {
            canvas: canvas.channels(),
            spectrum: spectrum.channels(),
        });
    }

    let width = canvas.width();
    let height = canvas.height();
    let max_intensity = canvas.max_intensity();
    let colours = spectrum.colours();

    let pixels: Vec<Rgba8> = (0..canvas.len())
        .into_par_iter()
        .map(|i| {
            let column = (i % width as usize) as u32;
            let row = height - 1 - (i / width as usize) as u32;
            canvas
                .pixel(column, row)
                .map_or(Rgba8::BLACK, |value| pixel_colour(value, colours, max_intensity, tone))
        })
        .collect();

    Ok(bytemuck::cast_slice(&pixels).to_vec())
}

/// Write a fully rendered canvas as a PNG.
pub fn save_png(
    path: impl AsRef<Path>,
    canvas: &Canvas,
    spectrum: &Spectrum,
    tone: ToneMapping,
) -> OutputResult<()> {
    if !canvas.is_complete() {
        return Err(OutputError::Incomplete {
            written: canvas.written(),
            total: canvas.len(),
        });
    }

    let (width, height) = (canvas.width(), canvas.height());
    let bytes = to_rgba(canvas, spectrum, tone)?;
    let image = image::RgbaImage::from_raw(width, height, bytes)
        .ok_or(OutputError::BufferSize { width, height })?;
    image.save_with_format(path.as_ref(), image::ImageFormat::Png)?;

    log::info!("Wrote {}x{} image to {}", width, height, path.as_ref().display());
    Ok(())
}

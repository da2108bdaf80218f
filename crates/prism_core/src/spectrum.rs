//! The spectrum: how many wavelength channels a scene carries and which
//! display colour each channel contributes to the final image.
//!
//! A [`Spectrum`] is built once at scene setup and shared read-only by every
//! component that needs the channel count or the channel colours.

use thiserror::Error;

use crate::{Colour, SpectralIntensity};

/// One bit per channel. Bit `i` set means channel `i` is carried.
pub type ChannelMask = u32;

/// Channel capacity: one channel per bit of [`ChannelMask`].
pub const MAX_CHANNELS: usize = ChannelMask::BITS as usize;

/// Errors raised while setting up spectra or building intensity vectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("a spectrum needs at least one channel")]
    NoChannels,

    #[error("{requested} channels requested but at most {capacity} are supported")]
    TooManyChannels { requested: usize, capacity: usize },

    #[error("expected {expected} channel values, got {found}")]
    LengthMismatch { expected: usize, found: usize },
}

pub type SpectrumResult<T> = Result<T, SpectrumError>;

/// Immutable channel configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    colours: Vec<Colour>,
}

impl Spectrum {
    /// Build a spectrum with one channel per colour.
    pub fn new(colours: Vec<Colour>) -> SpectrumResult<Self> {
        if colours.is_empty() {
            return Err(SpectrumError::NoChannels);
        }
        if colours.len() > MAX_CHANNELS {
            return Err(SpectrumError::TooManyChannels {
                requested: colours.len(),
                capacity: MAX_CHANNELS,
            });
        }
        log::debug!("Spectrum configured with {} channels", colours.len());
        Ok(Self { colours })
    }

    /// Red, green and blue channels.
    pub fn rgb() -> Self {
        Self {
            colours: vec![Colour::RED, Colour::GREEN, Colour::BLUE],
        }
    }

    /// Seven channels from red to violet.
    pub fn roygbiv() -> Self {
        Self {
            colours: vec![
                Colour::RED,
                Colour::ORANGE,
                Colour::YELLOW,
                Colour::GREEN,
                Colour::BLUE,
                Colour::INDIGO,
                Colour::VIOLET,
            ],
        }
    }

    /// A single white channel.
    pub fn greyscale() -> Self {
        Self {
            colours: vec![Colour::WHITE],
        }
    }

    /// Number of channels N.
    #[inline]
    pub fn channels(&self) -> usize {
        self.colours.len()
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Mask with every channel of this spectrum set.
    pub fn full_mask(&self) -> ChannelMask {
        ChannelMask::MAX >> (MAX_CHANNELS - self.channels())
    }

    /// All-zero intensity vector sized to this spectrum.
    pub fn zeros(&self) -> SpectralIntensity {
        SpectralIntensity::splat(self.channels(), 0.0)
    }

    /// Intensity vector with `value` on every channel.
    pub fn splat(&self, value: f32) -> SpectralIntensity {
        SpectralIntensity::splat(self.channels(), value)
    }

    /// Intensity vector holding exactly one value per channel.
    pub fn intensity(&self, values: &[f32]) -> SpectrumResult<SpectralIntensity> {
        if values.len() != self.channels() {
            return Err(SpectrumError::LengthMismatch {
                expected: self.channels(),
                found: values.len(),
            });
        }
        SpectralIntensity::try_from(values)
    }

    /// Check that an intensity vector was sized for this spectrum.
    pub fn check(&self, intensity: &SpectralIntensity) -> SpectrumResult<()> {
        if intensity.len() != self.channels() {
            return Err(SpectrumError::LengthMismatch {
                expected: self.channels(),
                found: intensity.len(),
            });
        }
        Ok(())
    }
}

/// Indices of the channels set in `mask`, lowest first.
pub fn channels_in(mask: ChannelMask) -> impl Iterator<Item = usize> {
    (0..MAX_CHANNELS).filter(move |&i| mask & (1 << i) != 0)
}

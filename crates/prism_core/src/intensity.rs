//! Per-channel intensity vectors.
//!
//! [`SpectralIntensity`] is the owning form: a fixed-capacity array sized to
//! the spectrum it was built for. Borrowed views are plain slices from
//! [`SpectralIntensity::as_slice`] and [`SpectralIntensity::as_mut_slice`],
//! which the in-place helpers accept so callers can work on storage they
//! own without copying.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign};

use crate::spectrum::{ChannelMask, SpectrumError, MAX_CHANNELS};

/// Channel-indexed intensities.
///
/// Arithmetic is elementwise between vectors of the same length and
/// broadcast for scalars. Channels past `len` are always zero.
#[derive(Clone, Copy, PartialEq)]
pub struct SpectralIntensity {
    values: [f32; MAX_CHANNELS],
    len: usize,
}

impl SpectralIntensity {
    /// Vector of `len` channels all holding `value`.
    ///
    /// `len` is clamped to [`MAX_CHANNELS`]; spectra are validated on
    /// construction so this only matters for hand-built vectors.
    pub fn splat(len: usize, value: f32) -> Self {
        let len = len.min(MAX_CHANNELS);
        let mut values = [0.0; MAX_CHANNELS];
        values[..len].fill(value);
        Self { values, len }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.as_slice().iter()
    }

    /// Whether any channel exceeds `value`.
    pub fn exceeds(&self, value: f32) -> bool {
        self.iter().any(|&v| v > value)
    }

    /// Whether any channel set in `mask` exceeds `value`.
    pub fn exceeds_in(&self, value: f32, mask: ChannelMask) -> bool {
        self.iter()
            .enumerate()
            .any(|(i, &v)| mask & (1 << i) != 0 && v > value)
    }

    /// Copy with every channel outside `mask` set to zero.
    pub fn masked(&self, mask: ChannelMask) -> Self {
        let mut out = *self;
        for (i, v) in out.as_mut_slice().iter_mut().enumerate() {
            if mask & (1 << i) == 0 {
                *v = 0.0;
            }
        }
        out
    }

    /// Largest channel value, ignoring NaN; zero for an empty vector.
    pub fn max_component(&self) -> f32 {
        self.iter().copied().fold(0.0, f32::max)
    }

    pub fn sum(&self) -> f32 {
        self.iter().sum()
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    /// Add this vector into externally owned storage of the same length.
    pub fn accumulate_into(&self, target: &mut [f32]) {
        debug_assert_eq!(target.len(), self.len, "channel count mismatch");
        for (t, v) in target.iter_mut().zip(self.iter()) {
            *t += v;
        }
    }

    /// Combine channel by channel. Both operands must have the same length;
    /// callers check this, and only debug builds assert it.
    fn zip_with(mut self, rhs: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        debug_assert_eq!(self.len, rhs.len, "channel count mismatch");
        for (a, b) in self.as_mut_slice().iter_mut().zip(rhs.as_slice()) {
            *a = f(*a, *b);
        }
        self
    }

    fn map(mut self, f: impl Fn(f32) -> f32) -> Self {
        for a in self.as_mut_slice() {
            *a = f(*a);
        }
        self
    }
}

impl TryFrom<&[f32]> for SpectralIntensity {
    type Error = SpectrumError;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        if values.len() > MAX_CHANNELS {
            return Err(SpectrumError::TooManyChannels {
                requested: values.len(),
                capacity: MAX_CHANNELS,
            });
        }
        let mut out = Self::splat(values.len(), 0.0);
        out.as_mut_slice().copy_from_slice(values);
        Ok(out)
    }
}

impl fmt::Debug for SpectralIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpectralIntensity").field(&self.as_slice()).finish()
    }
}

impl Index<usize> for SpectralIntensity {
    type Output = f32;

    fn index(&self, channel: usize) -> &f32 {
        &self.as_slice()[channel]
    }
}

impl IndexMut<usize> for SpectralIntensity {
    fn index_mut(&mut self, channel: usize) -> &mut f32 {
        &mut self.as_mut_slice()[channel]
    }
}

impl<'a> IntoIterator for &'a SpectralIntensity {
    type Item = &'a f32;
    type IntoIter = std::slice::Iter<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

macro_rules! impl_elementwise {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $f:expr) => {
        impl $op for SpectralIntensity {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                self.zip_with(&rhs, $f)
            }
        }

        impl $op<f32> for SpectralIntensity {
            type Output = Self;

            fn $method(self, rhs: f32) -> Self {
                self.map(|a| ($f)(a, rhs))
            }
        }

        impl $assign for SpectralIntensity {
            fn $assign_method(&mut self, rhs: Self) {
                *self = self.zip_with(&rhs, $f);
            }
        }

        impl $assign<f32> for SpectralIntensity {
            fn $assign_method(&mut self, rhs: f32) {
                *self = self.map(|a| ($f)(a, rhs));
            }
        }
    };
}

impl_elementwise!(Add, add, AddAssign, add_assign, |a: f32, b: f32| a + b);
impl_elementwise!(Sub, sub, SubAssign, sub_assign, |a: f32, b: f32| a - b);
impl_elementwise!(Mul, mul, MulAssign, mul_assign, |a: f32, b: f32| a * b);
impl_elementwise!(Div, div, DivAssign, div_assign, |a: f32, b: f32| a / b);

impl std::iter::Sum for SpectralIntensity {
    /// Sums a non-empty iterator; an empty one yields an empty vector.
    fn sum<I: Iterator<Item = Self>>(mut iter: I) -> Self {
        let Some(first) = iter.next() else {
            return Self::splat(0, 0.0);
        };
        iter.fold(first, |acc, v| acc + v)
    }
}

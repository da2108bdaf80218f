//! Per-pixel result storage.
//!
//! Every pixel slot is written at most once per render, by whichever worker
//! claimed that pixel, so writes need no lock: each slot is a `OnceLock` and
//! the running maximum is an atomic. Non-negative `f32` values order the same
//! way as their bit patterns, which lets `fetch_max` on the raw bits track the
//! maximum intensity.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::{RenderError, RenderResult};
use prism_core::SpectralIntensity;

/// Flat, row-major buffer of spectral results.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    channels: usize,
    slots: Vec<OnceLock<SpectralIntensity>>,
    max_bits: AtomicU32,
    written: AtomicUsize,
}

impl Canvas {
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            channels,
            slots: (0..len).map(|_| OnceLock::new()).collect(),
            max_bits: AtomicU32::new(0.0_f32.to_bits()),
            written: AtomicUsize::new(0),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store the result for pixel `index`.
    ///
    /// Fails if the index is out of range or the slot already holds a value.
    /// Negative or NaN channels do not lower the tracked maximum.
    pub fn write(&self, index: usize, value: SpectralIntensity) -> RenderResult<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(RenderError::SlotOutOfRange { index, len })?;
        let peak = value.max_component();
        if slot.set(value).is_err() {
            log::warn!("Pixel {} written twice; keeping the first value", index);
            return Err(RenderError::DuplicateWrite { index });
        }
        self.max_bits.fetch_max(peak.to_bits(), Ordering::Relaxed);
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Result for pixel `index`, if written.
    pub fn get(&self, index: usize) -> Option<&SpectralIntensity> {
        self.slots.get(index)?.get()
    }

    /// Result at (`column`, `row`), row 0 being the bottom row.
    pub fn pixel(&self, column: u32, row: u32) -> Option<&SpectralIntensity> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.get(row as usize * self.width as usize + column as usize)
    }

    /// Largest channel value written so far.
    pub fn max_intensity(&self) -> f32 {
        f32::from_bits(self.max_bits.load(Ordering::Relaxed))
    }

    /// Number of slots written.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    pub fn is_complete(&self) -> bool {
        self.written() == self.slots.len()
    }

    /// Clear every slot and the maximum.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.take();
        }
        *self.max_bits.get_mut() = 0.0_f32.to_bits();
        *self.written.get_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Spectrum;

    #[test]
    fn test_canvas_write_and_read() {
        let spectrum = Spectrum::rgb();
        let canvas = Canvas::new(3, 2, 3);
        assert_eq!(canvas.len(), 6);
        assert!(canvas.get(4).is_none());

        let value = spectrum.intensity(&[0.5, 2.0, 1.0]).unwrap();
        canvas.write(4, value).unwrap();
        assert_eq!(canvas.get(4), Some(&value));
        assert_eq!(canvas.pixel(1, 1), Some(&value));
        assert_eq!(canvas.max_intensity(), 2.0);
        assert_eq!(canvas.written(), 1);
        assert!(!canvas.is_complete());
    }

    #[test]
    fn test_canvas_rejects_duplicates_and_out_of_range() {
        let spectrum = Spectrum::greyscale();
        let canvas = Canvas::new(2, 2, 1);

        canvas.write(0, spectrum.splat(1.0)).unwrap();
        assert_eq!(
            canvas.write(0, spectrum.splat(9.0)),
            Err(RenderError::DuplicateWrite { index: 0 })
        );
        assert_eq!(
            canvas.write(4, spectrum.splat(1.0)),
            Err(RenderError::SlotOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(canvas.get(0), Some(&spectrum.splat(1.0)));
        assert_eq!(canvas.max_intensity(), 1.0);
        assert_eq!(canvas.written(), 1);
    }

    #[test]
    fn test_canvas_max_is_true_maximum() {
        let spectrum = Spectrum::rgb();
        let canvas = Canvas::new(4, 1, 3);
        let values = [[0.1, 0.2, 0.3], [4.0, 0.0, 1.0], [0.0, 3.5, 0.0], [2.0, 2.0, 2.0]];
        for (i, v) in values.iter().enumerate() {
            canvas.write(i, spectrum.intensity(v).unwrap()).unwrap();
        }
        assert_eq!(canvas.max_intensity(), 4.0);
        assert!(canvas.is_complete());
    }

    #[test]
    fn test_canvas_concurrent_disjoint_writes() {
        let spectrum = Spectrum::greyscale();
        let canvas = Canvas::new(64, 16, 1);
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let canvas = &canvas;
                let spectrum = &spectrum;
                scope.spawn(move || {
                    for index in (worker..canvas.len()).step_by(4) {
                        canvas.write(index, spectrum.splat(index as f32)).unwrap();
                    }
                });
            }
        });
        assert!(canvas.is_complete());
        assert_eq!(canvas.max_intensity(), (64 * 16 - 1) as f32);
    }

    #[test]
    fn test_canvas_reset() {
        let spectrum = Spectrum::greyscale();
        let mut canvas = Canvas::new(1, 1, 1);
        canvas.write(0, spectrum.splat(3.0)).unwrap();
        canvas.reset();

        assert!(canvas.get(0).is_none());
        assert_eq!(canvas.max_intensity(), 0.0);
        assert_eq!(canvas.written(), 0);
        canvas.write(0, spectrum.splat(1.0)).unwrap();
    }
}

//! Camera for primary ray generation.
//!
//! The camera enumerates pixels in raster order (columns, then rows) and
//! hands each out exactly once through [`Camera::spawn_ray`]. The raster
//! cursor is the only state shared between render workers and sits behind
//! a mutex that is held just long enough to read and advance it.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{Canvas, RayInfo, RenderError, RenderResult};
use prism_core::{ChannelMask, Spectrum};
use prism_math::{rotation_from_degrees, Ray, Vec3};

/// Camera placement and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Horizontal resolution in pixels.
    pub resolution: u32,
    /// Width over height; the vertical resolution is `resolution / aspect_ratio`.
    pub aspect_ratio: f32,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
    pub position: Vec3,
    /// Roll, pitch and yaw in degrees about X, Y and Z.
    pub rotation_degrees: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            resolution: 640,
            aspect_ratio: 16.0 / 9.0,
            fov_degrees: 70.0,
            position: Vec3::ZERO,
            rotation_degrees: Vec3::ZERO,
        }
    }
}

impl CameraSettings {
    /// Set horizontal resolution and aspect ratio.
    pub fn with_resolution(mut self, resolution: u32, aspect_ratio: f32) -> Self {
        self.resolution = resolution;
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation_degrees: Vec3) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    /// Vertical resolution, truncated.
    pub fn vertical_resolution(&self) -> u32 {
        (self.resolution as f32 / self.aspect_ratio) as u32
    }

    fn validate(&self) -> RenderResult<()> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RenderError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(RenderError::InvalidFieldOfView(self.fov_degrees));
        }
        let (width, height) = (self.resolution, self.vertical_resolution());
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        if !self.position.is_finite() || !self.rotation_degrees.is_finite() {
            return Err(RenderError::InvalidPlacement);
        }
        Ok(())
    }
}

/// Result of claiming the next pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelClaim {
    /// The caller now owns pixel `index` and must trace `task` for it.
    Pixel { index: usize, task: RayInfo },
    /// Every pixel has been handed out.
    Exhausted,
}

/// Position of the next pixel to hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RasterCursor {
    column: u32,
    row: u32,
}

/// Pinhole camera owning the canvas it renders into.
pub struct Camera {
    width: u32,
    height: u32,
    tan_half_h: f32,
    tan_half_v: f32,
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    channels: ChannelMask,
    cursor: Mutex<RasterCursor>,
    canvas: Canvas,
}

impl Camera {
    pub fn new(spectrum: &Spectrum, settings: &CameraSettings) -> RenderResult<Self> {
        settings.validate()?;
        let width = settings.resolution;
        let height = settings.vertical_resolution();

        let h_angle = settings.fov_degrees.to_radians();
        let v_angle = h_angle / settings.aspect_ratio;

        // X forward, Y left, Z up.
        let rotation = rotation_from_degrees(settings.rotation_degrees);
        let forward = (rotation * Vec3::X).normalize();
        let right = -(rotation * Vec3::Y).normalize();
        let up = (rotation * Vec3::Z).normalize();

        log::debug!(
            "Camera {}x{} at {:?}, forward {:?}",
            width,
            height,
            settings.position,
            forward
        );

        Ok(Self {
            width,
            height,
            tan_half_h: (h_angle / 2.0).tan(),
            tan_half_v: (v_angle / 2.0).tan(),
            position: settings.position,
            forward,
            right,
            up,
            channels: spectrum.full_mask(),
            cursor: Mutex::new(RasterCursor::default()),
            canvas: Canvas::new(width, height, spectrum.channels()),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Forward, right and up basis vectors.
    pub fn basis(&self) -> [Vec3; 3] {
        [self.forward, self.right, self.up]
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Primary ray through pixel (`column`, `row`).
    ///
    /// Column 0 is the left edge and row 0 the bottom edge of the view.
    pub fn ray_through(&self, column: u32, row: u32) -> Ray {
        let dx = Self::offset(column, self.width) * self.tan_half_h;
        let dy = Self::offset(row, self.height) * self.tan_half_v;
        Ray::new(self.position, self.forward + dx * self.right + dy * self.up)
    }

    /// Map `i` in `0..n` linearly onto [-1, 1]; a single pixel looks straight ahead.
    fn offset(i: u32, n: u32) -> f32 {
        if n <= 1 {
            return 0.0;
        }
        2.0 * i as f32 / (n - 1) as f32 - 1.0
    }

    /// Claim the pixel under the raster cursor and advance it.
    ///
    /// Safe to call from many threads; each pixel index is returned once.
    pub fn spawn_ray(&self) -> PixelClaim {
        let claimed = {
            let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
            if cursor.row >= self.height {
                return PixelClaim::Exhausted;
            }
            let claimed = *cursor;
            cursor.column += 1;
            if cursor.column == self.width {
                cursor.column = 0;
                cursor.row += 1;
            }
            claimed
        };

        let index = claimed.row as usize * self.width as usize + claimed.column as usize;
        let task = RayInfo::primary(self.ray_through(claimed.column, claimed.row), self.channels);
        PixelClaim::Pixel { index, task }
    }

    /// Rewind the cursor and clear the canvas for another render.
    pub fn reset(&mut self) {
        *self.cursor.get_mut().unwrap_or_else(PoisonError::into_inner) = RasterCursor::default();
        self.canvas.reset();
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("position", &self.position)
            .field("forward", &self.forward)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(settings: CameraSettings) -> Camera {
        Camera::new(&Spectrum::rgb(), &settings).unwrap()
    }

    #[test]
    fn test_vertical_resolution_from_aspect() {
        let settings = CameraSettings::default().with_resolution(160, 2.0);
        assert_eq!(settings.vertical_resolution(), 80);
        let cam = camera(settings);
        assert_eq!((cam.width(), cam.height()), (160, 80));
        assert_eq!(cam.pixel_count(), 12800);
        assert_eq!(cam.canvas().len(), 12800);
    }

    #[test]
    fn test_invalid_settings() {
        let spectrum = Spectrum::rgb();
        let bad = [
            CameraSettings::default().with_resolution(0, 1.0),
            CameraSettings::default().with_resolution(10, 20.0),
            CameraSettings::default().with_resolution(10, 0.0),
            CameraSettings::default().with_fov(180.0),
            CameraSettings::default().with_fov(-5.0),
            CameraSettings::default().with_position(Vec3::splat(f32::NAN)),
        ];
        for settings in bad {
            assert!(Camera::new(&spectrum, &settings).is_err(), "{settings:?}");
        }
    }

    #[test]
    fn test_default_basis() {
        let cam = camera(CameraSettings::default());
        let [forward, right, up] = cam.basis();
        assert!((forward - Vec3::X).length() < 1e-6);
        assert!((right + Vec3::Y).length() < 1e-6);
        assert!((up - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_and_centre_rays() {
        let settings = CameraSettings::default()
            .with_resolution(5, 1.0)
            .with_fov(90.0)
            .with_position(Vec3::new(1.0, 2.0, 3.0));
        let cam = camera(settings);

        let centre = cam.ray_through(2, 2);
        assert_eq!(centre.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((centre.direction - Vec3::X).length() < 1e-6);

        // tan(45 deg) = 1, so corners sit at forward + right/left + up/down.
        let bottom_left = cam.ray_through(0, 0);
        let expected = Vec3::new(1.0, 1.0, -1.0).normalize();
        assert!((bottom_left.direction - expected).length() < 1e-6);

        let top_right = cam.ray_through(4, 4);
        let expected = Vec3::new(1.0, -1.0, 1.0).normalize();
        assert!((top_right.direction - expected).length() < 1e-6);
    }

    #[test]
    fn test_pitch_tilts_view_down() {
        let cam = camera(CameraSettings::default().with_rotation(Vec3::new(0.0, 20.0, 0.0)));
        let [forward, _, up] = cam.basis();
        assert!(forward.z < 0.0);
        assert!(up.x > 0.0);
        assert!(forward.dot(up).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_ray_raster_order() {
        let cam = camera(CameraSettings::default().with_resolution(3, 1.5));
        assert_eq!(cam.height(), 2);

        let mut indices = Vec::new();
        while let PixelClaim::Pixel { index, task } = cam.spawn_ray() {
            assert_eq!(task.generation, 0);
            assert_eq!(task.channels, 0b111);
            let (column, row) = (index as u32 % 3, index as u32 / 3);
            assert_eq!(task.ray, cam.ray_through(column, row));
            indices.push(index);
        }
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(cam.spawn_ray(), PixelClaim::Exhausted);
        assert_eq!(cam.spawn_ray(), PixelClaim::Exhausted);
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut cam = camera(CameraSettings::default().with_resolution(2, 2.0));
        while matches!(cam.spawn_ray(), PixelClaim::Pixel { .. }) {}
        cam.reset();
        assert!(matches!(cam.spawn_ray(), PixelClaim::Pixel { index: 0, .. }));
    }
}

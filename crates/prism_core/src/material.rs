//! Optical materials.
//!
//! A [`Material`] stores four per-channel coefficients (absorptivity,
//! diffusivity, specularity, transmissivity) normalised so they sum to one on
//! every channel, plus the refractive index of each channel. Channels sharing
//! an index are collected into [`RefractionGroup`]s so a transmitted ray is
//! split into one sub-ray per distinct index.

use thiserror::Error;

use crate::spectrum::{channels_in, ChannelMask, Spectrum};
use crate::SpectralIntensity;

/// Errors raised while building a material.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("{name} has {found} channels but the spectrum has {expected}")]
    ChannelMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{name} on channel {channel} is negative or not finite")]
    InvalidCoefficient { name: &'static str, channel: usize },

    #[error("all optical coefficients are zero on channel {channel}")]
    AllZero { channel: usize },
}

pub type MaterialResult<T> = Result<T, MaterialError>;

/// Handle to a material stored in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

impl MaterialId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Raw, unnormalised per-channel inputs to [`Material::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    pub absorptivity: SpectralIntensity,
    pub diffusivity: SpectralIntensity,
    pub specularity: SpectralIntensity,
    pub transmissivity: SpectralIntensity,
    pub refractive_index: SpectralIntensity,
}

impl Coefficients {
    /// The same five values on every channel of `spectrum`.
    pub fn uniform(
        spectrum: &Spectrum,
        absorptivity: f32,
        diffusivity: f32,
        specularity: f32,
        transmissivity: f32,
        refractive_index: f32,
    ) -> Self {
        Self {
            absorptivity: spectrum.splat(absorptivity),
            diffusivity: spectrum.splat(diffusivity),
            specularity: spectrum.splat(specularity),
            transmissivity: spectrum.splat(transmissivity),
            refractive_index: spectrum.splat(refractive_index),
        }
    }
}

/// Channels refracted together because they share one refractive index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefractionGroup {
    pub mask: ChannelMask,
    pub refractive_index: f32,
}

/// Normalised optical response of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    absorptivity: SpectralIntensity,
    diffusivity: SpectralIntensity,
    specularity: SpectralIntensity,
    transmissivity: SpectralIntensity,
    refractive_index: SpectralIntensity,
    groups: Vec<RefractionGroup>,
}

impl Material {
    /// Normalise `raw` and partition the channels into refraction groups.
    ///
    /// Refractive indices below 1 are clamped to 1.
    pub fn new(spectrum: &Spectrum, raw: Coefficients) -> MaterialResult<Self> {
        let expected = spectrum.channels();
        let inputs = [
            ("absorptivity", &raw.absorptivity),
            ("diffusivity", &raw.diffusivity),
            ("specularity", &raw.specularity),
            ("transmissivity", &raw.transmissivity),
            ("refractive index", &raw.refractive_index),
        ];
        for (name, values) in inputs {
            if values.len() != expected {
                return Err(MaterialError::ChannelMismatch {
                    name,
                    expected,
                    found: values.len(),
                });
            }
            if let Some(channel) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
                return Err(MaterialError::InvalidCoefficient { name, channel });
            }
        }

        let total = raw.absorptivity + raw.diffusivity + raw.specularity + raw.transmissivity;
        if let Some(channel) = total.iter().position(|&t| t == 0.0) {
            return Err(MaterialError::AllZero { channel });
        }
        if let Some(channel) = total.iter().position(|t| !t.is_finite()) {
            return Err(MaterialError::InvalidCoefficient {
                name: "coefficient total",
                channel,
            });
        }

        let mut refractive_index = raw.refractive_index;
        for n in refractive_index.as_mut_slice() {
            *n = n.max(1.0);
        }
        let groups = refraction_groups(&refractive_index);
        log::debug!(
            "Material built with {} refraction group(s) over {} channels",
            groups.len(),
            expected
        );

        Ok(Self {
            absorptivity: raw.absorptivity / total,
            diffusivity: raw.diffusivity / total,
            specularity: raw.specularity / total,
            transmissivity: raw.transmissivity / total,
            refractive_index,
            groups,
        })
    }

    /// Same coefficients on every channel.
    pub fn uniform(
        spectrum: &Spectrum,
        absorptivity: f32,
        diffusivity: f32,
        specularity: f32,
        transmissivity: f32,
        refractive_index: f32,
    ) -> MaterialResult<Self> {
        Self::new(
            spectrum,
            Coefficients::uniform(
                spectrum,
                absorptivity,
                diffusivity,
                specularity,
                transmissivity,
                refractive_index,
            ),
        )
    }

    /// Black body: absorbs everything.
    pub fn absorber(spectrum: &Spectrum) -> Self {
        Self::preset(spectrum, [1.0, 0.0, 0.0, 0.0], 1.0)
    }

    /// Perfect diffuse reflector.
    pub fn diffuse(spectrum: &Spectrum) -> Self {
        Self::preset(spectrum, [0.0, 1.0, 0.0, 0.0], 1.0)
    }

    /// Perfect mirror.
    pub fn mirror(spectrum: &Spectrum) -> Self {
        Self::preset(spectrum, [0.0, 0.0, 1.0, 0.0], 1.0)
    }

    /// Clear material with refractive index `n` on every channel.
    pub fn refractor(spectrum: &Spectrum, refractive_index: f32) -> Self {
        Self::preset(spectrum, [0.0, 0.0, 0.0, 1.0], refractive_index)
    }

    /// Material responding only on the channels in `mask`.
    ///
    /// Channels outside `mask` absorb everything but keep the same refractive
    /// index, so they never form a refraction group of their own.
    #[allow(clippy::too_many_arguments)]
    pub fn tinted(
        spectrum: &Spectrum,
        mask: ChannelMask,
        absorptivity: f32,
        diffusivity: f32,
        specularity: f32,
        transmissivity: f32,
        refractive_index: f32,
    ) -> MaterialResult<Self> {
        let mut raw = Coefficients::uniform(
            spectrum,
            absorptivity,
            diffusivity,
            specularity,
            transmissivity,
            refractive_index,
        );
        let outside = spectrum.full_mask() & !mask;
        for channel in channels_in(outside) {
            raw.absorptivity[channel] = 1.0;
            raw.diffusivity[channel] = 0.0;
            raw.specularity[channel] = 0.0;
            raw.transmissivity[channel] = 0.0;
        }
        Self::new(spectrum, raw)
    }

    // Fixed non-negative coefficients with a positive sum; only `n` needs sanitising.
    fn preset(spectrum: &Spectrum, [a, d, s, t]: [f32; 4], n: f32) -> Self {
        let n = if n.is_finite() { n.max(1.0) } else { 1.0 };
        let raw = Coefficients::uniform(spectrum, a, d, s, t, n);
        let total = spectrum.splat(a + d + s + t);
        let refractive_index = raw.refractive_index;
        Self {
            absorptivity: raw.absorptivity / total,
            diffusivity: raw.diffusivity / total,
            specularity: raw.specularity / total,
            transmissivity: raw.transmissivity / total,
            refractive_index,
            groups: refraction_groups(&refractive_index),
        }
    }

    pub fn absorptivity(&self) -> &SpectralIntensity {
        &self.absorptivity
    }

    pub fn diffusivity(&self) -> &SpectralIntensity {
        &self.diffusivity
    }

    pub fn specularity(&self) -> &SpectralIntensity {
        &self.specularity
    }

    pub fn transmissivity(&self) -> &SpectralIntensity {
        &self.transmissivity
    }

    /// Per-channel refractive index (clamped to at least 1).
    pub fn refractive_index(&self) -> &SpectralIntensity {
        &self.refractive_index
    }

    /// One group per distinct refractive index; group 0 holds channel 0.
    pub fn groups(&self) -> &[RefractionGroup] {
        &self.groups
    }

    /// The distinct refractive indices, in group order.
    pub fn distinct_indices(&self) -> impl Iterator<Item = f32> + '_ {
        self.groups.iter().map(|g| g.refractive_index)
    }
}

/// Partition channels by refractive index, in increasing channel order.
///
/// Channel 0 seeds group 0; each later channel joins the first group with an
/// identical index or opens a new one.
fn refraction_groups(indices: &SpectralIntensity) -> Vec<RefractionGroup> {
    let mut groups: Vec<RefractionGroup> = Vec::new();
    for (channel, &n) in indices.iter().enumerate() {
        let bit: ChannelMask = 1 << channel;
        match groups.iter_mut().find(|g| g.refractive_index == n) {
            Some(group) => group.mask |= bit,
            None => groups.push(RefractionGroup {
                mask: bit,
                refractive_index: n,
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_energy_conserved(material: &Material, channels: usize) {
        for c in 0..channels {
            let sum = material.absorptivity()[c]
                + material.diffusivity()[c]
                + material.specularity()[c]
                + material.transmissivity()[c];
            assert!((sum - 1.0).abs() < 1e-6, "channel {c} sums to {sum}");
        }
    }

    fn assert_partition(material: &Material, full: ChannelMask) {
        let groups = material.groups();
        let mut union = 0;
        for (i, a) in groups.iter().enumerate() {
            for b in &groups[i + 1..] {
                assert_eq!(a.mask & b.mask, 0, "groups overlap");
            }
            union |= a.mask;
        }
        assert_eq!(union, full);
        assert_ne!(groups[0].mask & 1, 0, "group 0 must hold channel 0");
    }

    #[test]
    fn test_coefficients_are_normalised() {
        let spectrum = Spectrum::rgb();
        let material = Material::uniform(&spectrum, 1.0, 2.0, 3.0, 4.0, 1.5).unwrap();

        assert_energy_conserved(&material, 3);
        assert!((material.diffusivity()[0] - 0.2).abs() < 1e-6);
        assert!((material.transmissivity()[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_random_materials_conserve_energy_and_partition() {
        let spectrum = Spectrum::roygbiv();
        let mut rng = StdRng::seed_from_u64(7);
        let palette = [1.0, 1.33, 1.5, 1.52, 0.8];

        for _ in 0..100 {
            let mut random = |hi: f32| {
                let values: Vec<f32> = (0..7).map(|_| rng.gen_range(0.0..hi)).collect();
                spectrum.intensity(&values).unwrap()
            };
            let absorptivity = random(1.0);
            let diffusivity = random(1.0);
            let specularity = random(1.0);
            let transmissivity = random(1.0) + 0.01;
            let indices: Vec<f32> = (0..7)
                .map(|_| palette[rng.gen_range(0..palette.len())])
                .collect();
            let raw = Coefficients {
                absorptivity,
                diffusivity,
                specularity,
                transmissivity,
                refractive_index: spectrum.intensity(&indices).unwrap(),
            };

            let material = Material::new(&spectrum, raw).unwrap();
            assert_energy_conserved(&material, 7);
            assert_partition(&material, spectrum.full_mask());
        }
    }

    #[test]
    fn test_all_zero_channel_is_rejected() {
        let spectrum = Spectrum::rgb();
        let mut raw = Coefficients::uniform(&spectrum, 0.2, 0.3, 0.0, 0.5, 1.0);
        raw.absorptivity[1] = 0.0;
        raw.diffusivity[1] = 0.0;
        raw.transmissivity[1] = 0.0;

        assert_eq!(
            Material::new(&spectrum, raw),
            Err(MaterialError::AllZero { channel: 1 })
        );
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let spectrum = Spectrum::rgb();

        let mut raw = Coefficients::uniform(&spectrum, 0.5, 0.5, 0.0, 0.0, 1.0);
        raw.specularity[2] = -0.1;
        assert_eq!(
            Material::new(&spectrum, raw),
            Err(MaterialError::InvalidCoefficient {
                name: "specularity",
                channel: 2
            })
        );

        let mut raw = Coefficients::uniform(&spectrum, 0.5, 0.5, 0.0, 0.0, 1.0);
        raw.diffusivity = Spectrum::greyscale().splat(1.0);
        assert!(matches!(
            Material::new(&spectrum, raw),
            Err(MaterialError::ChannelMismatch { found: 1, expected: 3, .. })
        ));
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let spectrum = Spectrum::rgb();
        let mut raw = Coefficients::uniform(&spectrum, 0.5, 0.5, 0.0, 0.0, 1.0);
        raw.diffusivity[1] = f32::MAX;
        raw.specularity[1] = f32::MAX;

        assert_eq!(
            Material::new(&spectrum, raw),
            Err(MaterialError::InvalidCoefficient {
                name: "coefficient total",
                channel: 1
            })
        );

        // Large but finite totals still normalise.
        let mut raw = Coefficients::uniform(&spectrum, 0.5, 0.5, 0.0, 0.0, 1.0);
        raw.diffusivity[1] = f32::MAX / 4.0;
        let material = Material::new(&spectrum, raw).unwrap();
        assert!(material.diffusivity()[1] > 0.99 && material.diffusivity()[1] <= 1.0);
    }

    #[test]
    fn test_dispersive_groups() {
        let spectrum = Spectrum::rgb();
        let mut raw = Coefficients::uniform(&spectrum, 0.05, 0.0, 0.1, 0.85, 1.0);
        raw.refractive_index = spectrum.intensity(&[1.50, 1.53, 1.50]).unwrap();

        let material = Material::new(&spectrum, raw).unwrap();
        let groups = material.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mask, 0b101);
        assert_eq!(groups[0].refractive_index, 1.50);
        assert_eq!(groups[1].mask, 0b010);
        assert_eq!(material.distinct_indices().collect::<Vec<_>>(), vec![1.50, 1.53]);
    }

    #[test]
    fn test_indices_below_one_are_clamped() {
        let spectrum = Spectrum::rgb();
        let mut raw = Coefficients::uniform(&spectrum, 0.0, 0.0, 0.0, 1.0, 1.0);
        raw.refractive_index = spectrum.intensity(&[0.5, 1.0, 0.9]).unwrap();

        let material = Material::new(&spectrum, raw).unwrap();
        assert_eq!(material.groups().len(), 1);
        assert_eq!(material.groups()[0].refractive_index, 1.0);
        assert_eq!(material.groups()[0].mask, 0b111);
    }

    #[test]
    fn test_presets() {
        let spectrum = Spectrum::rgb();

        assert_eq!(Material::absorber(&spectrum).absorptivity()[0], 1.0);
        assert_eq!(Material::diffuse(&spectrum).diffusivity()[1], 1.0);
        assert_eq!(Material::mirror(&spectrum).specularity()[2], 1.0);

        let glass = Material::refractor(&spectrum, 1.5);
        assert_eq!(glass.transmissivity()[0], 1.0);
        assert_eq!(glass.groups().len(), 1);
        assert_eq!(glass.groups()[0].refractive_index, 1.5);
    }

    #[test]
    fn test_tinted_material() {
        let spectrum = Spectrum::rgb();
        let red = Material::tinted(&spectrum, 0b001, 0.0, 1.0, 0.0, 0.0, 1.0).unwrap();

        assert_eq!(red.diffusivity().as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(red.absorptivity().as_slice(), &[0.0, 1.0, 1.0]);
        assert_eq!(red.groups().len(), 1);
        assert_energy_conserved(&red, 3);
    }
}

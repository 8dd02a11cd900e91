use fastnoise_lite::{FastNoiseLite, NoiseType};
use std::f64::consts::TAU;

use ralli_geom::{inverse_lerp, smoothstep01};

use crate::config::RoadGenParams;

/// Two-band height field: masked short bumps over long rolling hills.
pub struct ElevationField {
    enabled: bool,
    base_y: f64,
    seed_offset: f64,
    small_omega: f64,
    large_omega: f64,
    small_amplitude: f64,
    large_amplitude: f64,
    patch_length: f64,
    bump_threshold: f64,
    mask: FastNoiseLite,
}

impl ElevationField {
    pub fn new(params: &RoadGenParams) -> Self {
        let mut mask = FastNoiseLite::with_seed(params.seed);
        mask.set_noise_type(Some(NoiseType::Perlin));
        mask.set_frequency(Some(1.0));
        Self {
            enabled: params.enable_hills,
            base_y: params.origin.y,
            seed_offset: f64::from(params.seed) * 0.137,
            small_omega: TAU / params.small_bump_wavelength.max(6.0),
            large_omega: TAU / params.large_hill_wavelength.max(60.0),
            small_amplitude: params.small_bump_amplitude,
            large_amplitude: params.large_hill_amplitude,
            patch_length: params.small_bump_patch_length.max(20.0),
            bump_threshold: 1.0 - params.small_bump_occurrence.clamp(0.0, 1.0),
            mask,
        }
    }

    #[inline]
    pub fn base_y(&self) -> f64 {
        self.base_y
    }

    /// Mask in `[0, 1]` deciding where short bumps are active.
    pub fn bump_mask(&self, s: f64) -> f64 {
        let x = (s + self.seed_offset * 97.0) / self.patch_length;
        let n = self.mask.get_noise_2d(x as f32, 0.37);
        let n01 = (f64::from(n) * 0.5 + 0.5).clamp(0.0, 1.0);
        smoothstep01(inverse_lerp(self.bump_threshold, 1.0, n01))
    }

    pub fn height_at(&self, s: f64) -> f64 {
        if !self.enabled {
            return self.base_y;
        }
        let so = self.seed_offset;
        let small_phase = (s + so * 17.0) * self.small_omega;
        let large_a = (s + so * 53.0) * self.large_omega;
        let large_b = (s + so * 29.0) * (self.large_omega * 0.45);
        let small = small_phase.sin() * self.small_amplitude * self.bump_mask(s);
        let large = (large_a.sin() * 0.7 + large_b.sin() * 0.3) * self.large_amplitude;
        self.base_y + small + large
    }
}

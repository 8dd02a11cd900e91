//! Integrates the piece schedule into the append-only sample buffer.

use std::sync::Arc;

use ralli_geom::{Vec3, lerp, move_towards, smoothstep01};

use crate::config::RoadGenParams;
use crate::designed::DesignedPiecePool;
use crate::sample::{RoadFrame, RoadSample, frame_at, nearest_sample_index};
use crate::sequencer::{PieceSequencer, SequencerState};

pub struct RoadSynth {
    params: RoadGenParams,
    sequencer: PieceSequencer,
    state: SequencerState,
    samples: Vec<RoadSample>,
}

impl RoadSynth {
    pub fn new(params: &RoadGenParams, pool: Option<Arc<DesignedPiecePool>>) -> Self {
        let mut synth = Self {
            params: params.clone(),
            sequencer: PieceSequencer::new(params, pool),
            state: SequencerState::default(),
            samples: Vec::new(),
        };
        synth.reset();
        synth
    }

    /// Drops every sample and the sequencer cursor, re-seeding sample 0 at the origin.
    pub fn reset(&mut self) {
        self.state = SequencerState::default();
        self.samples.clear();
        self.samples.push(RoadSample::origin(self.params.origin));
    }

    #[inline]
    pub fn params(&self) -> &RoadGenParams {
        &self.params
    }

    #[inline]
    pub fn sample_distance(&self) -> f64 {
        self.params.sample_distance
    }

    #[inline]
    pub fn samples(&self) -> &[RoadSample] {
        &self.samples
    }

    #[inline]
    pub fn sequencer_state(&self) -> &SequencerState {
        &self.state
    }

    pub fn sequencer(&self) -> &PieceSequencer {
        &self.sequencer
    }

    /// Appends samples until `target_index` exists; never touches existing ones.
    pub fn ensure_samples_up_to(&mut self, target_index: usize) {
        while self.samples.len() <= target_index {
            let i = self.samples.len();
            let prev = self.samples[i - 1];
            let next = self.step(&prev, i);
            self.samples.push(next);
        }
    }

    fn step(&mut self, prev: &RoadSample, index: usize) -> RoadSample {
        let p = &self.params;
        let sd = p.sample_distance;
        let s = index as f64 * sd;

        let raw_rate = self.sequencer.turn_rate_at(&mut self.state, s);
        let designed = self.state.current.is_designed();
        let turn_rate = lerp(prev.turn_rate, raw_rate, p.turn_rate_response);
        let yaw = prev.tangent.yaw_deg() + turn_rate * sd;
        let forward = Vec3::from_yaw_deg(yaw);

        let mut slope = 0.0;
        if p.enable_hills || designed {
            let h_now = self.sequencer.target_elevation(&self.state, s);
            let h_prev = self.sequencer.target_elevation(&self.state, prev.s);
            let max = p.max_slope_angle_deg;
            let target = (h_now - h_prev).atan2(sd).to_degrees().clamp(-max, max);
            slope = lerp(prev.slope_angle, target, p.slope_response);
        }
        let (sin_s, cos_s) = slope.to_radians().sin_cos();
        let tangent = (forward * cos_s + Vec3::UP * sin_s).normalized();

        let bank_target = lerp(prev.bank_target_angle, raw_bank_target(p, turn_rate), p.bank_target_response);
        let bank = move_towards(prev.bank_angle, bank_target, p.bank_change_rate * sd);

        let mut right_flat = Vec3::UP.cross(tangent).normalized();
        if right_flat.length_sq() < 1e-4 {
            right_flat = prev.right;
        }
        let up = Vec3::UP.rotated_about(tangent, bank).normalized();
        let right = right_flat.rotated_about(tangent, bank).normalized();

        RoadSample {
            s,
            position: prev.position + tangent * sd,
            tangent,
            right,
            up,
            bank_angle: bank,
            bank_target_angle: bank_target,
            turn_rate,
            slope_angle: slope,
            designed,
        }
    }

    /// Interpolated frame at `s`, or `None` when `s` is negative or not generated yet.
    pub fn frame_at(&self, s: f64) -> Option<RoadFrame> {
        frame_at(&self.samples, self.params.sample_distance, s)
    }

    pub fn nearest_sample_index(&self, p: Vec3) -> Option<usize> {
        nearest_sample_index(&self.samples, p)
    }
}

/// Unsmoothed bank angle for a turn rate; banks into the curve.
pub fn raw_bank_target(p: &RoadGenParams, turn_rate: f64) -> f64 {
    let abs_rate = turn_rate.abs();
    if abs_rate <= p.bank_turn_rate_deadzone || p.max_turn_rate <= 0.001 {
        return 0.0;
    }
    let denom = (p.max_turn_rate - p.bank_turn_rate_deadzone).max(0.001);
    let t = smoothstep01((abs_rate - p.bank_turn_rate_deadzone) / denom);
    -turn_rate.signum() * p.max_bank_angle.min(p.bank_from_curvature) * t
}

use ralli_geom::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadSample {
    pub s: f64,
    pub position: Vec3,
    pub tangent: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub bank_angle: f64,
    pub bank_target_angle: f64,
    pub turn_rate: f64,
    pub slope_angle: f64,
    /// Generated while a designed piece was current.
    pub designed: bool,
}

impl RoadSample {
    /// Seed sample at the corridor origin, heading +Z.
    pub fn origin(position: Vec3) -> Self {
        Self {
            s: 0.0,
            position,
            tangent: Vec3::FORWARD,
            right: Vec3::RIGHT,
            up: Vec3::UP,
            bank_angle: 0.0,
            bank_target_angle: 0.0,
            turn_rate: 0.0,
            slope_angle: 0.0,
            designed: false,
        }
    }
}

/// World-space pose of the road at an arbitrary arc length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadFrame {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub turn_rate: f64,
}

impl From<&RoadSample> for RoadFrame {
    fn from(s: &RoadSample) -> Self {
        Self {
            position: s.position,
            forward: s.tangent,
            right: s.right,
            up: s.up,
            turn_rate: s.turn_rate,
        }
    }
}

/// Interpolated frame between evenly spaced samples; `None` outside `[0, last.s]`.
pub fn frame_at(samples: &[RoadSample], sample_distance: f64, s: f64) -> Option<RoadFrame> {
    let last = samples.last()?;
    if !s.is_finite() || s < 0.0 || s > last.s || sample_distance <= 0.0 {
        return None;
    }
    let f = s / sample_distance;
    let i = (f.floor() as usize).min(samples.len() - 1);
    if i + 1 >= samples.len() {
        return Some(RoadFrame::from(&samples[i]));
    }
    let a = &samples[i];
    let b = &samples[i + 1];
    let t = (f - i as f64).clamp(0.0, 1.0);
    Some(RoadFrame {
        position: a.position.lerp(b.position, t),
        forward: a.tangent.lerp(b.tangent, t).normalized(),
        right: a.right.lerp(b.right, t).normalized(),
        up: a.up.lerp(b.up, t).normalized(),
        turn_rate: a.turn_rate + (b.turn_rate - a.turn_rate) * t,
    })
}

/// Index of the sample closest to `p`.
pub fn nearest_sample_index(samples: &[RoadSample], p: Vec3) -> Option<usize> {
    samples
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.position - p)
                .length_sq()
                .total_cmp(&(b.position - p).length_sq())
        })
        .map(|(i, _)| i)
}

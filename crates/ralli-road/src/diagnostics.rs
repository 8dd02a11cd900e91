use ralli_geom::angle_between;

use crate::layout::ChunkLayout;
use crate::sample::RoadSample;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothnessReport {
    pub samples: usize,
    pub max_step_error: f64,
    pub max_tangent_delta_deg: f64,
    pub max_bank_step_deg: f64,
    pub max_seam_kink_deg: f64,
    pub worst_seam_chunk: Option<i32>,
}

pub fn measure_smoothness(
    samples: &[RoadSample],
    layouts: &[ChunkLayout],
    sample_distance: f64,
) -> SmoothnessReport {
    let mut r = SmoothnessReport {
        samples: samples.len(),
        ..Default::default()
    };
    for w in samples.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        r.max_step_error = r
            .max_step_error
            .max((a.position.distance(b.position) - sample_distance).abs());
        r.max_tangent_delta_deg = r.max_tangent_delta_deg.max(angle_between(a.tangent, b.tangent));
        r.max_bank_step_deg = r.max_bank_step_deg.max((b.bank_angle - a.bank_angle).abs());
    }
    for l in layouts {
        let k = l.sample_end;
        if k == 0 || k + 1 >= samples.len() {
            continue;
        }
        let inbound = samples[k].position - samples[k - 1].position;
        let outbound = samples[k + 1].position - samples[k].position;
        let kink = angle_between(inbound, outbound);
        if kink > r.max_seam_kink_deg {
            r.max_seam_kink_deg = kink;
            r.worst_seam_chunk = Some(l.index);
        }
    }
    r
}

/// Logs the report, warning when a seam kink exceeds `kink_warning_deg`.
pub fn log_smoothness(r: &SmoothnessReport, kink_warning_deg: f64) {
    log::info!(
        "road smoothness: samples={} step_err={:.5} tangent_delta={:.3}deg bank_step={:.3}deg seam_kink={:.3}deg",
        r.samples,
        r.max_step_error,
        r.max_tangent_delta_deg,
        r.max_bank_step_deg,
        r.max_seam_kink_deg
    );
    if r.max_seam_kink_deg > kink_warning_deg {
        log::warn!(
            "seam kink {:.3}deg at end of chunk {:?} exceeds {:.3}deg",
            r.max_seam_kink_deg,
            r.worst_seam_chunk,
            kink_warning_deg
        );
    }
}

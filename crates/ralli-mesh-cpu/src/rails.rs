//! Guard-rail placement along the outside of curves.

use ralli_geom::{Vec3, delta_angle};
use ralli_road::RoadGenParams;
use ralli_road::config::Rails;
use ralli_road::sample::{RoadSample, frame_at};

use crate::mesh_build::MeshBuild;
use crate::railing::{RailFrame, build_beam_mesh, build_rect_collider_mesh};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RailSide {
    Left,
    Right,
}

impl RailSide {
    /// Sign of the lateral offset along the road's `right` vector.
    #[inline]
    pub fn lateral_sign(self) -> f64 {
        match self {
            RailSide::Left => -1.0,
            RailSide::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailMark {
    pub s: f64,
    pub side: Option<RailSide>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailSpan {
    pub start_s: f64,
    pub end_s: f64,
    pub side: RailSide,
}

/// Signed horizontal heading change in radians per meter; positive turns right.
pub fn compute_signed_curvature(prev_forward: Vec3, next_forward: Vec3, distance: f64) -> f64 {
    let a = prev_forward.flat();
    let b = next_forward.flat();
    if a.length_sq() < 1e-4 || b.length_sq() < 1e-4 || distance <= 1e-4 {
        return 0.0;
    }
    delta_angle(a.yaw_deg(), b.yaw_deg()).to_radians() / distance
}

/// Rails go on the outside of the turn.
pub fn classify_side(
    curvature: f64,
    min_curvature: f64,
    is_designed: bool,
    only_designed: bool,
) -> Option<RailSide> {
    if only_designed && !is_designed {
        return None;
    }
    if curvature.abs() < min_curvature.max(0.0) {
        return None;
    }
    Some(if curvature > 0.0 {
        RailSide::Left
    } else {
        RailSide::Right
    })
}

pub fn build_spans(marks: &[RailMark], min_span_length: f64) -> Vec<RailSpan> {
    let min_len = min_span_length.max(0.0);
    let mut spans = Vec::new();
    let mut open: Option<RailSpan> = None;
    let mut close = |open: &mut Option<RailSpan>| {
        if let Some(span) = open.take() {
            if span.end_s - span.start_s >= min_len {
                spans.push(span);
            }
        }
    };
    for m in marks {
        let Some(side) = m.side else {
            close(&mut open);
            continue;
        };
        if let Some(span) = open.as_mut() {
            if span.side == side {
                span.end_s = m.s;
                continue;
            }
        }
        close(&mut open);
        open = Some(RailSpan {
            start_s: m.s,
            end_s: m.s,
            side,
        });
    }
    close(&mut open);
    spans
}

/// 0 at the span ends, ramping to 1 over `drop_distance`.
pub fn compute_end_drop01(s: f64, start_s: f64, end_s: f64, drop_distance: f64) -> f64 {
    let drop = drop_distance.max(0.0);
    if drop <= 1e-4 || end_s <= start_s {
        return 1.0;
    }
    ((s - start_s).min(end_s - s) / drop).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailPost {
    pub position: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

#[derive(Clone, Debug)]
pub struct RailPlacement {
    pub span: RailSpan,
    pub beam: MeshBuild,
    pub collider: MeshBuild,
    pub posts: Vec<RailPost>,
}

fn designed_at(samples: &[RoadSample], sample_distance: f64, s: f64) -> bool {
    let i = (s / sample_distance).round().max(0.0) as usize;
    samples.get(i.min(samples.len().saturating_sub(1))).is_some_and(|x| x.designed)
}

/// Marks every `sample_spacing` meters across `[start_s, end_s]`.
pub fn mark_range(
    params: &RoadGenParams,
    samples: &[RoadSample],
    start_s: f64,
    end_s: f64,
) -> Vec<RailMark> {
    let cfg = &params.rails;
    let sd = params.sample_distance;
    let step = cfg.sample_spacing;
    let mut marks = Vec::new();
    let mut k = 0usize;
    loop {
        let s = (start_s + k as f64 * step).min(end_s);
        let ahead = (s + step).min(end_s);
        let behind = (ahead - step).max(0.0);
        let side = match (frame_at(samples, sd, behind), frame_at(samples, sd, ahead)) {
            (Some(a), Some(b)) => classify_side(
                compute_signed_curvature(a.forward, b.forward, ahead - behind),
                cfg.min_curvature_for_rail,
                designed_at(samples, sd, s),
                cfg.only_on_designed_pieces,
            ),
            _ => None,
        };
        marks.push(RailMark { s, side });
        if s >= end_s {
            break;
        }
        k += 1;
    }
    marks
}

fn rail_frames(params: &RoadGenParams, samples: &[RoadSample], span: &RailSpan) -> Vec<RailFrame> {
    let cfg: &Rails = &params.rails;
    let sd = params.sample_distance;
    let sign = span.side.lateral_sign();
    let lateral = params.safe_zone() * sign;
    let mut frames = Vec::new();
    let mut k = 0usize;
    loop {
        let s = (span.start_s + k as f64 * cfg.sample_spacing).min(span.end_s);
        if let Some(f) = frame_at(samples, sd, s) {
            let drop01 = compute_end_drop01(s, span.start_s, span.end_s, cfg.end_drop_distance);
            let base = f.position + f.right * lateral - f.up * params.shoulder_drop;
            frames.push(RailFrame {
                s,
                position: base + f.up * (cfg.beam_mount_height * drop01),
                inward: f.right * -sign,
                up: f.up,
            });
        }
        if s >= span.end_s {
            break;
        }
        k += 1;
    }
    frames
}

fn rail_posts(params: &RoadGenParams, samples: &[RoadSample], span: &RailSpan) -> Vec<RailPost> {
    let cfg = &params.rails;
    let sign = span.side.lateral_sign();
    let lateral = params.safe_zone() * sign + sign * cfg.post_depth * 0.5;
    let mut posts = Vec::new();
    let mut s = span.start_s;
    while s <= span.end_s + 1e-9 {
        if let Some(f) = frame_at(samples, params.sample_distance, s) {
            posts.push(RailPost {
                position: f.position + f.right * lateral - f.up * params.shoulder_drop,
                up: f.up,
                forward: f.forward,
                width: cfg.post_width,
                depth: cfg.post_depth,
                height: cfg.post_height
                    * compute_end_drop01(s, span.start_s, span.end_s, cfg.end_drop_distance).max(0.25),
            });
        }
        s += cfg.post_spacing;
    }
    posts
}

/// Rails for the chunk covering `[start_s, end_s]`; `samples` is the full buffer.
pub fn build_chunk_rails(
    params: &RoadGenParams,
    samples: &[RoadSample],
    start_s: f64,
    end_s: f64,
) -> Vec<RailPlacement> {
    let cfg = &params.rails;
    if !cfg.enable || end_s <= start_s {
        return Vec::new();
    }
    let marks = mark_range(params, samples, start_s, end_s);
    build_spans(&marks, cfg.min_span_length)
        .into_iter()
        .filter_map(|span| {
            let frames = rail_frames(params, samples, &span);
            let beam = build_beam_mesh(
                &frames,
                cfg.beam_depth,
                cfg.beam_height,
                cfg.beam_flange_thickness,
                cfg.beam_taper,
            )?;
            let collider = build_rect_collider_mesh(&frames, cfg.beam_depth, cfg.beam_height)?;
            Some(RailPlacement {
                posts: rail_posts(params, samples, &span),
                span,
                beam,
                collider,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(s: f64, side: Option<RailSide>) -> RailMark {
        RailMark { s, side }
    }

    #[test]
    fn spans_merge_same_side_and_close_on_none() {
        let r = Some(RailSide::Right);
        let marks = [
            mark(0.0, r),
            mark(2.0, r),
            mark(4.0, None),
            mark(6.0, r),
            mark(8.0, None),
        ];
        let spans = build_spans(&marks, 2.0);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start_s, 0.0);
        assert_eq!(spans[0].end_s, 2.0);
        assert_eq!(spans[0].side, RailSide::Right);
    }

    #[test]
    fn side_change_splits_span() {
        let l = Some(RailSide::Left);
        let r = Some(RailSide::Right);
        let marks = [mark(0.0, l), mark(5.0, l), mark(6.0, r), mark(12.0, r)];
        let spans = build_spans(&marks, 1.0);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].side, RailSide::Left);
        assert_eq!(spans[1].start_s, 6.0);
        assert_eq!(spans[1].end_s, 12.0);
    }

    #[test]
    fn end_drop_ramps() {
        assert_eq!(compute_end_drop01(10.0, 10.0, 30.0, 4.0), 0.0);
        assert_eq!(compute_end_drop01(30.0, 10.0, 30.0, 4.0), 0.0);
        assert_eq!(compute_end_drop01(20.0, 10.0, 30.0, 4.0), 1.0);
        assert!((compute_end_drop01(12.0, 10.0, 30.0, 4.0) - 0.5).abs() < 1e-12);
        assert_eq!(compute_end_drop01(12.0, 10.0, 30.0, 0.0), 1.0);
    }

    #[test]
    fn classify_outside_of_turn() {
        assert_eq!(classify_side(0.01, 0.001, false, false), Some(RailSide::Left));
        assert_eq!(classify_side(-0.01, 0.001, false, false), Some(RailSide::Right));
        assert_eq!(classify_side(0.0005, 0.001, false, false), None);
        assert_eq!(classify_side(0.01, 0.001, false, true), None);
        assert_eq!(classify_side(0.01, 0.001, true, true), Some(RailSide::Left));
    }

    #[test]
    fn curvature_sign_follows_heading() {
        let right_turn = compute_signed_curvature(Vec3::FORWARD, Vec3::from_yaw_deg(10.0), 5.0);
        assert!(right_turn > 0.0);
        assert!((right_turn - 10f64.to_radians() / 5.0).abs() < 1e-12);
        assert_eq!(compute_signed_curvature(Vec3::UP, Vec3::FORWARD, 5.0), 0.0);
        assert_eq!(compute_signed_curvature(Vec3::FORWARD, Vec3::FORWARD, 0.0), 0.0);
    }
}

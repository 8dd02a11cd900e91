//! Lateral cross-section of the corridor and its curvature compression.

use ralli_road::RoadGenParams;

const MERGE_EPS: f64 = 1e-4;
const PRESENT_EPS: f64 = 0.001;
const MIN_COMPRESSION_EXTENT: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceTag {
    Asphalt,
    Shoulder,
    Ditch,
    ForestFloor,
    Skirt,
    Underside,
    Rail,
}

/// One cross-section vertex: signed offset along `right`, drop along `-up`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfilePoint {
    pub lateral: f64,
    pub drop: f64,
    pub tag: SurfaceTag,
}

impl ProfilePoint {
    #[inline]
    const fn new(lateral: f64, drop: f64, tag: SurfaceTag) -> Self {
        Self { lateral, drop, tag }
    }
}

fn push_point(points: &mut Vec<ProfilePoint>, p: ProfilePoint) {
    if let Some(last) = points.last_mut() {
        if (last.lateral - p.lateral).abs() < MERGE_EPS && (last.drop - p.drop).abs() < MERGE_EPS {
            *last = p;
            return;
        }
    }
    points.push(p);
}

/// Ordered left to right, symmetric about the centerline.
pub fn build_profile(p: &RoadGenParams) -> Vec<ProfilePoint> {
    use SurfaceTag::*;

    let half = p.half_road_width();
    let forest_drop = -p.forest_floor_y_offset;
    let has_shoulder = p.shoulder_width > PRESENT_EPS;
    let has_ditch = p.ditch_width > PRESENT_EPS;
    let has_forest = p.collidable_forest_width > PRESENT_EPS;
    let has_skirt = p.drop_skirt_depth > PRESENT_EPS;
    if !(has_shoulder || has_ditch || has_forest || has_skirt) {
        return vec![ProfilePoint::new(-half, 0.0, Asphalt), ProfilePoint::new(half, 0.0, Asphalt)];
    }

    let shoulder_outer = half + p.shoulder_width;
    let ditch_outer = shoulder_outer + p.ditch_width;
    let forest_outer = ditch_outer + p.collidable_forest_width;
    let side_width = ((p.ditch_width - p.ditch_bottom_flat_width) * 0.5).max(0.0);
    let bottom_inner = shoulder_outer + side_width;
    let bottom_outer = ditch_outer - side_width;
    let bottom_drop = p.shoulder_drop.max(forest_drop) + p.ditch_depth;
    let has_flat_bottom = p.ditch_bottom_flat_width > PRESENT_EPS;

    // Right half from the road edge outward; the left half mirrors it.
    let mut half_profile = Vec::with_capacity(8);
    half_profile.push(ProfilePoint::new(shoulder_outer, p.shoulder_drop, Shoulder));
    if has_ditch {
        if has_flat_bottom {
            half_profile.push(ProfilePoint::new(bottom_inner, bottom_drop, Ditch));
        }
        half_profile.push(ProfilePoint::new(bottom_outer, bottom_drop, Ditch));
        half_profile.push(ProfilePoint::new(ditch_outer, forest_drop, Ditch));
    }
    if has_forest {
        half_profile.push(ProfilePoint::new(forest_outer, forest_drop, ForestFloor));
    }
    if has_skirt {
        half_profile.push(ProfilePoint::new(forest_outer, forest_drop + p.drop_skirt_depth, Skirt));
    }

    let mut points = Vec::with_capacity(half_profile.len() * 2 + 2);
    for hp in half_profile.iter().rev() {
        push_point(&mut points, ProfilePoint::new(-hp.lateral, hp.drop, hp.tag));
    }
    push_point(&mut points, ProfilePoint::new(-half, 0.0, Asphalt));
    push_point(&mut points, ProfilePoint::new(half, 0.0, Asphalt));
    for hp in &half_profile {
        push_point(&mut points, *hp);
    }
    points
}

/// Tag of the strip between two adjacent profile points: the outer point wins,
/// and for a vertical edge the lower one.
pub fn segment_tag(a: &ProfilePoint, b: &ProfilePoint) -> SurfaceTag {
    let (la, lb) = (a.lateral.abs(), b.lateral.abs());
    if (la - lb).abs() < MERGE_EPS {
        if a.drop >= b.drop { a.tag } else { b.tag }
    } else if la > lb {
        a.tag
    } else {
        b.tag
    }
}

/// Per-point normals in `(right, up)` space from the neighbouring slope.
pub fn profile_normals(profile: &[ProfilePoint]) -> Vec<(f64, f64)> {
    let n = profile.len();
    (0..n)
        .map(|i| {
            let prev = &profile[i.saturating_sub(1)];
            let next = &profile[(i + 1).min(n - 1)];
            let dx = next.lateral - prev.lateral;
            let dy = next.drop - prev.drop;
            let slope = if dx.abs() > 1e-4 { dy / dx } else { 0.0 };
            let len = (slope * slope + 1.0).sqrt();
            (slope / len, 1.0 / len)
        })
        .collect()
}

/// Pulls inside-of-curve offsets beyond the road and shoulder toward the centerline
/// so tight curves do not fold the outer strips over themselves.
pub fn adjust_lateral_for_curvature(p: &RoadGenParams, lateral: f64, turn_rate_deg: f64) -> f64 {
    let rate_rad = turn_rate_deg.abs().to_radians();
    if rate_rad < 1e-4 {
        return lateral;
    }
    let radius = 1.0 / rate_rad;
    let inside_sign = turn_rate_deg.signum();
    let inside = lateral * inside_sign;
    if inside <= 0.0 {
        return lateral;
    }
    let safe_zone = p.safe_zone();
    if inside <= safe_zone {
        return lateral;
    }
    let max_extent = compression_extent(p, turn_rate_deg);
    let requested = inside - safe_zone;
    let compressed = if max_extent < MIN_COMPRESSION_EXTENT {
        0.0
    } else {
        max_extent * (1.0 - (-requested / max_extent).exp())
    };
    (safe_zone + compressed) * inside_sign
}

/// Asymptotic extent beyond the safe zone allowed on the inside of a curve.
pub fn compression_extent(p: &RoadGenParams, turn_rate_deg: f64) -> f64 {
    let rate_rad = turn_rate_deg.abs().to_radians();
    if rate_rad < 1e-4 {
        return f64::INFINITY;
    }
    (p.compression_radius_factor / rate_rad - p.safe_zone()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_symmetric_and_tagged() {
        let p = RoadGenParams::default();
        let prof = build_profile(&p);
        let n = prof.len();
        assert!(n >= 10);
        for i in 0..n {
            let a = prof[i];
            let b = prof[n - 1 - i];
            assert!((a.lateral + b.lateral).abs() < 1e-12);
            assert_eq!(a.drop, b.drop);
            assert_eq!(a.tag, b.tag);
        }
        assert_eq!(prof[0].tag, SurfaceTag::Skirt);
        let mid = n / 2;
        assert_eq!(segment_tag(&prof[mid - 1], &prof[mid]), SurfaceTag::Asphalt);
        assert_eq!(segment_tag(&prof[0], &prof[1]), SurfaceTag::Skirt);
        assert_eq!(segment_tag(&prof[1], &prof[2]), SurfaceTag::ForestFloor);
    }

    #[test]
    fn bare_road_has_two_points() {
        let mut p = RoadGenParams::default();
        p.shoulder_width = 0.0;
        p.ditch_width = 0.0;
        p.collidable_forest_width = 0.0;
        p.drop_skirt_depth = 0.0;
        let prof = build_profile(&p);
        assert_eq!(prof.len(), 2);
        assert!(prof.iter().all(|q| q.tag == SurfaceTag::Asphalt));
    }

    #[test]
    fn coincident_points_merge() {
        let mut p = RoadGenParams::default();
        p.ditch_depth = 0.0;
        p.shoulder_drop = 0.0;
        p.forest_floor_y_offset = 0.0;
        p.ditch_width = 0.0;
        let prof = build_profile(&p);
        for w in prof.windows(2) {
            let same = (w[0].lateral - w[1].lateral).abs() < MERGE_EPS
                && (w[0].drop - w[1].drop).abs() < MERGE_EPS;
            assert!(!same);
        }
    }

    #[test]
    fn flat_bottom_adds_points() {
        let mut p = RoadGenParams::default();
        let v = build_profile(&p).len();
        p.ditch_bottom_flat_width = 0.8;
        assert_eq!(build_profile(&p).len(), v + 2);
    }

    #[test]
    fn outside_and_safe_zone_are_untouched() {
        let p = RoadGenParams::default();
        assert_eq!(adjust_lateral_for_curvature(&p, -9.0, 2.0), -9.0);
        assert_eq!(adjust_lateral_for_curvature(&p, 3.0, 2.0), 3.0);
        assert_eq!(adjust_lateral_for_curvature(&p, 9.0, 0.0), 9.0);
    }
}

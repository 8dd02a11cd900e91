//! Swept meshes for guard-rail beams and their box colliders.

use ralli_geom::Vec3;

use crate::mesh_build::MeshBuild;
use crate::profile::SurfaceTag;

const SOFTEN: f64 = 0.45;

/// Mounting frame for one ring of the swept profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailFrame {
    pub s: f64,
    pub position: Vec3,
    /// Points from the rail back toward the road.
    pub inward: Vec3,
    pub up: Vec3,
}

/// Closed corrugated profile as `(inward, up)` pairs, fitted to `depth` x `height`.
pub fn w_beam_profile(depth: f64, height: f64, flange_thickness: f64) -> Vec<(f64, f64)> {
    let depth = depth.max(0.02);
    let height = height.max(0.02);
    let thickness = flange_thickness.clamp(0.005, height * 0.4);
    let hh = height * 0.5;
    let ht = thickness * 0.5;
    let raw = [
        (0.00, 0.36, ht),
        (0.25, -0.98, ht),
        (0.50, 0.82, ht),
        (0.75, -0.95, ht),
        (1.00, 0.62, ht),
        (1.00, 0.62, -ht),
        (0.75, -0.95, -ht),
        (0.50, 0.82, -ht),
        (0.25, -0.98, -ht),
        (0.00, 0.36, -ht),
    ];
    // Quarter turn so the corrugation runs along the post.
    let rotated: Vec<(f64, f64)> = raw
        .iter()
        .map(|&(x, y, off)| {
            let (px, py) = (x * depth, y * hh + off);
            (-py, px)
        })
        .collect();
    let n = rotated.len();
    let softened: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let p = rotated[i];
            let a = rotated[(i + n - 1) % n];
            let b = rotated[(i + 1) % n];
            let mid = ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5);
            (p.0 + (mid.0 - p.0) * SOFTEN, p.1 + (mid.1 - p.1) * SOFTEN)
        })
        .collect();
    fit_to_bounds(&softened, depth, height)
}

fn fit_to_bounds(points: &[(f64, f64)], depth: f64, height: f64) -> Vec<(f64, f64)> {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let w = (max_x - min_x).max(1e-4);
    let h = (max_y - min_y).max(1e-4);
    points
        .iter()
        .map(|&(x, y)| {
            let nx = (x - min_x) / w;
            let ny = (y - min_y) / h;
            (nx * depth, (ny - 0.5) * height)
        })
        .collect()
}

/// Sweeps a closed profile along `frames`; `scale_at` shrinks individual rings.
fn sweep(frames: &[RailFrame], profile: &[(f64, f64)], scale_at: impl Fn(usize) -> f64) -> MeshBuild {
    let ring = profile.len();
    let mut mesh = MeshBuild::default();
    mesh.reserve(frames.len() * ring, (frames.len() - 1) * ring * 2);
    for (i, f) in frames.iter().enumerate() {
        let inward = f.inward.normalized();
        let up = f.up.normalized();
        let k = scale_at(i);
        for &(x, y) in profile {
            mesh.push_vertex(f.position + inward * (x * k) + up * (y * k), Vec3::ZERO, (0.0, f.s));
        }
    }
    for i in 0..frames.len() - 1 {
        let a = (i * ring) as u32;
        let b = ((i + 1) * ring) as u32;
        for j in 0..ring as u32 {
            let jn = (j + 1) % ring as u32;
            mesh.push_quad(a + j, a + jn, b + j, b + jn, SurfaceTag::Rail);
        }
    }
    mesh.recalculate_normals();
    mesh
}

/// Beam mesh with `frames.len() * 10` vertices; `None` below two frames.
pub fn build_beam_mesh(
    frames: &[RailFrame],
    depth: f64,
    height: f64,
    flange_thickness: f64,
    taper: f64,
) -> Option<MeshBuild> {
    if frames.len() < 2 {
        return None;
    }
    let profile = w_beam_profile(depth, height, flange_thickness);
    let taper = taper.max(0.0);
    let (first_s, last_s) = (frames[0].s, frames[frames.len() - 1].s);
    Some(sweep(frames, &profile, |i| {
        if taper <= 1e-4 {
            return 1.0;
        }
        let s = frames[i].s;
        ((s - first_s).min(last_s - s) / taper).clamp(0.0, 1.0)
    }))
}

/// Rectangular collider swept along the beam; `None` below two frames.
pub fn build_rect_collider_mesh(frames: &[RailFrame], depth: f64, height: f64) -> Option<MeshBuild> {
    if frames.len() < 2 {
        return None;
    }
    let d = depth.max(0.01);
    let hh = (height * 0.5).max(0.01);
    let profile = [(0.0, hh), (d, hh), (d, -hh), (0.0, -hh)];
    Some(sweep(frames, &profile, |_| 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_fits_requested_bounds() {
        let prof = w_beam_profile(0.24, 0.28, 0.055);
        assert_eq!(prof.len(), 10);
        let max_x = prof.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_x = prof.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_y = prof.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let min_y = prof.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        assert!(min_x.abs() < 1e-12 && (max_x - 0.24).abs() < 1e-12);
        assert!((min_y + 0.14).abs() < 1e-12 && (max_y - 0.14).abs() < 1e-12);
    }

    #[test]
    fn tiny_dimensions_are_clamped() {
        let prof = w_beam_profile(0.0, 0.0, 1.0);
        let max_x = prof.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        assert!((max_x - 0.02).abs() < 1e-12);
    }
}

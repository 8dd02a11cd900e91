//! Area-weighted tree scattering over forest-floor triangles.

use ralli_geom::Vec3;
use ralli_road::{HashStream, RoadGenParams, RoadSample};

use crate::mesh_build::MeshBuild;
use crate::profile::SurfaceTag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    Birch,
    Pine,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreePlacement {
    pub position: Vec3,
    pub species: TreeSpecies,
    pub yaw_deg: f64,
    pub collider_width: f64,
    pub collider_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub cumulative_area: f64,
}

impl ForestTriangle {
    /// Uniform point for two independent rolls in `[0, 1)`.
    #[inline]
    pub fn sample(&self, r1: f64, r2: f64) -> Vec3 {
        let sr1 = r1.sqrt();
        let u = 1.0 - sr1;
        let v = sr1 * (1.0 - r2);
        let w = sr1 * r2;
        self.a * u + self.b * v + self.c * w
    }
}

/// Forest-floor triangles facing up by at least `min_up_dot`, with running area totals.
pub fn collect_forest_triangles(mesh: &MeshBuild, min_up_dot: f64) -> Vec<ForestTriangle> {
    let mut out = Vec::new();
    let mut total = 0.0;
    for (_, [a, b, c]) in mesh.triangles_with_tag(SurfaceTag::ForestFloor) {
        let cross = (b - a).cross(c - a);
        let twice_area = cross.length();
        if twice_area <= 1e-12 {
            continue;
        }
        if (cross / twice_area).dot(Vec3::UP) < min_up_dot {
            continue;
        }
        total += twice_area * 0.5;
        out.push(ForestTriangle {
            a,
            b,
            c,
            cumulative_area: total,
        });
    }
    out
}

/// Triangle whose cumulative-area bucket contains `roll * total`.
pub fn pick_triangle(tris: &[ForestTriangle], roll: f64) -> Option<&ForestTriangle> {
    let total = tris.last()?.cumulative_area;
    let target = roll.clamp(0.0, 1.0) * total;
    let i = tris.partition_point(|t| t.cumulative_area < target);
    tris.get(i.min(tris.len() - 1))
}

/// Unsigned lateral offset of `p` from the closest centerline sample.
pub fn lateral_from_centerline(samples: &[RoadSample], p: Vec3) -> Option<f64> {
    let nearest = samples.iter().min_by(|a, b| {
        (a.position - p)
            .flat()
            .length_sq()
            .total_cmp(&(b.position - p).flat().length_sq())
    })?;
    Some((p - nearest.position).dot(nearest.right.flat().normalized()).abs())
}

#[derive(Clone, Debug, Default)]
pub struct ScatterOutcome {
    pub trees: Vec<TreePlacement>,
    pub eligible_triangles: usize,
    pub attempts: usize,
}

/// Scatters trees for one chunk. `neighbours` holds trunk positions already placed
/// in adjacent chunks; `samples` is the chunk's own centerline.
pub fn scatter_forest(
    params: &RoadGenParams,
    chunk_index: i32,
    mesh: &MeshBuild,
    samples: &[RoadSample],
    neighbours: &[Vec3],
) -> ScatterOutcome {
    let tris = collect_forest_triangles(mesh, params.forest_min_up_dot);
    let mut outcome = ScatterOutcome {
        eligible_triangles: tris.len(),
        ..Default::default()
    };
    if tris.is_empty() || params.trees_per_chunk == 0 {
        return outcome;
    }

    let mut rng = HashStream::new(params.seed as u32, chunk_index);
    let min_lateral = params.ditch_outer() + params.ditch_clearance;
    let min_d2 = params.trunk_safe_radius * params.trunk_safe_radius;
    let max_attempts = params.trees_per_chunk * params.attempts_multiplier;

    while outcome.attempts < max_attempts && outcome.trees.len() < params.trees_per_chunk {
        outcome.attempts += 1;
        let tri_roll = rng.next01();
        let (r1, r2) = (rng.next01(), rng.next01());
        let species_roll = rng.next01();
        let yaw = rng.range(0.0, 360.0);

        let Some(tri) = pick_triangle(&tris, tri_roll) else {
            break;
        };
        let p = tri.sample(r1, r2);

        let crowded = neighbours
            .iter()
            .chain(outcome.trees.iter().map(|t| &t.position))
            .any(|q| (*q - p).flat().length_sq() < min_d2);
        if crowded {
            continue;
        }
        match lateral_from_centerline(samples, p) {
            Some(lat) if lat >= min_lateral => {}
            _ => continue,
        }

        outcome.trees.push(TreePlacement {
            position: p,
            species: if species_roll < params.birch_ratio {
                TreeSpecies::Birch
            } else {
                TreeSpecies::Pine
            },
            yaw_deg: yaw,
            collider_width: params.tree_collider_width,
            collider_height: params.tree_collider_height,
        });
    }
    log::trace!(
        target: "forest",
        "chunk {} placed {} trees in {} attempts over {} triangles",
        chunk_index,
        outcome.trees.len(),
        outcome.attempts,
        outcome.eligible_triangles
    );
    outcome
}

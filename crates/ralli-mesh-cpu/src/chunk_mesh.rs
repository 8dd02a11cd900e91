use ralli_geom::{Aabb, Vec3};
use ralli_road::{RoadGenParams, RoadSample};

use crate::mesh_build::MeshBuild;
use crate::profile::{
    ProfilePoint, SurfaceTag, adjust_lateral_for_curvature, build_profile, profile_normals,
    segment_tag,
};

const UV_V_PER_METER: f64 = 0.1;

/// Cross-section shared by every chunk of a session.
#[derive(Clone, Debug)]
pub struct CrossSection {
    pub points: Vec<ProfilePoint>,
    pub normals: Vec<(f64, f64)>,
    pub segment_tags: Vec<SurfaceTag>,
}

impl CrossSection {
    pub fn new(params: &RoadGenParams) -> Self {
        let points = build_profile(params);
        let normals = profile_normals(&points);
        let segment_tags = points.windows(2).map(|w| segment_tag(&w[0], &w[1])).collect();
        Self {
            points,
            normals,
            segment_tags,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct ChunkMeshes {
    pub visual: MeshBuild,
    pub collider: MeshBuild,
    pub bounds: Aabb,
}

#[inline]
fn profile_vertex(params: &RoadGenParams, sample: &RoadSample, point: &ProfilePoint) -> Vec3 {
    let lateral = adjust_lateral_for_curvature(params, point.lateral, sample.turn_rate);
    sample.position + sample.right * lateral - sample.up * point.drop
}

/// Visual slab (top, bottom, outer walls) and top-surface collider over `samples`,
/// which covers one chunk inclusive of both seam samples.
pub fn build_chunk_meshes(
    params: &RoadGenParams,
    section: &CrossSection,
    samples: &[RoadSample],
) -> Option<ChunkMeshes> {
    let rows = samples.len();
    let cols = section.len();
    if rows < 2 || cols < 2 {
        return None;
    }
    let thickness = params.road_thickness.max(0.05);
    let stride = cols * 2;

    let mut visual = MeshBuild::default();
    visual.reserve(rows * stride, (rows - 1) * ((cols - 1) * 4 + 4));
    let mut collider = MeshBuild::default();
    collider.reserve(rows * cols, (rows - 1) * (cols - 1) * 2);

    for sample in samples {
        let v = sample.s * UV_V_PER_METER;
        let mut bottoms = Vec::with_capacity(cols);
        for (j, point) in section.points.iter().enumerate() {
            let top = profile_vertex(params, sample, point);
            let (nr, nu) = section.normals[j];
            let n = (sample.right * nr + sample.up * nu).normalized();
            let u = j as f64 / (cols - 1) as f64;
            visual.push_vertex(top, n, (u, v));
            collider.push_vertex(top, n, (u, v));
            bottoms.push((top - sample.up * thickness, -n, (u, v)));
        }
        for (p, n, uv) in bottoms {
            visual.push_vertex(p, n, uv);
        }
    }

    let cols32 = cols as u32;
    for i in 0..rows - 1 {
        let a_row = (i * stride) as u32;
        let b_row = ((i + 1) * stride) as u32;
        let ca = (i * cols) as u32;
        let cb = ((i + 1) * cols) as u32;
        for j in 0..cols32 - 1 {
            let tag = section.segment_tags[j as usize];
            visual.push_quad(a_row + j, a_row + j + 1, b_row + j, b_row + j + 1, tag);
            collider.push_quad(ca + j, ca + j + 1, cb + j, cb + j + 1, tag);

            let (a0, a1) = (a_row + cols32 + j, a_row + cols32 + j + 1);
            let (b0, b1) = (b_row + cols32 + j, b_row + cols32 + j + 1);
            visual.push_triangle(a0, a1, b0, SurfaceTag::Underside);
            visual.push_triangle(a1, b1, b0, SurfaceTag::Underside);
        }

        // Outer walls joining top and bottom rows.
        let (lt_a, lb_a) = (a_row, a_row + cols32);
        let (lt_b, lb_b) = (b_row, b_row + cols32);
        visual.push_triangle(lt_a, lb_a, lt_b, SurfaceTag::Underside);
        visual.push_triangle(lb_a, lb_b, lt_b, SurfaceTag::Underside);
        let (rt_a, rb_a) = (a_row + cols32 - 1, a_row + 2 * cols32 - 1);
        let (rt_b, rb_b) = (b_row + cols32 - 1, b_row + 2 * cols32 - 1);
        visual.push_triangle(rt_a, rt_b, rb_a, SurfaceTag::Underside);
        visual.push_triangle(rb_a, rt_b, rb_b, SurfaceTag::Underside);
    }

    let bounds = visual.bounds();
    Some(ChunkMeshes {
        visual,
        collider,
        bounds,
    })
}

use ralli_geom::{Aabb, Vec3};

use crate::profile::SurfaceTag;

/// Indexed triangle mesh with a surface tag per triangle.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub tags: Vec<SurfaceTag>,
}

impl MeshBuild {
    #[inline]
    pub fn reserve(&mut self, vertices: usize, triangles: usize) {
        self.pos.reserve(vertices * 3);
        self.norm.reserve(vertices * 3);
        self.uv.reserve(vertices * 2);
        self.idx.reserve(triangles * 3);
        self.tags.reserve(triangles);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f64, f64)) -> u32 {
        let i = self.vertex_count() as u32;
        self.pos.extend_from_slice(&p.to_f32());
        self.norm.extend_from_slice(&n.to_f32());
        self.uv.extend_from_slice(&[uv.0 as f32, uv.1 as f32]);
        i
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32, tag: SurfaceTag) {
        self.idx.extend_from_slice(&[a, b, c]);
        self.tags.push(tag);
    }

    /// Two triangles over a strip cell: `(a0, b0, a1)` and `(a1, b0, b1)`.
    #[inline]
    pub fn push_quad(&mut self, a0: u32, a1: u32, b0: u32, b1: u32, tag: SurfaceTag) {
        self.push_triangle(a0, b0, a1, tag);
        self.push_triangle(a1, b0, b1, tag);
    }

    #[inline]
    pub fn vertex(&self, i: u32) -> Vec3 {
        let o = i as usize * 3;
        Vec3::new(
            f64::from(self.pos[o]),
            f64::from(self.pos[o + 1]),
            f64::from(self.pos[o + 2]),
        )
    }

    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let o = t * 3;
        [
            self.vertex(self.idx[o]),
            self.vertex(self.idx[o + 1]),
            self.vertex(self.idx[o + 2]),
        ]
    }

    /// Triangles carrying `tag`, as `(index, corners)`.
    pub fn triangles_with_tag(&self, tag: SurfaceTag) -> impl Iterator<Item = (usize, [Vec3; 3])> + '_ {
        self.tags
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == tag)
            .map(|(i, _)| (i, self.triangle(i)))
    }

    pub fn bounds(&self) -> Aabb {
        let mut b = Aabb::EMPTY;
        for i in 0..self.vertex_count() {
            b.grow(self.vertex(i as u32));
        }
        b
    }

    /// Area-weighted per-vertex normals from the triangle list.
    pub fn recalculate_normals(&mut self) {
        let n = self.vertex_count();
        let mut acc = vec![Vec3::ZERO; n];
        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            let face = (b - a).cross(c - a);
            for k in 0..3 {
                acc[self.idx[t * 3 + k] as usize] += face;
            }
        }
        self.norm.clear();
        for v in acc {
            self.norm.extend_from_slice(&v.normalized().to_f32());
        }
    }
}

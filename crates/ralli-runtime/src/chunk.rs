use ralli_geom::{Aabb, Vec3};
use ralli_mesh_cpu::{ChunkMeshes, CrossSection, RailPlacement, TreePlacement, build_chunk_meshes, build_chunk_rails};
use ralli_road::{ChunkLayout, RoadGenParams, RoadSample};

/// Everything a resident chunk owns. Dropping it releases the meshes, rails and trees.
#[derive(Clone, Debug)]
pub struct ChunkGeometry {
    pub layout: ChunkLayout,
    pub meshes: Option<ChunkMeshes>,
    pub rails: Vec<RailPlacement>,
    pub trees: Vec<TreePlacement>,
}

impl ChunkGeometry {
    #[inline]
    pub fn index(&self) -> i32 {
        self.layout.index
    }

    pub fn bounds(&self) -> Aabb {
        self.meshes.as_ref().map_or(Aabb::EMPTY, |m| m.bounds)
    }

    pub fn tree_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.trees.iter().map(|t| t.position)
    }

    pub fn triangle_count(&self) -> usize {
        let road = self.meshes.as_ref().map_or(0, |m| m.visual.triangle_count());
        let rails: usize = self.rails.iter().map(|r| r.beam.triangle_count()).sum();
        road + rails
    }
}

/// Output of the parallel stage; trees are added afterwards on the calling thread.
pub(crate) struct BuiltChunk {
    pub layout: ChunkLayout,
    pub meshes: Option<ChunkMeshes>,
    pub rails: Vec<RailPlacement>,
}

/// Pure geometry for one chunk. `samples` must already reach `layout.sample_end`.
pub(crate) fn build_chunk(
    params: &RoadGenParams,
    section: &CrossSection,
    samples: &[RoadSample],
    layout: ChunkLayout,
) -> BuiltChunk {
    let meshes = samples
        .get(layout.sample_start..=layout.sample_end)
        .and_then(|rows| build_chunk_meshes(params, section, rows));
    let rails = build_chunk_rails(params, samples, layout.start_s, layout.end_s);
    BuiltChunk {
        layout,
        meshes,
        rails,
    }
}

//! CPU geometry for road chunks: cross-section strips, forest scatter and guard rails.
#![forbid(unsafe_code)]

pub mod chunk_mesh;
pub mod forest;
pub mod mesh_build;
pub mod profile;
pub mod rails;
pub mod railing;

pub use chunk_mesh::{ChunkMeshes, CrossSection, build_chunk_meshes};
pub use forest::{
    ForestTriangle, ScatterOutcome, TreePlacement, TreeSpecies, collect_forest_triangles,
    scatter_forest,
};
pub use mesh_build::MeshBuild;
pub use profile::{
    ProfilePoint, SurfaceTag, adjust_lateral_for_curvature, build_profile, compression_extent,
};
pub use rails::{
    RailMark, RailPlacement, RailPost, RailSide, RailSpan, build_chunk_rails, build_spans,
    classify_side, compute_end_drop01, compute_signed_curvature,
};
pub use railing::{RailFrame, build_beam_mesh, build_rect_collider_mesh, w_beam_profile};

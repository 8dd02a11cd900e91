//! Chunk streaming around a moving viewpoint, plus the road frame query API.
#![forbid(unsafe_code)]

mod chunk;

use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use ralli_geom::Vec3;
use ralli_mesh_cpu::{CrossSection, scatter_forest};
use ralli_road::{
    ChunkLayout, ChunkLayoutCache, DesignedPiecePool, RoadFrame, RoadGenParams, RoadSynth,
    SmoothnessReport, log_smoothness, measure_smoothness,
};
use rayon::prelude::*;

pub use chunk::ChunkGeometry;
use chunk::{BuiltChunk, build_chunk};

/// What one `update` call changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub viewpoint_chunk: i32,
    pub created: usize,
    pub destroyed: usize,
    pub pending: usize,
}

pub struct RoadStream {
    params: RoadGenParams,
    synth: RoadSynth,
    layouts: ChunkLayoutCache,
    section: CrossSection,
    chunks: HashMap<i32, ChunkGeometry>,
    pending: VecDeque<i32>,
    active: Option<(i32, i32)>,
    warned_no_forest: bool,
    last_report: Option<SmoothnessReport>,
}

impl RoadStream {
    /// Empty stream; call `rebuild_from_scratch` or `update` to materialize chunks.
    pub fn new(params: RoadGenParams, pool: Option<Arc<DesignedPiecePool>>) -> Self {
        Self {
            synth: RoadSynth::new(&params, pool),
            layouts: ChunkLayoutCache::new(&params),
            section: CrossSection::new(&params),
            chunks: HashMap::new(),
            pending: VecDeque::new(),
            active: None,
            warned_no_forest: false,
            last_report: None,
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &RoadGenParams {
        &self.params
    }

    #[inline]
    pub fn synth(&self) -> &RoadSynth {
        &self.synth
    }

    #[inline]
    pub fn layouts(&self) -> &ChunkLayoutCache {
        &self.layouts
    }

    /// Clears all generated state and synchronously builds chunks `0..=max(1, chunks_ahead)`.
    pub fn rebuild_from_scratch(&mut self) {
        self.synth.reset();
        self.layouts.clear();
        self.chunks.clear();
        self.pending.clear();
        self.last_report = None;
        self.warned_no_forest = false;

        let hi = self.params.chunks_ahead.max(1);
        let wanted: Vec<i32> = (0..=hi).collect();
        self.create_chunks(&wanted);
        self.active = Some((0, hi));
        log::info!(
            "road rebuilt: seed={} chunks=0..={} samples={} sample_distance={:.3}",
            self.params.seed,
            hi,
            self.synth.samples().len(),
            self.params.sample_distance
        );

        if self.params.log_smoothness_diagnostics {
            let report = measure_smoothness(
                self.synth.samples(),
                self.layouts.layouts(),
                self.params.sample_distance,
            );
            log_smoothness(&report, self.params.seam_kink_warning_deg);
            self.last_report = Some(report);
        }
    }

    /// Slides the resident window to the chunk containing `viewpoint_s`.
    pub fn update(&mut self, viewpoint_s: f64) -> TickStats {
        let center = self.layouts.index_at_s(viewpoint_s);
        let lo = (center - self.params.chunks_behind).max(0);
        let hi = center + self.params.chunks_ahead;
        self.active = Some((lo, hi));

        let mut stale: Vec<i32> = self
            .chunks
            .keys()
            .copied()
            .filter(|i| *i < lo || *i > hi)
            .collect();
        stale.sort_unstable();
        for i in &stale {
            self.destroy_chunk(*i);
        }

        let mut missing: Vec<i32> = (lo..=hi).filter(|i| !self.chunks.contains_key(i)).collect();
        missing.sort_by_key(|i| ((i - center).abs(), *i));
        self.pending = missing.into();

        let cap = match self.params.max_chunks_per_tick {
            0 => self.pending.len(),
            n => n.min(self.pending.len()),
        };
        let batch: Vec<i32> = self.pending.drain(..cap).collect();
        self.create_chunks(&batch);

        if !self.pending.is_empty() {
            log::debug!(
                target: "stream",
                "deferred {} chunks around chunk {}",
                self.pending.len(),
                center
            );
        }
        TickStats {
            viewpoint_chunk: center,
            created: batch.len(),
            destroyed: stale.len(),
            pending: self.pending.len(),
        }
    }

    pub fn update_from_position(&mut self, position: Vec3) -> TickStats {
        let s = self.estimate_s(position);
        self.update(s)
    }

    /// Arc length of the generated sample closest to `position`; 0 with no samples.
    pub fn estimate_s(&self, position: Vec3) -> f64 {
        self.synth
            .nearest_sample_index(position)
            .map_or(0.0, |i| self.synth.samples()[i].s)
    }

    fn create_chunks(&mut self, indices: &[i32]) {
        if indices.is_empty() {
            return;
        }
        let layouts: Vec<ChunkLayout> = indices
            .iter()
            .filter(|i| !self.chunks.contains_key(*i))
            .filter_map(|i| self.layouts.layout(*i))
            .collect();
        let Some(last) = layouts.iter().map(|l| l.sample_end).max() else {
            return;
        };
        self.synth.ensure_samples_up_to(last);

        let params = &self.params;
        let section = &self.section;
        let samples = self.synth.samples();
        let mut built: Vec<BuiltChunk> = layouts
            .par_iter()
            .map(|l| build_chunk(params, section, samples, *l))
            .collect();

        // Scatter in index order so neighbour spacing sees earlier chunks of the batch.
        built.sort_by_key(|b| b.layout.index);
        for b in built {
            self.insert_chunk(b);
        }
    }

    fn insert_chunk(&mut self, built: BuiltChunk) {
        let BuiltChunk {
            layout,
            meshes,
            rails,
        } = built;
        let index = layout.index;

        let mut trees = Vec::new();
        if self.params.spawn_trees {
            if let Some(m) = meshes.as_ref() {
                let neighbours: Vec<Vec3> = [index - 1, index + 1]
                    .iter()
                    .filter_map(|n| self.chunks.get(n))
                    .flat_map(|c| c.tree_positions())
                    .collect();
                let rows = &self.synth.samples()[layout.sample_start..=layout.sample_end];
                let outcome = scatter_forest(&self.params, index, &m.collider, rows, &neighbours);
                if outcome.eligible_triangles == 0 && !self.warned_no_forest {
                    log::warn!(
                        "chunk {} has no eligible forest-floor triangles; trees will be skipped",
                        index
                    );
                    self.warned_no_forest = true;
                }
                trees = outcome.trees;
            }
        }

        log::debug!(
            target: "stream",
            "create chunk {} s=[{:.1}, {:.1}) samples={}..={} rails={} trees={}",
            index,
            layout.start_s,
            layout.end_s,
            layout.sample_start,
            layout.sample_end,
            rails.len(),
            trees.len()
        );
        self.chunks.insert(
            index,
            ChunkGeometry {
                layout,
                meshes,
                rails,
                trees,
            },
        );
    }

    fn destroy_chunk(&mut self, index: i32) {
        if let Some(c) = self.chunks.remove(&index) {
            log::debug!(
                target: "stream",
                "destroy chunk {} (trees={} rails={})",
                index,
                c.trees.len(),
                c.rails.len()
            );
        }
    }

    /// Interpolated frame at `s`, `None` until the samples covering `s` exist.
    pub fn road_frame_at(&self, s: f64) -> Option<RoadFrame> {
        self.synth.frame_at(s)
    }

    /// Chunk index containing `s`; extends the layout cache as needed.
    pub fn chunk_index_for_s(&mut self, s: f64) -> i32 {
        self.layouts.index_at_s(s)
    }

    /// `[start_s, end_s)` of an already laid-out chunk.
    pub fn chunk_range_s(&self, index: i32) -> Option<(f64, f64)> {
        self.layouts.get(index).map(|l| (l.start_s, l.end_s))
    }

    /// Inclusive window of chunk indices the last update or rebuild targeted.
    /// The lower bound is clamped at 0, so near the origin the window holds
    /// fewer than `chunks_behind` trailing chunks.
    #[inline]
    pub fn active_chunk_range(&self) -> Option<(i32, i32)> {
        self.active
    }

    #[inline]
    pub fn road_width(&self) -> f64 {
        self.params.road_width
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.params.seed
    }

    pub fn chunk(&self, index: i32) -> Option<&ChunkGeometry> {
        self.chunks.get(&index)
    }

    #[inline]
    pub fn is_resident(&self, index: i32) -> bool {
        self.chunks.contains_key(&index)
    }

    /// Resident chunk indices in ascending order.
    pub fn resident_indices(&self) -> Vec<i32> {
        let mut v: Vec<i32> = self.chunks.keys().copied().collect();
        v.sort_unstable();
        v
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn tree_count(&self) -> usize {
        self.chunks.values().map(|c| c.trees.len()).sum()
    }

    pub fn last_smoothness_report(&self) -> Option<&SmoothnessReport> {
        self.last_report.as_ref()
    }
}

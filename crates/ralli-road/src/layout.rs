use ralli_geom::lerp;

use crate::config::RoadGenParams;
use crate::hash::{SALT_CHUNK_LENGTH, hash01};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkLayout {
    pub index: i32,
    pub sample_start: usize,
    pub sample_end: usize,
    pub start_s: f64,
    pub end_s: f64,
    pub length: f64,
}

/// Lazily extended, contiguous chunk layouts addressed by chunk index.
#[derive(Clone, Debug)]
pub struct ChunkLayoutCache {
    seed: u32,
    min_length: f64,
    max_length: f64,
    sample_distance: f64,
    layouts: Vec<ChunkLayout>,
}

impl ChunkLayoutCache {
    pub fn new(params: &RoadGenParams) -> Self {
        Self {
            seed: params.seed as u32,
            min_length: params.min_chunk_length,
            max_length: params.max_chunk_length,
            sample_distance: params.sample_distance,
            layouts: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    #[inline]
    pub fn layouts(&self) -> &[ChunkLayout] {
        &self.layouts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Jittered chunk length before snapping to whole samples.
    pub fn nominal_length(&self, index: i32) -> f64 {
        lerp(self.min_length, self.max_length, hash01(self.seed, index, SALT_CHUNK_LENGTH))
    }

    fn push_next(&mut self) {
        let index = self.layouts.len() as i32;
        let sample_start = self.layouts.last().map_or(0, |l| l.sample_end);
        let count = ((self.nominal_length(index) / self.sample_distance).round() as usize).max(2);
        let sample_end = sample_start + count;
        let start_s = sample_start as f64 * self.sample_distance;
        let end_s = sample_end as f64 * self.sample_distance;
        self.layouts.push(ChunkLayout {
            index,
            sample_start,
            sample_end,
            start_s,
            end_s,
            length: end_s - start_s,
        });
    }

    pub fn ensure_up_to(&mut self, index: i32) {
        if index < 0 {
            return;
        }
        while self.layouts.len() <= index as usize {
            self.push_next();
        }
    }

    /// Layout for `index`, extending the cache if needed; `None` for negative indices.
    pub fn layout(&mut self, index: i32) -> Option<ChunkLayout> {
        if index < 0 {
            return None;
        }
        self.ensure_up_to(index);
        self.layouts.get(index as usize).copied()
    }

    /// Already-built layout without extending.
    pub fn get(&self, index: i32) -> Option<&ChunkLayout> {
        if index < 0 {
            return None;
        }
        self.layouts.get(index as usize)
    }

    /// Chunk containing `s` under half-open `[start_s, end_s)`; `s <= 0` and
    /// non-finite `s` map to 0.
    pub fn index_at_s(&mut self, s: f64) -> i32 {
        if !s.is_finite() || s <= 0.0 {
            return 0;
        }
        if self.layouts.is_empty() {
            self.push_next();
        }
        while self.layouts.last().is_some_and(|l| l.end_s <= s) {
            self.push_next();
        }
        let i = self.layouts.partition_point(|l| l.end_s <= s);
        i.min(self.layouts.len().saturating_sub(1)) as i32
    }
}

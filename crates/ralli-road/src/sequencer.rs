//! Forward-only schedule of straight, curve and designed pieces over arc length.

use std::sync::Arc;

use ralli_geom::lerp;

use crate::config::RoadGenParams;
use crate::designed::{DesignedPiece, DesignedPiecePool, HeadingBias, select_designed};
use crate::elevation::ElevationField;
use crate::hash::{
    SALT_CURVE_DIRECTION, SALT_CURVE_FLIP, SALT_CURVE_LENGTH, SALT_CURVE_PROBABILITY,
    SALT_CURVE_RATE, SALT_DESIGNED_THRESHOLD, SALT_STRAIGHT_LENGTH, hash01,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Straight,
    Curve,
    Designed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Piece {
    Straight {
        start_s: f64,
        end_s: f64,
    },
    Curve {
        start_s: f64,
        end_s: f64,
        turn_rate: f64,
    },
    Designed {
        start_s: f64,
        end_s: f64,
        piece: Arc<DesignedPiece>,
        mirrored: bool,
        entry_turn_rate: f64,
    },
}

impl Piece {
    #[inline]
    pub fn start_s(&self) -> f64 {
        match self {
            Piece::Straight { start_s, .. }
            | Piece::Curve { start_s, .. }
            | Piece::Designed { start_s, .. } => *start_s,
        }
    }

    #[inline]
    pub fn end_s(&self) -> f64 {
        match self {
            Piece::Straight { end_s, .. } | Piece::Curve { end_s, .. } | Piece::Designed { end_s, .. } => {
                *end_s
            }
        }
    }

    pub fn kind(&self) -> PieceKind {
        match self {
            Piece::Straight { .. } => PieceKind::Straight,
            Piece::Curve { .. } => PieceKind::Curve,
            Piece::Designed { .. } => PieceKind::Designed,
        }
    }

    pub fn entry_turn_rate(&self) -> f64 {
        match self {
            Piece::Straight { .. } => 0.0,
            Piece::Curve { turn_rate, .. } => *turn_rate,
            Piece::Designed { entry_turn_rate, .. } => *entry_turn_rate,
        }
    }

    #[inline]
    pub fn is_designed(&self) -> bool {
        matches!(self, Piece::Designed { .. })
    }

    /// Normalized position of `s` within the piece, clamped to `[0, 1]`.
    fn t_at(&self, s: f64) -> f64 {
        let len = self.end_s() - self.start_s();
        if len > 0.0 {
            ((s - self.start_s()) / len).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn turn_rate_at(&self, s: f64) -> f64 {
        match self {
            Piece::Straight { .. } => 0.0,
            Piece::Curve { turn_rate, .. } => *turn_rate,
            Piece::Designed { piece, mirrored, .. } => piece.turn_rate_at(self.t_at(s), *mirrored),
        }
    }
}

/// Generation cursor, threaded explicitly through the sequencer calls.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencerState {
    pub piece_index: i32,
    pub current: Piece,
    pub previous_curve_turn_rate: f64,
    pub procedural_distance_since_designed: f64,
    pub cumulative_yaw_deg: f64,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            piece_index: -1,
            current: Piece::Straight {
                start_s: 0.0,
                end_s: 0.0,
            },
            previous_curve_turn_rate: 0.0,
            procedural_distance_since_designed: 0.0,
            cumulative_yaw_deg: 0.0,
        }
    }
}

pub struct PieceSequencer {
    params: RoadGenParams,
    pool: Option<Arc<DesignedPiecePool>>,
    elevation: ElevationField,
}

impl PieceSequencer {
    pub fn new(params: &RoadGenParams, pool: Option<Arc<DesignedPiecePool>>) -> Self {
        Self {
            params: params.clone(),
            pool: pool.filter(|p| !p.is_empty()),
            elevation: ElevationField::new(params),
        }
    }

    #[inline]
    fn seed(&self) -> u32 {
        self.params.seed as u32
    }

    pub fn pool(&self) -> Option<&DesignedPiecePool> {
        self.pool.as_deref()
    }

    pub fn elevation(&self) -> &ElevationField {
        &self.elevation
    }

    /// Moves the cursor to the next piece, starting where the current one ends.
    pub fn advance(&self, state: &mut SequencerState) {
        state.piece_index += 1;
        let index = state.piece_index;
        let start_s = state.current.end_s();
        let p = &self.params;
        let seed = self.seed();
        let force_straight = index == 0;

        if !force_straight {
            if let Some(pool) = self.pool.as_deref() {
                let threshold = lerp(
                    p.min_procedural_between_designed,
                    p.max_procedural_between_designed,
                    hash01(seed, index, SALT_DESIGNED_THRESHOLD),
                );
                if state.procedural_distance_since_designed >= threshold {
                    let bias = HeadingBias {
                        cumulative_yaw_deg: state.cumulative_yaw_deg,
                        target_bearing_deg: p.target_bearing_deg,
                        strength: p.heading_correction_strength,
                    };
                    if let Some(sel) = select_designed(pool, seed, index, &bias) {
                        let piece = sel.piece;
                        let sign = if sel.mirrored { -1.0 } else { 1.0 };
                        state.cumulative_yaw_deg += sign * piece.total_yaw_delta_deg;
                        state.procedural_distance_since_designed = 0.0;
                        log::debug!(
                            "piece {} designed '{}' mirrored={} s=[{:.1}, {:.1})",
                            index,
                            piece.name,
                            sel.mirrored,
                            start_s,
                            start_s + piece.arc_length
                        );
                        state.current = Piece::Designed {
                            start_s,
                            end_s: start_s + piece.arc_length,
                            entry_turn_rate: sign * piece.entry_turn_rate,
                            mirrored: sel.mirrored,
                            piece,
                        };
                        return;
                    }
                }
            }
        }

        let is_curve = !force_straight && hash01(seed, index, SALT_CURVE_PROBABILITY) < p.curve_probability;
        let length;
        if is_curve {
            length = lerp(
                p.min_curve_length,
                p.max_curve_length,
                hash01(seed, index, SALT_CURVE_LENGTH),
            );
            let abs_rate = lerp(p.min_curve_rate, p.max_curve_rate, hash01(seed, index, SALT_CURVE_RATE));
            let mut direction = if hash01(seed, index, SALT_CURVE_DIRECTION) < 0.5 { -1.0 } else { 1.0 };
            if state.previous_curve_turn_rate.abs() > 0.001 {
                let previous = state.previous_curve_turn_rate.signum();
                let flip = hash01(seed, index, SALT_CURVE_FLIP) < p.opposite_curve_chance;
                direction = if flip { -previous } else { previous };
            }
            let turn_rate = direction * abs_rate;
            state.previous_curve_turn_rate = turn_rate;
            state.cumulative_yaw_deg += turn_rate * length;
            state.current = Piece::Curve {
                start_s,
                end_s: start_s + p.sample_distance.max(length),
                turn_rate,
            };
        } else {
            length = lerp(
                p.min_straight_length,
                p.max_straight_length,
                hash01(seed, index, SALT_STRAIGHT_LENGTH),
            );
            state.current = Piece::Straight {
                start_s,
                end_s: start_s + p.sample_distance.max(length),
            };
        }
        state.procedural_distance_since_designed += length;
    }

    /// Raw (unsmoothed) turn rate at `s`, advancing past every piece that ends at or before it.
    pub fn turn_rate_at(&self, state: &mut SequencerState, s: f64) -> f64 {
        while s >= state.current.end_s() {
            self.advance(state);
        }
        state.current.turn_rate_at(s)
    }

    pub fn target_elevation(&self, state: &SequencerState, s: f64) -> f64 {
        if let Piece::Designed {
            start_s, end_s, piece, ..
        } = &state.current
        {
            if piece.has_elevation && s >= *start_s && s < *end_s {
                return self.elevation.base_y() + piece.elevation_at(state.current.t_at(s));
            }
        }
        self.elevation.height_at(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    fn seq(params: &RoadGenParams, pool: Option<DesignedPiecePool>) -> PieceSequencer {
        PieceSequencer::new(params, pool.map(Arc::new))
    }

    #[test]
    fn first_piece_is_straight_from_origin() {
        let p = RoadGenParams::default();
        let sq = seq(&p, None);
        let mut st = SequencerState::default();
        sq.advance(&mut st);
        assert_eq!(st.piece_index, 0);
        assert_eq!(st.current.kind(), PieceKind::Straight);
        assert_eq!(st.current.start_s(), 0.0);
        assert!(st.current.end_s() >= p.min_straight_length);
    }

    #[test]
    fn pieces_tile_arc_length_without_gaps() {
        let p = RoadGenParams::default();
        let sq = seq(&p, None);
        let mut st = SequencerState::default();
        let mut prev_end = 0.0;
        for _ in 0..200 {
            sq.advance(&mut st);
            assert_eq!(st.current.start_s(), prev_end);
            assert!(st.current.end_s() > st.current.start_s());
            prev_end = st.current.end_s();
        }
    }

    #[test]
    fn curve_rates_respect_configured_range() {
        let p = RoadGenParams::default();
        let sq = seq(&p, None);
        let mut st = SequencerState::default();
        let mut curves = 0;
        for _ in 0..300 {
            sq.advance(&mut st);
            if let Piece::Curve { turn_rate, .. } = st.current {
                curves += 1;
                assert!(turn_rate.abs() >= p.min_curve_rate - 1e-12);
                assert!(turn_rate.abs() <= p.max_curve_rate + 1e-12);
            }
        }
        assert!(curves > 0);
    }

    #[test]
    fn large_jump_advances_through_many_pieces() {
        let p = RoadGenParams::default();
        let sq = seq(&p, None);
        let mut st = SequencerState::default();
        sq.turn_rate_at(&mut st, 5000.0);
        assert!(st.current.start_s() <= 5000.0 && 5000.0 < st.current.end_s());
        assert!(st.piece_index > 10);
    }

    #[test]
    fn designed_piece_injected_and_yaw_tracked() {
        let mut p = RoadGenParams::default();
        p.min_procedural_between_designed = 0.0;
        p.max_procedural_between_designed = 0.0;
        let mut pool = DesignedPiecePool::default();
        pool.push(
            DesignedPiece::from_turn_rate_curve("hairpin", 80.0, Curve::constant(0.5)),
            1.0,
            false,
        );
        let sq = seq(&p, Some(pool));
        let mut st = SequencerState::default();
        sq.advance(&mut st);
        let yaw_before = st.cumulative_yaw_deg;
        sq.advance(&mut st);
        assert_eq!(st.current.kind(), PieceKind::Designed);
        assert!((st.current.end_s() - st.current.start_s() - 80.0).abs() < 1e-9);
        assert!((st.cumulative_yaw_deg - yaw_before - 40.0).abs() < 1e-6);
        assert_eq!(st.procedural_distance_since_designed, 0.0);
        assert_eq!(st.current.entry_turn_rate(), 0.5);
    }

    #[test]
    fn designed_elevation_overrides_hills_inside_piece() {
        let mut p = RoadGenParams::default();
        p.min_procedural_between_designed = 0.0;
        p.max_procedural_between_designed = 0.0;
        let mut pool = DesignedPiecePool::default();
        pool.push(
            DesignedPiece::from_turn_rate_curve("crest", 50.0, Curve::constant(0.0))
                .with_elevation(Curve::new(vec![[0.0, 0.0], [1.0, 10.0]])),
            1.0,
            false,
        );
        let sq = seq(&p, Some(pool));
        let mut st = SequencerState::default();
        sq.advance(&mut st);
        sq.advance(&mut st);
        let mid = st.current.start_s() + 25.0;
        assert!((sq.target_elevation(&st, mid) - (p.origin.y + 5.0)).abs() < 1e-9);
    }
}

//! Authored pieces, the weighted pool they live in, and heading-aware selection.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use ralli_geom::delta_angle;

use crate::curve::Curve;
use crate::hash::{SALT_DESIGNED_ROLL, hash01};

const MIN_SCORE: f64 = 0.001;
const CORRECTION_SCALE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct DesignedPiece {
    pub name: String,
    pub arc_length: f64,
    pub total_yaw_delta_deg: f64,
    pub entry_turn_rate: f64,
    pub exit_turn_rate: f64,
    pub turn_rate_curve: Curve,
    pub elevation_curve: Curve,
    pub has_elevation: bool,
}

impl DesignedPiece {
    /// Derives yaw delta and boundary rates from the turn-rate curve.
    pub fn from_turn_rate_curve(name: impl Into<String>, arc_length: f64, turn_rate_curve: Curve) -> Self {
        let arc_length = arc_length.max(0.0);
        let total_yaw_delta_deg = turn_rate_curve.integrate01(256) * arc_length;
        Self {
            name: name.into(),
            arc_length,
            total_yaw_delta_deg,
            entry_turn_rate: turn_rate_curve.evaluate(0.0),
            exit_turn_rate: turn_rate_curve.evaluate(1.0),
            turn_rate_curve,
            elevation_curve: Curve::default(),
            has_elevation: false,
        }
    }

    pub fn with_elevation(mut self, elevation_curve: Curve) -> Self {
        self.has_elevation = !elevation_curve.is_empty();
        self.elevation_curve = elevation_curve;
        self
    }

    #[inline]
    pub fn is_usable(&self) -> bool {
        self.arc_length.is_finite() && self.arc_length > 0.0
    }

    #[inline]
    pub fn turn_rate_at(&self, t: f64, mirrored: bool) -> f64 {
        let v = self.turn_rate_curve.evaluate(t);
        if mirrored { -v } else { v }
    }

    #[inline]
    pub fn elevation_at(&self, t: f64) -> f64 {
        self.elevation_curve.evaluate(t)
    }
}

#[derive(Clone, Debug)]
pub struct PoolEntry {
    pub piece: Arc<DesignedPiece>,
    pub weight: f64,
    pub can_mirror: bool,
}

impl PoolEntry {
    #[inline]
    fn is_selectable(&self) -> bool {
        self.piece.is_usable() && self.weight.is_finite() && self.weight > 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct DesignedPiecePool {
    pub entries: Vec<PoolEntry>,
}

#[derive(Deserialize)]
struct PoolDef {
    #[serde(default)]
    entries: Vec<EntryDef>,
}

#[derive(Deserialize)]
struct EntryDef {
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default = "default_can_mirror")]
    can_mirror: bool,
    piece: PieceDef,
}

fn default_weight() -> f64 {
    1.0
}
fn default_can_mirror() -> bool {
    true
}

#[derive(Deserialize)]
struct PieceDef {
    #[serde(default)]
    name: String,
    arc_length: f64,
    #[serde(default)]
    total_yaw_delta_deg: Option<f64>,
    #[serde(default)]
    entry_turn_rate: Option<f64>,
    #[serde(default)]
    exit_turn_rate: Option<f64>,
    #[serde(default)]
    has_elevation: Option<bool>,
    #[serde(default)]
    turn_rate_curve: Curve,
    #[serde(default)]
    elevation_curve: Curve,
}

impl From<PieceDef> for DesignedPiece {
    fn from(d: PieceDef) -> Self {
        let mut piece = DesignedPiece::from_turn_rate_curve(d.name, d.arc_length, d.turn_rate_curve);
        if let Some(y) = d.total_yaw_delta_deg {
            piece.total_yaw_delta_deg = y;
        }
        if let Some(r) = d.entry_turn_rate {
            piece.entry_turn_rate = r;
        }
        if let Some(r) = d.exit_turn_rate {
            piece.exit_turn_rate = r;
        }
        piece.has_elevation = d.has_elevation.unwrap_or(!d.elevation_curve.is_empty());
        piece.elevation_curve = d.elevation_curve;
        piece
    }
}

impl DesignedPiecePool {
    pub fn new(entries: Vec<PoolEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, piece: DesignedPiece, weight: f64, can_mirror: bool) {
        self.entries.push(PoolEntry {
            piece: Arc::new(piece),
            weight,
            can_mirror,
        });
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let def: PoolDef = toml::from_str(s)?;
        let entries = def
            .entries
            .into_iter()
            .map(|e| PoolEntry {
                piece: Arc::new(DesignedPiece::from(e.piece)),
                weight: e.weight,
                can_mirror: e.can_mirror,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when at least one entry can ever be selected.
    pub fn has_selectable(&self) -> bool {
        self.entries.iter().any(PoolEntry::is_selectable)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DesignedSelection {
    pub piece: Arc<DesignedPiece>,
    pub entry: usize,
    pub mirrored: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct HeadingBias {
    pub cumulative_yaw_deg: f64,
    pub target_bearing_deg: f64,
    pub strength: f64,
}

struct Candidate {
    entry: usize,
    mirrored: bool,
    score: f64,
}

fn score_candidate(weight: f64, yaw_delta: f64, bias: &HeadingBias) -> f64 {
    let err = delta_angle(bias.target_bearing_deg, bias.cumulative_yaw_deg);
    // Unwrapped: overshooting past 180 degrees counts as more error.
    let err_after = err + yaw_delta;
    let correction = (err.abs() - err_after.abs()) * CORRECTION_SCALE;
    (weight * (1.0 + bias.strength * correction)).max(MIN_SCORE)
}

/// Weighted roll over normal and mirrored candidates, keyed by `piece_index`.
pub fn select_designed(
    pool: &DesignedPiecePool,
    seed: u32,
    piece_index: i32,
    bias: &HeadingBias,
) -> Option<DesignedSelection> {
    let mut candidates = Vec::with_capacity(pool.entries.len() * 2);
    for (i, e) in pool.entries.iter().enumerate() {
        if !e.is_selectable() {
            continue;
        }
        let yaw = e.piece.total_yaw_delta_deg;
        candidates.push(Candidate {
            entry: i,
            mirrored: false,
            score: score_candidate(e.weight, yaw, bias),
        });
        if e.can_mirror {
            candidates.push(Candidate {
                entry: i,
                mirrored: true,
                score: score_candidate(e.weight, -yaw, bias),
            });
        }
    }
    let total: f64 = candidates.iter().map(|c| c.score).sum();
    if candidates.is_empty() || !(total > 0.0) {
        return None;
    }

    let roll = hash01(seed, piece_index, SALT_DESIGNED_ROLL) * total;
    let mut running = 0.0;
    let mut chosen = None;
    for c in &candidates {
        running += c.score;
        if roll <= running {
            chosen = Some(c);
            break;
        }
    }
    let c = match chosen {
        Some(c) => c,
        None => {
            log::warn!(
                "designed piece roll {:.4} missed cumulative weight {:.4}; using first valid entry",
                roll,
                total
            );
            &candidates[0]
        }
    };
    Some(DesignedSelection {
        piece: Arc::clone(&pool.entries[c.entry].piece),
        entry: c.entry,
        mirrored: c.mirrored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bias(yaw: f64, strength: f64) -> HeadingBias {
        HeadingBias {
            cumulative_yaw_deg: yaw,
            target_bearing_deg: 0.0,
            strength,
        }
    }

    #[test]
    fn score_prefers_pieces_that_reduce_drift() {
        let b = bias(40.0, 1.0);
        let toward = score_candidate(1.0, -30.0, &b);
        let away = score_candidate(1.0, 30.0, &b);
        assert!(toward > 1.0);
        assert!(away < 1.0);
        assert!(score_candidate(1.0, 0.0, &b) == 1.0);
    }

    #[test]
    fn score_never_drops_below_floor() {
        let b = bias(0.0, 1.0);
        assert_eq!(score_candidate(0.0001, 170.0, &b), MIN_SCORE);
    }

    #[test]
    fn pool_toml_fills_missing_fields_from_curve() {
        let pool = DesignedPiecePool::from_toml_str(
            r#"
            [[entries]]
            weight = 2.0
            can_mirror = false
            [entries.piece]
            name = "ramp"
            arc_length = 100.0
            turn_rate_curve = [[0.0, 0.0], [1.0, 0.4]]
            "#,
        )
        .expect("parse");
        assert_eq!(pool.entries.len(), 1);
        let p = &pool.entries[0].piece;
        assert!((p.total_yaw_delta_deg - 20.0).abs() < 1e-6);
        assert_eq!(p.entry_turn_rate, 0.0);
        assert_eq!(p.exit_turn_rate, 0.4);
        assert!(!p.has_elevation);
        assert!(!pool.entries[0].can_mirror);
    }
}

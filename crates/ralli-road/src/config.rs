use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use ralli_geom::Vec3;

#[derive(Clone, Debug, Deserialize)]
pub struct RoadGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default)]
    pub chunking: Chunking,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub turning: Turning,
    #[serde(default)]
    pub elevation: Elevation,
    #[serde(default)]
    pub pieces: Pieces,
    #[serde(default)]
    pub designed: Designed,
    #[serde(default)]
    pub banking: Banking,
    #[serde(default)]
    pub forest: Forest,
    #[serde(default)]
    pub rails: Rails,
    #[serde(default)]
    pub debug: Debug,
}

fn default_seed() -> i32 {
    1337
}

impl Default for RoadGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            origin: [0.0; 3],
            chunking: Chunking::default(),
            shape: Shape::default(),
            turning: Turning::default(),
            elevation: Elevation::default(),
            pieces: Pieces::default(),
            designed: Designed::default(),
            banking: Banking::default(),
            forest: Forest::default(),
            rails: Rails::default(),
            debug: Debug::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chunking {
    #[serde(default = "default_chunk_length")]
    pub chunk_length: f64,
    #[serde(default = "default_min_chunk_length")]
    pub min_chunk_length: f64,
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: f64,
    #[serde(default = "default_samples_per_chunk")]
    pub samples_per_chunk: i32,
    #[serde(default = "default_chunks_ahead")]
    pub chunks_ahead: i32,
    #[serde(default = "default_chunks_behind")]
    pub chunks_behind: i32,
    /// 0 disables the per-tick creation cap.
    #[serde(default = "default_max_chunks_per_tick")]
    pub max_chunks_per_tick: usize,
}
fn default_chunk_length() -> f64 {
    140.0
}
fn default_min_chunk_length() -> f64 {
    100.0
}
fn default_max_chunk_length() -> f64 {
    180.0
}
fn default_samples_per_chunk() -> i32 {
    80
}
fn default_chunks_ahead() -> i32 {
    8
}
fn default_chunks_behind() -> i32 {
    2
}
fn default_max_chunks_per_tick() -> usize {
    4
}
impl Default for Chunking {
    fn default() -> Self {
        Self {
            chunk_length: default_chunk_length(),
            min_chunk_length: default_min_chunk_length(),
            max_chunk_length: default_max_chunk_length(),
            samples_per_chunk: default_samples_per_chunk(),
            chunks_ahead: default_chunks_ahead(),
            chunks_behind: default_chunks_behind(),
            max_chunks_per_tick: default_max_chunks_per_tick(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Shape {
    #[serde(default = "default_road_width")]
    pub road_width: f64,
    #[serde(default = "default_road_thickness")]
    pub road_thickness: f64,
    #[serde(default = "default_shoulder_width")]
    pub shoulder_width: f64,
    #[serde(default = "default_shoulder_drop")]
    pub shoulder_drop: f64,
    #[serde(default = "default_ditch_width")]
    pub ditch_width: f64,
    #[serde(default = "default_ditch_depth")]
    pub ditch_depth: f64,
    #[serde(default)]
    pub ditch_bottom_flat_width: f64,
    #[serde(default = "default_forest_width")]
    pub collidable_forest_width: f64,
    #[serde(default = "default_skirt_depth")]
    pub drop_skirt_depth: f64,
    #[serde(default = "default_forest_floor_y_offset")]
    pub forest_floor_y_offset: f64,
    #[serde(default = "default_compression_factor")]
    pub inner_profile_compression_radius_factor: f64,
}
fn default_road_width() -> f64 {
    8.0
}
fn default_road_thickness() -> f64 {
    0.35
}
fn default_shoulder_width() -> f64 {
    1.2
}
fn default_shoulder_drop() -> f64 {
    0.05
}
fn default_ditch_width() -> f64 {
    2.0
}
fn default_ditch_depth() -> f64 {
    0.55
}
fn default_forest_width() -> f64 {
    2.5
}
fn default_skirt_depth() -> f64 {
    3.0
}
fn default_forest_floor_y_offset() -> f64 {
    -0.05
}
fn default_compression_factor() -> f64 {
    0.8
}
impl Default for Shape {
    fn default() -> Self {
        Self {
            road_width: default_road_width(),
            road_thickness: default_road_thickness(),
            shoulder_width: default_shoulder_width(),
            shoulder_drop: default_shoulder_drop(),
            ditch_width: default_ditch_width(),
            ditch_depth: default_ditch_depth(),
            ditch_bottom_flat_width: 0.0,
            collidable_forest_width: default_forest_width(),
            drop_skirt_depth: default_skirt_depth(),
            forest_floor_y_offset: default_forest_floor_y_offset(),
            inner_profile_compression_radius_factor: default_compression_factor(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Turning {
    #[serde(default = "default_max_turn_rate")]
    pub max_turn_rate_deg_per_meter: f64,
    #[serde(default = "default_turn_rate_response")]
    pub turn_rate_response: f64,
}
fn default_max_turn_rate() -> f64 {
    0.22
}
fn default_turn_rate_response() -> f64 {
    0.08
}
impl Default for Turning {
    fn default() -> Self {
        Self {
            max_turn_rate_deg_per_meter: default_max_turn_rate(),
            turn_rate_response: default_turn_rate_response(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Elevation {
    #[serde(default = "default_true")]
    pub enable_hills: bool,
    #[serde(default = "default_small_bump_amplitude")]
    pub small_bump_amplitude: f64,
    #[serde(default = "default_small_bump_wavelength")]
    pub small_bump_wavelength: f64,
    #[serde(default = "default_small_bump_occurrence")]
    pub small_bump_occurrence: f64,
    #[serde(default = "default_small_bump_patch_length")]
    pub small_bump_patch_length: f64,
    #[serde(default = "default_large_hill_amplitude")]
    pub large_hill_amplitude: f64,
    #[serde(default = "default_large_hill_wavelength")]
    pub large_hill_wavelength: f64,
    #[serde(default = "default_max_slope")]
    pub max_slope_angle_deg: f64,
    #[serde(default = "default_slope_response")]
    pub slope_response: f64,
}
fn default_true() -> bool {
    true
}
fn default_small_bump_amplitude() -> f64 {
    0.9
}
fn default_small_bump_wavelength() -> f64 {
    42.0
}
fn default_small_bump_occurrence() -> f64 {
    0.28
}
fn default_small_bump_patch_length() -> f64 {
    140.0
}
fn default_large_hill_amplitude() -> f64 {
    8.0
}
fn default_large_hill_wavelength() -> f64 {
    360.0
}
fn default_max_slope() -> f64 {
    8.0
}
fn default_slope_response() -> f64 {
    0.12
}
impl Default for Elevation {
    fn default() -> Self {
        Self {
            enable_hills: true,
            small_bump_amplitude: default_small_bump_amplitude(),
            small_bump_wavelength: default_small_bump_wavelength(),
            small_bump_occurrence: default_small_bump_occurrence(),
            small_bump_patch_length: default_small_bump_patch_length(),
            large_hill_amplitude: default_large_hill_amplitude(),
            large_hill_wavelength: default_large_hill_wavelength(),
            max_slope_angle_deg: default_max_slope(),
            slope_response: default_slope_response(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pieces {
    #[serde(default = "default_curve_probability")]
    pub curve_piece_probability: f64,
    #[serde(default = "default_min_straight")]
    pub min_straight_length: f64,
    #[serde(default = "default_max_straight")]
    pub max_straight_length: f64,
    #[serde(default = "default_min_curve")]
    pub min_curve_length: f64,
    #[serde(default = "default_max_curve")]
    pub max_curve_length: f64,
    #[serde(default = "default_min_curve_rate")]
    pub min_curve_turn_rate_deg_per_meter: f64,
    #[serde(default = "default_max_curve_rate")]
    pub max_curve_turn_rate_deg_per_meter: f64,
    #[serde(default = "default_opposite_curve_chance")]
    pub opposite_curve_chance: f64,
}
fn default_curve_probability() -> f64 {
    0.72
}
fn default_min_straight() -> f64 {
    28.0
}
fn default_max_straight() -> f64 {
    90.0
}
fn default_min_curve() -> f64 {
    30.0
}
fn default_max_curve() -> f64 {
    75.0
}
fn default_min_curve_rate() -> f64 {
    0.12
}
fn default_max_curve_rate() -> f64 {
    0.30
}
fn default_opposite_curve_chance() -> f64 {
    0.65
}
impl Default for Pieces {
    fn default() -> Self {
        Self {
            curve_piece_probability: default_curve_probability(),
            min_straight_length: default_min_straight(),
            max_straight_length: default_max_straight(),
            min_curve_length: default_min_curve(),
            max_curve_length: default_max_curve(),
            min_curve_turn_rate_deg_per_meter: default_min_curve_rate(),
            max_curve_turn_rate_deg_per_meter: default_max_curve_rate(),
            opposite_curve_chance: default_opposite_curve_chance(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Designed {
    /// Pool file, resolved by the host; `None` keeps the corridor procedural.
    #[serde(default)]
    pub pool_path: Option<String>,
    #[serde(default = "default_min_between_designed")]
    pub min_procedural_between_designed: f64,
    #[serde(default = "default_max_between_designed")]
    pub max_procedural_between_designed: f64,
    #[serde(default = "default_heading_strength")]
    pub heading_correction_strength: f64,
    #[serde(default)]
    pub target_bearing_deg: f64,
}
fn default_min_between_designed() -> f64 {
    200.0
}
fn default_max_between_designed() -> f64 {
    600.0
}
fn default_heading_strength() -> f64 {
    0.4
}
impl Default for Designed {
    fn default() -> Self {
        Self {
            pool_path: None,
            min_procedural_between_designed: default_min_between_designed(),
            max_procedural_between_designed: default_max_between_designed(),
            heading_correction_strength: default_heading_strength(),
            target_bearing_deg: 0.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Banking {
    #[serde(default = "default_bank_from_curvature")]
    pub bank_from_curvature: f64,
    #[serde(default = "default_max_bank_angle")]
    pub max_bank_angle: f64,
    #[serde(default = "default_bank_deadzone")]
    pub bank_turn_rate_deadzone: f64,
    #[serde(default = "default_bank_target_response")]
    pub bank_target_response: f64,
    #[serde(default = "default_bank_change_rate")]
    pub bank_change_rate_deg_per_meter: f64,
}
fn default_bank_from_curvature() -> f64 {
    8.0
}
fn default_max_bank_angle() -> f64 {
    8.0
}
fn default_bank_deadzone() -> f64 {
    0.08
}
fn default_bank_target_response() -> f64 {
    0.08
}
fn default_bank_change_rate() -> f64 {
    1.0
}
impl Default for Banking {
    fn default() -> Self {
        Self {
            bank_from_curvature: default_bank_from_curvature(),
            max_bank_angle: default_max_bank_angle(),
            bank_turn_rate_deadzone: default_bank_deadzone(),
            bank_target_response: default_bank_target_response(),
            bank_change_rate_deg_per_meter: default_bank_change_rate(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Forest {
    #[serde(default = "default_true")]
    pub spawn_trees: bool,
    #[serde(default = "default_trees_per_chunk")]
    pub trees_per_chunk: usize,
    #[serde(default = "default_birch_ratio")]
    pub birch_ratio: f64,
    #[serde(default = "default_trunk_safe_radius")]
    pub trunk_safe_radius: f64,
    #[serde(default = "default_attempts_multiplier")]
    pub attempts_multiplier: usize,
    #[serde(default = "default_ditch_clearance")]
    pub ditch_clearance: f64,
    #[serde(default = "default_collider_width")]
    pub collider_width: f64,
    #[serde(default = "default_collider_height")]
    pub collider_height: f64,
    /// Minimum dot(normal, up) for a forest triangle to host trees.
    #[serde(default = "default_min_up_dot")]
    pub min_up_dot: f64,
}
fn default_trees_per_chunk() -> usize {
    120
}
fn default_birch_ratio() -> f64 {
    0.65
}
fn default_trunk_safe_radius() -> f64 {
    1.4
}
fn default_attempts_multiplier() -> usize {
    8
}
fn default_ditch_clearance() -> f64 {
    1.5
}
fn default_collider_width() -> f64 {
    0.6
}
fn default_collider_height() -> f64 {
    8.0
}
fn default_min_up_dot() -> f64 {
    0.7
}
impl Default for Forest {
    fn default() -> Self {
        Self {
            spawn_trees: true,
            trees_per_chunk: default_trees_per_chunk(),
            birch_ratio: default_birch_ratio(),
            trunk_safe_radius: default_trunk_safe_radius(),
            attempts_multiplier: default_attempts_multiplier(),
            ditch_clearance: default_ditch_clearance(),
            collider_width: default_collider_width(),
            collider_height: default_collider_height(),
            min_up_dot: default_min_up_dot(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Rails {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_true")]
    pub only_on_designed_pieces: bool,
    /// Signed horizontal curvature threshold in rad/m.
    #[serde(default = "default_min_curvature_for_rail")]
    pub min_curvature_for_rail: f64,
    #[serde(default = "default_min_rail_span")]
    pub min_span_length: f64,
    #[serde(default = "default_rail_sample_spacing")]
    pub sample_spacing: f64,
    #[serde(default = "default_rail_end_drop")]
    pub end_drop_distance: f64,
    #[serde(default = "default_beam_depth")]
    pub beam_depth: f64,
    #[serde(default = "default_beam_height")]
    pub beam_height: f64,
    #[serde(default = "default_beam_flange")]
    pub beam_flange_thickness: f64,
    #[serde(default = "default_beam_taper")]
    pub beam_taper: f64,
    #[serde(default = "default_beam_mount_height")]
    pub beam_mount_height: f64,
    #[serde(default = "default_post_spacing")]
    pub post_spacing: f64,
    #[serde(default = "default_post_width")]
    pub post_width: f64,
    #[serde(default = "default_post_depth")]
    pub post_depth: f64,
    #[serde(default = "default_post_height")]
    pub post_height: f64,
}
fn default_min_curvature_for_rail() -> f64 {
    0.003
}
fn default_min_rail_span() -> f64 {
    12.0
}
fn default_rail_sample_spacing() -> f64 {
    2.0
}
fn default_rail_end_drop() -> f64 {
    4.0
}
fn default_beam_depth() -> f64 {
    0.24
}
fn default_beam_height() -> f64 {
    0.28
}
fn default_beam_flange() -> f64 {
    0.055
}
fn default_beam_taper() -> f64 {
    0.5
}
fn default_beam_mount_height() -> f64 {
    0.6
}
fn default_post_spacing() -> f64 {
    4.0
}
fn default_post_width() -> f64 {
    0.12
}
fn default_post_depth() -> f64 {
    0.12
}
fn default_post_height() -> f64 {
    0.75
}
impl Default for Rails {
    fn default() -> Self {
        Self {
            enable: true,
            only_on_designed_pieces: true,
            min_curvature_for_rail: default_min_curvature_for_rail(),
            min_span_length: default_min_rail_span(),
            sample_spacing: default_rail_sample_spacing(),
            end_drop_distance: default_rail_end_drop(),
            beam_depth: default_beam_depth(),
            beam_height: default_beam_height(),
            beam_flange_thickness: default_beam_flange(),
            beam_taper: default_beam_taper(),
            beam_mount_height: default_beam_mount_height(),
            post_spacing: default_post_spacing(),
            post_width: default_post_width(),
            post_depth: default_post_depth(),
            post_height: default_post_height(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Debug {
    #[serde(default = "default_true")]
    pub log_smoothness_diagnostics: bool,
    #[serde(default = "default_seam_kink_warning")]
    pub seam_kink_warning_deg: f64,
}
fn default_seam_kink_warning() -> f64 {
    2.5
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            log_smoothness_diagnostics: true,
            seam_kink_warning_deg: default_seam_kink_warning(),
        }
    }
}

// Flattened, clamped snapshot read by the synthesis loops.
#[derive(Clone, Debug)]
pub struct RoadGenParams {
    pub seed: i32,
    pub origin: Vec3,
    pub sample_distance: f64,
    pub min_chunk_length: f64,
    pub max_chunk_length: f64,
    pub chunks_ahead: i32,
    pub chunks_behind: i32,
    pub max_chunks_per_tick: usize,

    pub road_width: f64,
    pub road_thickness: f64,
    pub shoulder_width: f64,
    pub shoulder_drop: f64,
    pub ditch_width: f64,
    pub ditch_depth: f64,
    pub ditch_bottom_flat_width: f64,
    pub collidable_forest_width: f64,
    pub drop_skirt_depth: f64,
    pub forest_floor_y_offset: f64,
    pub compression_radius_factor: f64,

    pub max_turn_rate: f64,
    pub turn_rate_response: f64,

    pub enable_hills: bool,
    pub small_bump_amplitude: f64,
    pub small_bump_wavelength: f64,
    pub small_bump_occurrence: f64,
    pub small_bump_patch_length: f64,
    pub large_hill_amplitude: f64,
    pub large_hill_wavelength: f64,
    pub max_slope_angle_deg: f64,
    pub slope_response: f64,

    pub curve_probability: f64,
    pub min_straight_length: f64,
    pub max_straight_length: f64,
    pub min_curve_length: f64,
    pub max_curve_length: f64,
    pub min_curve_rate: f64,
    pub max_curve_rate: f64,
    pub opposite_curve_chance: f64,

    pub min_procedural_between_designed: f64,
    pub max_procedural_between_designed: f64,
    pub heading_correction_strength: f64,
    pub target_bearing_deg: f64,

    pub bank_from_curvature: f64,
    pub max_bank_angle: f64,
    pub bank_turn_rate_deadzone: f64,
    pub bank_target_response: f64,
    pub bank_change_rate: f64,

    pub spawn_trees: bool,
    pub trees_per_chunk: usize,
    pub birch_ratio: f64,
    pub trunk_safe_radius: f64,
    pub attempts_multiplier: usize,
    pub ditch_clearance: f64,
    pub tree_collider_width: f64,
    pub tree_collider_height: f64,
    pub forest_min_up_dot: f64,

    pub rails: Rails,

    pub log_smoothness_diagnostics: bool,
    pub seam_kink_warning_deg: f64,
}

impl Default for RoadGenParams {
    fn default() -> Self {
        Self::from_config(&RoadGenConfig::default())
    }
}

impl RoadGenParams {
    pub fn from_config(cfg: &RoadGenConfig) -> Self {
        let ch = &cfg.chunking;
        let fallback = ch.chunk_length.max(20.0);
        let min_chunk = if ch.min_chunk_length > 0.0 {
            ch.min_chunk_length
        } else {
            fallback
        }
        .max(20.0);
        let max_chunk = if ch.max_chunk_length > 0.0 {
            ch.max_chunk_length
        } else {
            fallback
        }
        .max(min_chunk);
        let base_chunk = 0.5 * (min_chunk + max_chunk);
        let sample_distance = base_chunk / f64::from(ch.samples_per_chunk.max(2));

        let sh = &cfg.shape;
        let ditch_width = sh.ditch_width.max(0.0);

        let max_turn_rate = cfg.turning.max_turn_rate_deg_per_meter.max(0.001);
        let p = &cfg.pieces;
        let min_straight = p.min_straight_length.max(10.0);
        let min_curve = p.min_curve_length.max(8.0);
        let min_curve_rate = p.min_curve_turn_rate_deg_per_meter.max(0.001).min(max_turn_rate);
        let max_curve_rate = p
            .max_curve_turn_rate_deg_per_meter
            .max(min_curve_rate)
            .min(max_turn_rate);

        let d = &cfg.designed;
        let min_between = d.min_procedural_between_designed.max(0.0);

        let f = &cfg.forest;
        let r = &cfg.rails;
        let rails = Rails {
            min_curvature_for_rail: r.min_curvature_for_rail.max(0.0),
            min_span_length: r.min_span_length.max(0.0),
            sample_spacing: r.sample_spacing.max(0.1),
            end_drop_distance: r.end_drop_distance.max(0.0),
            beam_depth: r.beam_depth.max(0.02),
            beam_height: r.beam_height.max(0.02),
            beam_flange_thickness: r.beam_flange_thickness.max(0.005),
            beam_taper: r.beam_taper.max(0.0),
            beam_mount_height: r.beam_mount_height.max(0.0),
            post_spacing: r.post_spacing.max(0.5),
            post_width: r.post_width.max(0.01),
            post_depth: r.post_depth.max(0.01),
            post_height: r.post_height.max(0.01),
            ..r.clone()
        };

        Self {
            seed: cfg.seed,
            origin: Vec3::new(cfg.origin[0], cfg.origin[1], cfg.origin[2]),
            sample_distance,
            min_chunk_length: min_chunk,
            max_chunk_length: max_chunk,
            chunks_ahead: ch.chunks_ahead.max(1),
            chunks_behind: ch.chunks_behind.max(0),
            max_chunks_per_tick: ch.max_chunks_per_tick,

            road_width: sh.road_width.max(0.5),
            road_thickness: sh.road_thickness.max(0.05),
            shoulder_width: sh.shoulder_width.max(0.0),
            shoulder_drop: sh.shoulder_drop.max(0.0),
            ditch_width,
            ditch_depth: sh.ditch_depth.max(0.0),
            ditch_bottom_flat_width: sh.ditch_bottom_flat_width.clamp(0.0, ditch_width),
            collidable_forest_width: sh.collidable_forest_width.max(0.0),
            drop_skirt_depth: sh.drop_skirt_depth.max(0.0),
            forest_floor_y_offset: sh.forest_floor_y_offset,
            compression_radius_factor: sh.inner_profile_compression_radius_factor.clamp(0.4, 0.95),

            max_turn_rate,
            turn_rate_response: cfg.turning.turn_rate_response.clamp(0.0, 1.0),

            enable_hills: cfg.elevation.enable_hills,
            small_bump_amplitude: cfg.elevation.small_bump_amplitude,
            small_bump_wavelength: cfg.elevation.small_bump_wavelength.max(6.0),
            small_bump_occurrence: cfg.elevation.small_bump_occurrence.clamp(0.0, 1.0),
            small_bump_patch_length: cfg.elevation.small_bump_patch_length.max(20.0),
            large_hill_amplitude: cfg.elevation.large_hill_amplitude,
            large_hill_wavelength: cfg.elevation.large_hill_wavelength.max(60.0),
            max_slope_angle_deg: cfg.elevation.max_slope_angle_deg.abs(),
            slope_response: cfg.elevation.slope_response.clamp(0.0, 1.0),

            curve_probability: p.curve_piece_probability.clamp(0.0, 1.0),
            min_straight_length: min_straight,
            max_straight_length: p.max_straight_length.max(min_straight),
            min_curve_length: min_curve,
            max_curve_length: p.max_curve_length.max(min_curve),
            min_curve_rate,
            max_curve_rate,
            opposite_curve_chance: p.opposite_curve_chance.clamp(0.0, 1.0),

            min_procedural_between_designed: min_between,
            max_procedural_between_designed: d.max_procedural_between_designed.max(0.0),
            heading_correction_strength: d.heading_correction_strength.clamp(0.0, 1.0),
            target_bearing_deg: d.target_bearing_deg,

            bank_from_curvature: cfg.banking.bank_from_curvature,
            max_bank_angle: cfg.banking.max_bank_angle,
            bank_turn_rate_deadzone: cfg.banking.bank_turn_rate_deadzone,
            bank_target_response: cfg.banking.bank_target_response.clamp(0.0, 1.0),
            bank_change_rate: cfg.banking.bank_change_rate_deg_per_meter.max(0.01),

            spawn_trees: f.spawn_trees,
            trees_per_chunk: f.trees_per_chunk,
            birch_ratio: f.birch_ratio.clamp(0.0, 1.0),
            trunk_safe_radius: f.trunk_safe_radius.max(0.0),
            attempts_multiplier: f.attempts_multiplier.max(1),
            ditch_clearance: f.ditch_clearance.max(0.0),
            tree_collider_width: f.collider_width.max(0.01),
            tree_collider_height: f.collider_height.max(0.01),
            forest_min_up_dot: f.min_up_dot.clamp(-1.0, 1.0),

            rails,

            log_smoothness_diagnostics: cfg.debug.log_smoothness_diagnostics,
            seam_kink_warning_deg: cfg.debug.seam_kink_warning_deg,
        }
    }

    #[inline]
    pub fn half_road_width(&self) -> f64 {
        self.road_width * 0.5
    }

    /// Lateral extent left untouched by curvature compression.
    #[inline]
    pub fn safe_zone(&self) -> f64 {
        self.half_road_width() + self.shoulder_width
    }

    /// Outer lateral edge of the ditch (where the forest floor begins).
    #[inline]
    pub fn ditch_outer(&self) -> f64 {
        self.safe_zone() + self.ditch_width
    }
}

pub fn load_config_from_path(path: &Path) -> Result<RoadGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: RoadGenConfig = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn load_params_from_path(path: &Path) -> Result<RoadGenParams, Box<dyn Error>> {
    Ok(RoadGenParams::from_config(&load_config_from_path(path)?))
}

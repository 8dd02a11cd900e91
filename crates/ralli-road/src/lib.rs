//! Road corridor generation: seeded piece schedule, sample synthesis and chunk layout.
#![forbid(unsafe_code)]

pub mod config;
pub mod curve;
pub mod designed;
pub mod diagnostics;
pub mod elevation;
pub mod hash;
pub mod layout;
pub mod sample;
pub mod sequencer;
pub mod synth;

pub use config::{RoadGenConfig, RoadGenParams, load_config_from_path, load_params_from_path};
pub use curve::Curve;
pub use designed::{DesignedPiece, DesignedPiecePool, DesignedSelection, HeadingBias, PoolEntry, select_designed};
pub use diagnostics::{SmoothnessReport, log_smoothness, measure_smoothness};
pub use elevation::ElevationField;
pub use hash::{HashStream, hash_u32, hash01};
pub use layout::{ChunkLayout, ChunkLayoutCache};
pub use sample::{RoadFrame, RoadSample};
pub use sequencer::{Piece, PieceKind, PieceSequencer, SequencerState};
pub use synth::RoadSynth;

use std::sync::Arc;

use ralli_road::{Curve, DesignedPiece, DesignedPiecePool, RoadGenConfig, RoadGenParams};
use ralli_runtime::RoadStream;

fn scenario_params(cap: usize) -> RoadGenParams {
    let mut cfg = RoadGenConfig::default();
    cfg.seed = 1337;
    cfg.chunking.chunks_ahead = 8;
    cfg.chunking.chunks_behind = 2;
    cfg.chunking.max_chunks_per_tick = cap;
    cfg.pieces.min_curve_turn_rate_deg_per_meter = 0.12;
    RoadGenParams::from_config(&cfg)
}

fn mid_s(stream: &RoadStream, index: i32) -> f64 {
    let (a, b) = stream.chunk_range_s(index).expect("range");
    0.5 * (a + b)
}

#[test]
fn rebuild_then_slide_window() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    assert_eq!(stream.resident_indices(), (0..=8).collect::<Vec<_>>());
    assert!(!stream.is_resident(-1));
    assert!(!stream.is_resident(9));
    assert_eq!(stream.active_chunk_range(), Some((0, 8)));

    let s = mid_s(&stream, 5);
    let stats = stream.update(s);
    assert_eq!(stats.viewpoint_chunk, 5);
    assert_eq!(stats.destroyed, 3);
    assert_eq!(stats.created, 5);
    assert_eq!(stats.pending, 0);
    assert_eq!(stream.resident_indices(), (3..=13).collect::<Vec<_>>());
    assert_eq!(stream.active_chunk_range(), Some((3, 13)));
    for i in 0..3 {
        assert!(stream.chunk(i).is_none());
    }
}

#[test]
fn window_near_origin_is_clamped_at_zero() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    let stats = stream.update(0.0);
    assert_eq!(stats.viewpoint_chunk, 0);
    assert_eq!(stream.active_chunk_range(), Some((0, 8)));
    assert_eq!(stream.resident_indices(), (0..=8).collect::<Vec<_>>());
}

#[test]
fn non_finite_viewpoint_falls_back_to_origin() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    let laid_out = stream.layouts().len();
    assert_eq!(stream.chunk_index_for_s(f64::INFINITY), 0);
    let stats = stream.update(f64::INFINITY);
    assert_eq!(stats.viewpoint_chunk, 0);
    assert_eq!(stream.layouts().len(), laid_out);
}

#[test]
fn update_is_idempotent_for_same_viewpoint() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    let s = mid_s(&stream, 4);
    stream.update(s);
    let again = stream.update(s);
    assert_eq!(again.created, 0);
    assert_eq!(again.destroyed, 0);
}

#[test]
fn capped_ticks_fill_nearest_first() {
    let mut stream = RoadStream::new(scenario_params(2), None);
    stream.rebuild_from_scratch();
    let far = 5000.0;
    let center = stream.chunk_index_for_s(far);
    assert!(center > 12);

    let first = stream.update(far);
    assert_eq!(first.created, 2);
    assert_eq!(first.destroyed, 9);
    assert_eq!(first.pending, 9);
    assert!(stream.is_resident(center));
    assert!(stream.is_resident(center - 1) || stream.is_resident(center + 1));

    let mut ticks = 1;
    while stream.pending_len() > 0 {
        let t = stream.update(far);
        assert!(t.created <= 2);
        ticks += 1;
        assert!(ticks < 20);
    }
    assert_eq!(ticks, 6);
    assert_eq!(
        stream.resident_indices(),
        (center - 2..=center + 8).collect::<Vec<_>>()
    );
}

#[test]
fn frame_queries_cover_the_window() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    let (_, end) = stream.chunk_range_s(8).expect("range");
    let f = stream.road_frame_at(end - 0.5).expect("frame");
    assert!((f.forward.length() - 1.0).abs() < 1e-9);
    assert!(stream.road_frame_at(-1.0).is_none());
    assert!(stream.road_frame_at(end + 500.0).is_none());
    assert_eq!(stream.seed(), 1337);
    assert_eq!(stream.road_width(), stream.params().road_width);
    assert_eq!(stream.chunk_index_for_s(-3.0), 0);

    for i in 0..8 {
        let (_, a_end) = stream.chunk_range_s(i).expect("range");
        let (b_start, _) = stream.chunk_range_s(i + 1).expect("range");
        assert_eq!(a_end, b_start);
    }
}

#[test]
fn estimate_s_tracks_the_viewpoint() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    let s = mid_s(&stream, 6);
    let f = stream.road_frame_at(s).expect("frame");
    let est = stream.estimate_s(f.position + f.right * 1.5);
    assert!((est - s).abs() <= stream.params().sample_distance);

    let stats = stream.update_from_position(f.position);
    assert_eq!(stats.viewpoint_chunk, 6);
}

#[test]
fn rebuild_is_deterministic() {
    let mut a = RoadStream::new(scenario_params(0), None);
    let mut b = RoadStream::new(scenario_params(0), None);
    a.rebuild_from_scratch();
    b.rebuild_from_scratch();
    assert_eq!(a.synth().samples(), b.synth().samples());
    for i in 0..=8 {
        let ca = a.chunk(i).expect("chunk");
        let cb = b.chunk(i).expect("chunk");
        assert_eq!(ca.trees, cb.trees);
        assert_eq!(ca.layout, cb.layout);
    }
    assert!(a.tree_count() > 0);
}

#[test]
fn trees_keep_spacing_across_chunk_seams() {
    let mut stream = RoadStream::new(scenario_params(0), None);
    stream.rebuild_from_scratch();
    let p = stream.params().clone();
    let r2 = p.trunk_safe_radius * p.trunk_safe_radius;
    for i in 0..8 {
        let a = stream.chunk(i).expect("chunk");
        let b = stream.chunk(i + 1).expect("chunk");
        for ta in a.tree_positions() {
            for tb in b.tree_positions() {
                assert!((ta - tb).flat().length_sq() >= r2);
            }
        }
    }
}

#[test]
fn disabled_trees_leave_chunks_bare() {
    let mut p = scenario_params(0);
    p.spawn_trees = false;
    let mut stream = RoadStream::new(p, None);
    stream.rebuild_from_scratch();
    assert_eq!(stream.tree_count(), 0);
    assert!(stream.chunk(0).is_some_and(|c| c.meshes.is_some()));
}

#[test]
fn zero_weight_pool_keeps_corridor_procedural() {
    let mut pool = DesignedPiecePool::default();
    pool.push(
        DesignedPiece::from_turn_rate_curve("hairpin", 80.0, Curve::constant(2.0)),
        0.0,
        true,
    );
    let mut p = scenario_params(0);
    p.min_procedural_between_designed = 0.0;
    p.max_procedural_between_designed = 10.0;
    let mut stream = RoadStream::new(p, Some(Arc::new(pool)));
    stream.rebuild_from_scratch();
    assert!(stream.synth().samples().iter().all(|s| !s.designed));
}

#[test]
fn diagnostics_report_after_rebuild() {
    let mut p = scenario_params(0);
    p.log_smoothness_diagnostics = true;
    let mut stream = RoadStream::new(p, None);
    stream.rebuild_from_scratch();
    let r = stream.last_smoothness_report().expect("report");
    assert_eq!(r.samples, stream.synth().samples().len());
    assert!(r.max_step_error < 1e-6);
}

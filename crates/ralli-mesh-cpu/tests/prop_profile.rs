use proptest::prelude::*;
use ralli_mesh_cpu::{adjust_lateral_for_curvature, build_profile, compression_extent};
use ralli_road::RoadGenParams;

fn rate() -> impl Strategy<Value = f64> {
    prop_oneof![-6.0f64..-0.01, 0.01f64..6.0]
}

proptest! {
    // Inside offsets never pass the asymptote, and the map preserves order
    #[test]
    fn compression_is_bounded_and_monotonic(turn in rate(), a in 0.0f64..80.0, b in 0.0f64..80.0) {
        let p = RoadGenParams::default();
        let sign = turn.signum();
        let safe = p.safe_zone();
        let extent = compression_extent(&p, turn);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let out_lo = adjust_lateral_for_curvature(&p, (safe + lo) * sign, turn) * sign;
        let out_hi = adjust_lateral_for_curvature(&p, (safe + hi) * sign, turn) * sign;
        prop_assert!(out_hi <= safe + extent + 1e-9);
        prop_assert!(out_lo <= out_hi + 1e-12);
        prop_assert!(out_lo >= safe - 1e-12);
    }

    #[test]
    fn outside_and_road_surface_unchanged(turn in rate(), lat in 0.0f64..80.0) {
        let p = RoadGenParams::default();
        let outside = -turn.signum() * lat;
        prop_assert_eq!(adjust_lateral_for_curvature(&p, outside, turn), outside);
        let inside_safe = turn.signum() * lat.min(p.safe_zone());
        prop_assert_eq!(adjust_lateral_for_curvature(&p, inside_safe, turn), inside_safe);
    }

    #[test]
    fn profile_is_left_to_right(
        shoulder in 0.0f64..3.0,
        ditch in 0.0f64..4.0,
        flat in 0.0f64..4.0,
        forest in 0.0f64..5.0,
        skirt in 0.0f64..5.0,
    ) {
        let mut p = RoadGenParams::default();
        p.shoulder_width = shoulder;
        p.ditch_width = ditch;
        p.ditch_bottom_flat_width = flat.min(ditch);
        p.collidable_forest_width = forest;
        p.drop_skirt_depth = skirt;
        let prof = build_profile(&p);
        prop_assert!(prof.len() >= 2);
        for w in prof.windows(2) {
            prop_assert!(w[0].lateral <= w[1].lateral + 1e-12);
        }
    }
}

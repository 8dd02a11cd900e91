use proptest::prelude::*;
use ralli_road::{ChunkLayoutCache, RoadGenParams, hash01};

fn params_with(seed: i32, min_len: f64, max_len: f64, samples: i32) -> RoadGenParams {
    let mut cfg = ralli_road::RoadGenConfig::default();
    cfg.seed = seed;
    cfg.chunking.min_chunk_length = min_len;
    cfg.chunking.max_chunk_length = max_len;
    cfg.chunking.samples_per_chunk = samples;
    RoadGenParams::from_config(&cfg)
}

proptest! {
    #[test]
    fn hash_is_unit_interval_and_pure(seed in any::<u32>(), index in any::<i32>(), salt in any::<i32>()) {
        let a = hash01(seed, index, salt);
        prop_assert!((0.0..1.0).contains(&a));
        prop_assert_eq!(a, hash01(seed, index, salt));
    }

    // Neighbouring chunks share their boundary exactly, in both s and sample index
    #[test]
    fn layouts_are_contiguous(
        seed in -100_000i32..100_000,
        min_len in 20.0f64..200.0,
        extra in 0.0f64..150.0,
        samples in 2i32..200,
        count in 1i32..60,
    ) {
        let p = params_with(seed, min_len, min_len + extra, samples);
        let mut c = ChunkLayoutCache::new(&p);
        c.ensure_up_to(count);
        let ls = c.layouts();
        prop_assert_eq!(ls[0].start_s, 0.0);
        for w in ls.windows(2) {
            prop_assert_eq!(w[0].end_s, w[1].start_s);
            prop_assert_eq!(w[0].sample_end, w[1].sample_start);
            prop_assert!(w[0].sample_end >= w[0].sample_start + 2);
            prop_assert!(w[0].length > 0.0);
        }
    }

    #[test]
    fn index_at_s_lands_inside_its_chunk(seed in -1000i32..1000, s in 0.001f64..20_000.0) {
        let p = params_with(seed, 100.0, 180.0, 80);
        let mut c = ChunkLayoutCache::new(&p);
        let i = c.index_at_s(s);
        let l = *c.get(i).expect("layout exists after lookup");
        prop_assert!(l.start_s <= s && s < l.end_s);
    }
}

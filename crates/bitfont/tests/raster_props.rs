use bitfont::{BitRaster, PackMode, Palette, Rgba};
use proptest::prelude::*;

fn mode() -> impl Strategy<Value = PackMode> {
    prop_oneof![Just(PackMode::BitPacked), Just(PackMode::ByteAligned)]
}

proptest! {
    #[test]
    fn fresh_raster_is_clear(w in 1usize..40, h in 1usize..40, mode in mode()) {
        let r = BitRaster::new(w, h, mode).unwrap();
        for y in 0..h {
            for x in 0..w {
                prop_assert!(!r.get_bit(x, y).unwrap());
            }
        }
    }

    #[test]
    fn set_then_get(w in 1usize..40, h in 1usize..40, mode in mode(), seed in any::<u64>()) {
        let mut r = BitRaster::new(w, h, mode).unwrap();
        let x = (seed as usize) % w;
        let y = (seed as usize / w) % h;
        r.set_bit(x, y, true).unwrap();
        prop_assert!(r.get_bit(x, y).unwrap());
        prop_assert_eq!(r.count_set(), 1);
        r.set_bit(x, y, false).unwrap();
        prop_assert!(!r.get_bit(x, y).unwrap());
    }

    #[test]
    fn predicate_is_reproduced(w in 1usize..32, h in 1usize..32, mode in mode(), k in 1usize..7) {
        let f = |x: usize, y: usize| (x * 3 + y * 5) % k == 0;
        let mut r = BitRaster::new(w, h, mode).unwrap();
        r.convert_from_predicate(f);
        for y in 0..h {
            for x in 0..w {
                prop_assert_eq!(r.get_bit(x, y).unwrap(), f(x, y));
            }
        }
    }

    #[test]
    fn line_size_matches_mode(w in 1usize..200, h in 1usize..4) {
        let aligned = BitRaster::new(w, h, PackMode::ByteAligned).unwrap();
        prop_assert_eq!(aligned.line_size_in_bits() % 8, 0);
        prop_assert!(aligned.line_size_in_bits() >= w);
        let packed = BitRaster::new(w, h, PackMode::BitPacked).unwrap();
        prop_assert_eq!(packed.line_size_in_bits(), w);
    }

    #[test]
    fn closest_index_is_idempotent(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>(),
                                   tolerance in 0.0f64..100.0, apply_alpha in any::<bool>()) {
        let palette = Palette::grey(bitfont::BitDepth::Four);
        let color = Rgba::new(r, g, b, a);
        let first = palette.closest_index(color, tolerance, apply_alpha);
        prop_assert!(first < palette.len());
        prop_assert_eq!(first, palette.closest_index(color, tolerance, apply_alpha));
    }
}

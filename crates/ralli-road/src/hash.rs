//! Stateless seeded hashing; every random decision in the corridor comes from here.

pub const SALT_CURVE_PROBABILITY: i32 = 0;
pub const SALT_CURVE_LENGTH: i32 = 1;
pub const SALT_CURVE_RATE: i32 = 2;
pub const SALT_CURVE_DIRECTION: i32 = 3;
pub const SALT_CURVE_FLIP: i32 = 4;
pub const SALT_STRAIGHT_LENGTH: i32 = 5;
pub const SALT_DESIGNED_THRESHOLD: i32 = 100;
pub const SALT_CHUNK_LENGTH: i32 = 101;
pub const SALT_DESIGNED_ROLL: i32 = 200;
pub const SALT_FOREST_BASE: i32 = 1000;

#[inline]
pub fn hash_u32(seed: u32, index: i32, salt: i32) -> u32 {
    let mut x = seed;
    x ^= (index.wrapping_add(1) as u32).wrapping_mul(747_796_405);
    x ^= (salt.wrapping_add(17) as u32).wrapping_mul(2_891_336_453);
    x ^= x >> 16;
    x = x.wrapping_mul(2_246_822_519);
    x ^= x >> 13;
    x = x.wrapping_mul(3_266_489_917);
    x ^= x >> 16;
    x
}

/// Uniform value in `[0, 1)` from the low 24 bits of the mix.
#[inline]
pub fn hash01(seed: u32, index: i32, salt: i32) -> f64 {
    f64::from(hash_u32(seed, index, salt) & 0x00FF_FFFF) / 16_777_216.0
}

/// Counter-based stream of `hash01` draws, one stream per `(seed, key)`.
#[derive(Clone, Debug)]
pub struct HashStream {
    seed: u32,
    key: i32,
    counter: i32,
}

impl HashStream {
    pub fn new(seed: u32, key: i32) -> Self {
        Self {
            seed: hash_u32(seed, key, SALT_FOREST_BASE),
            key,
            counter: 0,
        }
    }

    #[inline]
    pub fn next01(&mut self) -> f64 {
        let v = hash01(self.seed, self.key, SALT_FOREST_BASE + 1 + self.counter);
        self.counter = self.counter.wrapping_add(1);
        v
    }

    #[inline]
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next01()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_inputs_are_stable() {
        let a = hash_u32(1337, 0, 0);
        let b = hash_u32(1337, 0, 0);
        assert_eq!(a, b);
        assert_ne!(hash_u32(1337, 0, 0), hash_u32(1337, 0, 1));
        assert_ne!(hash_u32(1337, 0, 0), hash_u32(1337, 1, 0));
        assert_ne!(hash_u32(1337, 0, 0), hash_u32(1338, 0, 0));
    }

    #[test]
    fn stream_is_reproducible_and_keyed() {
        let mut a = HashStream::new(1337, 4);
        let mut b = HashStream::new(1337, 4);
        let mut c = HashStream::new(1337, 5);
        let va: Vec<f64> = (0..16).map(|_| a.next01()).collect();
        let vb: Vec<f64> = (0..16).map(|_| b.next01()).collect();
        let vc: Vec<f64> = (0..16).map(|_| c.next01()).collect();
        assert_eq!(va, vb);
        assert_ne!(va, vc);
    }
}

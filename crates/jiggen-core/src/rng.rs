//! Deterministic 32-bit random stream.
//!
//! All randomness in a generation run flows through [`SeedStream`]: a pure
//! integer state advanced by a constant add and scrambled with a
//! xor-shift-multiply avalanche. The same seed therefore produces the same
//! byte-for-byte geometry on every platform. Edge geometry draws from a
//! sub-seeded stream derived from the edge's grid position, so the values an
//! edge sees never depend on generation order.

const STREAM_INCREMENT: u32 = 0x9e37_79b9;

/// Final mixing step. Every bit of the input affects every bit of the output.
pub fn avalanche(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Derive an independent seed from a base seed and a position tag.
///
/// `tag` namespaces consumers (horizontal edges, vertical edges, layout, ...)
/// so that two consumers at the same grid position still see unrelated
/// streams.
pub fn sub_seed(base: u32, tag: u32, row: u32, col: u32) -> u32 {
    let mut h = base;
    for v in [tag, row, col] {
        h = avalanche(h ^ v.wrapping_mul(STREAM_INCREMENT).wrapping_add(0x85eb_ca6b));
    }
    h
}

#[derive(Debug, Clone)]
pub struct SeedStream {
    state: u32,
}

impl SeedStream {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STREAM_INCREMENT);
        avalanche(self.state)
    }

    /// Uniform value in `[0, 1)` built from the top 24 bits of the stream.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() >> 8) * (1.0 / 16_777_216.0)
    }

    /// Uniform value in `[lo, hi)`.
    pub fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Multiplicative jitter: `1 ± amplitude`, uniformly distributed.
    pub fn vary(&mut self, amplitude: f64) -> f64 {
        1.0 + (self.next_f64() * 2.0 - 1.0) * amplitude
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    pub fn pick(&mut self, n: u32) -> u32 {
        debug_assert!(n > 0);
        self.next_u32() % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeedStream::new(12345);
        let mut b = SeedStream::new(12345);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeedStream::new(1);
        let mut b = SeedStream::new(2);
        let same = (0..16).filter(|_| a.next_u32() == b.next_u32()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut s = SeedStream::new(0xdead_beef);
        for _ in 0..1000 {
            let v = s.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn sub_seed_separates_positions_and_tags() {
        let base = 42;
        assert_ne!(sub_seed(base, 0, 1, 2), sub_seed(base, 0, 2, 1));
        assert_ne!(sub_seed(base, 0, 1, 2), sub_seed(base, 1, 1, 2));
        assert_ne!(sub_seed(base, 0, 0, 0), sub_seed(base, 0, 0, 1));
    }

    #[test]
    fn sub_seed_is_order_free() {
        // Interleaving draws from other streams must not change what a
        // position-derived stream produces.
        let mut isolated = SeedStream::new(sub_seed(7, 0, 3, 4));
        let expected: Vec<u32> = (0..8).map(|_| isolated.next_u32()).collect();

        let mut noise = SeedStream::new(sub_seed(7, 0, 1, 1));
        let _ = noise.next_f64();
        let mut replay = SeedStream::new(sub_seed(7, 0, 3, 4));
        let got: Vec<u32> = (0..8).map(|_| replay.next_u32()).collect();
        assert_eq!(expected, got);
    }

    #[test]
    fn vary_is_centered_on_one() {
        let mut s = SeedStream::new(99);
        for _ in 0..100 {
            let v = s.vary(0.15);
            assert!((0.85..=1.15).contains(&v));
        }
    }
}

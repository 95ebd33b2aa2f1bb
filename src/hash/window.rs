//! Base windowed hash and its k-amplified composite.

use rand::Rng;

/// Polynomial base used when folding quantized coordinates: `2^32 - 5`.
///
/// Any large constant coprime to the bucket moduli works; this one is kept
/// for bucket-distribution compatibility with prior runs.
pub const POLY_BASE: u64 = (1u64 << 32) - 5;

/// `(i % n + n) % n` for a possibly negative quantized coordinate.
#[inline]
fn modulo(i: i64, n: u64) -> u64 {
    i.rem_euclid(n as i64) as u64
}

/// `base^exp % modulus` by square-and-multiply.
///
/// `modulus <= 2^32`, so intermediates stay below `2^64` and plain `u64`
/// arithmetic cannot overflow.
#[inline]
fn pow_mod(mut base: u64, mut exp: u32, modulus: u64) -> u64 {
    let mut result = 1u64;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        exp >>= 1;
        base = base * base % modulus;
    }
    result
}

/// A single LSH hash `h(p)` mapping a byte vector to a bucket id in `[0, M)`.
///
/// Owns `dim` random offsets drawn uniformly from `[0, w)` at construction;
/// the offsets are immutable afterwards, so `hash` is a pure function of its
/// input for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct WindowHash {
    offsets: Vec<f64>,
    window: f64,
    modulus: u64,
}

impl WindowHash {
    /// Draw a fresh hash function with its own offsets.
    ///
    /// `modulus` must lie in `(1, 2^32]`; the callers derive it as
    /// `2^(32 / k)` and validate `k` beforehand.
    pub fn new<R: Rng + ?Sized>(dim: usize, modulus: u64, window: f64, rng: &mut R) -> Self {
        debug_assert!(modulus > 1 && modulus <= 1 << 32);
        debug_assert!(window > 0.0);
        let offsets = (0..dim).map(|_| rng.random::<f64>() * window).collect();
        Self {
            offsets,
            window,
            modulus,
        }
    }

    /// Bucket id of `v`, in `[0, modulus)`.
    ///
    /// Quantizes each coordinate to `floor((v[i] - s[i]) / w)`, walks the
    /// coordinates in *reverse* order, and folds them as a polynomial in
    /// [`POLY_BASE`] modulo the bucket count. The reversal matches the
    /// original formulation of this family and only affects which bucket a
    /// point lands in, never the metric.
    #[must_use]
    pub fn hash(&self, v: &[u8]) -> u32 {
        debug_assert_eq!(v.len(), self.offsets.len());

        let m = self.modulus;
        let mut acc = 0u64;
        for (i, (&x, &s)) in v.iter().zip(self.offsets.iter()).rev().enumerate() {
            let a = ((f64::from(x) - s) / self.window).floor() as i64;
            acc = (acc + modulo(a, m) * pow_mod(POLY_BASE, i as u32, m)) % m;
        }
        acc as u32
    }
}

/// A k-amplified composite hash `g(p) = h_1(p) . h_2(p) ... h_k(p)`.
///
/// The k sub-hash values are bit-packed into a single `u64` key, each
/// occupying `32 / k` bits, which is injective over the sub-hash range
/// `[0, 2^(32/k))^k`. Key collisions between different inputs therefore
/// require *all* k sub-hashes to agree, which is exactly the LSH bucketing
/// mechanism.
#[derive(Debug, Clone)]
pub struct AmplifiedHash {
    hashes: Vec<WindowHash>,
    bits_per_hash: u32,
}

impl AmplifiedHash {
    /// Build k independent base hashes sharing one window.
    ///
    /// The per-hash modulus is `2^(32 / k)`; the caller validates
    /// `k in 1..=32`.
    pub fn new<R: Rng + ?Sized>(k: usize, dim: usize, window: f64, rng: &mut R) -> Self {
        debug_assert!((1..=32).contains(&k));
        let bits_per_hash = 32 / k as u32;
        let modulus = 1u64 << bits_per_hash;
        let hashes = (0..k)
            .map(|_| WindowHash::new(dim, modulus, window, rng))
            .collect();
        Self {
            hashes,
            bits_per_hash,
        }
    }

    /// Composite key of `v`.
    #[must_use]
    pub fn key(&self, v: &[u8]) -> u64 {
        self.hashes.iter().fold(0u64, |acc, h| {
            (acc << self.bits_per_hash) | u64::from(h.hash(v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pow_mod_matches_naive() {
        for &(b, e, m) in &[(3u64, 7u32, 11u64), (POLY_BASE, 13, 1 << 8), (2, 0, 97)] {
            let naive = (0..e).fold(1u64, |acc, _| acc * (b % m) % m);
            assert_eq!(pow_mod(b, e, m), naive);
        }
    }

    #[test]
    fn modulo_is_non_negative_for_negative_input() {
        assert_eq!(modulo(-3, 256), 253);
        assert_eq!(modulo(-256, 256), 0);
        assert_eq!(modulo(5, 256), 5);
    }

    #[test]
    fn hash_is_deterministic_for_fixed_offsets() {
        let mut rng = StdRng::seed_from_u64(7);
        let h = WindowHash::new(16, 1 << 8, 40.0, &mut rng);
        let v: Vec<u8> = (0..16).map(|i| (i * 13) as u8).collect();
        assert_eq!(h.hash(&v), h.hash(&v));
    }

    #[test]
    fn hash_stays_below_modulus() {
        let mut rng = StdRng::seed_from_u64(13);
        let modulus = 1u64 << 8;
        let h = WindowHash::new(8, modulus, 10.0, &mut rng);
        for step in 0..64u16 {
            let v: Vec<u8> = (0..8).map(|i| (i as u16 * step % 256) as u8).collect();
            assert!(u64::from(h.hash(&v)) < modulus);
        }
    }

    #[test]
    fn seeded_family_is_reproducible() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(42);
            AmplifiedHash::new(4, 12, 25.0, &mut rng)
        };
        let (g1, g2) = (build(), build());
        let v: Vec<u8> = (0..12).map(|i| (i * 20) as u8).collect();
        assert_eq!(g1.key(&v), g2.key(&v));
    }

    #[test]
    fn amplified_key_packs_sub_hashes_injectively() {
        let mut rng = StdRng::seed_from_u64(3);
        let g = AmplifiedHash::new(4, 8, 15.0, &mut rng);
        let v: Vec<u8> = vec![200, 10, 30, 250, 0, 90, 120, 60];
        let key = g.key(&v);
        // Recompute the packing by hand from the sub-hash values.
        let mut expect = 0u64;
        for h in &g.hashes {
            expect = (expect << 8) | u64::from(h.hash(&v));
        }
        assert_eq!(key, expect);
    }
}

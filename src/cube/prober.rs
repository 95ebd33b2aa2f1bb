//! Hamming-distance-ordered vertex expansion.

/// Generates bit-flip masks for multi-probe vertex exploration.
///
/// Masks come out in increasing popcount (first every single-bit flip, then
/// every two-bit flip, ...), each popcount level in lexicographic order of
/// flipped positions. XOR-ing the query's vertex with the mask stream
/// therefore walks the cube in increasing Hamming distance and touches every
/// one of the `2^d' - 1` other vertices exactly once before exhausting.
///
/// The state machine is (current flip count `bits`, current position
/// combination); stepping past the last combination of a level increments
/// `bits`, and `bits > d'` signals exhaustion: at that point the whole cube
/// has been explored and the caller returns whatever it has.
#[derive(Debug)]
pub struct HammingProber {
    dim: u32,
    bits: u32,
    /// Flipped bit positions of the mask yielded next, ascending.
    positions: Vec<u32>,
}

impl HammingProber {
    /// Prober over a `dim`-bit cube. `dim` must lie in `1..=32`.
    #[must_use]
    pub fn new(dim: u32) -> Self {
        debug_assert!((1..=32).contains(&dim));
        Self {
            dim,
            bits: 1,
            positions: vec![0],
        }
    }

    /// Next flip mask, or `None` once every non-zero mask has been yielded.
    pub fn next_mask(&mut self) -> Option<u32> {
        if self.bits > self.dim {
            return None;
        }

        let mask = self
            .positions
            .iter()
            .fold(0u32, |acc, &p| acc | (1u32 << p));
        self.advance();
        Some(mask)
    }

    /// Step to the next position combination, rolling over to the next
    /// popcount level when the current one is spent.
    fn advance(&mut self) {
        let k = self.positions.len();

        // Find the rightmost position that can still move up.
        let mut i = k;
        while i > 0 {
            i -= 1;
            let ceiling = self.dim - (k - 1 - i) as u32;
            if self.positions[i] + 1 < ceiling {
                self.positions[i] += 1;
                for j in i + 1..k {
                    self.positions[j] = self.positions[j - 1] + 1;
                }
                return;
            }
        }

        // Level exhausted: start the next popcount.
        self.bits += 1;
        if self.bits <= self.dim {
            self.positions = (0..self.bits).collect();
        }
    }
}

impl Iterator for HammingProber {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.next_mask()
    }
}

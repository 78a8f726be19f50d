//! Small seeded random source for particle attributes.
//!
//! xorshift32 keeps the wasm bundle free of an entropy backend and makes
//! simulations reproducible under a fixed seed.

/// Fallback state used when seeded with zero (xorshift never leaves zero).
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// xorshift32 generator producing uniform `f64` samples.
#[derive(Clone, Debug)]
pub struct Rng {
	state: u32,
}

impl Rng {
	pub fn new(seed: u32) -> Self {
		Self {
			state: if seed == 0 {
				ZERO_SEED_REPLACEMENT
			} else {
				seed
			},
		}
	}

	/// Uniform value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.state ^= self.state << 13;
		self.state ^= self.state >> 17;
		self.state ^= self.state << 5;
		(self.state >> 8) as f64 * (1.0 / 16_777_216.0)
	}

	/// Uniform value in `[lo, hi)`.
	pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
		lo + self.next_f64() * (hi - lo)
	}

	/// Uniformly chosen element, `None` for an empty slice.
	pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
		if items.is_empty() {
			return None;
		}
		let idx = (self.next_f64() * items.len() as f64) as usize;
		items.get(idx.min(items.len() - 1))
	}
}

// Deterministic, portable luck values for procedural generation.
//
// Every "is there a cache here?" and "how many tokens does it hold?" decision
// in the game is answered by `luck(key)`: a pure function from a string key to
// a value in [0, 1). The key is hashed with FNV-1a (64-bit), the hash seeds a
// xoshiro256++ generator through SplitMix64, and the first `f64` drawn from
// that generator is the luck value.
//
// `GameRng` is a hand-rolled xoshiro256++ (Blackman & Vigna, 2019) with zero
// external dependencies, chosen for portability and to guarantee identical
// output across all platforms.
//
// **Critical constraint: determinism.** The luck function is part of the
// save-file contract. Changing the hash, the seeding path, or the float
// conversion changes which cells hold caches for every cell a player has not
// yet visited. Already-materialized caches are unaffected (their state lives
// in mementos), but the world map would shift under the player's feet.

use std::fmt::{self, Write as _};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Xoshiro256++ PRNG.
///
/// `luck` draws a single value from a freshly seeded instance. Callers that
/// need a stream of values from one seed can use the generator directly.
#[derive(Clone, Debug)]
pub struct GameRng {
    s: [u64; 4],
}

impl GameRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    /// Two `GameRng` instances created with the same seed will produce
    /// identical output sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Seed a generator from an arbitrary string key.
    pub fn from_key(key: &str) -> Self {
        Self::new(stable_hash(key))
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform `f64` in [0, 1).
    ///
    /// Uses the upper 53 bits of a `u64` to fill the mantissa of an f64.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// FNV-1a 64-bit hash of the UTF-8 bytes of `key`.
///
/// Stable across platforms and Rust versions, unlike `std::hash`.
pub fn stable_hash(key: &str) -> u64 {
    key.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic luck value in [0, 1) for a string key.
pub fn luck(key: &str) -> f64 {
    GameRng::from_key(key).next_f64()
}

/// Join key parts with commas, the way the game has always spelled composite
/// keys (`5,5,initialValue`).
pub fn join_key(parts: &[&dyn fmt::Display]) -> String {
    let mut key = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            key.push(',');
        }
        // Writing to a String cannot fail.
        let _ = write!(key, "{part}");
    }
    key
}

/// Luck value for a composite key. Equivalent to `luck(&join_key(parts))`.
pub fn luck_parts(parts: &[&dyn fmt::Display]) -> f64 {
    luck(&join_key(parts))
}

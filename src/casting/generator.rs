//! Coin tosses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::CoinToss;

/// Source of three-coin tosses.
///
/// The sequencer only ever asks for one toss per round; implementations
/// must not look at or depend on the hexagram being built.
pub trait CoinSource {
    fn generate_toss(&mut self) -> CoinToss;
}

/// Fair coins backed by a `rand` RNG.
#[derive(Debug)]
pub struct RandomCoins {
    rng: StdRng,
}

impl RandomCoins {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible tosses for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from an arbitrary string, e.g. a seed passed over the API.
    pub fn with_seed_str(seed: &str) -> Self {
        // FNV-1a, so a seed maps to the same tosses on every platform.
        let hash = seed.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        Self::with_seed(hash)
    }
}

impl Default for RandomCoins {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinSource for RandomCoins {
    fn generate_toss(&mut self) -> CoinToss {
        [
            self.rng.gen_bool(0.5),
            self.rng.gen_bool(0.5),
            self.rng.gen_bool(0.5),
        ]
    }
}

/// Replays a fixed list of tosses, cycling when exhausted. Used by tests and
/// by callers that already know the coins (e.g. a physical throw).
#[derive(Debug, Clone)]
pub struct ScriptedCoins {
    tosses: Vec<CoinToss>,
    next: usize,
}

impl ScriptedCoins {
    pub fn new(tosses: Vec<CoinToss>) -> Self {
        Self { tosses, next: 0 }
    }
}

impl CoinSource for ScriptedCoins {
    fn generate_toss(&mut self) -> CoinToss {
        if self.tosses.is_empty() {
            return [true, true, false];
        }
        let toss = self.tosses[self.next % self.tosses.len()];
        self.next += 1;
        toss
    }
}

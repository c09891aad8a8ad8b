use serde::{Deserialize, Serialize};

/// Outcome of a single coin: `true` is heads (front), `false` is tails.
pub type CoinOutcome = bool;

/// The three coins thrown for one line.
pub type CoinToss = [CoinOutcome; 3];

/// Faces shown before the very first toss of a casting.
pub const INITIAL_FACES: CoinToss = [true, true, true];

/// Zero-based position after which the lower trigram ends.
const SEPARATOR_POSITION: usize = 2;

/// One line of a hexagram.
///
/// Lines are created once from a coin toss and never mutated. `separate`
/// carries no meaning for resolution; it only tells a renderer where the
/// lower trigram ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Line {
    /// Solid (yang) when true, broken (yin) when false.
    pub yang: bool,
    /// Moving line: the toss was unanimous.
    pub change: bool,
    #[serde(default)]
    pub separate: bool,
}

impl Line {
    pub fn new(yang: bool, change: bool) -> Self {
        Self {
            yang,
            change,
            separate: false,
        }
    }

    /// Derive a line from three coins, given how many lines already exist.
    ///
    /// Two or more heads give a yang line; three heads (old yang) or three
    /// tails (old yin) give a moving line.
    pub fn from_toss(toss: CoinToss, position: usize) -> Self {
        let front = heads(toss);
        Self {
            yang: front >= 2,
            change: front == 0 || front == 3,
            separate: position == SEPARATOR_POSITION,
        }
    }

    /// The line this one turns into: moving lines flip polarity and settle.
    pub fn settled(self) -> Self {
        Self {
            yang: if self.change { !self.yang } else { self.yang },
            change: false,
            separate: self.separate,
        }
    }
}

/// Number of heads in a toss.
pub fn heads(toss: CoinToss) -> usize {
    toss.iter().filter(|face| **face).count()
}

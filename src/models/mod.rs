//! Domain models for iching-cast.
//!
//! # Core Concepts
//!
//! - [`Line`]: one line of a hexagram, derived from a [`CoinToss`].
//! - [`ResolvedHexagram`]: the name, sequence and changing lines computed
//!   from six lines.
//! - [`InterpretationRecord`]: traditional text for a hexagram, read from
//!   the external data file.
//! - [`CastingStats`]: counters kept across castings.
//! - [`AnalysisRequest`]: context sent to the AI analysis endpoint.

mod analysis;
mod hexagram;
mod interpretation;
mod line;
mod stats;

pub use analysis::*;
pub use hexagram::*;
pub use interpretation::*;
pub use line::*;
pub use stats::*;

//! The casting core: tables, coins, the round state machine and the resolver.

mod ack;
mod generator;
mod resolver;
mod sequencer;
mod session;
pub mod table;

pub use ack::{round_ack, AckSignal, AckWaiter, Acknowledgement};
pub use generator::{CoinSource, RandomCoins, ScriptedCoins};
pub use resolver::{changed_lines, resolve, trigram_index, HEXAGRAM_LINES};
pub use sequencer::{CastError, Round, RoundOutcome, RoundSequencer, SequencerState};
pub use session::{CastingSession, InstantPresenter, RoundPresenter};

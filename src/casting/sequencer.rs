//! The six-round casting state machine.
//!
//! A casting is six rounds. Each round draws one toss, waits for the
//! presentation layer to acknowledge it, then appends one line. Only one
//! round may be in flight at a time; extra start requests are ignored.
//!
//! ```text
//!            start_round()              on_round_acknowledged()
//!   Idle ─────────────────▶ RoundInFlight ──────────────────────▶ Idle      (< 6 lines)
//!                                        └─────────────────────▶ Complete  (6 lines)
//!   Complete ── begin() ──▶ Idle (fresh casting) ──▶ RoundInFlight
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CoinToss, Line, ResolvedHexagram, INITIAL_FACES};

use super::generator::{CoinSource, RandomCoins};
use super::resolver::{self, HEXAGRAM_LINES};

/// Casting errors surfaced to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("心诚则灵，请先输入您的问题。")]
    EmptyQuestion,

    #[error("a round is already in flight")]
    RoundInFlight,

    #[error("sequencer is {0:?}, expected a round in flight")]
    OutOfSequence(SequencerState),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SequencerState {
    /// Fewer than six lines, nothing in flight.
    Idle,
    /// A toss has been drawn and awaits acknowledgement.
    RoundInFlight,
    /// Six lines accumulated; frozen until the next `begin`.
    Complete,
}

/// A round handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    /// 1-based round number, equal to the line position being cast.
    pub number: usize,
    /// Faces left showing by the previous round; the transition starts here.
    pub previous: CoinToss,
    pub toss: CoinToss,
}

/// What acknowledging a round produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A line was appended and more rounds follow.
    Continue(Line),
    /// The sixth line was appended.
    Complete {
        line: Line,
        hexagram: ResolvedHexagram,
    },
}

impl RoundOutcome {
    pub fn line(&self) -> Line {
        match self {
            Self::Continue(line) => *line,
            Self::Complete { line, .. } => *line,
        }
    }
}

/// Owns the hexagram in progress. Nothing else mutates the lines.
#[derive(Debug)]
pub struct RoundSequencer<C = RandomCoins> {
    coins: C,
    lines: Vec<Line>,
    state: SequencerState,
    pending: Option<CoinToss>,
    last_faces: CoinToss,
    result: Option<ResolvedHexagram>,
}

impl<C: CoinSource> RoundSequencer<C> {
    pub fn new(coins: C) -> Self {
        Self {
            coins,
            lines: Vec::with_capacity(HEXAGRAM_LINES),
            state: SequencerState::Idle,
            pending: None,
            last_faces: INITIAL_FACES,
            result: None,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Lines cast so far, bottom first.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Faces currently showing on the coins.
    pub fn last_faces(&self) -> CoinToss {
        self.last_faces
    }

    /// The resolved hexagram once the casting is complete.
    pub fn result(&self) -> Option<&ResolvedHexagram> {
        self.result.as_ref()
    }

    /// User-initiated start.
    ///
    /// Rejects a blank question without touching state. While a round is in
    /// flight this is a no-op returning `Ok(None)`. A completed casting is
    /// discarded and a new one begins.
    pub fn begin(&mut self, question: &str) -> Result<Option<Round>, CastError> {
        if question.trim().is_empty() {
            return Err(CastError::EmptyQuestion);
        }

        match self.state {
            SequencerState::RoundInFlight => return Ok(None),
            SequencerState::Complete => self.reset(),
            SequencerState::Idle => {}
        }

        Ok(self.start_round())
    }

    /// Draw the next toss. Only acts in `Idle`; otherwise returns `None`.
    pub fn start_round(&mut self) -> Option<Round> {
        if self.state != SequencerState::Idle || self.lines.len() >= HEXAGRAM_LINES {
            return None;
        }

        let toss = self.coins.generate_toss();
        let round = Round {
            number: self.lines.len() + 1,
            previous: self.last_faces,
            toss,
        };

        self.pending = Some(toss);
        self.state = SequencerState::RoundInFlight;
        tracing::debug!(round = round.number, ?toss, "round started");

        Some(round)
    }

    /// Presentation finished the round. Later calls for the same round are
    /// ignored, so a late signal after a timeout does nothing.
    pub fn on_round_acknowledged(&mut self) -> Option<RoundOutcome> {
        if self.state != SequencerState::RoundInFlight {
            return None;
        }
        let toss = self.pending.take()?;

        let line = Line::from_toss(toss, self.lines.len());
        self.lines.push(line);
        self.last_faces = toss;

        if self.lines.len() < HEXAGRAM_LINES {
            self.state = SequencerState::Idle;
            return Some(RoundOutcome::Continue(line));
        }

        let hexagram = resolver::resolve(&self.lines);
        tracing::info!(
            sequence = hexagram.sequence,
            name = %hexagram.name,
            "casting complete"
        );
        self.state = SequencerState::Complete;
        self.result = Some(hexagram.clone());

        Some(RoundOutcome::Complete { line, hexagram })
    }

    /// Back to a fresh, empty casting.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.pending = None;
        self.last_faces = INITIAL_FACES;
        self.result = None;
        self.state = SequencerState::Idle;
    }

    /// Run all remaining rounds with no presentation in between.
    pub fn complete_immediately(&mut self) -> Option<ResolvedHexagram> {
        if self.state == SequencerState::Complete {
            self.reset();
        }
        loop {
            if self.state == SequencerState::Idle {
                self.start_round()?;
            }
            if let RoundOutcome::Complete { hexagram, .. } = self.on_round_acknowledged()? {
                return Some(hexagram);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casting::generator::ScriptedCoins;

    fn young_yang() -> RoundSequencer<ScriptedCoins> {
        RoundSequencer::new(ScriptedCoins::new(vec![[true, true, false]]))
    }

    #[test]
    fn starts_idle_and_empty() {
        let seq = young_yang();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(seq.lines().is_empty());
        assert_eq!(seq.last_faces(), INITIAL_FACES);
    }

    #[test]
    fn blank_question_is_rejected_without_state_change() {
        let mut seq = young_yang();
        assert_eq!(seq.begin("   "), Err(CastError::EmptyQuestion));
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn start_while_in_flight_is_a_no_op() {
        let mut seq = young_yang();
        let round = seq.begin("今日运势如何？").unwrap().unwrap();
        assert_eq!(round.number, 1);

        assert_eq!(seq.start_round(), None);
        assert_eq!(seq.begin("今日运势如何？"), Ok(None));
        assert_eq!(seq.state(), SequencerState::RoundInFlight);
        assert!(seq.lines().is_empty());
    }

    #[test]
    fn duplicate_acknowledgement_appends_once() {
        let mut seq = young_yang();
        seq.start_round();
        assert!(seq.on_round_acknowledged().is_some());
        assert!(seq.on_round_acknowledged().is_none());
        assert_eq!(seq.lines().len(), 1);
    }

    #[test]
    fn previous_faces_carry_over_between_rounds() {
        let mut seq = RoundSequencer::new(ScriptedCoins::new(vec![
            [false, true, false],
            [true, false, false],
        ]));
        let first = seq.start_round().unwrap();
        assert_eq!(first.previous, INITIAL_FACES);
        seq.on_round_acknowledged();

        let second = seq.start_round().unwrap();
        assert_eq!(second.previous, [false, true, false]);
        assert_eq!(second.toss, [true, false, false]);
    }

    #[test]
    fn sixth_line_completes_and_never_exceeds_six() {
        let mut seq = young_yang();
        for round in 1..=6 {
            let r = seq.start_round().unwrap();
            assert_eq!(r.number, round);
            let outcome = seq.on_round_acknowledged().unwrap();
            if round < 6 {
                assert!(matches!(outcome, RoundOutcome::Continue(_)));
            } else {
                match outcome {
                    RoundOutcome::Complete { hexagram, .. } => assert_eq!(hexagram.name, "乾"),
                    other => panic!("expected completion, got {:?}", other),
                }
            }
        }

        assert_eq!(seq.state(), SequencerState::Complete);
        assert_eq!(seq.start_round(), None);
        assert_eq!(seq.lines().len(), 6);
        assert!(seq.lines()[2].separate);
    }

    #[test]
    fn begin_after_completion_starts_fresh() {
        let mut seq = young_yang();
        seq.complete_immediately().unwrap();
        assert_eq!(seq.lines().len(), 6);

        let round = seq.begin("再问一卦").unwrap().unwrap();
        assert_eq!(round.number, 1);
        assert_eq!(round.previous, INITIAL_FACES);
        assert!(seq.lines().is_empty());
        assert!(seq.result().is_none());
    }
}

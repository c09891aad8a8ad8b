//! Drives a [`RoundSequencer`] through a full casting in real time.

use crate::config::CastingConfig;
use crate::models::{Line, ResolvedHexagram};

use super::ack::{round_ack, AckSignal, Acknowledgement};
use super::generator::{CoinSource, RandomCoins};
use super::sequencer::{CastError, Round, RoundOutcome, RoundSequencer, SequencerState};

/// The presentation side of a casting.
///
/// `begin_transition` must return promptly; the presenter animates however
/// it likes and calls [`AckSignal::signal`] when done. If it never does, the
/// session moves on after the configured fallback.
pub trait RoundPresenter {
    fn begin_transition(&self, round: &Round, done: AckSignal);

    /// A line landed at `index` (0 = bottom).
    fn line_appended(&self, _line: &Line, _index: usize) {}

    fn completed(&self, _hexagram: &ResolvedHexagram) {}
}

/// Presenter with no visuals: acknowledges every round on the spot.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPresenter;

impl RoundPresenter for InstantPresenter {
    fn begin_transition(&self, _round: &Round, done: AckSignal) {
        done.signal();
    }
}

/// One user's casting session: the sequencer plus its timing.
#[derive(Debug)]
pub struct CastingSession<C = RandomCoins> {
    sequencer: RoundSequencer<C>,
    config: CastingConfig,
}

impl<C: CoinSource> CastingSession<C> {
    pub fn new(coins: C, config: CastingConfig) -> Self {
        Self {
            sequencer: RoundSequencer::new(coins),
            config,
        }
    }

    pub fn sequencer(&self) -> &RoundSequencer<C> {
        &self.sequencer
    }

    /// Cast a full hexagram for `question`.
    ///
    /// Each round suspends until the presenter signals or the fallback
    /// elapses, then pauses for the inter-round delay before the next toss.
    /// Calling this again after completion starts a brand-new casting, as
    /// does calling it after an earlier `cast` future was dropped mid-way.
    pub async fn cast<P>(
        &mut self,
        question: &str,
        presenter: &P,
    ) -> Result<ResolvedHexagram, CastError>
    where
        P: RoundPresenter + ?Sized,
    {
        self.discard_abandoned();

        let mut round = self
            .sequencer
            .begin(question)?
            .ok_or(CastError::RoundInFlight)?;

        loop {
            self.await_round(&round, presenter).await;

            let outcome = self
                .sequencer
                .on_round_acknowledged()
                .ok_or(CastError::OutOfSequence(self.sequencer.state()))?;
            presenter.line_appended(&outcome.line(), round.number - 1);

            match outcome {
                RoundOutcome::Continue(_) => {
                    tokio::time::sleep(self.config.inter_round_delay).await;
                    round = self
                        .sequencer
                        .start_round()
                        .ok_or(CastError::OutOfSequence(self.sequencer.state()))?;
                }
                RoundOutcome::Complete { hexagram, .. } => {
                    presenter.completed(&hexagram);
                    return Ok(hexagram);
                }
            }
        }
    }

    /// `cast` holds `&mut self` until it returns, so progress found here
    /// belongs to a call whose future was dropped before completing.
    fn discard_abandoned(&mut self) {
        let abandoned = match self.sequencer.state() {
            SequencerState::RoundInFlight => true,
            SequencerState::Idle => !self.sequencer.lines().is_empty(),
            SequencerState::Complete => false,
        };
        if abandoned {
            tracing::warn!(
                lines = self.sequencer.lines().len(),
                "discarding an abandoned casting"
            );
            self.sequencer.reset();
        }
    }

    async fn await_round<P>(&self, round: &Round, presenter: &P)
    where
        P: RoundPresenter + ?Sized,
    {
        let (signal, waiter) = round_ack();
        presenter.begin_transition(round, signal);

        match waiter.wait(self.config.ack_timeout).await {
            Acknowledgement::Signalled => {}
            Acknowledgement::TimedOut => tracing::warn!(
                round = round.number,
                timeout = ?self.config.ack_timeout,
                "transition never acknowledged, advancing"
            ),
            Acknowledgement::Abandoned => {
                tracing::warn!(round = round.number, "presenter dropped the round signal")
            }
        }
    }
}

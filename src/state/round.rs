//! Controller-driven round transitions.
//!
//! The session moves through three states: voting (`revealed == false`),
//! revealed, and finished (last round revealed). Every transition is
//! idempotent-by-rejection: calling it when it does not apply returns
//! `None` and changes nothing.

use super::SessionState;
use crate::catalog::Catalog;
use crate::protocol::RoundPublic;
use crate::types::VoteTally;

/// Data released when a round's sources are revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOutcome {
    pub source_a: String,
    pub source_b: String,
    pub votes: VoteTally,
    /// True when the revealed round was the catalog's last; the caller must
    /// follow the reveal broadcast with a session-finished notification.
    pub finished: bool,
}

/// Payload for a round change (advance or reset): the new round's public
/// content with counters zeroed.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundChange {
    pub round: RoundPublic,
    pub votes: VoteTally,
    pub total_voters: usize,
    pub total_rounds: usize,
}

impl RoundChange {
    fn for_round(catalog: &Catalog, number: usize) -> Self {
        Self {
            round: RoundPublic::from(catalog.record(number)),
            votes: VoteTally::default(),
            total_voters: 0,
            total_rounds: catalog.len(),
        }
    }
}

/// Reveal the current round's sources and tally. `None` if already revealed.
pub fn reveal(state: &mut SessionState, catalog: &Catalog) -> Option<RevealOutcome> {
    if state.revealed {
        return None;
    }

    let record = catalog.record(state.current_round);
    state.revealed = true;

    let finished = state.current_round == catalog.len();
    if finished {
        state.finished = true;
    }

    Some(RevealOutcome {
        source_a: record.option_a.source.clone(),
        source_b: record.option_b.source.clone(),
        votes: state.votes,
        finished,
    })
}

/// Move on to the next round. `None` before the current round is revealed,
/// and `None` when no round remains (reset is the way back from the end).
pub fn advance_round(state: &mut SessionState, catalog: &Catalog) -> Option<RoundChange> {
    if !state.revealed || state.current_round >= catalog.len() {
        return None;
    }

    state.current_round += 1;
    state.revealed = false;
    state.votes = VoteTally::default();
    // Fresh ledger for the new round; prior rounds keep theirs.
    state.voter_choices.entry(state.current_round).or_default();

    Some(RoundChange::for_round(catalog, state.current_round))
}

/// Start over at round 1, dropping every tally and ledger entry. Valid from
/// any state.
pub fn reset(state: &mut SessionState, catalog: &Catalog) -> RoundChange {
    *state = SessionState::initial();
    RoundChange::for_round(catalog, 1)
}

//! Snapshot-at-join and post-mutation fan-out.
//!
//! Every mutation runs and publishes its broadcast while the session write
//! guard is held, so all connections observe transitions in one global
//! order. A joining connection subscribes first and then reads its
//! snapshot, so nothing can slip between the two.

use super::{round, vote, AppState};
use crate::protocol::{RoundPublic, ServerMessage};
use crate::render;
use crate::types::Choice;

/// Source labels are free text that may carry URLs; render them for display
/// the same way question text is rendered.
fn source_markup(raw: &str) -> String {
    render::linkify(&render::escape_html(raw))
}

impl AppState {
    /// Build the point-in-time state for a connection that just joined or
    /// reconnected. Sent to that connection only.
    pub async fn join_snapshot(&self, participant_id: Option<&str>) -> ServerMessage {
        let session = self.session.read().await;
        let record = self.catalog.record(session.current_round);

        let (source_a, source_b) = if session.revealed {
            (
                Some(source_markup(&record.option_a.source)),
                Some(source_markup(&record.option_b.source)),
            )
        } else {
            (None, None)
        };

        ServerMessage::SyncSnapshot {
            round: RoundPublic::from(record),
            votes: session.votes,
            total_voters: session.total_voters(),
            revealed: session.revealed,
            finished: session.finished,
            total_rounds: self.catalog.len(),
            source_a,
            source_b,
            my_vote: participant_id.and_then(|id| session.prior_choice(id)),
        }
    }

    /// Record a participant's vote and fan out the new tally. Rejected
    /// votes produce no broadcast.
    pub async fn apply_vote(&self, participant_id: &str, choice: Choice) {
        let mut session = self.session.write().await;
        let Some(outcome) = vote::cast_vote(&mut session, participant_id, choice) else {
            tracing::debug!(participant_id, "vote ignored");
            return;
        };

        self.publish(ServerMessage::VoteTallyUpdate {
            votes: outcome.votes,
            total_voters: outcome.total_voters,
        });
    }

    /// Reveal the current round, fanning out its sources and tally, then
    /// the finished marker when this was the last round.
    pub async fn apply_reveal(&self) {
        let mut session = self.session.write().await;
        let Some(outcome) = round::reveal(&mut session, &self.catalog) else {
            tracing::debug!("reveal ignored: already revealed");
            return;
        };

        self.publish(ServerMessage::RoundRevealed {
            source_a: source_markup(&outcome.source_a),
            source_b: source_markup(&outcome.source_b),
            votes: outcome.votes,
        });

        if outcome.finished {
            self.publish(ServerMessage::SessionFinished);
        }
    }

    /// Advance to the next round and fan out its public content.
    pub async fn apply_advance_round(&self) {
        let mut session = self.session.write().await;
        let Some(change) = round::advance_round(&mut session, &self.catalog) else {
            tracing::debug!("advance ignored");
            return;
        };

        self.publish(ServerMessage::RoundAdvanced {
            round: change.round,
            votes: change.votes,
            total_voters: change.total_voters,
            total_rounds: change.total_rounds,
        });
    }

    /// Reset to round 1 and fan out the fresh state.
    pub async fn apply_reset(&self) {
        let mut session = self.session.write().await;
        let change = round::reset(&mut session, &self.catalog);

        self.publish(ServerMessage::SessionReset {
            round: change.round,
            votes: change.votes,
            total_voters: change.total_voters,
            total_rounds: change.total_rounds,
        });
    }

    /// Send to every subscriber; a send error only means nobody is
    /// listening right now.
    fn publish(&self, msg: ServerMessage) {
        let _ = self.broadcast.send(msg);
    }
}

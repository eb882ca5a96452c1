mod round;
mod sync;
mod vote;

pub use round::{advance_round, reset, reveal, RevealOutcome, RoundChange};
pub use vote::{cast_vote, VoteOutcome};

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::auth::AdminConfig;
use crate::catalog::Catalog;
use crate::protocol::ServerMessage;
use crate::types::{Choice, ParticipantId, RoundNumber, VoteTally};

/// The authoritative record of the running session.
///
/// All mutation goes through [`cast_vote`], [`reveal`], [`advance_round`]
/// and [`reset`], each of which runs to completion under [`AppState`]'s
/// write guard. Between any two inbound events:
/// - `votes.a + votes.b` equals the entry count of
///   `voter_choices[current_round]`
/// - `finished` implies `revealed` and `current_round` is the catalog's
///   last round
/// - ledgers of past rounds are retained untouched
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// 1-based, always within the catalog's range.
    pub current_round: RoundNumber,
    pub revealed: bool,
    pub finished: bool,
    pub votes: VoteTally,
    /// Per-round ledger of who voted for what, keyed round -> participant.
    pub voter_choices: HashMap<RoundNumber, HashMap<ParticipantId, Choice>>,
}

impl SessionState {
    /// Round 1, empty tallies, nothing revealed.
    pub fn initial() -> Self {
        Self {
            current_round: 1,
            revealed: false,
            finished: false,
            votes: VoteTally::default(),
            voter_choices: HashMap::from([(1, HashMap::new())]),
        }
    }

    /// Distinct participants with a recorded choice in the current round.
    pub fn total_voters(&self) -> usize {
        self.voter_choices
            .get(&self.current_round)
            .map_or(0, |choices| choices.len())
    }

    /// A participant's recorded choice for the current round, if any.
    pub fn prior_choice(&self, participant_id: &str) -> Option<Choice> {
        self.voter_choices
            .get(&self.current_round)?
            .get(participant_id)
            .copied()
    }
}

/// Shared application state: the session behind its single write lock, the
/// immutable round catalog, the admin secret, and the fan-out channel every
/// connection subscribes to.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<SessionState>>,
    pub catalog: Arc<Catalog>,
    pub admin: Arc<AdminConfig>,
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new(catalog: Catalog, admin: AdminConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: Arc::new(RwLock::new(SessionState::initial())),
            catalog: Arc::new(catalog),
            admin: Arc::new(admin),
            broadcast: tx,
        }
    }

    /// Subscribe to the session's broadcast stream. Connections subscribe
    /// before reading their join snapshot so no update can slip between.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcast.subscribe()
    }
}

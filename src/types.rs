use serde::{Deserialize, Serialize};

/// Participant identities are opaque, client-supplied strings. They survive
/// reconnects, which is what lets a returning client recover its vote.
pub type ParticipantId = String;

/// Round ordinals are 1-based; the catalog owns the offset arithmetic.
pub type RoundNumber = usize;

/// One of the two options participants vote between.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    A,
    B,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Controller,
    Participant,
}

/// Live tally for the current round only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTally {
    pub a: u32,
    pub b: u32,
}

impl VoteTally {
    fn slot(&mut self, choice: Choice) -> &mut u32 {
        match choice {
            Choice::A => &mut self.a,
            Choice::B => &mut self.b,
        }
    }

    /// Count one vote for `choice`.
    pub fn add(&mut self, choice: Choice) {
        *self.slot(choice) += 1;
    }

    /// Remove one vote for `choice`, never going below zero.
    pub fn remove(&mut self, choice: Choice) {
        let slot = self.slot(choice);
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> u32 {
        self.a + self.b
    }
}

use super::SessionState;
use crate::types::{Choice, VoteTally};

/// The tally after a recorded vote, for the fan-out update.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub votes: VoteTally,
    pub total_voters: usize,
}

/// Apply one vote or vote-change from a participant.
///
/// Returns `None`, leaving the state untouched, when the participant id is
/// empty, voting is closed by a reveal, or the same choice is resubmitted.
/// A differing prior choice is retracted before the new one is counted, so
/// only a participant's latest choice ever counts.
pub fn cast_vote(
    state: &mut SessionState,
    participant_id: &str,
    choice: Choice,
) -> Option<VoteOutcome> {
    if participant_id.is_empty() || state.revealed {
        return None;
    }

    let round = state.current_round;
    let choices = state.voter_choices.entry(round).or_default();

    let prior = choices.get(participant_id).copied();
    if prior == Some(choice) {
        return None;
    }

    if let Some(prior) = prior {
        state.votes.remove(prior);
    }
    choices.insert(participant_id.to_string(), choice);
    state.votes.add(choice);

    Some(VoteOutcome {
        votes: state.votes,
        total_voters: state.total_voters(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_matches_ledger(state: &SessionState) -> bool {
        state.votes.total() as usize == state.total_voters()
    }

    #[test]
    fn test_first_vote_is_counted() {
        let mut state = SessionState::initial();
        let outcome = cast_vote(&mut state, "p1", Choice::A).unwrap();

        assert_eq!(outcome.votes, VoteTally { a: 1, b: 0 });
        assert_eq!(outcome.total_voters, 1);
        assert!(tally_matches_ledger(&state));
    }

    #[test]
    fn test_same_vote_resubmitted_is_rejected() {
        let mut state = SessionState::initial();
        cast_vote(&mut state, "p1", Choice::A).unwrap();

        assert!(cast_vote(&mut state, "p1", Choice::A).is_none());
        assert_eq!(state.votes, VoteTally { a: 1, b: 0 });
        assert_eq!(state.total_voters(), 1);
    }

    #[test]
    fn test_vote_switch_moves_a_single_count() {
        let mut state = SessionState::initial();
        cast_vote(&mut state, "p1", Choice::A).unwrap();
        let outcome = cast_vote(&mut state, "p1", Choice::B).unwrap();

        assert_eq!(outcome.votes, VoteTally { a: 0, b: 1 });
        assert_eq!(outcome.total_voters, 1);
        assert!(tally_matches_ledger(&state));
    }

    #[test]
    fn test_empty_participant_id_is_rejected() {
        let mut state = SessionState::initial();
        assert!(cast_vote(&mut state, "", Choice::A).is_none());
        assert_eq!(state.votes, VoteTally::default());
    }

    #[test]
    fn test_vote_after_reveal_is_rejected() {
        let mut state = SessionState::initial();
        state.revealed = true;

        assert!(cast_vote(&mut state, "p1", Choice::A).is_none());
        assert_eq!(state.total_voters(), 0);
    }

    #[test]
    fn test_distinct_voters_accumulate() {
        let mut state = SessionState::initial();
        for (id, choice) in [
            ("p1", Choice::A),
            ("p2", Choice::A),
            ("p3", Choice::A),
            ("p4", Choice::B),
            ("p5", Choice::B),
        ] {
            cast_vote(&mut state, id, choice).unwrap();
        }

        assert_eq!(state.votes, VoteTally { a: 3, b: 2 });
        assert_eq!(state.total_voters(), 5);
        assert!(tally_matches_ledger(&state));
    }

    #[test]
    fn test_switching_repeatedly_keeps_only_latest() {
        let mut state = SessionState::initial();
        cast_vote(&mut state, "p1", Choice::A).unwrap();
        cast_vote(&mut state, "p1", Choice::B).unwrap();
        cast_vote(&mut state, "p1", Choice::A).unwrap();
        let outcome = cast_vote(&mut state, "p1", Choice::B).unwrap();

        assert_eq!(outcome.votes, VoteTally { a: 0, b: 1 });
        assert_eq!(outcome.total_voters, 1);
        assert_eq!(state.prior_choice("p1"), Some(Choice::B));
    }
}

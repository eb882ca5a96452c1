use serde::{Deserialize, Serialize};

use crate::catalog::RoundRecord;
use crate::render;
use crate::types::{Choice, ParticipantId, VoteTally};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    Vote {
        participant_id: ParticipantId,
        choice: Choice,
    },
    // Controller-only messages
    Reveal,
    AdvanceRound,
    Reset,
}

/// Public view of a round: question and option texts rendered for display.
/// Source labels stay out of this struct so they cannot leak before reveal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundPublic {
    pub number: u32,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
}

impl From<&RoundRecord> for RoundPublic {
    fn from(record: &RoundRecord) -> Self {
        Self {
            number: record.number,
            question: render::format_text(&record.question),
            option_a: render::format_text(&record.option_a.text),
            option_b: render::format_text(&record.option_b.text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Point-in-time state for a connection that just joined or reconnected.
    /// Sent to that connection only, never broadcast.
    SyncSnapshot {
        round: RoundPublic,
        votes: VoteTally,
        total_voters: usize,
        revealed: bool,
        finished: bool,
        total_rounds: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_a: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_b: Option<String>,
        /// The caller's own recorded choice for the current round, so a
        /// reconnecting client can restore its selection without re-voting.
        #[serde(skip_serializing_if = "Option::is_none")]
        my_vote: Option<Choice>,
    },
    VoteTallyUpdate {
        votes: VoteTally,
        total_voters: usize,
    },
    RoundRevealed {
        source_a: String,
        source_b: String,
        votes: VoteTally,
    },
    RoundAdvanced {
        round: RoundPublic,
        votes: VoteTally,
        total_voters: usize,
        total_rounds: usize,
    },
    SessionReset {
        round: RoundPublic,
        votes: VoteTally,
        total_voters: usize,
        total_rounds: usize,
    },
    SessionFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"t":"vote","participant_id":"p1","choice":"a"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Vote { ref participant_id, choice: Choice::A } if participant_id == "p1"
        ));

        let msg: ClientMessage = serde_json::from_str(r#"{"t":"advance_round"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::AdvanceRound));
    }

    #[test]
    fn test_invalid_choice_fails_to_parse() {
        let result = serde_json::from_str::<ClientMessage>(
            r#"{"t":"vote","participant_id":"p1","choice":"c"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_omits_absent_optionals() {
        let snapshot = ServerMessage::SyncSnapshot {
            round: RoundPublic {
                number: 1,
                question: "<p>Q</p>".to_string(),
                option_a: "<p>A</p>".to_string(),
                option_b: "<p>B</p>".to_string(),
            },
            votes: VoteTally::default(),
            total_voters: 0,
            revealed: false,
            finished: false,
            total_rounds: 3,
            source_a: None,
            source_b: None,
            my_vote: None,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""t":"sync_snapshot""#));
        assert!(!json.contains("source_a"));
        assert!(!json.contains("my_vote"));
    }

    #[test]
    fn test_session_finished_is_an_empty_marker() {
        let json = serde_json::to_string(&ServerMessage::SessionFinished).unwrap();
        assert_eq!(json, r#"{"t":"session_finished"}"#);
    }

    #[test]
    fn test_round_public_renders_display_markup() {
        let record = RoundRecord {
            number: 2,
            question: "Which <answer> is better?".to_string(),
            option_a: crate::catalog::RoundOption {
                text: "First".to_string(),
                source: "https://a.example".to_string(),
            },
            option_b: crate::catalog::RoundOption {
                text: "Second".to_string(),
                source: "https://b.example".to_string(),
            },
        };

        let public = RoundPublic::from(&record);
        assert_eq!(public.number, 2);
        assert_eq!(public.question, "<p>Which &lt;answer&gt; is better?</p>");
        assert_eq!(public.option_a, "<p>First</p>");
    }
}

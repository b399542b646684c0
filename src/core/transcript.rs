use serde::{Deserialize, Serialize};

use crate::core::classify::DisplayStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Speaker::User
    }

    pub fn is_bot(self) -> bool {
        self == Speaker::Bot
    }
}

impl AsRef<str> for Speaker {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// What a turn carries: raw text for the user, a classified display
/// structure for the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnPayload {
    Text(String),
    Display(DisplayStructure),
}

/// One entry in the conversation transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub payload: TurnPayload,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            payload: TurnPayload::Text(text.into()),
        }
    }

    pub fn bot(display: DisplayStructure) -> Self {
        Self {
            speaker: Speaker::Bot,
            payload: TurnPayload::Display(display),
        }
    }
}

/// Ordered, append-only log of conversation turns.
///
/// Turns are never reordered, deduplicated, or removed within a session;
/// [`TranscriptStore::all`] hands out an insertion-order snapshot that later
/// appends cannot affect.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut store = TranscriptStore::new();
        store.append(Turn::user("first"));
        store.append(Turn::bot(DisplayStructure::plain("second")));

        let turns = store.all();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("first"));
        assert_eq!(turns[1], Turn::bot(DisplayStructure::plain("second")));
    }

    #[test]
    fn snapshots_are_unaffected_by_later_appends() {
        let mut store = TranscriptStore::new();
        store.append(Turn::user("one"));

        let snapshot = store.all();
        store.append(Turn::user("two"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn speaker_string_forms_round_trip() {
        assert_eq!(Speaker::User.as_str(), "user");
        assert_eq!(Speaker::Bot.as_str(), "bot");
        assert!(Speaker::User.is_user());
        assert!(Speaker::Bot.is_bot());
    }
}

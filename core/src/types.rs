//! Domain DTOs for the board service.
//!
//! # Design
//! Boards, lists and cards compare and hash by `id` alone. Two values that
//! describe the same remote entity are equal even when one of them carries
//! fetched children or a stale name; set and membership operations rely on
//! that. Name-based identity, used by the reconciler, is spelled out
//! explicitly there instead of living in `PartialEq`.
//!
//! `Card` keeps every field the service sends that we don't model in
//! `extra`, and writes them back verbatim when serialized.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// API key, token and the accounts whose boards are synchronized.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub token: String,
    #[serde(default)]
    pub usernames: Vec<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .field("usernames", &self.usernames)
            .finish()
    }
}

/// A board. `lists` stays `None` until fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub lists: Option<Vec<BoardList>>,
}

/// A list (column) on a board. `cards` stays `None` until fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    pub cards: Option<Vec<Card>>,
}

impl BoardList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cards: None,
        }
    }

    /// Fetched cards, or an empty slice if they were never loaded.
    pub fn cards(&self) -> &[Card] {
        self.cards.as_deref().unwrap_or_default()
    }

    pub(crate) fn push_card(&mut self, card: Card) {
        self.cards.get_or_insert_with(Vec::new).push(card);
    }
}

/// A card. Fields beyond the modelled ones are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(rename = "dueComplete", default)]
    pub due_complete: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            due: None,
            due_complete: false,
            extra: Map::new(),
        }
    }
}

/// A sync relationship: cards in `source` must exist, by name, in `target`.
/// Derived from list names or the config file on every run.
#[derive(Debug, Clone)]
pub struct ListMapping {
    pub source: BoardList,
    pub target: BoardList,
    pub interval: u32,
}

macro_rules! identity_by_id {
    ($($ty:ty),+) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    )+};
}

identity_by_id!(Board, BoardList, Card);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn cards_compare_by_id_only() {
        let a = Card::new("1", "Water plants");
        let mut b = Card::new("1", "Renamed");
        b.due_complete = true;
        assert_eq!(a, b);
        assert_ne!(a, Card::new("2", "Water plants"));

        let set: HashSet<Card> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn lists_compare_by_id_even_with_cards_loaded() {
        let mut loaded = BoardList::new("L1", "Daily");
        loaded.push_card(Card::new("c", "x"));
        assert_eq!(loaded, BoardList::new("L1", "Daily {\"interval\": 1}"));
    }

    #[test]
    fn card_keeps_unknown_fields() {
        let raw = r#"{"id":"c1","name":"Vacuum","due":null,"dueComplete":true,"idList":"L1","labels":[{"color":"red"}]}"#;
        let card: Card = serde_json::from_str(raw).unwrap();
        assert!(card.due_complete);
        assert_eq!(card.extra["idList"], "L1");

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["labels"][0]["color"], "red");
        assert_eq!(back["dueComplete"], true);
    }

    #[test]
    fn card_defaults_missing_optional_fields() {
        let card: Card = serde_json::from_str(r#"{"id":"c1","name":"Dishes"}"#).unwrap();
        assert!(card.due.is_none());
        assert!(!card.due_complete);
        assert!(card.extra.is_empty());
    }

    #[test]
    fn list_ignores_unknown_fields_and_never_reads_cards() {
        let raw = r#"{"id":"L1","name":"Todo","closed":false,"cards":[{"id":"c","name":"n"}]}"#;
        let list: BoardList = serde_json::from_str(raw).unwrap();
        assert!(list.cards.is_none());
        assert!(list.cards().is_empty());
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let creds = Credentials {
            key: "k-secret".to_string(),
            token: "t-secret".to_string(),
            usernames: vec!["s.law".to_string()],
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("secret"));
        assert!(shown.contains("s.law"));
    }
}

//! Board entities
//!
//! Read-only views of the managed Trello board. Both are fetched once at
//! the start of a run and never refreshed while it is in progress.

use serde::{Deserialize, Serialize};

use super::normalize::eq_loose;

/// A card that already exists on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCard {
    pub id: String,
    pub name: String,
}

impl BoardCard {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A list (bucket) new cards are filed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: String,
    pub name: String,
}

impl BoardList {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Lists and cards of the board as seen at the start of a run
#[derive(Debug, Clone, Default)]
pub struct BoardSnapshot {
    pub lists: Vec<BoardList>,
    pub cards: Vec<BoardCard>,
}

impl BoardSnapshot {
    pub fn new(lists: Vec<BoardList>, cards: Vec<BoardCard>) -> Self {
        Self { lists, cards }
    }

    /// First list whose name loosely equals `name`
    pub fn find_list(&self, name: &str) -> Option<&BoardList> {
        self.lists.iter().find(|list| eq_loose(&list.name, name))
    }

    pub fn card_names(&self) -> Vec<&str> {
        self.cards.iter().map(|card| card.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_list_matches_loosely() {
        let snapshot = BoardSnapshot::new(
            vec![BoardList::new("l1", "White"), BoardList::new("l2", "Land")],
            Vec::new(),
        );
        assert_eq!(snapshot.find_list("white").map(|l| l.id.as_str()), Some("l1"));
        assert_eq!(snapshot.find_list(" LAND ").map(|l| l.id.as_str()), Some("l2"));
        assert!(snapshot.find_list("Green").is_none());
    }
}

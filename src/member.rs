use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// A registered library member and the items they currently hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Membership number, unique within a library
    number: String,
    /// Display name
    name: String,
    /// Items checked out to this member, in borrowing order
    held: Vec<ItemId>,
}

impl Member {
    /// Create a member holding nothing
    #[must_use]
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self { number: number.into(), name: name.into(), held: Vec::new() }
    }

    /// Membership number
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items currently checked out to this member
    #[must_use]
    pub fn held(&self) -> &[ItemId] {
        &self.held
    }

    /// Whether `item` is in the held set
    #[must_use]
    pub fn holds(&self, item: ItemId) -> bool {
        self.held.contains(&item)
    }

    /// Note that `item` was lent to this member
    pub fn record_borrow(&mut self, item: ItemId) {
        self.held.push(item);
    }

    /// Drop one entry for `item` from the held set, returning whether one was present
    pub fn record_return(&mut self, item: ItemId) -> bool {
        let found = self.held.iter().position(|held| *held == item);
        found.map(|pos| self.held.remove(pos)).is_some()
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {}), items on loan: {}", self.name, self.number, self.held.len())
    }
}

//! Icon tokens and the bounded icon row each alert card shows.
//!
//! The row holds at most `ICON_ROW_CAP` tokens. Pushing past capacity evicts
//! the oldest token first. Tokens carry the identifier of the notification
//! that delivered them, which is what deduplication keys on.

use std::collections::VecDeque;

use super::card::CardKind;
use super::Millis;

pub const ICON_ROW_CAP: usize = 5;

/// The four glyphs alert icons are drawn from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Glyph {
    Square,
    Arrow,
    File,
    Search,
}

impl Glyph {
    pub const ALL: [Glyph; 4] = [Glyph::Square, Glyph::Arrow, Glyph::File, Glyph::Search];

    /// Single-column terminal symbol.
    pub fn symbol(self) -> char {
        match self {
            Glyph::Square => '■',
            Glyph::Arrow => '→',
            Glyph::File => '≡',
            Glyph::Search => '○',
        }
    }
}

/// Process-unique identifier of a token / notification.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TokenId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IconToken {
    pub id: TokenId,
    pub glyph: Glyph,
    pub source: CardKind,
    pub at: Millis,
}

/// Cross-card signal: a card dropped an icon toward "Active Threats".
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Notification {
    pub id: TokenId,
    pub icon: Glyph,
    pub source: CardKind,
    pub timestamp: Millis,
}

impl Notification {
    pub fn token(&self) -> IconToken {
        IconToken { id: self.id, glyph: self.icon, source: self.source, at: self.timestamp }
    }
}

#[derive(Clone, Debug, Default)]
pub struct IconQueue {
    items: VecDeque<IconToken>,
}

impl IconQueue {
    pub fn new() -> Self {
        IconQueue { items: VecDeque::with_capacity(ICON_ROW_CAP + 1) }
    }

    /// Append at the newest end. Returns the evicted token, if any.
    pub fn push(&mut self, token: IconToken) -> Option<IconToken> {
        self.items.push_back(token);
        if self.items.len() > ICON_ROW_CAP {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// Append unless a token with the same id is already present.
    /// Returns false when the token was a duplicate.
    pub fn push_unique(&mut self, token: IconToken) -> bool {
        if self.contains(token.id) {
            return false;
        }
        self.push(token);
        true
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.items.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &IconToken> {
        self.items.iter()
    }
}

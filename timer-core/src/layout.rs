use crate::card::{Card, Span, CARD_COUNT};

/// How the four card slots share the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Layout {
    /// 2x2 grid, every card visible
    #[default]
    Quad,
    /// Left and right halves: cards 1+2 and 3+4 merged
    LeftRight,
    /// Top and bottom halves: cards 1+2 and 3+4 merged
    TopBottom,
    /// Card 1 fills the board
    Solo,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Quad, Layout::LeftRight, Layout::TopBottom, Layout::Solo];

    /// Stored preference value
    pub fn key(&self) -> &'static str {
        match self {
            Layout::Quad => "2x2",
            Layout::LeftRight => "1x2",
            Layout::TopBottom => "2x1",
            Layout::Solo => "1x1",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Layout::Quad => "Quad",
            Layout::LeftRight => "Left / Right",
            Layout::TopBottom => "Top / Bottom",
            Layout::Solo => "Solo",
        }
    }

    pub fn spans(&self) -> [Span; CARD_COUNT] {
        use Span::*;
        match self {
            Layout::Quad => [Normal, Normal, Normal, Normal],
            Layout::LeftRight | Layout::TopBottom => [MergePrimary, Hidden, MergeSecondary, Hidden],
            Layout::Solo => [Full, Hidden, Hidden, Hidden],
        }
    }

    /// Grid dimensions as (columns, rows) for the visible cards.
    pub fn grid(&self) -> (u16, u16) {
        match self {
            Layout::Quad => (2, 2),
            Layout::LeftRight => (2, 1),
            Layout::TopBottom => (1, 2),
            Layout::Solo => (1, 1),
        }
    }
}

/// Rewrite every card's span for the given layout.
pub fn apply_layout(layout: Layout, cards: &mut [Card; CARD_COUNT]) {
    for (card, span) in cards.iter_mut().zip(layout.spans()) {
        card.span = span;
    }
}

/// Map a shortcut digit (1-4) to a card index. Hidden cards have no shortcut.
pub fn key_to_card_index(layout: Layout, key: u8) -> Option<usize> {
    match (layout, key) {
        (Layout::Quad, 1..=4) => Some(key as usize - 1),
        (Layout::LeftRight | Layout::TopBottom, 1) => Some(0),
        (Layout::LeftRight | Layout::TopBottom, 2) => Some(2),
        (Layout::Solo, 1) => Some(0),
        _ => None,
    }
}

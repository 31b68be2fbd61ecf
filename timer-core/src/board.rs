use crate::card::{Card, CARD_COUNT};
use crate::layout::{apply_layout, Layout};

/// The four card slots. Cards are addressed by their stable id (1-4) and
/// are never added or removed after construction.
pub struct Board {
    cards: [Card; CARD_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cards: [Card::new(1), Card::new(2), Card::new(3), Card::new(4)],
        }
    }

    pub fn cards(&self) -> &[Card; CARD_COUNT] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card; CARD_COUNT] {
        &mut self.cards
    }

    pub fn get(&self, id: u8) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: u8) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn apply_layout(&mut self, layout: Layout) {
        apply_layout(layout, &mut self.cards);
    }

    /// Any card running and not paused
    pub fn any_active(&self) -> bool {
        self.cards.iter().any(Card::is_active)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Span;

    #[test]
    fn test_lookup_by_id() {
        let mut board = Board::new();
        assert_eq!(board.get(4).map(|c| c.id), Some(4));
        assert!(board.get(0).is_none());
        assert!(board.get(5).is_none());

        if let Some(card) = board.get_mut(2) {
            card.start();
        }
        assert!(board.cards()[1].is_running());
    }

    #[test]
    fn test_any_active_ignores_paused() {
        let mut board = Board::new();
        assert!(!board.any_active());
        board.cards_mut()[0].start();
        assert!(board.any_active());
        board.cards_mut()[0].toggle_pause();
        assert!(!board.any_active());
    }

    #[test]
    fn test_layout_applies_in_place() {
        let mut board = Board::new();
        board.apply_layout(Layout::Solo);
        assert_eq!(board.cards()[0].span, Span::Full);
        assert_eq!(board.cards()[3].span, Span::Hidden);
    }
}

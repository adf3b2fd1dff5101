use std::collections::VecDeque;
use rand::Rng;
use rand::seq::SliceRandom;
use crate::{Role, ROLE_VARIANTS};

/// Face-down court deck. Draws come off the front, returned exchange cards go on the back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Role>,
}

impl Deck {
    /// `copies` of every role, shuffled.
    pub fn new<R: Rng + ?Sized>(copies: usize, rng: &mut R) -> Self {
        let cards: Vec<Role> = ROLE_VARIANTS.iter()
            .flat_map(|&role| std::iter::repeat(role).take(copies))
            .collect();

        let mut deck = Self::from_cards(cards);
        deck.shuffle(rng);
        deck
    }

    pub fn from_cards(cards: impl IntoIterator<Item=Role>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&Role> {
        self.cards.iter()
    }

    pub fn count(&self, role: Role) -> usize {
        self.cards.iter().filter(|&&r| r == role).count()
    }

    pub fn draw(&mut self) -> Option<Role> {
        self.cards.pop_front()
    }

    pub fn draw_up_to(&mut self, n: usize) -> Vec<Role> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn insert_and_shuffle<R: Rng + ?Sized>(&mut self, role: Role, rng: &mut R) {
        self.cards.push_back(role);
        self.shuffle(rng);
    }

    /// Puts a card back on the bottom without shuffling.
    pub fn return_to_bottom(&mut self, role: Role) {
        self.cards.push_back(role);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::deck::Deck;
    use crate::Role::{Ambassador, Captain, Contessa, Duke};
    use crate::ROLE_VARIANTS;

    #[test]
    fn seeded_with_copies_of_every_role() {
        let mut rng = Pcg64::seed_from_u64(7);
        let deck = Deck::new(3, &mut rng);
        assert_eq!(deck.len(), 15);
        for role in ROLE_VARIANTS {
            assert_eq!(deck.count(role), 3);
        }
    }

    #[test]
    fn draw_from_front_return_to_back() {
        let mut deck = Deck::from_cards([Duke, Captain]);
        deck.return_to_bottom(Contessa);
        assert_eq!(deck.draw(), Some(Duke));
        assert_eq!(deck.draw(), Some(Captain));
        assert_eq!(deck.draw(), Some(Contessa));
        assert_eq!(deck.draw(), None);
        assert!(deck.is_empty());
    }

    #[test]
    fn draw_up_to_stops_at_empty() {
        let mut deck = Deck::from_cards([Ambassador]);
        assert_eq!(deck.draw_up_to(2), vec![Ambassador]);
        assert!(deck.draw_up_to(2).is_empty());
    }

    #[test]
    fn insert_and_shuffle_keeps_cards() {
        let mut rng = Pcg64::seed_from_u64(1);
        let mut deck = Deck::new(3, &mut rng);
        deck.insert_and_shuffle(Duke, &mut rng);
        assert_eq!(deck.len(), 16);
        assert_eq!(deck.count(Duke), 4);
    }
}

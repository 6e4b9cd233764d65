// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

/// A Poker card.
///
/// Cards are plain values compared by rank and suit, a card is created once
/// and never changes:
///
/// ```
/// # use potbot_cards::{Card, Rank, Suit};
/// let card = Card::new(Rank::Queen, Suit::Spades);
/// assert_eq!(card.rank().value(), 12);
/// assert_eq!(card.to_string(), "Q♠");
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card given a rank and a suit.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank, self.suit)
    }
}

/// Card rank, the discriminant is the rank value used for ranking hands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    /// Deuce
    Deuce = 2,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks from deuce to ace.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The rank value in the 2..=14 range, aces are 14.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Creates a rank from its value, returns None if the value is not in 2..=14.
    pub fn from_value(value: u8) -> Option<Rank> {
        Rank::ranks().find(|r| r.value() == value)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            Rank::Ace => write!(f, "A"),
            rank => write!(f, "{}", rank.value()),
        }
    }
}

/// Card color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Hearts and diamonds.
    Red,
    /// Clubs and spades.
    Black,
}

/// Card suit.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Suit {
    /// Hearts suit.
    Hearts,
    /// Diamonds (tiles) suit.
    Diamonds,
    /// Clubs (clovers) suit.
    Clubs,
    /// Spades (pikes) suit.
    Spades,
}

impl Suit {
    /// Returns all suits in deck order.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades].into_iter()
    }

    /// The suit color.
    pub fn color(&self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        };

        write!(f, "{suit}")
    }
}

/// Error returned when drawing from an empty deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the deck is empty")]
pub struct EmptyDeck;

/// A cards Deck.
///
/// Cards are drawn from the front of the pile, each deck owns the random
/// generator used to shuffle it.
#[derive(Debug)]
pub struct Deck {
    cards: VecDeque<Card>,
    rng: StdRng,
}

impl Deck {
    /// The number of cards in a full deck.
    pub const SIZE: usize = 52;

    /// Creates a full deck with a generator seeded from the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a full deck with a user provided generator.
    pub fn with_rng(rng: StdRng) -> Self {
        let mut deck = Self {
            cards: VecDeque::with_capacity(Self::SIZE),
            rng,
        };
        deck.refill();
        deck
    }

    /// Resets this deck to the ordered 52 cards.
    pub fn refill(&mut self) {
        self.cards.clear();
        self.cards.extend(
            Suit::suits().flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s))),
        );
    }

    /// Shuffles the cards left in the deck.
    pub fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut self.rng);
    }

    /// Removes and returns the card at the front of the deck.
    pub fn get_card(&mut self) -> Result<Card, EmptyDeck> {
        self.cards.pop_front().ok_or(EmptyDeck)
    }

    /// Returns the card at the front of the deck without removing it.
    pub fn peek_card(&self) -> Result<Card, EmptyDeck> {
        self.cards.front().copied().ok_or(EmptyDeck)
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns an iterator over the cards left in the deck, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Calls the `f` closure for each k-cards combination of the deck cards.
    ///
    /// Panics if k is not 1 <= k <= 7.
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!((1..=7).contains(&k), "1 <= k <= 7");

        if k > self.cards.len() {
            return;
        }

        let cards = self.cards.iter().copied().collect::<Vec<_>>();
        let mut idx = (0..k).collect::<Vec<_>>();
        let mut hand = idx.iter().map(|&i| cards[i]).collect::<Vec<_>>();

        loop {
            f(&hand);

            // Find the rightmost index that can still move right.
            let Some(pos) = (0..k).rev().find(|&i| idx[i] < cards.len() - k + i) else {
                break;
            };

            idx[pos] += 1;
            for i in (pos + 1)..k {
                idx[i] = idx[i - 1] + 1;
            }

            for i in pos..k {
                hand[i] = cards[idx[i]];
            }
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::collections::vec_deque::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;

    fn seeded_deck(seed: u64) -> Deck {
        Deck::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn refill_has_52_unique_cards() {
        let mut deck = seeded_deck(7);
        deck.shuffle();
        deck.get_card().unwrap();
        deck.refill();
        assert_eq!(deck.len(), Deck::SIZE);

        let cards = deck.iter().copied().collect::<HashSet<_>>();
        assert_eq!(cards.len(), Deck::SIZE);
        for card in &cards {
            assert!((2..=14).contains(&card.rank().value()));
        }

        // Refill order is hearts first, ranks ascending.
        assert_eq!(
            deck.peek_card().unwrap(),
            Card::new(Rank::Deuce, Suit::Hearts)
        );
    }

    #[test]
    fn deck_exhaustion() {
        let mut deck = seeded_deck(42);
        deck.shuffle();

        let mut cards = HashSet::default();
        for _ in 0..Deck::SIZE {
            assert!(cards.insert(deck.get_card().unwrap()));
        }

        assert_eq!(cards.len(), Deck::SIZE);
        assert!(deck.is_empty());
        assert_eq!(deck.get_card(), Err(EmptyDeck));
        assert_eq!(deck.peek_card(), Err(EmptyDeck));
    }

    #[test]
    fn peek_does_not_remove() {
        let mut deck = seeded_deck(1);
        deck.shuffle();
        let front = deck.peek_card().unwrap();
        assert_eq!(deck.len(), Deck::SIZE);
        assert_eq!(deck.get_card().unwrap(), front);
        assert_eq!(deck.len(), Deck::SIZE - 1);
    }

    #[test]
    fn shuffle_keeps_membership() {
        let mut deck = seeded_deck(3);
        let before = deck.iter().copied().collect::<HashSet<_>>();
        deck.shuffle();
        let after = deck.iter().copied().collect::<HashSet<_>>();
        assert_eq!(before, after);

        let mut d1 = seeded_deck(12345);
        let mut d2 = seeded_deck(12345);
        d1.shuffle();
        d2.shuffle();
        assert!(d1.iter().eq(d2.iter()));
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "K♦");

        let c = Card::new(Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5♠");

        let c = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "10♥");

        let c = Card::new(Rank::Ace, Suit::Clubs);
        assert_eq!(c.to_string(), "A♣");
    }

    #[test]
    fn suit_colors() {
        assert_eq!(Suit::Hearts.color(), Color::Red);
        assert_eq!(Suit::Diamonds.color(), Color::Red);
        assert_eq!(Suit::Clubs.color(), Color::Black);
        assert_eq!(Suit::Spades.color(), Color::Black);
    }

    #[test]
    fn rank_values() {
        assert_eq!(Rank::Deuce.value(), 2);
        assert_eq!(Rank::Ace.value(), 14);
        assert_eq!(Rank::from_value(11), Some(Rank::Jack));
        assert_eq!(Rank::from_value(1), None);
        assert_eq!(Rank::from_value(15), None);
    }

    #[test]
    fn deck_for_each() {
        let deck = seeded_deck(0);

        let mut hands = HashSet::default();
        deck.for_each(2, |cards| {
            assert_eq!(cards.len(), 2);
            hands.insert(cards.to_owned());
        });
        assert_eq!(hands.len(), 1_326);

        hands.clear();
        deck.for_each(3, |cards| {
            assert_eq!(cards.len(), 3);
            hands.insert(cards.to_owned());
        });
        assert_eq!(hands.len(), 22_100);
    }

    #[test]
    fn deck_for_each_small() {
        let mut deck = seeded_deck(0);
        while deck.len() > 7 {
            deck.get_card().unwrap();
        }

        let mut count = 0;
        deck.for_each(5, |cards| {
            assert_eq!(cards.len(), 5);
            count += 1;
        });
        assert_eq!(count, 21);

        // A single combination when k is the deck size.
        let mut count = 0;
        deck.for_each(7, |_| count += 1);
        assert_eq!(count, 1);
    }
}

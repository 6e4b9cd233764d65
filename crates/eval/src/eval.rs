// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! Every 5 cards subset of the input is ranked with a rank count table and the
//! best subset wins. A subset value is encoded as an integer key with the hand
//! category in the high bits followed by five 4 bits rank nibbles, the ranks
//! are ordered by group size and then by rank so that comparing keys compares
//! hands:
//!
//! ```text
//!   +--------+--------+--------+
//!   |xxxxcccc|aaaabbbb|ddddeeee| ...
//!   +--------+--------+--------+
//!   c = hand category (high card=0,...,royal flush=9)
//!   a..e = group ranks, highest multiplicity and rank first
//! ```
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use potbot_cards::Card;

/// The hand category, higher is better.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight flush.
    StraightFlush,
    /// Ten to ace straight flush.
    RoyalFlush,
}

impl HandRank {
    fn from_key(key: u32) -> HandRank {
        use HandRank::*;
        match key >> RANK_SHIFT {
            0 => HighCard,
            1 => OnePair,
            2 => TwoPair,
            3 => ThreeOfAKind,
            4 => Straight,
            5 => Flush,
            6 => FullHouse,
            7 => FourOfAKind,
            8 => StraightFlush,
            _ => RoyalFlush,
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandRank::HighCard => "high card",
            HandRank::OnePair => "pair",
            HandRank::TwoPair => "two pair",
            HandRank::ThreeOfAKind => "three of a kind",
            HandRank::Straight => "straight",
            HandRank::Flush => "flush",
            HandRank::FullHouse => "full house",
            HandRank::FourOfAKind => "four of a kind",
            HandRank::StraightFlush => "straight flush",
            HandRank::RoyalFlush => "royal flush",
        };

        write!(f, "{name}")
    }
}

/// Bits used by the tie breaking ranks.
const RANK_SHIFT: u32 = 20;

/// The value of a hand, values compare by their rank key.
#[derive(Debug, Clone)]
pub struct HandValue {
    key: u32,
    hand: Vec<Card>,
}

impl HandValue {
    /// Evaluates a hand of up to 7 cards and returns the value of its best 5
    /// cards subset.
    ///
    /// Hands with 5 cards or fewer are evaluated as a whole. The cards must be
    /// distinct.
    pub fn eval(cards: &[Card]) -> HandValue {
        if cards.len() <= 5 {
            return Self::eval5(cards);
        }

        let mut best: Option<HandValue> = None;
        for_each_five(cards, |hand| {
            let value = Self::eval5(hand);
            if best.as_ref().is_none_or(|b| value.key > b.key) {
                best = Some(value);
            }
        });

        // There is at least one subset as there are more than 5 cards.
        best.unwrap_or_else(|| Self::eval5(&cards[..5]))
    }

    /// The hand category.
    pub fn rank(&self) -> HandRank {
        HandRank::from_key(self.key)
    }

    /// The rank key, a larger key is a better hand.
    pub fn key(&self) -> u32 {
        self.key
    }

    /// The best hand cards, sorted by group and rank.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    fn eval5(cards: &[Card]) -> HandValue {
        // Occurrences per rank, index 1 is used only for an ace low straight.
        let mut counts = [0u8; 15];
        for card in cards {
            counts[card.rank().value() as usize] += 1;
        }

        if counts[2..=5].iter().all(|&c| c == 1) && counts[14] == 1 {
            counts[1] = 1;
            counts[14] = 0;
        }

        let is_straight = counts.windows(5).any(|w| w.iter().all(|&c| c == 1));
        let is_flush = cards.len() == 5 && cards.iter().all(|c| c.suit() == cards[0].suit());

        // Groups sorted by multiplicity then by rank.
        let mut groups = Vec::with_capacity(5);
        for count in (1..=4).rev() {
            for rank in (1..=14).rev() {
                if counts[rank] == count {
                    groups.push((count, rank as u32));
                }
            }
        }

        let rank = match groups.as_slice() {
            [(1, top), ..] if is_straight && is_flush => {
                if *top == 14 {
                    HandRank::RoyalFlush
                } else {
                    HandRank::StraightFlush
                }
            }
            [(4, _), ..] => HandRank::FourOfAKind,
            [(3, _), (2, _), ..] => HandRank::FullHouse,
            _ if is_flush => HandRank::Flush,
            _ if is_straight => HandRank::Straight,
            [(3, _), ..] => HandRank::ThreeOfAKind,
            [(2, _), (2, _), ..] => HandRank::TwoPair,
            [(2, _), ..] => HandRank::OnePair,
            _ => HandRank::HighCard,
        };

        let ranks = groups
            .iter()
            .take(5)
            .fold(0u32, |acc, &(_, rank)| (acc << 4) | rank);
        let ranks = ranks << (4 * (5 - groups.len().min(5)) as u32);

        // Sort by group position for the UI, the wheel ace goes last.
        let mut hand = cards.to_vec();
        hand.sort_by_key(|c| {
            let value = c.rank().value() as u32;
            let value = if counts[14] == 0 && value == 14 { 1 } else { value };
            groups.iter().position(|&(_, r)| r == value)
        });

        HandValue {
            key: ((rank as u32) << RANK_SHIFT) | ranks,
            hand,
        }
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank())?;
        for card in &self.hand {
            write!(f, " {card}")?;
        }

        Ok(())
    }
}

/// Calls `f` with every 5 cards subset of `cards`.
fn for_each_five<F>(cards: &[Card], mut f: F)
where
    F: FnMut(&[Card]),
{
    let n = cards.len();
    let mut h = [cards[0]; 5];

    for c1 in 0..n {
        h[0] = cards[c1];
        for c2 in (c1 + 1)..n {
            h[1] = cards[c2];
            for c3 in (c2 + 1)..n {
                h[2] = cards[c3];
                for c4 in (c3 + 1)..n {
                    h[3] = cards[c4];
                    for c5 in (c4 + 1)..n {
                        h[4] = cards[c5];
                        f(&h);
                    }
                }
            }
        }
    }
}

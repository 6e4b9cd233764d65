// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Potbot Poker hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. The evaluator ranks every
//! 5 cards subset of a hand and keeps the best one, the resulting [HandValue]
//! carries the hand category, a rank key that totally orders hands, and the
//! five best cards for showing a winning hand:
//!
//! ```
//! # use potbot_eval::*;
//! // 2H, 3H, .., JH
//! let cards = Deck::default().into_iter().take(10).collect::<Vec<_>>();
//! let v1 = HandValue::eval(&cards[0..5]);
//! let v2 = HandValue::eval(&cards[5..]);
//! assert_eq!(v1.rank(), HandRank::StraightFlush);
//! assert!(v2 > v1);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue};

// Reexport cards types.
pub use potbot_cards::{Card, Color, Deck, EmptyDeck, Rank, Suit};

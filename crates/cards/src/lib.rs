// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Potbot cards types.
//!
//! This crate define types to create cards:
//!
//! ```
//! # use potbot_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd = Card::new(Rank::King, Suit::Diamonds);
//! assert!(ah.rank() > kd.rank());
//! ```
//!
//! and a [Deck] type for refilling, shuffling, and drawing cards from the front
//! of the pile:
//!
//! ```
//! # use potbot_cards::{Deck, EmptyDeck};
//! let mut deck = Deck::default();
//! deck.shuffle();
//! for _ in 0..Deck::SIZE {
//!     deck.get_card().unwrap();
//! }
//! assert_eq!(deck.get_card(), Err(EmptyDeck));
//! ```
//!
//! To iterate through all 5 cards hands use [Deck::for_each]:
//!
//! ```no_run
//! # use potbot_cards::Deck;
//! let mut counter = 0;
//! Deck::default().for_each(5, |hand| {
//!     counter += 1;
//! });
//! assert_eq!(counter, 2_598_960);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Color, Deck, EmptyDeck, Rank, Suit};

// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Potbot Poker game engine.
//!
//! Coins and banks, players with their message outbox, and the Texas Hold'em
//! betting engine. The engine is synchronous and never does any I/O, callers
//! drain the players outboxes after each call:
//!
//! ```
//! # use potbot_core::{GameConfig, PlayerId, PokerGame};
//! let (p1, p2) = (PlayerId::new(1), PlayerId::new(2));
//!
//! let mut game = PokerGame::new(GameConfig::default());
//! assert!(game.add_player(p1, "alice"));
//! assert!(game.add_player(p2, "bob"));
//! game.init_game().unwrap();
//! assert_eq!(game.pot(), 15);
//!
//! // The small blind completes its bet and the turn card is revealed.
//! game.handle_bet(p2, 5).unwrap();
//! assert_eq!(game.board().len(), 4);
//!
//! for (player_id, msg) in game.drain_messages() {
//!     println!("{player_id}: {msg}");
//! }
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod bank;
pub mod error;
pub mod game;
pub mod player;

pub use bank::{Bank, BankError, Coin, Coins};
pub use error::{BetRule, GameError};
pub use game::{GameConfig, GameState, PokerGame};
pub use player::{Player, PlayerId};

// Reexport cards and evaluator types.
pub use potbot_eval::{Card, Deck, EmptyDeck, HandRank, HandValue, Rank, Suit};

// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game player types.
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

use potbot_eval::Card;

use crate::bank::Bank;

/// A player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a player id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game player.
///
/// Messages for a player are queued in its outbox, the game never talks to
/// the outside world directly and the integrator drains the outbox after each
/// call into the game.
#[derive(Debug)]
pub struct Player {
    player_id: PlayerId,
    nickname: String,
    hand: Vec<Card>,
    bank: Bank,
    outbox: VecDeque<String>,
}

impl Player {
    /// Creates a player with the given bank.
    pub fn new(player_id: PlayerId, nickname: &str, bank: Bank) -> Self {
        Self {
            player_id,
            nickname: nickname.to_string(),
            hand: Vec::with_capacity(2),
            bank,
            outbox: VecDeque::default(),
        }
    }

    /// The player id.
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// The player nickname.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// The player hole cards, empty before the first deal.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Adds a hole card.
    pub fn add_card(&mut self, card: Card) {
        debug_assert!(self.hand.len() < 2, "a player holds at most 2 cards");
        self.hand.push(card);
    }

    /// Removes all hole cards.
    pub fn clear_cards(&mut self) {
        self.hand.clear();
    }

    /// The player bank.
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Mutable access to the player bank.
    pub fn bank_mut(&mut self) -> &mut Bank {
        &mut self.bank
    }

    /// Queues a message for this player.
    pub fn send(&mut self, msg: impl Into<String>) {
        self.outbox.push_back(msg.into());
    }

    /// Queued messages, oldest first.
    pub fn outbox(&self) -> impl Iterator<Item = &str> {
        self.outbox.iter().map(String::as_str)
    }

    /// Removes and returns all queued messages, oldest first.
    pub fn drain_outbox(&mut self) -> impl Iterator<Item = String> + '_ {
        self.outbox.drain(..)
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id
    }
}

impl Eq for Player {}

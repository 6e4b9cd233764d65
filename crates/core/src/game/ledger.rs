// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Per round bet ledger.
use ahash::AHashMap;

use crate::player::PlayerId;

/// Coins committed by each player in the current betting round.
#[derive(Debug, Default)]
pub struct BetLedger {
    bets: AHashMap<PlayerId, u32>,
}

impl BetLedger {
    /// Removes all entries.
    pub fn clear(&mut self) {
        self.bets.clear();
    }

    /// Adds a player with no bets.
    pub fn insert(&mut self, player_id: PlayerId) {
        self.bets.insert(player_id, 0);
    }

    /// Removes a player.
    pub fn remove(&mut self, player_id: PlayerId) {
        self.bets.remove(&player_id);
    }

    /// Adds to a player round bets.
    pub fn add(&mut self, player_id: PlayerId, amount: u32) {
        *self.bets.entry(player_id).or_default() += amount;
    }

    /// A player round bets, zero for players not in the ledger.
    pub fn get(&self, player_id: PlayerId) -> u32 {
        self.bets.get(&player_id).copied().unwrap_or_default()
    }

    /// The largest bet in this round.
    pub fn highest(&self) -> u32 {
        self.bets.values().copied().max().unwrap_or_default()
    }

    /// Checks if all players committed the same amount.
    pub fn all_equal(&self) -> bool {
        let mut values = self.bets.values();
        match values.next() {
            Some(first) => values.all(|v| v == first),
            None => true,
        }
    }

    /// Starts a new round, every player keeps its entry with no bets.
    pub fn reset(&mut self) {
        self.bets.values_mut().for_each(|v| *v = 0);
    }
}

// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Coins and banks.
//!
//! A [Coin] cannot be copied or cloned, coins only move from one [Bank] to
//! another so the number of coins in a game never changes once the players
//! banks have been funded.
use std::fmt;
use thiserror::Error;

/// A unit of value.
#[derive(Debug, PartialEq, Eq)]
pub struct Coin {
    value: u32,
}

impl Coin {
    /// The coin value.
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// A collection of coins moved between banks.
pub type Coins = Vec<Coin>;

/// Bank errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The bank has fewer coins than requested.
    #[error("attempt to get {requested} coins from a bank with {available} coins")]
    InsufficientFunds {
        /// The number of coins requested.
        requested: usize,
        /// The number of coins in the bank.
        available: usize,
    },
}

/// An owned collection of coins.
#[derive(Debug, Default)]
pub struct Bank {
    coins: Coins,
}

impl Bank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bank funded with `count` new coins.
    pub fn with_coins(count: usize) -> Self {
        Self {
            coins: (0..count).map(|_| Coin { value: 1 }).collect(),
        }
    }

    /// Number of coins in the bank.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Checks if the bank has no coins.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Removes and returns exactly `count` coins.
    ///
    /// Returns an error and leaves the bank untouched if there are fewer coins
    /// than requested.
    pub fn get_coins(&mut self, count: usize) -> Result<Coins, BankError> {
        if count > self.coins.len() {
            return Err(BankError::InsufficientFunds {
                requested: count,
                available: self.coins.len(),
            });
        }

        Ok(self.coins.drain(..count).collect())
    }

    /// Moves all the given coins into this bank.
    pub fn add_coins(&mut self, coins: Coins) {
        self.coins.extend(coins);
    }

    /// Moves `count` coins from this bank to another bank.
    pub fn transfer(&mut self, to: &mut Bank, count: usize) -> Result<(), BankError> {
        let coins = self.get_coins(count)?;
        to.add_coins(coins);
        Ok(())
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coins.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn get_and_add_coins() {
        let mut bank = Bank::with_coins(10);
        assert_eq!(bank.len(), 10);

        let coins = bank.get_coins(4).unwrap();
        assert_eq!(coins.len(), 4);
        assert!(coins.iter().all(|c| c.value() == 1));
        assert_eq!(bank.len(), 6);

        let mut pot = Bank::new();
        assert!(pot.is_empty());
        pot.add_coins(coins);
        assert_eq!(pot.len(), 4);

        assert!(bank.get_coins(0).unwrap().is_empty());
        assert_eq!(bank.len(), 6);
    }

    #[test]
    fn insufficient_funds_leaves_bank_unchanged() {
        let mut bank = Bank::with_coins(3);
        let err = bank.get_coins(4).unwrap_err();
        assert_eq!(
            err,
            BankError::InsufficientFunds {
                requested: 4,
                available: 3
            }
        );
        assert_eq!(bank.len(), 3);

        let mut other = Bank::new();
        assert!(bank.transfer(&mut other, 5).is_err());
        assert_eq!(bank.len(), 3);
        assert!(other.is_empty());
    }

    #[test]
    fn coins_are_conserved() {
        const TOTAL: usize = 400;
        let mut rng = StdRng::seed_from_u64(11);
        let mut banks = vec![
            Bank::with_coins(100),
            Bank::with_coins(100),
            Bank::with_coins(200),
            Bank::new(),
        ];

        for _ in 0..1_000 {
            let from = rng.random_range(0..banks.len());
            let to = rng.random_range(0..banks.len());
            let count = rng.random_range(0..=150);

            // Failed requests must not change the bank either.
            if let Ok(coins) = banks[from].get_coins(count) {
                banks[to].add_coins(coins);
            }

            let total = banks.iter().map(Bank::len).sum::<usize>();
            assert_eq!(total, TOTAL);
        }
    }
}

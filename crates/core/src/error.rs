// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game errors.
use std::fmt;
use thiserror::Error;

use potbot_eval::EmptyDeck;

use crate::bank::BankError;

/// The bet amount a player is allowed to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetRule {
    /// The bet must be exactly this amount.
    Exactly(u32),
    /// The bet must be at least this amount.
    AtLeast(u32),
}

impl fmt::Display for BetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetRule::Exactly(n) => write!(f, "other than {n}"),
            BetRule::AtLeast(n) => write!(f, "lower than {n}"),
        }
    }
}

/// Errors returned by game operations.
///
/// The messages of user facing errors are sent as they are to the player that
/// caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The player is not the one expected to bet.
    #[error("It's not your turn to make a bet")]
    WrongTurn,
    /// The bet is larger than the player bank.
    #[error("You can't make that bet, your bank is: {available}")]
    InsufficientFunds {
        /// The requested amount.
        requested: usize,
        /// The coins in the player bank.
        available: usize,
    },
    /// The bet amount breaks the betting rules.
    #[error("Your bet can't be {rule}")]
    InvalidBetAmount {
        /// The rejected amount.
        amount: u32,
        /// The rule the amount must satisfy.
        rule: BetRule,
    },
    /// A game is already running.
    #[error("The game is already in progress")]
    GameInProgress,
    /// The player is already in the game.
    #[error("You are already in the game")]
    PlayerAlreadyPresent,
    /// The game has no players to deal to.
    #[error("There are no players to start the game")]
    NotEnoughPlayers,
    /// There are not enough cards to deal a hand to every player.
    #[error("There can't be more than {max} players in a game")]
    TooManyPlayers {
        /// The maximum number of players.
        max: usize,
    },
    /// The player is not part of the game.
    #[error("player not found")]
    PlayerNotFound,
    /// The deck ran out of cards.
    #[error(transparent)]
    EmptyDeck(#[from] EmptyDeck),
}

impl GameError {
    /// Checks if this error is caused by a user action and can be reported to
    /// the user, other errors signal an inconsistent game.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, GameError::PlayerNotFound | GameError::EmptyDeck(_))
    }
}

impl From<BankError> for GameError {
    fn from(err: BankError) -> Self {
        match err {
            BankError::InsufficientFunds {
                requested,
                available,
            } => GameError::InsufficientFunds {
                requested,
                available,
            },
        }
    }
}

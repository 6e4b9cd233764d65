// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Games that can be played in a room.
use potbot_core::{GameError, GameState, Player, PlayerId, PokerGame};

/// A room game.
#[derive(Debug)]
pub enum Game {
    /// Texas Hold'em poker.
    Poker(PokerGame),
}

impl Game {
    /// The game name.
    pub fn name(&self) -> &'static str {
        match self {
            Game::Poker(_) => "poker",
        }
    }

    /// Adds a player to the game.
    pub fn add_player(&mut self, player_id: PlayerId, nickname: &str) -> bool {
        match self {
            Game::Poker(game) => game.add_player(player_id, nickname),
        }
    }

    /// Removes a player from the game.
    pub fn handle_exit(&mut self, player_id: PlayerId) -> Result<Player, GameError> {
        match self {
            Game::Poker(game) => game.handle_exit(player_id),
        }
    }

    /// Starts the game.
    pub fn start(&mut self) -> Result<(), GameError> {
        match self {
            Game::Poker(game) => game.init_game(),
        }
    }

    /// Checks if the game is running.
    pub fn is_playing(&self) -> bool {
        match self {
            Game::Poker(game) => game.state() == GameState::Playing,
        }
    }

    /// Checks if a player is in the game.
    pub fn has_player(&self, player_id: PlayerId) -> bool {
        match self {
            Game::Poker(game) => game.player(player_id).is_some(),
        }
    }

    /// Removes and returns all queued messages for the game players.
    pub fn drain_messages(&mut self) -> Vec<(PlayerId, String)> {
        match self {
            Game::Poker(game) => game.drain_messages(),
        }
    }
}

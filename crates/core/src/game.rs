// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em betting engine.
//!
//! A [PokerGame] deals the cards, takes the blinds, enforces the betting
//! order and moves coins into the pot. The game never does any I/O, all the
//! messages for a player are queued in the player outbox and must be drained
//! by the caller after each call.
use log::{debug, error, info, warn};
use rand::rngs::StdRng;

use potbot_eval::{Card, Deck, HandValue};

use crate::{
    bank::Bank,
    error::{BetRule, GameError},
    player::{Player, PlayerId},
};

mod ledger;
use ledger::BetLedger;

/// Game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// The big blind amount, the small blind is half of it.
    pub big_blind: u32,
    /// The coins each player gets when joining a game.
    pub starting_stake: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            big_blind: 10,
            starting_stake: 100,
        }
    }
}

/// The game state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameState {
    /// No game is running, players can join.
    #[default]
    Ended,
    /// Cards have been dealt and players are betting.
    Playing,
}

/// A Texas Hold'em game.
#[derive(Debug)]
pub struct PokerGame {
    config: GameConfig,
    state: GameState,
    players: Vec<Player>,
    deck: Deck,
    pot: Bank,
    board: Vec<Card>,
    bets: BetLedger,
    turn: Option<PlayerId>,
    big_blind: Option<PlayerId>,
    small_blind: Option<PlayerId>,
    small_blind_matched: bool,
}

impl PokerGame {
    /// The number of community cards at the river.
    pub const BOARD_SIZE: usize = 5;

    /// The largest number of players the deck can deal a full hand to.
    pub const MAX_PLAYERS: usize = (Deck::SIZE - Self::BOARD_SIZE) / 2;

    /// Creates a game with a deck seeded from the OS entropy source.
    pub fn new(config: GameConfig) -> Self {
        Self::with_deck(config, Deck::new())
    }

    /// Creates a game with a deck shuffled by the given generator.
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self::with_deck(config, Deck::with_rng(rng))
    }

    fn with_deck(config: GameConfig, deck: Deck) -> Self {
        Self {
            config,
            state: GameState::Ended,
            players: Vec::default(),
            deck,
            pot: Bank::new(),
            board: Vec::with_capacity(Self::BOARD_SIZE),
            bets: BetLedger::default(),
            turn: None,
            big_blind: None,
            small_blind: None,
            small_blind_matched: false,
        }
    }

    /// Adds a player funded with the starting stake.
    ///
    /// Returns false if a game is running or the player is already present.
    pub fn add_player(&mut self, player_id: PlayerId, nickname: &str) -> bool {
        match self.try_add_player(player_id, nickname) {
            Ok(()) => true,
            Err(e) => {
                debug!("Player {player_id} cannot join the game: {e}");
                false
            }
        }
    }

    /// Adds a player funded with the starting stake.
    pub fn try_add_player(
        &mut self,
        player_id: PlayerId,
        nickname: &str,
    ) -> Result<(), GameError> {
        if self.state == GameState::Playing {
            return Err(GameError::GameInProgress);
        }

        if self.position(player_id).is_some() {
            return Err(GameError::PlayerAlreadyPresent);
        }

        let bank = Bank::with_coins(self.config.starting_stake as usize);
        self.players.push(Player::new(player_id, nickname, bank));

        info!(
            "Player {player_id} joined the game with {} coins",
            self.config.starting_stake
        );

        Ok(())
    }

    /// Deals a new hand, takes the blinds and asks the first player to bet.
    pub fn init_game(&mut self) -> Result<(), GameError> {
        if self.state == GameState::Playing {
            return Err(GameError::GameInProgress);
        }

        if self.players.is_empty() {
            return Err(GameError::NotEnoughPlayers);
        }

        if self.players.len() > Self::MAX_PLAYERS {
            return Err(GameError::TooManyPlayers {
                max: Self::MAX_PLAYERS,
            });
        }

        self.deck.refill();
        self.deck.shuffle();

        self.board.clear();
        self.bets.clear();
        self.small_blind_matched = false;

        for player in &mut self.players {
            player.clear_cards();
            for _ in 0..2 {
                player.add_card(self.deck.get_card()?);
            }

            self.bets.insert(player.player_id());
        }

        self.reveal_cards()?;

        self.big_blind = self.players.first().map(Player::player_id);
        self.small_blind = self.players.get(1).map(Player::player_id);

        self.post_blind(0, self.config.big_blind, "Big");
        if self.small_blind.is_some() {
            self.post_blind(1, self.small_blind_amount(), "Small");
        }

        self.state = GameState::Playing;
        info!("Game started with {} players", self.players.len());

        self.broadcast_state();

        self.turn = self.big_blind;
        self.advance_turn()
    }

    /// Handles a bet from a player.
    ///
    /// Rejected bets are reported to the player and leave the game unchanged.
    pub fn handle_bet(&mut self, player_id: PlayerId, amount: u32) -> Result<(), GameError> {
        let Some(idx) = self.position(player_id) else {
            error!("Bet from player {player_id} that is not in the game");
            return Err(GameError::PlayerNotFound);
        };

        if let Err(e) = self.check_bet(idx, amount) {
            debug!("Player {player_id} bet {amount} rejected: {e}");
            self.players[idx].send(e.to_string());
            return Err(e);
        }

        self.players[idx]
            .bank_mut()
            .transfer(&mut self.pot, amount as usize)?;
        self.bets.add(player_id, amount);

        if self.small_blind == Some(player_id) {
            self.small_blind_matched = true;
        }

        debug!("Player {player_id} bet {amount}, pot {}", self.pot);

        self.advance_turn()?;

        if self.bets.all_equal() && self.board.len() < Self::BOARD_SIZE {
            self.reveal_cards()?;
            self.bets.reset();
        }

        self.broadcast_state();

        Ok(())
    }

    /// Removes a player from the game and returns it with its bank.
    ///
    /// The turn is not passed on if the player was the one expected to bet.
    pub fn handle_exit(&mut self, player_id: PlayerId) -> Result<Player, GameError> {
        let Some(idx) = self.position(player_id) else {
            error!("Exit from player {player_id} that is not in the game");
            return Err(GameError::PlayerNotFound);
        };

        let player = self.players.remove(idx);
        self.bets.remove(player_id);

        info!("Player {player_id} left the game with {} coins", player.bank());

        Ok(player)
    }

    /// The game state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The game players in dealing order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// A game player.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.position(player_id).map(|idx| &self.players[idx])
    }

    /// The coins in the pot.
    pub fn pot(&self) -> usize {
        self.pot.len()
    }

    /// The community cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The coins a player bet in the current round.
    pub fn bet(&self, player_id: PlayerId) -> u32 {
        self.bets.get(player_id)
    }

    /// The player expected to bet.
    pub fn turn(&self) -> Option<PlayerId> {
        self.turn
    }

    /// The big blind player.
    pub fn big_blind(&self) -> Option<PlayerId> {
        self.big_blind
    }

    /// The small blind player.
    pub fn small_blind(&self) -> Option<PlayerId> {
        self.small_blind
    }

    /// The coins in the pot and in the players banks.
    pub fn total_coins(&self) -> usize {
        self.pot.len() + self.players.iter().map(|p| p.bank().len()).sum::<usize>()
    }

    /// Checks if all community cards are out and all bets are equal.
    pub fn is_betting_complete(&self) -> bool {
        self.state == GameState::Playing
            && self.board.len() == Self::BOARD_SIZE
            && self.bets.all_equal()
    }

    /// Evaluates each player hole cards with the community cards, best hands
    /// first.
    pub fn best_hands(&self) -> Vec<(PlayerId, HandValue)> {
        let mut hands = self
            .players
            .iter()
            .filter(|p| !p.hand().is_empty())
            .map(|p| {
                let cards = p.hand().iter().chain(&self.board).copied().collect::<Vec<_>>();
                (p.player_id(), HandValue::eval(&cards))
            })
            .collect::<Vec<_>>();

        hands.sort_by(|(_, v1), (_, v2)| v2.cmp(v1));
        hands
    }

    /// Removes and returns all queued messages for all players.
    pub fn drain_messages(&mut self) -> Vec<(PlayerId, String)> {
        let mut msgs = Vec::new();
        for player in &mut self.players {
            let player_id = player.player_id();
            msgs.extend(player.drain_outbox().map(|msg| (player_id, msg)));
        }
        msgs
    }

    fn position(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.player_id() == player_id)
    }

    fn small_blind_amount(&self) -> u32 {
        self.config.big_blind / 2
    }

    fn check_bet(&self, idx: usize, amount: u32) -> Result<(), GameError> {
        let player = &self.players[idx];
        let player_id = player.player_id();

        if self.turn != Some(player_id) {
            return Err(GameError::WrongTurn);
        }

        let available = player.bank().len();
        if amount as usize > available {
            return Err(GameError::InsufficientFunds {
                requested: amount as usize,
                available,
            });
        }

        let rule = if self.small_blind == Some(player_id) && !self.small_blind_matched {
            BetRule::Exactly(self.small_blind_amount())
        } else {
            BetRule::AtLeast(self.bets.highest() - self.bets.get(player_id))
        };

        let valid = match rule {
            BetRule::Exactly(n) => amount == n,
            BetRule::AtLeast(n) => amount >= n,
        };

        if valid {
            Ok(())
        } else {
            Err(GameError::InvalidBetAmount { amount, rule })
        }
    }

    fn post_blind(&mut self, idx: usize, amount: u32, name: &str) {
        let player = &mut self.players[idx];
        match player.bank_mut().transfer(&mut self.pot, amount as usize) {
            Ok(()) => {
                self.bets.add(player.player_id(), amount);
                player.send(format!("{name} blind was taken from you ({amount})"));
            }
            Err(e) => warn!(
                "Player {} cannot post the {} blind: {e}",
                player.player_id(),
                name.to_lowercase()
            ),
        }
    }

    fn advance_turn(&mut self) -> Result<(), GameError> {
        let Some(idx) = self.turn.and_then(|id| self.position(id)) else {
            error!("Turn player {:?} is not in the game", self.turn);
            return Err(GameError::PlayerNotFound);
        };

        let next = (idx + 1) % self.players.len();
        let player = &mut self.players[next];
        self.turn = Some(player.player_id());
        player.send("It's your turn.");

        Ok(())
    }

    fn reveal_cards(&mut self) -> Result<(), GameError> {
        let count = if self.board.is_empty() { 3 } else { 1 };
        for _ in 0..count {
            self.board.push(self.deck.get_card()?);
        }

        debug!("Community cards {}", join_cards(&self.board));

        Ok(())
    }

    fn broadcast_state(&mut self) {
        for idx in 0..self.players.len() {
            let msg = self.render_state(&self.players[idx]);
            self.players[idx].send(msg);
        }
    }

    fn render_state(&self, player: &Player) -> String {
        let mut lines = vec![
            format!("Pot: {}", self.pot),
            format!("Table: {}", join_cards(&self.board)),
        ];

        lines.extend(self.players.iter().map(|p| {
            let bet = self.bets.get(p.player_id());
            format!("{} bet: {bet}", p.nickname())
        }));

        lines.push(format!("Your bank: {}", player.bank()));

        if self.small_blind == Some(player.player_id()) && !self.small_blind_matched {
            let blind = self.small_blind_amount();
            lines.push(format!("To open your cards, bet {blind} coins"));
        } else {
            lines.push(format!("Hand: {}", join_cards(player.hand())));
        }

        lines.join("\n")
    }
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use potbot_eval::{HandRank, Rank, Suit};
    use rand::SeedableRng;

    const P1: PlayerId = PlayerId::new(1);
    const P2: PlayerId = PlayerId::new(2);
    const P3: PlayerId = PlayerId::new(3);

    // Creates a game with seeded randomness and the given players.
    fn new_game(config: GameConfig, players: &[PlayerId]) -> PokerGame {
        let mut game = PokerGame::with_rng(config, StdRng::seed_from_u64(19));
        for id in players {
            assert!(game.add_player(*id, &format!("player{id}")));
        }
        game
    }

    fn bank(game: &PokerGame, player_id: PlayerId) -> usize {
        game.player(player_id).unwrap().bank().len()
    }

    fn outbox(game: &PokerGame, player_id: PlayerId) -> Vec<String> {
        game.player(player_id)
            .unwrap()
            .outbox()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn two_players_hand_start() {
        let mut game = new_game(GameConfig::default(), &[P1, P2]);
        game.init_game().unwrap();

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.big_blind(), Some(P1));
        assert_eq!(game.small_blind(), Some(P2));
        assert_eq!(bank(&game, P1), 90);
        assert_eq!(bank(&game, P2), 95);
        assert_eq!(game.pot(), 15);
        assert_eq!(game.board().len(), 3);
        assert_eq!(game.bet(P1), 10);
        assert_eq!(game.bet(P2), 5);
        assert_eq!(game.turn(), Some(P2));
        assert!(game.players().iter().all(|p| p.hand().len() == 2));

        // Small blind first bet must be exactly half the big blind.
        let err = game.handle_bet(P2, 10).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidBetAmount {
                amount: 10,
                rule: BetRule::Exactly(5)
            }
        );
        assert_eq!(bank(&game, P2), 95);
        assert_eq!(game.pot(), 15);

        game.handle_bet(P2, 5).unwrap();
        assert_eq!(bank(&game, P2), 90);
        assert_eq!(game.pot(), 20);
        assert_eq!(game.board().len(), 4);
        assert_eq!(game.bet(P1), 0);
        assert_eq!(game.bet(P2), 0);
        assert_eq!(game.turn(), Some(P1));
        assert_eq!(game.total_coins(), 200);
    }

    #[test]
    fn init_game_messages() {
        let mut game = new_game(GameConfig::default(), &[P1, P2]);
        game.init_game().unwrap();

        let msgs = outbox(&game, P1);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0], "Big blind was taken from you (10)");
        assert!(msgs[1].starts_with("Pot: 15\nTable: "));
        assert!(msgs[1].contains("player1 bet: 10\nplayer2 bet: 5\n"));
        assert!(msgs[1].contains("Your bank: 90\nHand: "));

        let msgs = outbox(&game, P2);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], "Small blind was taken from you (5)");
        assert!(msgs[1].ends_with("Your bank: 95\nTo open your cards, bet 5 coins"));
        assert_eq!(msgs[2], "It's your turn.");

        let drained = game.drain_messages();
        assert_eq!(drained.len(), 5);
        assert!(drained[..2].iter().all(|(id, _)| *id == P1));
        assert!(game.players().iter().all(|p| p.outbox().count() == 0));

        // The small blind sees its cards after the first bet.
        game.handle_bet(P2, 5).unwrap();
        let msgs = outbox(&game, P2);
        assert!(msgs.last().unwrap().contains("Hand: "));
    }

    #[test]
    fn betting_progression() {
        let mut game = new_game(GameConfig::default(), &[P1, P2]);
        game.init_game().unwrap();

        game.handle_bet(P2, 5).unwrap();
        assert_eq!(game.board().len(), 4);

        game.handle_bet(P1, 0).unwrap();
        assert_eq!(game.board().len(), 5);
        assert!(game.is_betting_complete());

        game.handle_bet(P2, 20).unwrap();
        assert_eq!(game.board().len(), 5);
        assert!(!game.is_betting_complete());

        let err = game.handle_bet(P1, 10).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidBetAmount {
                amount: 10,
                rule: BetRule::AtLeast(20)
            }
        );

        game.handle_bet(P1, 20).unwrap();
        assert_eq!(game.board().len(), 5);
        assert!(game.is_betting_complete());
        assert_eq!(game.pot(), 60);
        assert_eq!(game.total_coins(), 200);

        // No more cards to reveal, the round bets are not reset.
        assert_eq!(game.bet(P1), 20);

        let hands = game.best_hands();
        assert_eq!(hands.len(), 2);
        assert!(hands[0].1 >= hands[1].1);
        assert!(hands.iter().all(|(_, v)| v.hand().len() == 5));
    }

    #[test]
    fn turn_enforcement() {
        let mut game = new_game(GameConfig::default(), &[P1, P2, P3]);
        game.init_game().unwrap();
        game.drain_messages();
        assert_eq!(game.turn(), Some(P2));

        for id in [P1, P3] {
            let err = game.handle_bet(id, 10).unwrap_err();
            assert_eq!(err, GameError::WrongTurn);
            assert_eq!(outbox(&game, id), vec!["It's not your turn to make a bet"]);
        }

        assert_eq!(game.pot(), 15);
        assert_eq!(bank(&game, P1), 90);
        assert_eq!(bank(&game, P3), 100);

        game.handle_bet(P2, 5).unwrap();
        assert_eq!(game.turn(), Some(P3));

        // Third player must call the big blind.
        let err = game.handle_bet(P3, 9).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidBetAmount {
                amount: 9,
                rule: BetRule::AtLeast(10)
            }
        );
        assert_eq!(game.board().len(), 3);

        game.handle_bet(P3, 10).unwrap();
        assert_eq!(game.board().len(), 4);
        assert_eq!(game.turn(), Some(P1));
        assert_eq!(game.pot(), 30);
        assert_eq!(game.total_coins(), 300);
    }

    #[test]
    fn insufficient_funds() {
        let mut game = new_game(GameConfig::default(), &[P1, P2]);
        game.init_game().unwrap();
        game.drain_messages();

        let err = game.handle_bet(P2, 500).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientFunds {
                requested: 500,
                available: 95
            }
        );
        assert_eq!(
            outbox(&game, P2),
            vec!["You can't make that bet, your bank is: 95"]
        );
        assert_eq!(game.pot(), 15);
        assert_eq!(game.turn(), Some(P2));
    }

    #[test]
    fn unaffordable_blinds_are_skipped() {
        let config = GameConfig {
            big_blind: 10,
            starting_stake: 4,
        };
        let mut game = new_game(config, &[P1, P2]);
        game.init_game().unwrap();

        assert_eq!(game.pot(), 0);
        assert_eq!(bank(&game, P1), 4);
        assert_eq!(bank(&game, P2), 4);
        assert_eq!(game.bet(P1), 0);
        assert_eq!(game.turn(), Some(P2));
    }

    #[test]
    fn init_game_errors() {
        let mut game = new_game(GameConfig::default(), &[]);
        assert_eq!(game.init_game().unwrap_err(), GameError::NotEnoughPlayers);
        assert_eq!(game.state(), GameState::Ended);

        assert!(game.add_player(P1, "alice"));
        assert!(!game.add_player(P1, "alice"));
        assert_eq!(
            game.try_add_player(P1, "alice").unwrap_err(),
            GameError::PlayerAlreadyPresent
        );

        game.init_game().unwrap();
        assert_eq!(game.init_game().unwrap_err(), GameError::GameInProgress);
        assert!(!game.add_player(P2, "bob"));
        assert_eq!(game.players().len(), 1);

        // A single player is the big blind and always has the turn.
        assert_eq!(game.small_blind(), None);
        assert_eq!(game.turn(), Some(P1));
        game.handle_bet(P1, 0).unwrap();
        assert_eq!(game.board().len(), 4);
    }

    #[test]
    fn too_many_players() {
        assert_eq!(PokerGame::MAX_PLAYERS, 23);

        let players = (0..24).map(PlayerId::new).collect::<Vec<_>>();
        let mut game = new_game(GameConfig::default(), &players);
        let err = game.init_game().unwrap_err();
        assert_eq!(err, GameError::TooManyPlayers { max: 23 });
        assert!(err.is_user_facing());

        // Nothing was dealt and no blinds were taken.
        assert_eq!(game.state(), GameState::Ended);
        assert!(game.board().is_empty());
        assert_eq!(game.pot(), 0);
        assert!(game.players().iter().all(|p| p.hand().is_empty()));
        assert_eq!(game.total_coins(), 2_400);
    }

    #[test]
    fn full_table_reaches_river() {
        let players = (0..23).map(PlayerId::new).collect::<Vec<_>>();
        let mut game = new_game(GameConfig::default(), &players);
        game.init_game().unwrap();
        assert_eq!(game.board().len(), 3);

        // Small blind completes, everyone else calls the big blind.
        game.handle_bet(players[1], 5).unwrap();
        for id in &players[2..] {
            game.handle_bet(*id, 10).unwrap();
        }
        assert_eq!(game.board().len(), 4);
        assert_eq!(game.turn(), Some(players[0]));

        game.handle_bet(players[0], 0).unwrap();
        assert_eq!(game.board().len(), 5);
        assert!(game.is_betting_complete());
        assert_eq!(game.pot(), 230);
        assert_eq!(game.total_coins(), 2_300);
    }

    #[test]
    fn player_exit() {
        let mut game = new_game(GameConfig::default(), &[P1, P2, P3]);
        game.init_game().unwrap();
        game.handle_bet(P2, 5).unwrap();
        assert_eq!(game.turn(), Some(P3));

        let player = game.handle_exit(P3).unwrap();
        assert_eq!(player.player_id(), P3);
        assert_eq!(player.bank().len(), 100);
        assert_eq!(game.players().len(), 2);
        assert_eq!(game.bet(P3), 0);
        assert_eq!(game.total_coins() + player.bank().len(), 300);

        // The turn stays with the player that left.
        assert_eq!(game.turn(), Some(P3));
        assert_eq!(game.handle_bet(P1, 0).unwrap_err(), GameError::WrongTurn);
        assert_eq!(game.handle_bet(P3, 0).unwrap_err(), GameError::PlayerNotFound);
        assert_eq!(game.handle_exit(P3).unwrap_err(), GameError::PlayerNotFound);
    }

    #[test]
    fn best_hands_ordering() {
        let mut game = new_game(GameConfig::default(), &[P1, P2]);
        game.init_game().unwrap();

        // Replace the dealt cards with known ones.
        game.board = vec![
            Card::new(Rank::Ace, Suit::Hearts),
            Card::new(Rank::Ace, Suit::Clubs),
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Seven, Suit::Diamonds),
            Card::new(Rank::Deuce, Suit::Clubs),
        ];

        let p1 = &mut game.players[0];
        p1.clear_cards();
        p1.add_card(Card::new(Rank::Queen, Suit::Hearts));
        p1.add_card(Card::new(Rank::Jack, Suit::Hearts));

        let p2 = &mut game.players[1];
        p2.clear_cards();
        p2.add_card(Card::new(Rank::Ace, Suit::Spades));
        p2.add_card(Card::new(Rank::Ace, Suit::Diamonds));

        let hands = game.best_hands();
        assert_eq!(hands[0].0, P2);
        assert_eq!(hands[0].1.rank(), HandRank::FourOfAKind);
        assert_eq!(hands[1].0, P1);
        assert_eq!(hands[1].1.rank(), HandRank::OnePair);
    }
}

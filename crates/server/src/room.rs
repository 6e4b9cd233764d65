// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game rooms.
//!
//! A [RoomState] holds the users that joined a room and the room game, each
//! room state is owned by a task that handles the commands sent by its [Room]
//! handle one at a time.
use anyhow::{Result, bail};
use log::{error, info};
use std::fmt;
use tokio::sync::{mpsc, oneshot};

use potbot_core::{GameConfig, GameError, Player, PlayerId, PokerGame};

use crate::game::Game;

/// A room identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(u64);

impl RoomId {
    /// Creates a room id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// The receiver.
    pub user: PlayerId,
    /// The message text.
    pub text: String,
}

impl Delivery {
    /// Creates a delivery.
    pub fn new(user: PlayerId, text: impl Into<String>) -> Self {
        Self {
            user,
            text: text.into(),
        }
    }
}

/// The state of a room.
#[derive(Debug)]
pub struct RoomState {
    room_id: RoomId,
    token: String,
    owner: PlayerId,
    users: Vec<(PlayerId, String)>,
    game: Option<Game>,
    config: GameConfig,
}

impl RoomState {
    /// Creates a room with its owner as the only user.
    pub fn new(
        room_id: RoomId,
        token: String,
        owner: PlayerId,
        nickname: &str,
        config: GameConfig,
    ) -> Self {
        Self {
            room_id,
            token,
            owner,
            users: vec![(owner, nickname.to_string())],
            game: None,
            config,
        }
    }

    /// The room id.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The token users join this room with.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The room owner.
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The room users in joining order.
    pub fn users(&self) -> &[(PlayerId, String)] {
        &self.users
    }

    /// The room game if one was started.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Checks if there are no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks if a user is in this room.
    pub fn contains(&self, user: PlayerId) -> bool {
        self.users.iter().any(|(id, _)| *id == user)
    }

    /// A user joins this room.
    pub fn join(&mut self, user: PlayerId, nickname: &str) -> Result<Vec<Delivery>> {
        if self.contains(user) {
            bail!("You are already in room {}", self.token);
        }

        let mut deliveries = self.broadcast(None, &format!("User {nickname} joined"));
        deliveries.push(Delivery::new(user, format!("Welcome to room {}", self.token)));

        self.users.push((user, nickname.to_string()));
        info!("User {user} joined room {}", self.room_id);

        Ok(deliveries)
    }

    /// A user leaves this room and its game.
    pub fn leave(&mut self, user: PlayerId) -> Result<Vec<Delivery>> {
        let Some(pos) = self.users.iter().position(|(id, _)| *id == user) else {
            bail!("User {user} is not in room {}", self.room_id);
        };

        let (_, nickname) = self.users.remove(pos);
        if self.owner == user {
            if let Some((id, _)) = self.users.first() {
                self.owner = *id;
            }
        }

        let mut deliveries = Vec::new();
        if let Some(game) = self.game.as_mut() {
            if game.has_player(user) {
                match game.handle_exit(user) {
                    Ok(player) => info!(
                        "User {user} left room {} game with {} coins",
                        self.room_id,
                        player.bank()
                    ),
                    Err(e) => error!("Room {} exit error {e}", self.room_id),
                }
            }

            deliveries.extend(drain_game(game));
        }

        deliveries.extend(self.broadcast(None, &format!("User {nickname} left")));
        info!("User {user} left room {}", self.room_id);

        Ok(deliveries)
    }

    /// Starts a new poker game with all the room users.
    ///
    /// A running game is replaced only once all community cards are out and
    /// all bets are equal, the hands of the finished game are shown to all
    /// users.
    pub fn start_poker(&mut self, user: PlayerId) -> Vec<Delivery> {
        let showdown = self.showdown();
        if self.game.as_ref().is_some_and(Game::is_playing) && showdown.is_none() {
            return vec![Delivery::new(user, GameError::GameInProgress.to_string())];
        }

        let mut deliveries = Vec::new();
        if let Some(msg) = showdown {
            deliveries.extend(self.broadcast(None, &msg));
        }

        let mut game = Game::Poker(PokerGame::new(self.config));
        for (id, nickname) in &self.users {
            game.add_player(*id, nickname);
        }

        match game.start() {
            Ok(()) => info!("Room {} started a {} game", self.room_id, game.name()),
            Err(e) if e.is_user_facing() => deliveries.push(Delivery::new(user, e.to_string())),
            Err(e) => {
                error!("Room {} game start error {e}", self.room_id);
                deliveries.push(Delivery::new(user, "The game could not be started"));
            }
        }

        deliveries.extend(drain_game(&mut game));
        self.game = Some(game);

        deliveries
    }

    /// Handles a bet from a user.
    pub fn bet(&mut self, user: PlayerId, amount: u32) -> Vec<Delivery> {
        let Some(game) = self.game.as_mut() else {
            return vec![Delivery::new(
                user,
                "There is no game in this room, start one with poker_start",
            )];
        };

        if !game.has_player(user) {
            return vec![Delivery::new(user, "You are not playing in this game")];
        }

        match game {
            Game::Poker(poker) => {
                // User facing errors are already in the player outbox.
                if let Err(e) = poker.handle_bet(user, amount) {
                    if !e.is_user_facing() {
                        error!("Room {} bet error {e}", self.room_id);
                    }
                }
            }
        }

        drain_game(game)
    }

    /// Sends a user message to all other users.
    pub fn say(&self, user: PlayerId, text: &str) -> Vec<Delivery> {
        let nickname = self.nickname(user).unwrap_or_default();
        self.broadcast(Some(user), &format!("{nickname}: {text}"))
    }

    /// Lists the room users.
    pub fn list(&self, user: PlayerId) -> Vec<Delivery> {
        let mut lines = vec![format!("Room {} users:", self.token)];
        lines.extend(self.users.iter().map(|(id, nickname)| {
            if *id == self.owner {
                format!("{nickname} (owner)")
            } else {
                nickname.clone()
            }
        }));

        vec![Delivery::new(user, lines.join("\n"))]
    }

    fn nickname(&self, user: PlayerId) -> Option<&str> {
        self.users
            .iter()
            .find(|(id, _)| *id == user)
            .map(|(_, nickname)| nickname.as_str())
    }

    fn broadcast(&self, except: Option<PlayerId>, text: &str) -> Vec<Delivery> {
        self.users
            .iter()
            .filter(|(id, _)| Some(*id) != except)
            .map(|(id, _)| Delivery::new(*id, text))
            .collect()
    }

    fn showdown(&self) -> Option<String> {
        let Some(Game::Poker(game)) = &self.game else {
            return None;
        };

        if !game.is_betting_complete() {
            return None;
        }

        let mut lines = vec![String::from("Showdown:")];
        lines.extend(game.best_hands().into_iter().map(|(player_id, value)| {
            let nickname = game.player(player_id).map(Player::nickname).unwrap_or_default();
            format!("{nickname}: {value}")
        }));

        Some(lines.join("\n"))
    }
}

fn drain_game(game: &mut Game) -> Vec<Delivery> {
    game.drain_messages()
        .into_iter()
        .map(|(user, text)| Delivery::new(user, text))
        .collect()
}

/// A room handle, the room state is owned by a task that stops when the
/// handle is dropped.
#[derive(Debug)]
pub struct Room {
    room_id: RoomId,
    token: String,
    commands_tx: mpsc::Sender<RoomCommand>,
}

/// Command for the room task.
#[derive(Debug)]
enum RoomCommand {
    Join {
        user: PlayerId,
        nickname: String,
        resp_tx: oneshot::Sender<Result<()>>,
    },
    Leave {
        user: PlayerId,
        resp_tx: oneshot::Sender<Result<usize>>,
    },
    StartPoker {
        user: PlayerId,
        resp_tx: oneshot::Sender<()>,
    },
    Bet {
        user: PlayerId,
        amount: u32,
        resp_tx: oneshot::Sender<()>,
    },
    Say {
        user: PlayerId,
        text: String,
        resp_tx: oneshot::Sender<()>,
    },
    List {
        user: PlayerId,
        resp_tx: oneshot::Sender<()>,
    },
}

impl Room {
    /// Spawns a task that owns the room state and sends the room messages to
    /// the deliveries channel.
    pub fn new(state: RoomState, deliveries_tx: mpsc::Sender<Delivery>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(128);
        let room_id = state.room_id();
        let token = state.token().to_string();

        let mut task = RoomTask {
            state,
            commands_rx,
            deliveries_tx,
        };

        tokio::spawn(async move {
            if let Err(err) = task.run().await {
                error!("Room {room_id} error {err}");
            }

            info!("Room task for room {room_id} stopped");
        });

        Self {
            room_id,
            token,
            commands_tx,
        }
    }

    /// The room id.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The room token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// A user joins this room.
    pub async fn join(&self, user: PlayerId, nickname: &str) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::Join {
                user,
                nickname: nickname.to_string(),
                resp_tx,
            })
            .await?;

        resp_rx.await?
    }

    /// A user leaves this room, returns the number of users left.
    pub async fn leave(&self, user: PlayerId) -> Result<usize> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::Leave { user, resp_tx })
            .await?;

        resp_rx.await?
    }

    /// Starts a poker game.
    pub async fn start_poker(&self, user: PlayerId) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::StartPoker { user, resp_tx })
            .await?;

        Ok(resp_rx.await?)
    }

    /// Handles a user bet.
    pub async fn bet(&self, user: PlayerId, amount: u32) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::Bet {
                user,
                amount,
                resp_tx,
            })
            .await?;

        Ok(resp_rx.await?)
    }

    /// Sends a user message to the other users.
    pub async fn say(&self, user: PlayerId, text: &str) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::Say {
                user,
                text: text.to_string(),
                resp_tx,
            })
            .await?;

        Ok(resp_rx.await?)
    }

    /// Sends the list of users to a user.
    pub async fn list(&self, user: PlayerId) -> Result<()> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.commands_tx
            .send(RoomCommand::List { user, resp_tx })
            .await?;

        Ok(resp_rx.await?)
    }
}

struct RoomTask {
    /// The room state.
    state: RoomState,
    /// Channel for receiving room commands.
    commands_rx: mpsc::Receiver<RoomCommand>,
    /// Channel for sending messages to users.
    deliveries_tx: mpsc::Sender<Delivery>,
}

impl RoomTask {
    async fn run(&mut self) -> Result<()> {
        // Messages are delivered before responding so that callers see them
        // once a command returns.
        while let Some(cmd) = self.commands_rx.recv().await {
            match cmd {
                RoomCommand::Join {
                    user,
                    nickname,
                    resp_tx,
                } => {
                    let res = match self.state.join(user, &nickname) {
                        Ok(deliveries) => self.deliver(deliveries).await,
                        Err(e) => Err(e),
                    };
                    let _ = resp_tx.send(res);
                }
                RoomCommand::Leave { user, resp_tx } => {
                    let res = match self.state.leave(user) {
                        Ok(deliveries) => self.deliver(deliveries).await,
                        Err(e) => Err(e),
                    };
                    let _ = resp_tx.send(res.map(|_| self.state.users().len()));
                }
                RoomCommand::StartPoker { user, resp_tx } => {
                    let deliveries = self.state.start_poker(user);
                    self.deliver(deliveries).await?;
                    let _ = resp_tx.send(());
                }
                RoomCommand::Bet {
                    user,
                    amount,
                    resp_tx,
                } => {
                    let deliveries = self.state.bet(user, amount);
                    self.deliver(deliveries).await?;
                    let _ = resp_tx.send(());
                }
                RoomCommand::Say {
                    user,
                    text,
                    resp_tx,
                } => {
                    let deliveries = self.state.say(user, &text);
                    self.deliver(deliveries).await?;
                    let _ = resp_tx.send(());
                }
                RoomCommand::List { user, resp_tx } => {
                    let deliveries = self.state.list(user);
                    self.deliver(deliveries).await?;
                    let _ = resp_tx.send(());
                }
            }
        }

        Ok(())
    }

    async fn deliver(&self, deliveries: Vec<Delivery>) -> Result<()> {
        for delivery in deliveries {
            self.deliveries_tx.send(delivery).await?;
        }

        Ok(())
    }
}

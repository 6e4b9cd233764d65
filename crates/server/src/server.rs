// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Users and rooms registry.
use ahash::AHashMap;
use anyhow::{Result, bail};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use potbot_core::{GameConfig, PlayerId};

use crate::{
    room::{Delivery, Room, RoomId, RoomState},
    token::TokenIssuer,
};

/// Server config.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// The config for the games played in the server rooms.
    pub game: GameConfig,
}

/// A connected user.
#[derive(Debug)]
struct User {
    nickname: String,
    token: String,
    room: Option<RoomId>,
}

#[derive(Debug)]
struct Shared {
    users: AHashMap<PlayerId, User>,
    rooms: AHashMap<RoomId, Arc<Room>>,
    last_room_id: u64,
    tokens: TokenIssuer,
}

impl Shared {
    fn user(&self, user: PlayerId) -> Result<&User> {
        match self.users.get(&user) {
            Some(u) => Ok(u),
            None => bail!("User {user} is not connected"),
        }
    }

    fn user_room(&self, user: PlayerId) -> Result<Arc<Room>> {
        let Some(room_id) = self.user(user)?.room else {
            bail!("You are not in a room");
        };

        match self.rooms.get(&room_id) {
            Some(room) => Ok(room.clone()),
            None => bail!("Room {room_id} not found"),
        }
    }
}

/// The server that tracks users and their rooms.
///
/// Messages for users are sent to the deliveries channel.
#[derive(Debug)]
pub struct Server {
    config: Config,
    shared: Mutex<Shared>,
    deliveries_tx: mpsc::Sender<Delivery>,
}

impl Server {
    /// Creates a new server.
    pub fn new(config: Config, deliveries_tx: mpsc::Sender<Delivery>) -> Self {
        Self::with_tokens(config, TokenIssuer::new(), deliveries_tx)
    }

    /// Creates a new server with the given token issuer.
    pub fn with_tokens(
        config: Config,
        tokens: TokenIssuer,
        deliveries_tx: mpsc::Sender<Delivery>,
    ) -> Self {
        let shared = Shared {
            users: AHashMap::default(),
            rooms: AHashMap::default(),
            last_room_id: 0,
            tokens,
        };

        Self {
            config,
            shared: Mutex::new(shared),
            deliveries_tx,
        }
    }

    /// A user connects to the server.
    pub async fn connect(&self, user: PlayerId, nickname: &str) -> Result<()> {
        {
            let mut shared = self.shared.lock();
            if shared.users.contains_key(&user) {
                bail!("User {user} is already connected");
            }

            let token = shared.tokens.issue();
            info!("User {user} connected with token {token}");

            shared.users.insert(
                user,
                User {
                    nickname: nickname.to_string(),
                    token,
                    room: None,
                },
            );
        }

        self.deliver(user, format!("Hi {nickname}!")).await
    }

    /// A user disconnects from the server leaving its room.
    pub async fn disconnect(&self, user: PlayerId) -> Result<()> {
        let in_room = self.shared.lock().user(user)?.room.is_some();
        if in_room {
            self.leave(user).await?;
        }

        let mut shared = self.shared.lock();
        if let Some(u) = shared.users.remove(&user) {
            shared.tokens.release(&u.token);
            info!("User {user} disconnected");
        }

        Ok(())
    }

    /// Creates a room owned by the user, the user leaves its current room.
    pub async fn create_room(&self, user: PlayerId) -> Result<String> {
        let in_room = self.shared.lock().user(user)?.room.is_some();
        if in_room {
            self.leave_room(user).await?;
        }

        let token = {
            let mut shared = self.shared.lock();
            let nickname = shared.user(user)?.nickname.clone();

            shared.last_room_id += 1;
            let room_id = RoomId::new(shared.last_room_id);
            let token = shared.tokens.issue();

            let state = RoomState::new(room_id, token.clone(), user, &nickname, self.config.game);
            let room = Room::new(state, self.deliveries_tx.clone());
            shared.rooms.insert(room_id, Arc::new(room));

            if let Some(u) = shared.users.get_mut(&user) {
                u.room = Some(room_id);
            }

            info!("User {user} created room {room_id} with token {token}");
            token
        };

        self.deliver(
            user,
            "Welcome to new room,\nSend this token to your friends so they could join you:",
        )
        .await?;
        self.deliver(user, token.clone()).await?;

        Ok(token)
    }

    /// A user joins the room with the given token.
    pub async fn join_room(&self, user: PlayerId, token: &str) -> Result<()> {
        let (room, current, nickname) = {
            let shared = self.shared.lock();
            let u = shared.user(user)?;
            let Some(room) = shared.rooms.values().find(|r| r.token() == token) else {
                bail!("No room with token {token}");
            };

            (room.clone(), u.room, u.nickname.clone())
        };

        if current == Some(room.room_id()) {
            bail!("You are already in room {token}");
        }

        if current.is_some() {
            self.leave_room(user).await?;
        }

        room.join(user, &nickname).await?;

        if !self.register_join(user, room.room_id()) {
            // The last user left and the room was removed while joining.
            let _ = room.leave(user).await;
            bail!("No room with token {token}");
        }

        Ok(())
    }

    /// Records the user room if the room is still registered.
    fn register_join(&self, user: PlayerId, room_id: RoomId) -> bool {
        let mut shared = self.shared.lock();
        if !shared.rooms.contains_key(&room_id) {
            return false;
        }

        if let Some(u) = shared.users.get_mut(&user) {
            u.room = Some(room_id);
        }

        true
    }

    /// A user leaves its room, empty rooms are removed.
    pub async fn leave_room(&self, user: PlayerId) -> Result<()> {
        self.leave(user).await?;
        self.deliver(user, "Welcome to lobby!").await
    }

    /// Starts a poker game in the user room.
    pub async fn start_game(&self, user: PlayerId) -> Result<()> {
        let room = self.shared.lock().user_room(user)?;
        room.start_poker(user).await
    }

    /// Handles a bet in the user room game.
    pub async fn bet(&self, user: PlayerId, amount: u32) -> Result<()> {
        let room = self.shared.lock().user_room(user)?;
        room.bet(user, amount).await
    }

    /// Sends a message to the other users in the user room.
    pub async fn say(&self, user: PlayerId, text: &str) -> Result<()> {
        let room = self.shared.lock().user_room(user)?;
        room.say(user, text).await
    }

    /// Sends the list of the room users to the user.
    pub async fn list(&self, user: PlayerId) -> Result<()> {
        let room = self.shared.lock().user_room(user)?;
        room.list(user).await
    }

    /// The number of rooms.
    pub fn rooms_count(&self) -> usize {
        self.shared.lock().rooms.len()
    }

    /// The room token of a user.
    pub fn user_room_token(&self, user: PlayerId) -> Option<String> {
        self.shared
            .lock()
            .user_room(user)
            .ok()
            .map(|room| room.token().to_string())
    }

    async fn leave(&self, user: PlayerId) -> Result<()> {
        let room = {
            let mut shared = self.shared.lock();
            let Some(room_id) = shared.user(user)?.room else {
                bail!("You are not in a room");
            };

            match shared.rooms.get(&room_id).cloned() {
                Some(room) => room,
                None => {
                    warn!("User {user} room {room_id} was already removed");
                    if let Some(u) = shared.users.get_mut(&user) {
                        u.room = None;
                    }
                    return Ok(());
                }
            }
        };

        let users_left = room.leave(user).await?;

        let mut shared = self.shared.lock();
        if let Some(u) = shared.users.get_mut(&user) {
            u.room = None;
        }

        if users_left == 0 {
            shared.rooms.remove(&room.room_id());
            shared.tokens.release(room.token());
            info!("Room {} is empty and was removed", room.room_id());
        }

        Ok(())
    }

    async fn deliver(&self, user: PlayerId, text: impl Into<String>) -> Result<()> {
        self.deliveries_tx.send(Delivery::new(user, text)).await?;
        Ok(())
    }
}

// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Console front end that reads user commands from stdin.
//!
//! Each line has the form `<nickname> <command> [argument]`, messages for
//! users are printed as `[nickname] text`.
use ahash::AHashMap;
use anyhow::{Result, anyhow, bail};
use log::{error, info};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use potbot_core::PlayerId;

use crate::{
    room::Delivery,
    server::{Config, Server},
};

/// A user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect to the server.
    Connect,
    /// Disconnect from the server.
    Disconnect,
    /// Create a room.
    Create,
    /// Join the room with the given token.
    Join(String),
    /// Leave the current room.
    Leave,
    /// Start a poker game in the current room.
    PokerStart,
    /// Bet in the current room game.
    PokerBet(u32),
    /// Send a message to the room users.
    Say(String),
    /// List the room users.
    List,
}

/// Parses a `<nickname> <command> [argument]` line.
pub fn parse_line(line: &str) -> Result<(&str, Command)> {
    let mut parts = line.trim().splitn(3, char::is_whitespace);
    let nickname = parts.next().filter(|s| !s.is_empty());
    let Some(nickname) = nickname else {
        bail!("Missing nickname");
    };

    let Some(cmd) = parts.next() else {
        bail!("Missing command for {nickname}");
    };

    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let command = match (cmd, arg) {
        ("connect", None) => Command::Connect,
        ("disconnect", None) => Command::Disconnect,
        ("create", None) => Command::Create,
        ("join", Some(token)) => Command::Join(token.to_string()),
        ("leave", None) => Command::Leave,
        ("poker_start", None) => Command::PokerStart,
        ("poker_bet", Some(amount)) => {
            let amount = amount
                .parse::<u32>()
                .map_err(|e| anyhow!("Invalid bet amount {amount}: {e}"))?;
            Command::PokerBet(amount)
        }
        ("say", Some(text)) => Command::Say(text.to_string()),
        ("list", None) => Command::List,
        _ => bail!("Invalid command {}", line.trim()),
    };

    Ok((nickname, command))
}

/// Maps nicknames to user ids.
#[derive(Debug, Default)]
struct Nicknames {
    ids: AHashMap<String, PlayerId>,
    names: AHashMap<PlayerId, String>,
}

impl Nicknames {
    fn id(&mut self, nickname: &str) -> PlayerId {
        if let Some(id) = self.ids.get(nickname) {
            return *id;
        }

        let id = PlayerId::new(self.ids.len() as u64 + 1);
        self.ids.insert(nickname.to_string(), id);
        self.names.insert(id, nickname.to_string());
        id
    }

    fn name(&self, id: PlayerId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("?")
    }
}

/// Runs the console until stdin is closed.
pub async fn run(config: Config) -> Result<()> {
    info!(
        "Starting console with big blind {} and stake {}",
        config.game.big_blind, config.game.starting_stake
    );

    let (deliveries_tx, mut deliveries_rx) = mpsc::channel(1024);
    let server = Server::new(config, deliveries_tx);
    let mut nicknames = Nicknames::default();

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let (nickname, command) = match parse_line(&line) {
            Ok(res) => res,
            Err(e) => {
                error!("{e}");
                continue;
            }
        };

        let user = nicknames.id(nickname);
        let res = match command {
            Command::Connect => server.connect(user, nickname).await,
            Command::Disconnect => server.disconnect(user).await,
            Command::Create => server.create_room(user).await.map(|_| ()),
            Command::Join(token) => server.join_room(user, &token).await,
            Command::Leave => server.leave_room(user).await,
            Command::PokerStart => server.start_game(user).await,
            Command::PokerBet(amount) => server.bet(user, amount).await,
            Command::Say(text) => server.say(user, &text).await,
            Command::List => server.list(user).await,
        };

        if let Err(e) = res {
            println!("[{nickname}] {e}");
        }

        while let Ok(delivery) = deliveries_rx.try_recv() {
            println!("[{}] {}", nicknames.name(delivery.user), delivery.text);
        }
    }

    info!("Console input closed");

    Ok(())
}

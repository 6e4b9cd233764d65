// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Potbot Poker rooms server.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod console;
pub mod game;
pub mod room;
pub mod server;
pub mod token;

pub use server::{Config, Server};

// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use log::error;
use potbot_core::GameConfig;
use potbot_server::console;

#[derive(Debug, Parser)]
struct Cli {
    /// The big blind amount, the small blind is half of it.
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(2..=10_000))]
    big_blind: u32,
    /// The coins each player gets when a game starts.
    #[clap(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=1_000_000))]
    stake: u32,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let config = potbot_server::Config {
        game: GameConfig {
            big_blind: cli.big_blind,
            starting_stake: cli.stake,
        },
    };

    if let Err(e) = console::run(config).await {
        error!("{e}");
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! rosbag-record - Record ROS 2 topics listed in a YAML file.
//!
//! Usage:
//!   rosbag-record
//!   rosbag-record --yaml-file topics.yaml --single_bag
//!   rosbag-record --storage sqlite3

use clap::Parser;
use rosbag_record::{
    is_known_storage, load_topics, supervise, RecordCommand, SignalForwarder, DEFAULT_STORAGE,
    DEFAULT_TOPIC_FILE,
};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rosbag-record")]
#[command(about = "Record ROS2 bag data")]
#[command(version)]
struct Args {
    /// Path to YAML file
    #[arg(long, default_value = DEFAULT_TOPIC_FILE)]
    yaml_file: PathBuf,

    /// Do not break bags into multiple files
    #[arg(long = "single_bag", alias = "single-bag")]
    single_bag: bool,

    /// Storage backend (e.g., mcap or sqlite3)
    #[arg(long, default_value = DEFAULT_STORAGE)]
    storage: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    // RUST_LOG, when set, takes precedence over --log-level.
    let level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let topics = load_topics(&args.yaml_file)?;

    if !is_known_storage(&args.storage) {
        warn!(
            "Unrecognized storage backend '{}', leaving backend selection to ros2",
            args.storage
        );
    }

    let command = RecordCommand::new(topics)
        .storage(args.storage.as_str())
        .split_bags(!args.single_bag);

    info!("Running command:");
    info!("{}", command);

    let forwarder = SignalForwarder::new();
    forwarder.install()?;

    let status = supervise(command.to_command(), &forwarder)?;
    if status.success() {
        info!("ros2 bag record has exited cleanly.");
    } else {
        warn!("ros2 bag record exited with {}", status);
    }

    Ok(())
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ROS 2 bag recording wrapper
//!
//! Loads a topic list from YAML and runs `ros2 bag record` on it with fixed
//! cache and split limits, relaying Ctrl+C to the recorder so it can close
//! the bag cleanly.
//!
//! # Quick Start
//!
//! ```bash
//! # Record topics from ./topic_list.yaml into ~4 GB mcap bags
//! rosbag-record
//!
//! # One unsplit sqlite3 bag from a custom list
//! rosbag-record --yaml-file field_test.yaml --storage sqlite3 --single_bag
//! ```

pub mod command;
pub mod config;
pub mod supervisor;

pub use command::{is_known_storage, RecordCommand, DEFAULT_STORAGE};
pub use config::{load_topics, ConfigError, TopicConfig, DEFAULT_TOPIC_FILE};
pub use supervisor::{supervise, SignalForwarder, SupervisorError};

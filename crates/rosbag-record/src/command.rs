// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `ros2 bag record` command line construction.

use std::fmt;
use std::process::Command;

/// Recorder executable.
pub const RECORDER_PROGRAM: &str = "ros2";

/// Subcommand arguments preceding the recorder options.
pub const RECORD_SUBCOMMAND: [&str; 2] = ["bag", "record"];

/// Default storage backend.
pub const DEFAULT_STORAGE: &str = "mcap";

/// Storage backends understood by rosbag2.
pub const KNOWN_STORAGE: [&str; 2] = ["mcap", "sqlite3"];

/// Storage config passed alongside the mcap backend.
pub const MCAP_STORAGE_CONFIG: &str = "mcap_qos_agx.yaml";

/// Recorder cache size limit in bytes.
pub const MAX_CACHE_SIZE: u64 = 5_073_741_824;

/// Bag split size in bytes (~4 GB).
pub const MAX_BAG_SIZE: u64 = 4_000_000_000;

/// Returns true if `storage` names a backend rosbag2 ships with.
pub fn is_known_storage(storage: &str) -> bool {
    KNOWN_STORAGE.contains(&storage)
}

/// Builder for a `ros2 bag record` invocation.
#[derive(Debug, Clone)]
pub struct RecordCommand {
    topics: Vec<String>,
    storage: String,
    split_bags: bool,
}

impl RecordCommand {
    /// Create a command recording `topics` with the default backend and bag splitting enabled.
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            storage: DEFAULT_STORAGE.to_string(),
            split_bags: true,
        }
    }

    /// Set the storage backend.
    ///
    /// Only the default backend adds `-s` and the storage config file. Any
    /// other name, recognized or not, leaves the backend choice to `ros2`.
    pub fn storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = storage.into();
        self
    }

    /// Enable or disable splitting the recording into size-bounded bags.
    pub fn split_bags(mut self, split: bool) -> Self {
        self.split_bags = split;
        self
    }

    /// Recorder executable.
    pub fn program(&self) -> &str {
        RECORDER_PROGRAM
    }

    /// Topics appended to the command.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Configured storage backend name.
    pub fn storage_name(&self) -> &str {
        &self.storage
    }

    /// Full argument vector, excluding the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = RECORD_SUBCOMMAND.iter().map(|s| s.to_string()).collect();

        if self.storage == DEFAULT_STORAGE {
            args.extend([
                "-s".to_string(),
                self.storage.clone(),
                "--storage-config-file".to_string(),
                MCAP_STORAGE_CONFIG.to_string(),
            ]);
        }

        args.extend(["--max-cache-size".to_string(), MAX_CACHE_SIZE.to_string()]);

        if self.split_bags {
            args.extend(["--max-bag-size".to_string(), MAX_BAG_SIZE.to_string()]);
        }

        args.extend(self.topics.iter().cloned());
        args
    }

    /// Build a [`Command`] ready to spawn.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(RECORDER_PROGRAM);
        cmd.args(self.args());
        cmd
    }
}

impl fmt::Display for RecordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", RECORDER_PROGRAM)?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<String> {
        vec!["/imu".to_string(), "/camera/front".to_string()]
    }

    #[test]
    fn test_default_command() {
        let cmd = RecordCommand::new(topics());
        assert_eq!(
            cmd.args(),
            vec![
                "bag",
                "record",
                "-s",
                "mcap",
                "--storage-config-file",
                "mcap_qos_agx.yaml",
                "--max-cache-size",
                "5073741824",
                "--max-bag-size",
                "4000000000",
                "/imu",
                "/camera/front",
            ]
        );
    }

    #[test]
    fn test_single_bag_omits_bag_size() {
        let args = RecordCommand::new(topics()).split_bags(false).args();

        assert!(!args.iter().any(|a| a == "--max-bag-size"));
        assert!(!args.iter().any(|a| a == "4000000000"));
        assert!(args.iter().any(|a| a == "--max-cache-size"));
        assert!(args.iter().any(|a| a == "--storage-config-file"));
        assert!(args.ends_with(&topics()));
    }

    #[test]
    fn test_sqlite_storage_skips_storage_args() {
        let args = RecordCommand::new(topics()).storage("sqlite3").args();

        assert!(!args.iter().any(|a| a == "-s"));
        assert!(!args.iter().any(|a| a == MCAP_STORAGE_CONFIG));
        assert_eq!(&args[..2], ["bag", "record"]);
        assert_eq!(&args[2..4], ["--max-cache-size", "5073741824"]);
    }

    #[test]
    fn test_unknown_storage_is_permissive() {
        let args = RecordCommand::new(topics()).storage("parquet").args();

        assert!(!args.iter().any(|a| a == "-s" || a == "parquet"));
        assert!(args.iter().any(|a| a == "--max-bag-size"));
        assert!(args.ends_with(&topics()));
    }

    #[test]
    fn test_storage_match_is_exact() {
        let args = RecordCommand::new(topics()).storage("MCAP").args();
        assert!(!args.iter().any(|a| a == "--storage-config-file"));
    }

    #[test]
    fn test_topics_trail_in_order() {
        let many: Vec<String> = (0..5).map(|i| format!("/sensor_{}", i)).collect();
        let args = RecordCommand::new(many.clone()).split_bags(false).args();
        assert_eq!(&args[args.len() - many.len()..], many.as_slice());
    }

    #[test]
    fn test_display_matches_args() {
        let cmd = RecordCommand::new(topics()).split_bags(false);
        assert_eq!(
            cmd.to_string(),
            "ros2 bag record -s mcap --storage-config-file mcap_qos_agx.yaml \
             --max-cache-size 5073741824 /imu /camera/front"
        );
    }

    #[test]
    fn test_to_command() {
        let cmd = RecordCommand::new(topics()).to_command();
        assert_eq!(cmd.get_program(), RECORDER_PROGRAM);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, RecordCommand::new(topics()).args());
    }

    #[test]
    fn test_known_storage() {
        assert!(is_known_storage("mcap"));
        assert!(is_known_storage("sqlite3"));
        assert!(!is_known_storage("rosbag1"));
        assert!(!is_known_storage(""));
    }
}

//! Test helpers shared by the dogdisk-core unit tests.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::Builder;

use crate::config::{DiskConfig, PollConfig};

/// Creates a temporary config file with the given content.
/// Uses tempfile::Builder to ensure unique directories for parallel tests.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("dogdisk-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_path = temp_dir.path().join("dogdisk.yml");
    File::create(&config_path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    // Keep the directory alive for the rest of the test run
    let _ = Box::leak(Box::new(temp_dir));
    config_path
}

/// Disk settings pointing at a mock server, with fast polling.
pub fn mock_disk_config(server_uri: &str) -> DiskConfig {
    DiskConfig {
        base_url: format!("{server_uri}/v1/disk/resources"),
        token: Some("MOCK_DISK_TOKEN".to_string()),
        request_timeout_secs: 5,
        poll: PollConfig {
            interval_ms: 1,
            max_attempts: 3,
        },
    }
}

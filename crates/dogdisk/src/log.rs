//! Logging for dogdisk.
use anyhow::Context;
use dogdisk_core::get_data_dir;
use std::io::LineWriter;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::OffsetTime;

const LOG_FILE: &str = "dogdisk.log";
const MAX_LOG_SIZE: u64 = 100 * 1024;

/// Moves `<dir>/dogdisk.log` to `dogdisk.log.old` once it grows past 100KB.
///
/// Returns the path of the live log file.
pub fn rotate_log(data_dir: &Path) -> std::io::Result<PathBuf> {
    let log_path = data_dir.join(LOG_FILE);

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            let backup_path = data_dir.join(format!("{LOG_FILE}.old"));
            if backup_path.exists() {
                std::fs::remove_file(&backup_path)?;
            }
            std::fs::rename(&log_path, backup_path)?;
        }
    }

    Ok(log_path)
}

/// Initializes file based logging under the data directory.
///
/// Logs from the dogdisk crates are kept at DEBUG level and written to
/// `<data_dir>/dogdisk.log` with local timestamps.
///
/// # Errors
///
/// Fails when the data directory or log file cannot be prepared, or when a
/// global subscriber is already installed.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_path = rotate_log(&data_dir).context("Failed to rotate log file")?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // Flush after every line
    let writer = Mutex::new(LineWriter::new(log_file));

    tracing_subscriber::fmt()
        .with_env_filter("dogdisk=debug,dogdisk_core=debug,dogdisk_dog_source=debug")
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;
    Ok(())
}

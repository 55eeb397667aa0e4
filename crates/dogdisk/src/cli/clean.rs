use anyhow::Result;
use dogdisk_core::config::Config;
use dogdisk_core::disk::{DeleteOutcome, DiskClient};

use crate::cli::ux::{MessageType, style_text};
use crate::svc::scenario::clean;

/// Removes leftover scenario folders. Returns `false` if any removal failed.
pub async fn execute(config: &Config, client: &DiskClient, breeds: Vec<String>) -> Result<bool> {
    let results = clean(&config.scenario, client, &breeds).await;

    let mut all_ok = true;
    for (folder, result) in results {
        match result {
            Ok(DeleteOutcome::NotFound) => {
                println!("{folder}: {}", style_text("not found", MessageType::Footer))
            }
            Ok(_) => println!("{folder}: {}", style_text("removed", MessageType::Pass)),
            Err(e) => {
                all_ok = false;
                println!("{folder}: {} {e}", style_text("failed", MessageType::Error));
            }
        }
    }
    Ok(all_ok)
}

use anyhow::{Context, Result};
use dogdisk_core::config::Config;
use dogdisk_core::disk::DiskClient;
use dogdisk_dog_source::DogCeoSource;

use crate::cli::ux::{MessageType, StepSpinner, format_outcome, style_text};
use crate::svc::scenario::{BreedOutcome, run_breed};

/// Runs the upload scenario for each breed and prints a summary.
///
/// Returns `true` when every breed passed.
pub async fn execute(config: &Config, client: &DiskClient, breeds: Vec<String>) -> Result<bool> {
    let source =
        DogCeoSource::from_config(&config.dog_api).context("Failed to configure dog.ceo source")?;

    let mut outcomes = Vec::with_capacity(breeds.len());
    for breed in breeds {
        let spinner = StepSpinner::new(format!("Uploading {breed}..."));
        let result = run_breed(&config.scenario, &source, client, &breed).await;
        spinner.clear();

        let outcome = BreedOutcome { breed, result };
        println!("{}", format_outcome(&outcome));
        outcomes.push(outcome);
    }

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    let footer = format!("◼ {passed} of {} breeds passed.", outcomes.len());
    eprintln!();
    eprintln!("{}", style_text(&footer, MessageType::Footer));

    Ok(passed == outcomes.len())
}

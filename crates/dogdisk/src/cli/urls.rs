use anyhow::{Context, Result};
use dogdisk_core::config::Config;
use dogdisk_dog_source::{DogCeoSource, ImageSource};

use crate::cli::ux::{MessageType, style_text};

/// Prints the sub-breeds of `breed` and the pictures that would be uploaded.
pub async fn execute(config: &Config, breed: &str) -> Result<()> {
    let source =
        DogCeoSource::from_config(&config.dog_api).context("Failed to configure dog.ceo source")?;

    let breed = source.get_breed(breed).await?;
    let urls = source.get_urls(&breed.name, &breed.sub_breeds).await?;

    println!("{}", style_text(&breed.name, MessageType::Heading));
    if breed.sub_breeds.is_empty() {
        println!("{}", style_text("no sub-breeds", MessageType::Footer));
    }

    for (i, group) in urls.iter().enumerate() {
        if let Some(sub_breed) = breed.sub_breeds.get(i) {
            println!("  {sub_breed}");
        }
        for url in group {
            println!("    {} -> {}", url, url.display_name());
        }
    }
    Ok(())
}

//! The upload scenario.
//!
//! For each breed a scratch folder named after the breed is emptied, recreated
//! and filled with one random picture per sub-breed (or one for the breed
//! itself). The folder listing is then checked and the folder removed again.
use std::collections::BTreeSet;
use std::future::Future;

use anyhow::{Context, Result};
use dogdisk_core::config::ScenarioConfig;
use dogdisk_core::disk::{DeleteOutcome, DiskClient, DiskError, Resource, ResourceType};
use dogdisk_dog_source::{ImageSource, ImageUrl};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// What the check body gets to see of a prepared folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderContext {
    pub breed: String,
    pub sub_breeds: Vec<String>,
    pub folder: String,
    /// Number of distinct files uploaded into the folder.
    pub expected_files: usize,
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error(transparent)]
    Disk(#[from] DiskError),
    #[error("Failed to decode listing of {folder}: {source}")]
    Decode {
        folder: String,
        source: reqwest::Error,
    },
    #[error("Listing {folder} returned {status}, expected 200")]
    Status { folder: String, status: StatusCode },
    #[error("{folder} is a {found}, expected a dir")]
    NotADirectory { folder: String, found: &'static str },
    #[error("Folder is named {found}, expected {expected}")]
    NameMismatch { expected: String, found: String },
    #[error("{folder} holds {found} items, expected {expected}")]
    ItemCount {
        folder: String,
        expected: usize,
        found: usize,
    },
    #[error("{name} is a {found}, expected a file")]
    NotAFile { name: String, found: &'static str },
    #[error("{name} does not start with {breed}")]
    NamePrefix { name: String, breed: String },
}

/// Checks a prepared folder and returns the names of the files found in it.
#[instrument(skip(client, context), fields(folder = %context.folder))]
pub async fn verify_folder(
    client: &DiskClient,
    context: &FolderContext,
) -> Result<Vec<String>, VerifyError> {
    // One past the expected count so surplus items still show up
    let response = client
        .get_folder_with_limit(&context.folder, context.expected_files + 1)
        .await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(VerifyError::Status {
            folder: context.folder.clone(),
            status,
        });
    }

    let folder: Resource = response
        .json()
        .await
        .map_err(|source| VerifyError::Decode {
            folder: context.folder.clone(),
            source,
        })?;

    if folder.kind != ResourceType::Dir {
        return Err(VerifyError::NotADirectory {
            folder: context.folder.clone(),
            found: folder.kind.as_str(),
        });
    }
    if folder.name != context.folder {
        return Err(VerifyError::NameMismatch {
            expected: context.folder.clone(),
            found: folder.name,
        });
    }

    let items = folder.items();
    if items.len() != context.expected_files {
        return Err(VerifyError::ItemCount {
            folder: context.folder.clone(),
            expected: context.expected_files,
            found: items.len(),
        });
    }

    for item in items {
        if item.kind != ResourceType::File {
            return Err(VerifyError::NotAFile {
                name: item.name.clone(),
                found: item.kind.as_str(),
            });
        }
        if !item.name.starts_with(&context.breed) {
            return Err(VerifyError::NamePrefix {
                name: item.name.clone(),
                breed: context.breed.clone(),
            });
        }
    }

    info!(files = items.len(), "Folder verified");
    Ok(items.iter().map(|i| i.name.clone()).collect())
}

/// A remote folder filled with pictures of one breed.
///
/// Call [`BreedFolder::teardown`] when done, or use [`with_breed_folder`] which
/// always does.
#[derive(Debug)]
pub struct BreedFolder<'a> {
    client: &'a DiskClient,
    context: FolderContext,
}

impl<'a> BreedFolder<'a> {
    /// Resolves the breed's pictures and uploads them into a fresh folder.
    ///
    /// A folder left over by an earlier run is removed first. When an upload
    /// fails the half-filled folder is removed before the error is returned.
    #[instrument(skip(scenario, source, client))]
    pub async fn setup(
        scenario: &ScenarioConfig,
        source: &dyn ImageSource,
        client: &'a DiskClient,
        breed: &str,
    ) -> Result<Self> {
        let sub_breeds = source.get_sub_breeds(breed).await?;
        let urls = source.get_urls(breed, &sub_breeds).await?;
        let folder = scenario.folder_name(breed);

        client
            .delete_folder(&folder)
            .await
            .with_context(|| format!("Failed to remove leftover folder {folder}"))?;
        client
            .create_folder(&folder)
            .await
            .with_context(|| format!("Failed to create folder {folder}"))?;

        let expected_files = match upload_all(client, &folder, &urls).await {
            Ok(count) => count,
            Err(e) => {
                if let Err(cleanup) = client.delete_folder(&folder).await {
                    warn!(%folder, error = %cleanup, "Failed to remove folder after upload error");
                }
                return Err(e);
            }
        };
        info!(%folder, expected_files, "Folder ready");

        Ok(Self {
            client,
            context: FolderContext {
                breed: breed.to_string(),
                sub_breeds,
                folder,
                expected_files,
            },
        })
    }

    pub fn context(&self) -> &FolderContext {
        &self.context
    }

    /// Removes the folder.
    pub async fn teardown(self) -> Result<DeleteOutcome> {
        let folder = self.context.folder;
        self.client
            .delete_folder(&folder)
            .await
            .with_context(|| format!("Failed to remove folder {folder}"))
    }
}

// Returns the number of distinct files the folder should end up with.
async fn upload_all(client: &DiskClient, folder: &str, urls: &[Vec<ImageUrl>]) -> Result<usize> {
    let mut names = BTreeSet::new();
    for url in urls.iter().flatten() {
        let name = url.display_name();
        client
            .upload_photos_to_yd(folder, url.as_str(), &name)
            .await
            .with_context(|| format!("Failed to upload {url} as {name}"))?;
        names.insert(name);
    }
    Ok(names.len())
}

/// Prepares the folder for `breed`, runs `body` against it and removes the
/// folder again whatever the body returned.
///
/// When both the body and the removal fail, the body's error is returned.
pub async fn with_breed_folder<F, Fut, T>(
    scenario: &ScenarioConfig,
    source: &dyn ImageSource,
    client: &DiskClient,
    breed: &str,
    body: F,
) -> Result<T>
where
    F: FnOnce(FolderContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let folder = BreedFolder::setup(scenario, source, client, breed).await?;
    let result = body(folder.context().clone()).await;
    let teardown = folder.teardown().await;

    match (result, teardown) {
        (Ok(value), Ok(_)) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(_)) => Err(e),
        (Err(e), Err(teardown_err)) => {
            warn!(error = %teardown_err, "Teardown failed after a failed check");
            Err(e)
        }
    }
}

/// Result of a successful run for one breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedReport {
    pub breed: String,
    pub sub_breeds: Vec<String>,
    pub folder: String,
    pub files: Vec<String>,
}

#[derive(Debug)]
pub struct BreedOutcome {
    pub breed: String,
    pub result: Result<BreedReport>,
}

impl BreedOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the upload scenario for one breed.
pub async fn run_breed(
    scenario: &ScenarioConfig,
    source: &dyn ImageSource,
    client: &DiskClient,
    breed: &str,
) -> Result<BreedReport> {
    with_breed_folder(scenario, source, client, breed, |context| async move {
        let files = verify_folder(client, &context)
            .await
            .with_context(|| format!("Check of {} failed", context.folder))?;
        Ok(BreedReport {
            breed: context.breed,
            sub_breeds: context.sub_breeds,
            folder: context.folder,
            files,
        })
    })
    .await
}

/// Runs the scenario for every breed in turn. A failing breed does not stop
/// the others.
pub async fn run_all(
    scenario: &ScenarioConfig,
    source: &dyn ImageSource,
    client: &DiskClient,
    breeds: &[String],
) -> Vec<BreedOutcome> {
    let mut outcomes = Vec::with_capacity(breeds.len());
    for breed in breeds {
        let result = run_breed(scenario, source, client, breed).await;
        if let Err(e) = &result {
            warn!(%breed, error = %e, "Scenario failed");
        }
        outcomes.push(BreedOutcome {
            breed: breed.clone(),
            result,
        });
    }
    outcomes
}

/// Removes the scenario folders of the given breeds.
pub async fn clean(
    scenario: &ScenarioConfig,
    client: &DiskClient,
    breeds: &[String],
) -> Vec<(String, Result<DeleteOutcome, DiskError>)> {
    let mut results = Vec::with_capacity(breeds.len());
    for breed in breeds {
        let folder = scenario.folder_name(breed);
        let result = client.delete_folder(&folder).await;
        results.push((folder, result));
    }
    results
}

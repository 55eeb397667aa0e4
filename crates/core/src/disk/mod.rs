//! Client for the Yandex Disk resources API.
//!
//! Only the handful of calls needed to manage a scratch folder are covered:
//! create, list, upload-by-url and delete. Upload and delete may answer with
//! `202 Accepted` and an operation link, which [`DiskClient::wait_for_operation`]
//! polls until the operation settles.
mod types;

pub use types::{Link, OperationStatus, Resource, ResourceList, ResourceType};

use std::time::Duration;

use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue,
};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{DiskConfig, PollConfig};
use types::OperationStatusResponse;

/// Environment variable consulted when no token is passed or configured.
pub const TOKEN_ENV_VAR: &str = "YANDEX_DISK_TOKEN";

#[derive(Error, Debug)]
pub enum DiskError {
    #[error(
        "A Yandex Disk token is required: pass one explicitly, set disk.token in the config or export YANDEX_DISK_TOKEN"
    )]
    MissingToken,
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{operation} returned {status}, expected {expected}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: String,
        status: StatusCode,
        body: String,
    },
    #[error("Operation {href} failed")]
    OperationFailed { href: String },
    #[error("Operation {href} did not finish after {attempts} attempts")]
    OperationTimeout { href: String, attempts: u32 },
}

/// Non-failing results of [`DiskClient::delete_folder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// `204 No Content`, removed right away.
    Deleted,
    /// `202 Accepted`, removed once the operation finished.
    Accepted,
    /// `404 Not Found`, nothing to remove.
    NotFound,
}

/// Picks the token from, in order: the explicit argument, the configured value
/// (literal or `env:VARIABLE`) and finally [`TOKEN_ENV_VAR`].
pub fn resolve_token(explicit: Option<&str>, configured: Option<&str>) -> Result<String, DiskError> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(configured) = configured.map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(env_key) = configured.strip_prefix("env:") {
            if let Ok(token) = std::env::var(env_key.trim()) {
                if !token.trim().is_empty() {
                    return Ok(token.trim().to_string());
                }
            }
        } else {
            return Ok(configured.to_string());
        }
    }

    std::env::var(TOKEN_ENV_VAR)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(DiskError::MissingToken)
}

/// Thin wrapper over the disk resources endpoints.
#[derive(Debug)]
pub struct DiskClient {
    base_url: Url,
    upload_url: Url,
    poll: PollConfig,
    client: Client,
}

impl DiskClient {
    /// Creates a client, failing with [`DiskError::MissingToken`] when no token
    /// can be found.
    pub fn new(config: &DiskConfig, token: Option<&str>) -> Result<Self, DiskError> {
        let token = resolve_token(token, config.token.as_deref())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("OAuth {token}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            upload_url: Url::parse(&config.upload_url())?,
            poll: config.poll.clone(),
            client,
        })
    }

    /// Fetches folder metadata. The response is returned as is, status included.
    #[instrument(skip(self))]
    pub async fn get_folder(&self, path: &str) -> Result<Response, DiskError> {
        self.fetch_folder(path, None).await
    }

    /// Like [`DiskClient::get_folder`], but embeds up to `limit` items instead
    /// of the service's default page of 20.
    #[instrument(skip(self))]
    pub async fn get_folder_with_limit(
        &self,
        path: &str,
        limit: usize,
    ) -> Result<Response, DiskError> {
        self.fetch_folder(path, Some(limit)).await
    }

    async fn fetch_folder(&self, path: &str, limit: Option<usize>) -> Result<Response, DiskError> {
        let mut request = self.client.get(self.base_url.clone()).query(&[("path", path)]);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;
        debug!(status = %response.status(), ?limit, "Fetched folder");
        Ok(response)
    }

    /// Fetches and decodes a folder listing, requiring `200 OK`.
    #[instrument(skip(self))]
    pub async fn list_folder(&self, path: &str) -> Result<Resource, DiskError> {
        let response = self.get_folder(path).await?;
        let response = expect_status(response, "list folder", &[StatusCode::OK]).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    pub async fn create_folder(&self, path: &str) -> Result<(), DiskError> {
        let response = self
            .client
            .put(self.base_url.clone())
            .query(&[("path", path)])
            .send()
            .await?;
        expect_status(response, "create folder", &[StatusCode::CREATED]).await?;
        debug!("Created folder");
        Ok(())
    }

    /// Asks the disk to download `url` into `<path>/<name>`, overwriting any
    /// existing file, and waits for the download to finish.
    #[instrument(skip(self))]
    pub async fn upload_photos_to_yd(
        &self,
        path: &str,
        url: &str,
        name: &str,
    ) -> Result<(), DiskError> {
        let target = format!("/{}/{}", path.trim_matches('/'), name);
        let response = self
            .client
            .post(self.upload_url.clone())
            .query(&[
                ("path", target.as_str()),
                ("url", url),
                ("overwrite", "true"),
            ])
            .send()
            .await?;
        let response = expect_status(response, "upload", &[StatusCode::ACCEPTED]).await?;
        let link: Link = response.json().await?;
        debug!(href = %link.href, "Upload accepted");
        self.wait_for_operation(&link).await
    }

    /// Deletes a folder. A missing folder is not an error.
    #[instrument(skip(self))]
    pub async fn delete_folder(&self, path: &str) -> Result<DeleteOutcome, DiskError> {
        let response = self
            .client
            .delete(self.base_url.clone())
            .query(&[("path", path)])
            .send()
            .await?;
        let response = expect_status(
            response,
            "delete folder",
            &[
                StatusCode::NO_CONTENT,
                StatusCode::ACCEPTED,
                StatusCode::NOT_FOUND,
            ],
        )
        .await?;

        let status = response.status();
        let outcome = if status == StatusCode::ACCEPTED {
            let link: Link = response.json().await?;
            self.wait_for_operation(&link).await?;
            DeleteOutcome::Accepted
        } else if status == StatusCode::NOT_FOUND {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        };
        debug!(?outcome, "Deleted folder");
        Ok(outcome)
    }

    /// Polls an operation link until it reports `success`.
    ///
    /// Gives up with [`DiskError::OperationFailed`] on `failed`, and with
    /// [`DiskError::OperationTimeout`] after `poll.max_attempts` checks. A limit of
    /// zero skips polling altogether.
    #[instrument(skip(self), fields(href = %link.href))]
    pub async fn wait_for_operation(&self, link: &Link) -> Result<(), DiskError> {
        let max_attempts = self.poll.max_attempts;
        if max_attempts == 0 {
            debug!("Polling disabled");
            return Ok(());
        }

        for attempt in 1..=max_attempts {
            let response = self.client.get(&link.href).send().await?;
            let response = expect_status(response, "operation status", &[StatusCode::OK]).await?;
            let OperationStatusResponse { status } = response.json().await?;
            debug!(attempt, ?status, "Polled operation");

            match status {
                OperationStatus::Success => return Ok(()),
                OperationStatus::Failed => {
                    return Err(DiskError::OperationFailed {
                        href: link.href.clone(),
                    });
                }
                OperationStatus::InProgress | OperationStatus::Unknown(_) => {}
            }

            if attempt < max_attempts {
                tokio::time::sleep(Duration::from_millis(self.poll.interval_ms)).await;
            }
        }

        Err(DiskError::OperationTimeout {
            href: link.href.clone(),
            attempts: max_attempts,
        })
    }
}

async fn expect_status(
    response: Response,
    operation: &'static str,
    expected: &[StatusCode],
) -> Result<Response, DiskError> {
    let status = response.status();
    if expected.contains(&status) {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(DiskError::UnexpectedStatus {
        operation,
        expected: expected
            .iter()
            .map(|s| s.as_u16().to_string())
            .collect::<Vec<_>>()
            .join("/"),
        status,
        body,
    })
}

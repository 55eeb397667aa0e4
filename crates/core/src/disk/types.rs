use serde::{Deserialize, Serialize};

/// Kind of a remote resource (serialized as lowercase strings).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Dir,
    File,
    #[serde(other)]
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match &self {
            ResourceType::Dir => "dir",
            ResourceType::File => "file",
            ResourceType::Other => "other",
        }
    }
}

/// A file or folder on the disk. Only the fields the scenario inspects are kept.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<ResourceList>,
}

impl Resource {
    /// Items of a folder listing, empty for files.
    pub fn items(&self) -> &[Resource] {
        self.embedded
            .as_ref()
            .map(|e| e.items.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResourceList {
    #[serde(default)]
    pub items: Vec<Resource>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Handle returned with `202 Accepted` for operations that finish later.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub templated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OperationStatus {
    Success,
    InProgress,
    Failed,
    Unknown(String),
}

impl From<String> for OperationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => OperationStatus::Success,
            "in-progress" => OperationStatus::InProgress,
            "failed" => OperationStatus::Failed,
            _ => OperationStatus::Unknown(value),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationStatusResponse {
    pub status: OperationStatus,
}

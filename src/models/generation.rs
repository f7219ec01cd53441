// src/models/generation.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Lifecycle of a 3D generation job. `Processing` is the generating phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Queued,
    Uploading,
    #[serde(alias = "generating")]
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }
}

// One job per project, the only source of truth for "is the model ready"
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelGeneration {
    pub id: String,
    pub project_id: String,
    pub status: GenerationStatus,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub progress: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    // Status to fall back to if the in-flight upload fails
    #[serde(skip)]
    pub pre_upload_status: Option<GenerationStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ModelGeneration {
    pub fn new(project_id: &str, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            status: GenerationStatus::Queued,
            images,
            model_url: None,
            progress: 0,
            failure_reason: None,
            pre_upload_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn model_available(&self) -> bool {
        self.status == GenerationStatus::Completed
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportFormat {
    pub name: String,
    pub description: String,
    pub size: String,
}

// Returned from POST /projects/{id}/images/{filename}
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    pub generation: ModelGeneration,
}

// src/services/upload_service.rs
use crate::models::ServiceError;
use derive_more::Display;
use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::{Duration, Instant};

// Where the generation backend reports the finished asset
const MODEL_URL_POINTER: &str = "/tripo3dResponse/output/pbr_model";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// Everything that can go wrong talking to the upload endpoint. Callers treat
// all variants as one "upload failed" class; the variant only shapes the reason.
#[derive(Debug, Display, PartialEq)]
pub enum UploadError {
    #[display(fmt = "request failed: {}", _0)]
    Request(String),
    #[display(fmt = "endpoint returned HTTP {}: {}", status, body)]
    Status { status: u16, body: String },
    #[display(fmt = "response was not valid JSON: {}", _0)]
    Decode(String),
}

impl std::error::Error for UploadError {}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        ServiceError::UploadFailed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub payload: Value,
    pub model_url: Option<String>,
}

// Pull the generated asset URL out of an upload response. Any other shape,
// including non-object JSON, means "no model yet".
pub fn extract_model_url(payload: &Value) -> Option<String> {
    payload
        .pointer(MODEL_URL_POINTER)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: String,
}

impl UploadClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = ClientBuilder::new()
            .user_agent(concat!("forma-service/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                error!("❌ Failed to build upload client: {:?}", e);
                ServiceError::InternalServerError
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // POST the file as multipart form data with a single `file` field
    pub async fn upload(
        &self,
        file_name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadOutcome, UploadError> {
        let content_type = if content_type.trim().is_empty() {
            FALLBACK_CONTENT_TYPE
        } else {
            content_type
        };
        let size = content.len();

        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| UploadError::Request(format!("invalid content type {}: {}", content_type, e)))?;
        let form = Form::new().part("file", part);

        info!("📤 Uploading {} ({} bytes) to {}", file_name, size, self.endpoint);
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Request(format!("read body failed: {}", e)))?;

        debug!("Upload endpoint answered {} in {} ms", status, started.elapsed().as_millis());

        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| UploadError::Decode(e.to_string()))?;
        let model_url = extract_model_url(&payload);

        info!("✅ Upload of {} accepted (model url: {})", file_name,
            model_url.as_deref().unwrap_or("none yet"));

        Ok(UploadOutcome { payload, model_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_nested_model_url() {
        let payload = json!({
            "tripo3dResponse": {
                "code": 0,
                "output": { "pbr_model": "https://example.com/model.glb" }
            }
        });
        assert_eq!(
            extract_model_url(&payload).as_deref(),
            Some("https://example.com/model.glb")
        );
    }

    #[test]
    fn other_shapes_mean_no_model() {
        assert_eq!(extract_model_url(&json!({})), None);
        assert_eq!(extract_model_url(&json!({ "tripo3dResponse": null })), None);
        assert_eq!(extract_model_url(&json!({ "tripo3dResponse": { "output": {} } })), None);
        assert_eq!(
            extract_model_url(&json!({ "tripo3dResponse": { "output": { "pbr_model": 7 } } })),
            None
        );
        assert_eq!(extract_model_url(&json!(["not", "an", "object"])), None);
        assert_eq!(extract_model_url(&json!("text")), None);
    }

    #[test]
    fn errors_collapse_into_upload_failed() {
        let err: ServiceError = UploadError::Status { status: 503, body: "busy".into() }.into();
        assert_eq!(err, ServiceError::UploadFailed("endpoint returned HTTP 503: busy".to_string()));
    }
}

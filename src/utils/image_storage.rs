// src/utils/image_storage.rs
use crate::models::ServiceError;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref FILENAME_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").unwrap();
}

#[derive(Clone, Debug)]
pub struct StoredImage {
    pub content: Vec<u8>,
    pub content_type: String,
    pub checksum: String,
}

// Uploaded source images, kept for the lifetime of the process
#[derive(Clone, Default)]
pub struct ImageStore {
    images: Arc<Mutex<HashMap<(String, String), StoredImage>>>,
}

pub fn validate_filename(filename: &str) -> Result<(), ServiceError> {
    if FILENAME_PATTERN.is_match(filename) && !filename.contains("..") {
        Ok(())
    } else {
        warn!("⚠️ Rejected image filename: {:?}", filename);
        Err(ServiceError::BadRequest(format!("Invalid file name: {}", filename)))
    }
}

// Local URL under which an uploaded image is served back
pub fn image_url(project_id: &str, filename: &str) -> String {
    format!("/projects/{}/images/{}", project_id, filename)
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Store the image and return its local URL. Re-uploading a name replaces it.
    pub fn save(
        &self,
        project_id: &str,
        filename: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ServiceError> {
        validate_filename(filename)?;

        let checksum = format!("{:x}", Sha256::digest(&content));
        debug!("Storing image {} for project {} ({} bytes, sha256 {})",
            filename, project_id, content.len(), checksum);

        let mut images = self.images.lock()?;
        images.insert(
            (project_id.to_string(), filename.to_string()),
            StoredImage {
                content,
                content_type: content_type.to_string(),
                checksum,
            },
        );

        Ok(image_url(project_id, filename))
    }

    pub fn get(&self, project_id: &str, filename: &str) -> Result<Option<StoredImage>, ServiceError> {
        let images = self.images.lock()?;
        Ok(images
            .get(&(project_id.to_string(), filename.to_string()))
            .cloned())
    }
}

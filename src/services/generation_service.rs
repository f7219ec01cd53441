// src/services/generation_service.rs
use crate::models::{GenerationStatus, ModelGeneration, Project, ProjectStatus, ServiceError};
use crate::services::progress_simulator::{TickOutcome, COMPLETE_AT};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Generation jobs keyed by project id. Every change to "is the model ready"
// goes through here, both from the progress timer and from uploads.
#[derive(Clone, Default)]
pub struct GenerationRegistry {
    jobs: Arc<Mutex<HashMap<String, ModelGeneration>>>,
}

impl GenerationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Open a queued job for a freshly created project
    pub fn open(&self, project_id: &str, images: Vec<String>) -> Result<ModelGeneration, ServiceError> {
        let job = ModelGeneration::new(project_id, images);
        self.jobs.lock()?.insert(project_id.to_string(), job.clone());
        info!("🧊 Opened generation job {} for project {}", job.id, project_id);
        Ok(job)
    }

    // Job for a project, created on first access to mirror the project's status
    pub fn ensure(&self, project: &Project) -> Result<ModelGeneration, ServiceError> {
        let mut jobs = self.jobs.lock()?;
        let job = jobs.entry(project.id.clone()).or_insert_with(|| {
            let images = project.thumbnail_url.iter().cloned().collect();
            let mut job = ModelGeneration::new(&project.id, images);
            match project.status {
                ProjectStatus::Draft => {}
                ProjectStatus::Processing => job.status = GenerationStatus::Processing,
                ProjectStatus::Completed => {
                    job.status = GenerationStatus::Completed;
                    job.progress = COMPLETE_AT;
                }
            }
            job
        });
        Ok(job.clone())
    }

    pub fn get(&self, project_id: &str) -> Result<Option<ModelGeneration>, ServiceError> {
        Ok(self.jobs.lock()?.get(project_id).cloned())
    }

    // Apply a timer tick. Ticks never move a job out of a terminal state and
    // never touch a job that failed.
    pub fn record_tick(&self, project_id: &str, outcome: TickOutcome) -> Result<ModelGeneration, ServiceError> {
        self.update(project_id, |job| {
            if job.status.is_terminal() {
                return;
            }
            match outcome {
                TickOutcome::Advanced(progress) => {
                    job.progress = progress.min(COMPLETE_AT);
                    if job.status == GenerationStatus::Queued {
                        job.status = GenerationStatus::Processing;
                    }
                }
                TickOutcome::Completed(_) => {
                    job.progress = COMPLETE_AT;
                    // An in-flight upload decides the final state when it returns
                    if job.status != GenerationStatus::Uploading {
                        info!("✅ Generation for project {} finished", job.project_id);
                        job.status = GenerationStatus::Completed;
                    }
                }
                TickOutcome::Idle => {}
            }
        })
    }

    // Claim the job for an upload. Only one upload per project may be in flight
    // and a job that already holds a real model URL takes no more uploads.
    pub fn begin_upload(&self, project_id: &str) -> Result<ModelGeneration, ServiceError> {
        let mut jobs = self.jobs.lock()?;
        let job = jobs.get_mut(project_id).ok_or(ServiceError::NotFound)?;

        if job.status == GenerationStatus::Uploading {
            warn!("⚠️ Upload already in progress for project {}", project_id);
            return Err(ServiceError::Conflict("An upload is already in progress".to_string()));
        }
        if job.model_url.is_some() {
            return Err(ServiceError::Conflict("A model has already been generated".to_string()));
        }

        job.pre_upload_status = Some(job.status);
        job.status = GenerationStatus::Uploading;
        job.failure_reason = None;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    // Record a successful upload: the image joins the gallery and a model URL,
    // when present, completes the job.
    pub fn finish_upload(
        &self,
        project_id: &str,
        image_url: String,
        model_url: Option<String>,
    ) -> Result<ModelGeneration, ServiceError> {
        self.update(project_id, |job| {
            job.pre_upload_status = None;
            job.images.push(image_url);
            match model_url {
                Some(url) => {
                    info!("✅ Model ready for project {}: {}", job.project_id, url);
                    job.model_url = Some(url);
                    job.progress = COMPLETE_AT;
                    job.status = GenerationStatus::Completed;
                }
                None if job.progress >= COMPLETE_AT => job.status = GenerationStatus::Completed,
                None => job.status = GenerationStatus::Processing,
            }
        })
    }

    // Record a failed upload. A job that had already completed, or whose timer
    // finished while the upload was in flight, stays completed; anything else fails.
    pub fn fail_upload(&self, project_id: &str, reason: &str) -> Result<ModelGeneration, ServiceError> {
        self.update(project_id, |job| {
            let previous = job.pre_upload_status.take();
            job.failure_reason = Some(reason.to_string());

            if previous == Some(GenerationStatus::Completed) || job.progress >= COMPLETE_AT {
                warn!("⚠️ Upload for project {} failed, keeping completed model: {}", job.project_id, reason);
                job.status = GenerationStatus::Completed;
            } else {
                error!("❌ Generation for project {} failed: {}", job.project_id, reason);
                job.status = GenerationStatus::Failed;
            }
        })
    }

    fn update<F>(&self, project_id: &str, apply: F) -> Result<ModelGeneration, ServiceError>
    where
        F: FnOnce(&mut ModelGeneration),
    {
        let mut jobs = self.jobs.lock()?;
        let job = jobs.get_mut(project_id).ok_or(ServiceError::NotFound)?;
        let before = job.status;

        apply(job);
        job.updated_at = Utc::now();

        if before != job.status {
            debug!("Job {} {:?} -> {:?}", job.id, before, job.status);
        }
        Ok(job.clone())
    }
}

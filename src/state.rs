// src/state.rs
use crate::config::ServiceConfig;
use crate::models::{
    CreateProjectRequest, ExportFormat, GenerationStatus, ModelGeneration, Project, ProjectStatus,
    ServiceError, Team, TeamData, UploadResponse,
};
use crate::services::export_service;
use crate::services::generation_service::GenerationRegistry;
use crate::services::progress_simulator::{SimulatorRegistry, TickOutcome};
use crate::services::upload_service::UploadClient;
use crate::services::view_session::{DashboardView, ViewSessions};
use crate::utils::image_storage::{self, ImageStore};
use crate::utils::project_storage::{InMemoryProjectStore, ProjectRepository};
use crate::utils::team_storage::TeamRegistry;
use log::{debug, error, info, warn};
use std::ops::ControlFlow;
use std::sync::Arc;

// Everything the handlers share. Cloning is cheap: every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    pub projects: Arc<dyn ProjectRepository>,
    pub teams: TeamRegistry,
    pub images: ImageStore,
    pub generations: GenerationRegistry,
    pub sessions: ViewSessions,
    pub simulators: SimulatorRegistry,
    pub uploader: UploadClient,
}

impl AppState {
    // State seeded with the demo projects, users and team
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let projects = Arc::new(InMemoryProjectStore::seeded());
        let teams = TeamRegistry::seeded(&config.current_user_id);
        Self::with_stores(config, projects, teams)
    }

    pub fn with_stores(
        config: ServiceConfig,
        projects: Arc<dyn ProjectRepository>,
        teams: TeamRegistry,
    ) -> Result<Self, ServiceError> {
        let uploader = UploadClient::new(&config.upload_endpoint, config.upload_timeout)?;

        Ok(Self {
            config,
            projects,
            teams,
            images: ImageStore::new(),
            generations: GenerationRegistry::new(),
            sessions: ViewSessions::new(),
            simulators: SimulatorRegistry::new(),
            uploader,
        })
    }

    pub fn find_project(&self, project_id: &str) -> Result<Project, ServiceError> {
        self.projects.get(project_id)?.ok_or_else(|| {
            error!("❌ Project not found: {}", project_id);
            ServiceError::NotFound
        })
    }

    pub fn generation_for(&self, project_id: &str) -> Result<ModelGeneration, ServiceError> {
        let project = self.find_project(project_id)?;
        self.generations.ensure(&project)
    }

    // Store the project, open its job and show it in the caller's session
    pub fn create_project(&self, session_id: &str, request: CreateProjectRequest) -> Result<Project, ServiceError> {
        let previews = request.preview_images.clone();
        let project = self.projects.create(request)?;
        self.generations.open(&project.id, previews)?;
        self.open_project(session_id, &project.id)?;
        Ok(project)
    }

    // Switch the session to the detail view of a project. A processing project
    // gets a progress timer bound to this session.
    pub fn open_project(&self, session_id: &str, project_id: &str) -> Result<DashboardView, ServiceError> {
        let project = self.find_project(project_id)?;
        let job = self.generations.ensure(&project)?;
        self.sessions.select_project(session_id, project_id)?;

        if project.status == ProjectStatus::Processing && !job.status.is_terminal() {
            self.start_timer(session_id, &project.id, job.progress)?;
        } else {
            self.simulators.cancel(session_id)?;
        }

        self.view(session_id)
    }

    fn start_timer(&self, session_id: &str, project_id: &str, progress: u32) -> Result<bool, ServiceError> {
        let state = self.clone();
        let tracked = project_id.to_string();
        self.simulators.start(
            session_id,
            project_id,
            progress,
            self.config.progress,
            move |outcome| state.record_progress(&tracked, outcome),
        )
    }

    // Restart the timer in every session showing a project whose job is
    // generating again, e.g. after a retried upload
    fn resume_timers(&self, project_id: &str) -> Result<(), ServiceError> {
        let project = self.find_project(project_id)?;
        let job = self.generations.ensure(&project)?;
        if project.status != ProjectStatus::Processing || job.status.is_terminal() {
            return Ok(());
        }

        for session_id in self.sessions.viewing(project_id)? {
            if self.start_timer(&session_id, project_id, job.progress)? {
                info!("🔁 Resumed progress for project {} in session {}", project_id, session_id);
            }
        }
        Ok(())
    }

    // Leave the detail view, tearing down its timer
    pub fn close_project(&self, session_id: &str) -> Result<DashboardView, ServiceError> {
        if let Some(project_id) = self.sessions.back(session_id)? {
            info!("↩️ Session {} left project {}", session_id, project_id);
        }
        self.simulators.cancel(session_id)?;
        self.view(session_id)
    }

    pub fn view(&self, session_id: &str) -> Result<DashboardView, ServiceError> {
        let state = self.sessions.state(session_id)?;

        let selected = match state.selected_project_id.as_deref() {
            Some(id) => self.projects.get(id)?,
            None => None,
        };

        match selected {
            Some(project) => {
                let generation = self.generations.ensure(&project)?;
                let model_available = model_available(&project, &generation);
                let progress_running =
                    self.simulators.running_project(session_id)?.as_deref() == Some(project.id.as_str());
                Ok(DashboardView::Detail {
                    project,
                    generation,
                    model_available,
                    progress_running,
                    state,
                })
            }
            None => Ok(DashboardView::List {
                projects: self.projects.list()?,
                state,
            }),
        }
    }

    // Timer callback: feed the tick into the job and decide whether to keep going
    pub fn record_progress(&self, project_id: &str, outcome: TickOutcome) -> ControlFlow<()> {
        match self.apply_tick(project_id, outcome) {
            Ok(flow) => flow,
            Err(err) => {
                error!("❌ Progress update for project {} failed: {}", project_id, err);
                ControlFlow::Break(())
            }
        }
    }

    fn apply_tick(&self, project_id: &str, outcome: TickOutcome) -> Result<ControlFlow<()>, ServiceError> {
        let project = self.find_project(project_id)?;
        if project.status != ProjectStatus::Processing {
            info!("⏹️ Project {} is no longer processing, stopping timer", project_id);
            return Ok(ControlFlow::Break(()));
        }

        let job = self.generations.record_tick(project_id, outcome)?;
        match job.status {
            GenerationStatus::Completed => {
                self.projects.set_status(project_id, ProjectStatus::Completed)?;
                Ok(ControlFlow::Break(()))
            }
            GenerationStatus::Failed => Ok(ControlFlow::Break(())),
            _ => Ok(ControlFlow::Continue(())),
        }
    }

    // Forward an image to the generation endpoint and fold the answer into the job
    pub async fn upload_image(
        &self,
        project_id: &str,
        filename: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<UploadResponse, ServiceError> {
        image_storage::validate_filename(filename)?;
        if content.is_empty() {
            return Err(ServiceError::BadRequest("Uploaded file is empty".to_string()));
        }

        self.generation_for(project_id)?;
        self.generations.begin_upload(project_id)?;
        // Timers stopped by an earlier failed upload pick up again
        self.resume_timers(project_id)?;

        let outcome = match self.uploader.upload(filename, content.clone(), content_type).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("❌ Error in file upload for project {}: {}", project_id, err);
                self.abandon_upload(project_id, &err.to_string())?;
                return Err(err.into());
            }
        };
        debug!("Upload response for project {}: {}", project_id, outcome.payload);

        let image_url = match self.images.save(project_id, filename, content, content_type) {
            Ok(url) => url,
            Err(err) => {
                self.abandon_upload(project_id, "could not store uploaded image")?;
                return Err(err);
            }
        };

        let generation = self
            .generations
            .finish_upload(project_id, image_url.clone(), outcome.model_url.clone())?;

        match generation.status {
            GenerationStatus::Completed => {
                self.projects.set_status(project_id, ProjectStatus::Completed)?;
            }
            GenerationStatus::Processing => self.resume_timers(project_id)?,
            _ => {}
        }

        Ok(UploadResponse {
            image_url,
            model_url: outcome.model_url,
            generation,
        })
    }

    // Fold a failed upload into the job. A job that falls back to completed
    // takes the project with it.
    fn abandon_upload(&self, project_id: &str, reason: &str) -> Result<ModelGeneration, ServiceError> {
        let job = self.generations.fail_upload(project_id, reason)?;
        if job.status == GenerationStatus::Completed {
            self.projects.set_status(project_id, ProjectStatus::Completed)?;
        }
        Ok(job)
    }

    pub fn request_export(&self, project_id: &str, format: &str) -> Result<(ExportFormat, Option<String>), ServiceError> {
        let format = export_service::find_format(format)?;
        let project = self.find_project(project_id)?;
        let generation = self.generations.ensure(&project)?;

        if !model_available(&project, &generation) {
            warn!("⚠️ Export of project {} requested before the model is ready", project_id);
            return Err(ServiceError::Conflict("The model is not available yet".to_string()));
        }

        info!("💾 Downloading {} format for project {}", format.name, project_id);
        Ok((format, generation.model_url))
    }

    // Create a team and make it the session's active team
    pub fn create_team(&self, session_id: &str, data: TeamData) -> Result<Team, ServiceError> {
        let team = self.teams.create_team(data)?;
        self.sessions.set_active_team(session_id, &team.id)?;
        Ok(team)
    }

    pub fn set_active_team(&self, session_id: &str, team_id: &str) -> Result<DashboardView, ServiceError> {
        if self.teams.get_team(team_id)?.is_none() {
            return Err(ServiceError::NotFound);
        }
        self.sessions.set_active_team(session_id, team_id)?;
        self.view(session_id)
    }

    pub fn set_team_panel(&self, session_id: &str, open: bool) -> Result<DashboardView, ServiceError> {
        let default_team = self.teams.first_team_id()?;
        self.sessions.set_team_panel(session_id, open, default_team)?;
        self.view(session_id)
    }
}

// The 3D view and export menu unlock once either source reports completion
pub fn model_available(project: &Project, generation: &ModelGeneration) -> bool {
    project.status == ProjectStatus::Completed || generation.model_available()
}

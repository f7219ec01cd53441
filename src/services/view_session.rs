// src/services/view_session.rs
use crate::models::{ModelGeneration, Project, ServiceError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Ephemeral UI state of one dashboard tab
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub selected_project_id: Option<String>,
    pub show_create_modal: bool,
    pub show_team_panel: bool,
    pub active_team_id: Option<String>,
}

// What the dashboard should render for a session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum DashboardView {
    List {
        projects: Vec<Project>,
        #[serde(flatten)]
        state: ViewState,
    },
    #[serde(rename_all = "camelCase")]
    Detail {
        project: Project,
        generation: ModelGeneration,
        model_available: bool,
        // Whether this session's progress timer is ticking for the project
        progress_running: bool,
        #[serde(flatten)]
        state: ViewState,
    },
}

#[derive(Clone, Default)]
pub struct ViewSessions {
    sessions: Arc<Mutex<HashMap<String, ViewState>>>,
}

impl ViewSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, session_id: &str) -> Result<ViewState, ServiceError> {
        let sessions = self.sessions.lock()?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    // Switch to the detail view; returns the previously selected project
    pub fn select_project(&self, session_id: &str, project_id: &str) -> Result<Option<String>, ServiceError> {
        self.update(session_id, |state| {
            state.show_create_modal = false;
            state.selected_project_id.replace(project_id.to_string())
        })
    }

    // Back to the list view; returns the project that was open
    pub fn back(&self, session_id: &str) -> Result<Option<String>, ServiceError> {
        self.update(session_id, |state| state.selected_project_id.take())
    }

    // Sessions whose detail view shows `project_id`
    pub fn viewing(&self, project_id: &str) -> Result<Vec<String>, ServiceError> {
        let sessions = self.sessions.lock()?;
        Ok(sessions
            .iter()
            .filter(|(_, state)| state.selected_project_id.as_deref() == Some(project_id))
            .map(|(id, _)| id.clone())
            .collect())
    }

    pub fn set_create_modal(&self, session_id: &str, open: bool) -> Result<ViewState, ServiceError> {
        self.update(session_id, |state| {
            state.show_create_modal = open;
            state.clone()
        })
    }

    // Opening the panel without an active team falls back to `default_team`
    pub fn set_team_panel(
        &self,
        session_id: &str,
        open: bool,
        default_team: Option<String>,
    ) -> Result<ViewState, ServiceError> {
        self.update(session_id, |state| {
            state.show_team_panel = open;
            if open && state.active_team_id.is_none() {
                state.active_team_id = default_team;
            }
            state.clone()
        })
    }

    pub fn set_active_team(&self, session_id: &str, team_id: &str) -> Result<ViewState, ServiceError> {
        self.update(session_id, |state| {
            state.active_team_id = Some(team_id.to_string());
            state.clone()
        })
    }

    fn update<F, R>(&self, session_id: &str, apply: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut ViewState) -> R,
    {
        let mut sessions = self.sessions.lock()?;
        let state = sessions.entry(session_id.to_string()).or_default();
        Ok(apply(state))
    }
}

// src/utils/project_storage.rs
use crate::models::{CreateProjectRequest, Project, ProjectStatus, ServiceError};
use crate::utils::seed_date;
use chrono::Utc;
use log::{debug, info};
use std::sync::{Arc, Mutex};

// Create/read access to projects. The in-memory store backs the service today;
// a persistent store can sit behind the same trait.
pub trait ProjectRepository: Send + Sync {
    fn create(&self, request: CreateProjectRequest) -> Result<Project, ServiceError>;
    fn list(&self) -> Result<Vec<Project>, ServiceError>;
    fn get(&self, id: &str) -> Result<Option<Project>, ServiceError>;
    fn set_status(&self, id: &str, status: ProjectStatus) -> Result<Project, ServiceError>;
}

#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    projects: Arc<Mutex<Vec<Project>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Store pre-filled with the two dashboard demo projects
    pub fn seeded() -> Self {
        let store = Self::new();
        if let Ok(mut projects) = store.projects.lock() {
            projects.extend(seed_projects());
        }
        store
    }
}

impl ProjectRepository for InMemoryProjectStore {
    fn create(&self, request: CreateProjectRequest) -> Result<Project, ServiceError> {
        let mut projects = self.projects.lock()?;

        // Ids follow the list length; nothing is ever deleted so they stay unique
        let project = Project {
            id: (projects.len() + 1).to_string(),
            name: request.name,
            description: request.description,
            created_at: Utc::now(),
            status: ProjectStatus::Processing,
            thumbnail_url: request.preview_images.into_iter().next(),
        };

        projects.push(project.clone());
        info!("✅ Stored project: {} ({})", project.id, project.name);

        Ok(project)
    }

    fn list(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.projects.lock()?.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Project>, ServiceError> {
        let projects = self.projects.lock()?;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    fn set_status(&self, id: &str, status: ProjectStatus) -> Result<Project, ServiceError> {
        let mut projects = self.projects.lock()?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ServiceError::NotFound)?;

        debug!("Project {} status {:?} -> {:?}", id, project.status, status);
        project.status = status;

        Ok(project.clone())
    }
}

fn seed_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            name: "Product Showcase".to_string(),
            description: "Generate 3D model for our new product line".to_string(),
            created_at: seed_date(2024, 3, 10),
            status: ProjectStatus::Completed,
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1581092160562-40aa08e78837?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
        },
        Project {
            id: "2".to_string(),
            name: "Architecture Visualization".to_string(),
            description: "Modern building exterior visualization".to_string(),
            created_at: seed_date(2024, 3, 12),
            status: ProjectStatus::Processing,
            thumbnail_url: Some(
                "https://images.unsplash.com/photo-1487958449943-2429e8be8625?auto=format&fit=crop&q=80"
                    .to_string(),
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, description: &str, previews: &[&str]) -> CreateProjectRequest {
        CreateProjectRequest {
            name: name.to_string(),
            description: description.to_string(),
            preview_images: previews.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn create_sets_processing_and_first_thumbnail() {
        let store = InMemoryProjectStore::new();
        let project = store
            .create(request("Chair", "Wooden chair", &["blob:a", "blob:b"]))
            .unwrap();

        assert_eq!(project.id, "1");
        assert_eq!(project.name, "Chair");
        assert_eq!(project.description, "Wooden chair");
        assert_eq!(project.status, ProjectStatus::Processing);
        assert_eq!(project.thumbnail_url.as_deref(), Some("blob:a"));
    }

    #[test]
    fn create_without_previews_has_no_thumbnail() {
        let store = InMemoryProjectStore::new();
        let project = store.create(request("", "", &[])).unwrap();

        assert_eq!(project.name, "");
        assert!(project.thumbnail_url.is_none());
    }

    #[test]
    fn ids_continue_after_seed() {
        let store = InMemoryProjectStore::seeded();
        let project = store.create(request("Lamp", "Desk lamp", &[])).unwrap();

        assert_eq!(project.id, "3");
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn set_status_updates_and_rejects_unknown() {
        let store = InMemoryProjectStore::seeded();
        let updated = store.set_status("2", ProjectStatus::Completed).unwrap();
        assert_eq!(updated.status, ProjectStatus::Completed);
        assert_eq!(store.get("2").unwrap().unwrap().status, ProjectStatus::Completed);

        assert_eq!(
            store.set_status("99", ProjectStatus::Draft),
            Err(ServiceError::NotFound)
        );
    }
}

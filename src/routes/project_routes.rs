// src/routes/project_routes.rs
use crate::models::{CreateProjectRequest, ServiceError};
use crate::services::export_service;
use crate::state::{model_available, AppState};
use crate::utils::get_session_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

// List all projects
#[get("/projects")]
async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let projects = state.projects.list()?;

    info!("📋 Found {} projects", projects.len());

    Ok(HttpResponse::Ok().json(projects))
}

// Create a project and open it in the caller's session
#[post("/projects")]
async fn create_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);

    info!("📝 Creating new project: {:?} with {} preview images", data.name, data.preview_images.len());

    let project = state.create_project(&session_id, data.into_inner())?;

    info!("✅ Project created successfully: {}", project.id);

    Ok(HttpResponse::Ok().json(project))
}

// Get a specific project by ID
#[get("/projects/{project_id}")]
async fn get_project(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let project = state.find_project(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(project))
}

// Current generation job of a project
#[get("/projects/{project_id}/generation")]
async fn get_generation(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let generation = state.generation_for(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(generation))
}

// Export formats and whether they can be used yet
#[get("/projects/{project_id}/exports")]
async fn list_exports(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let project = state.find_project(&path.into_inner())?;
    let generation = state.generations.ensure(&project)?;

    Ok(HttpResponse::Ok().json(json!({
        "available": model_available(&project, &generation),
        "formats": export_service::export_formats()
    })))
}

#[post("/projects/{project_id}/exports/{format}")]
async fn request_export(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (project_id, format) = path.into_inner();
    let (format, model_url) = state.request_export(&project_id, &format)?;

    Ok(HttpResponse::Ok().json(json!({
        "projectId": project_id,
        "format": format,
        "modelUrl": model_url
    })))
}

// Register all project routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_projects)
        .service(create_project)
        .service(get_project)
        .service(get_generation)
        .service(list_exports)
        .service(request_export);
}

// src/routes/file_routes.rs
use crate::models::ServiceError;
use crate::state::AppState;
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;

// Matches the dashboard's "PNG, JPG up to 10MB each"
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

// GET ROUTES
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().body("forma-service: projects, teams and 3D generation for the dashboard.\nStart with GET /projects.")
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "upload_endpoint": state.uploader.endpoint()
    }))
}

// Serve an uploaded source image back to the gallery
#[get("/projects/{project_id}/images/{filename}")]
async fn get_image(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (project_id, filename) = path.into_inner();

    match state.images.get(&project_id, &filename)? {
        Some(image) => Ok(HttpResponse::Ok()
            .content_type(image.content_type)
            .append_header((header::ETAG, format!("\"{}\"", image.checksum)))
            .body(image.content)),
        None => {
            error!("❌ Image not found: {}/{}", project_id, filename);
            Err(ServiceError::NotFound)
        }
    }
}

// POST ROUTES

// Upload a source image and forward it to the generation endpoint
#[post("/projects/{project_id}/images/{filename}")]
async fn upload_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let (project_id, filename) = path.into_inner();
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    info!("📷 Upload request for project: {} file: {} ({} bytes)", project_id, filename, body.len());

    let response = state
        .upload_image(&project_id, &filename, body.to_vec(), &content_type)
        .await?;

    info!("✅ Image stored at {}", response.image_url);

    Ok(HttpResponse::Ok().json(response))
}

// Register routes function for easy import
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
        .service(index)
        .service(health)
        .service(get_image)
        .service(upload_image);
}

// src/routes/session_routes.rs
use crate::models::ServiceError;
use crate::state::AppState;
use crate::utils::get_session_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::info;

// What the dashboard should render right now
#[get("/session")]
async fn current_view(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    Ok(HttpResponse::Ok().json(state.view(&session_id)?))
}

// Open a project's detail view
#[post("/session/select/{project_id}")]
async fn select_project(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    let project_id = path.into_inner();

    info!("🔄 Session {} opening project: {}", session_id, project_id);

    Ok(HttpResponse::Ok().json(state.open_project(&session_id, &project_id)?))
}

// Back to the project list
#[post("/session/back")]
async fn back(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    Ok(HttpResponse::Ok().json(state.close_project(&session_id)?))
}

#[post("/session/create-modal/{action}")]
async fn toggle_create_modal(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    let open = parse_toggle(&path.into_inner())?;

    state.sessions.set_create_modal(&session_id, open)?;

    Ok(HttpResponse::Ok().json(state.view(&session_id)?))
}

#[post("/session/team-panel/{action}")]
async fn toggle_team_panel(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    let open = parse_toggle(&path.into_inner())?;

    Ok(HttpResponse::Ok().json(state.set_team_panel(&session_id, open)?))
}

// Pick the team shown in the team panel
#[post("/session/team/{team_id}")]
async fn set_active_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);
    Ok(HttpResponse::Ok().json(state.set_active_team(&session_id, &path.into_inner())?))
}

fn parse_toggle(action: &str) -> Result<bool, ServiceError> {
    match action {
        "open" => Ok(true),
        "close" => Ok(false),
        other => Err(ServiceError::BadRequest(format!(
            "Unknown action '{}', expected 'open' or 'close'",
            other
        ))),
    }
}

// Register all session routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(current_view)
        .service(select_project)
        .service(back)
        .service(toggle_create_modal)
        .service(toggle_team_panel)
        .service(set_active_team);
}

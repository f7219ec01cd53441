// src/routes/team_routes.rs
use crate::models::{AddMemberRequest, ServiceError, TeamData};
use crate::state::AppState;
use crate::utils::get_session_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

// Create a new team
#[post("/teams")]
async fn create_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    team_data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let session_id = get_session_id_from_request(&req);

    info!("📝 Creating new team: {}", team_data.name);

    let team = state.create_team(&session_id, team_data.into_inner())?;

    info!("✅ Team created successfully: {}", team.id);

    Ok(HttpResponse::Ok().json(team))
}

// Teams sidebar
#[get("/teams")]
async fn list_teams(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let teams = state.teams.list_teams()?;

    info!("📋 Found {} teams", teams.len());

    Ok(HttpResponse::Ok().json(teams))
}

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("🔍 Fetching team: {}", team_id);

    match state.teams.get_team(&team_id)? {
        Some(team) => Ok(HttpResponse::Ok().json(team)),
        None => {
            error!("❌ Team not found: {}", team_id);
            Err(ServiceError::NotFound)
        }
    }
}

// Get team members with their directory entries
#[get("/teams/{team_id}/members")]
async fn get_team_members(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("📋 Fetching members for team: {}", team_id);

    let members = state.teams.members_with_users(&team_id)?;

    info!("✅ Found {} team members", members.len());

    Ok(HttpResponse::Ok().json(members))
}

// Add a user to a team
#[post("/teams/{team_id}/members")]
async fn add_team_member(
    state: web::Data<AppState>,
    path: web::Path<String>,
    data: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("👥 Adding user: {} to team: {}", data.user_id, team_id);

    let member = state.teams.add_member(&team_id, &data.user_id)?;

    info!("✅ User: {} added to team: {} with role: {:?}", member.user_id, team_id, member.role);

    Ok(HttpResponse::Ok().json(member))
}

// Users that can still be invited to the team
#[get("/teams/{team_id}/candidates")]
async fn search_candidates(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();
    let users = state.teams.search(&team_id, &query.q)?;

    info!("🔍 {} invite candidates for team: {} matching {:?}", users.len(), team_id, query.q);

    Ok(HttpResponse::Ok().json(users))
}

// User directory
#[get("/users")]
async fn list_users(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.teams.list_users())
}

// Get user by ID (for team member display)
#[get("/users/{user_id}")]
async fn get_user_by_id(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();

    match state.teams.get_user(&user_id) {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => {
            error!("❌ User not found: {}", user_id);
            Err(ServiceError::NotFound)
        }
    }
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(list_teams)
        .service(get_team)
        .service(get_team_members)
        .service(add_team_member)
        .service(search_candidates)
        .service(list_users)
        .service(get_user_by_id);
}

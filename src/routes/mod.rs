// src/routes/mod.rs
pub mod file_routes;
pub mod project_routes;
pub mod session_routes;
pub mod team_routes;

use actix_web::web;

// Register every route group
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(file_routes::init_routes)
        .configure(project_routes::init_routes)
        .configure(team_routes::init_routes)
        .configure(session_routes::init_routes);
}

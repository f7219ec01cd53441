//Third-party-dependencies
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use forma_service::utils::Session;
use forma_service::{routes, AppState, ServiceConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServiceConfig::from_env();
    let address = config.bind_address.clone();
    info!("Forwarding uploads to {}", config.upload_endpoint);

    let state = AppState::new(config).map_err(|e| {
        error!("❌ Failed to initialise service state: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    info!("Server started at {}", address);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Session)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::init_routes)
    })
        .bind(address)?
        .run()
        .await
}

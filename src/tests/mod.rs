// src/tests/mod.rs
mod project_flow_tests;
mod session_flow_tests;

use crate::config::{ProgressConfig, ServiceConfig};
use crate::state::AppState;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const SESSION: (&str, &str) = ("X-Session-Id", "tab-1");

// Seeded state with a fast timer, pointed at `upload_endpoint`
pub fn test_state(upload_endpoint: &str) -> web::Data<AppState> {
    test_state_with_progress(
        upload_endpoint,
        ProgressConfig {
            step: 25,
            interval: Duration::from_millis(5),
        },
    )
}

pub fn test_state_with_progress(upload_endpoint: &str, progress: ProgressConfig) -> web::Data<AppState> {
    let config = ServiceConfig {
        upload_endpoint: upload_endpoint.to_string(),
        upload_timeout: Duration::from_secs(5),
        progress,
        ..ServiceConfig::default()
    };
    web::Data::new(AppState::new(config).expect("state"))
}

// Build the service the same way main does
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(crate::utils::Session)
                .app_data($state.clone())
                .configure(crate::routes::init_routes),
        )
        .await
    };
}
pub(crate) use test_app;

// Local stand-in for the generation backend. It only answers multipart
// requests that carry a `file` field.
pub async fn spawn_upload_endpoint(status: u16, body: &'static str) -> String {
    spawn_scripted_upload_endpoint(vec![(status, body)]).await
}

// Like `spawn_upload_endpoint`, but answers the n-th upload with the n-th
// response. The last response repeats once the script runs out.
pub async fn spawn_scripted_upload_endpoint(responses: Vec<(u16, &'static str)>) -> String {
    let responses = Arc::new(responses);
    let calls = Arc::new(AtomicUsize::new(0));

    let server = HttpServer::new(move || {
        let responses = responses.clone();
        let calls = calls.clone();
        App::new().route(
            "/api/files",
            web::post().to(move |req: HttpRequest, payload: web::Bytes| {
                let responses = responses.clone();
                let calls = calls.clone();
                async move {
                    let content_type = req
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("");
                    let has_file_field = payload
                        .windows(b"name=\"file\"".len())
                        .any(|w| w == b"name=\"file\"");

                    if !content_type.starts_with("multipart/form-data") || !has_file_field {
                        return HttpResponse::BadRequest().body("expected multipart file field");
                    }

                    let call = calls.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = responses[call.min(responses.len() - 1)];

                    HttpResponse::build(StatusCode::from_u16(status).unwrap())
                        .content_type("application/json")
                        .body(body)
                }
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock endpoint");

    let address = server.addrs()[0];
    actix_rt::spawn(server.run());

    format!("http://{}/api/files", address)
}

// Endpoint nobody listens on
pub fn unreachable_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}/api/files", address)
}

// src/utils/session.rs
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;

pub const SESSION_HEADER: &str = "X-Session-Id";
pub const DEFAULT_SESSION: &str = "default";

lazy_static! {
    static ref SESSION_ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

// Which dashboard tab a request belongs to
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    pub session_id: String,
}

// Attaches a SessionContext to every request
pub struct Session;

impl<S, B> Transform<S, ServiceRequest> for Session
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddleware { service }))
    }
}

pub struct SessionMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session_id = session_id_from_header(
            req.headers()
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok()),
        );

        debug!("{} {} (session {})", req.method(), req.path(), session_id);
        req.extensions_mut().insert(SessionContext { session_id });

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

// Malformed or missing ids share the default session
pub fn session_id_from_header(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(id) if SESSION_ID_PATTERN.is_match(id) => id.to_string(),
        _ => DEFAULT_SESSION.to_string(),
    }
}

// Read the session id, falling back to the header when the middleware is absent
pub fn get_session_id_from_request(req: &HttpRequest) -> String {
    if let Some(context) = req.extensions().get::<SessionContext>() {
        return context.session_id.clone();
    }

    session_id_from_header(
        req.headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok()),
    )
}

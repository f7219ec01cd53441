// src/services/mod.rs
pub mod export_service;
pub mod generation_service;
pub mod progress_simulator;
pub mod upload_service;
pub mod view_session;

// src/services/export_service.rs
use crate::models::{ExportFormat, ServiceError};
use lazy_static::lazy_static;

lazy_static! {
    static ref EXPORT_FORMATS: Vec<ExportFormat> = vec![
        export_format("GLB", "Binary GL Transmission Format", "2.4 MB"),
        export_format("FBX", "Filmbox 3D Format", "3.1 MB"),
        export_format("OBJ", "Wavefront 3D Object Format", "1.8 MB"),
    ];
}

fn export_format(name: &str, description: &str, size: &str) -> ExportFormat {
    ExportFormat {
        name: name.to_string(),
        description: description.to_string(),
        size: size.to_string(),
    }
}

pub fn export_formats() -> Vec<ExportFormat> {
    EXPORT_FORMATS.clone()
}

// Case-insensitive lookup, e.g. "glb" or "GLB"
pub fn find_format(name: &str) -> Result<ExportFormat, ServiceError> {
    EXPORT_FORMATS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| ServiceError::BadRequest(format!("Unsupported export format: {}", name)))
}

// src/utils/mod.rs
use chrono::{DateTime, TimeZone, Utc};

pub mod image_storage;
pub mod project_storage;
pub mod session;
pub mod team_storage;

pub use session::{get_session_id_from_request, Session, SessionContext};

// Midnight UTC on the given day, used for the demo seed records
pub fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

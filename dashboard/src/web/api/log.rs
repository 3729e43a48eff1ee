use crate::utils::logging::{LogEntry, Logger};
use crate::web::utils::api_error::ApiError;
use actix_web::{get, web, HttpResponse, Scope};
use chrono::{DateTime, Local};

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
}

#[get("/system_log")]
async fn system_log() -> HttpResponse {
    HttpResponse::Ok().json(render_entries(Logger::get_system_logs().await))
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let since = DateTime::parse_from_rfc3339(&since)
        .map_err(|_| ApiError::validation("Invalid datetime format, expected RFC 3339"))?
        .with_timezone(&Local);
    Ok(HttpResponse::Ok().json(render_entries(Logger::get_system_logs_since(since).await)))
}

fn render_entries(entries: Vec<LogEntry>) -> Vec<String> {
    entries.iter().map(LogEntry::to_plain_string).collect()
}

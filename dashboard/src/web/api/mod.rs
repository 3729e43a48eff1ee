pub mod config;
pub mod detect;
pub mod detection;
pub mod log;
pub mod metrics;

use actix_web::{web, Scope};

pub fn initialize() -> Scope {
    web::scope("/api")
        .service(config::initialize())
        .service(detect::initialize())
        .service(detection::initialize())
        .service(log::initialize())
        .service(metrics::initialize())
}

use crate::storage::{AppStorage, Storage};
use actix_web::{get, post, web, HttpResponse, Responder, Scope};
use common::detection::system_metrics::NewSystemMetrics;

pub fn initialize() -> Scope {
    web::scope("/metrics")
        .service(get_metrics)
        .service(update_metrics)
}

#[get("")]
async fn get_metrics(storage: web::Data<AppStorage>) -> impl Responder {
    HttpResponse::Ok().json(storage.get_system_metrics().await)
}

#[post("/update")]
async fn update_metrics(storage: web::Data<AppStorage>, metrics: web::Json<NewSystemMetrics>) -> impl Responder {
    HttpResponse::Ok().json(storage.update_system_metrics(metrics.into_inner()).await)
}

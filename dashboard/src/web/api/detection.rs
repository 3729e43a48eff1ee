use crate::storage::{AppStorage, Storage};
use crate::web::utils::api_error::ApiError;
use actix_web::{get, web, HttpResponse, Responder, Scope};
use uuid::Uuid;

const NOT_FOUND_MESSAGE: &str = "Detection result not found";

pub fn initialize() -> Scope {
    web::scope("/detections")
        .service(get_detection_results)
        .service(get_detection_result)
}

#[get("")]
async fn get_detection_results(storage: web::Data<AppStorage>) -> impl Responder {
    HttpResponse::Ok().json(storage.get_all_detection_results().await)
}

#[get("/{id}")]
async fn get_detection_result(storage: web::Data<AppStorage>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    //Anything that is not a UUID cannot be stored, so it is simply unknown.
    let id = Uuid::parse_str(&id.into_inner()).map_err(|_| ApiError::not_found(NOT_FOUND_MESSAGE))?;
    match storage.get_detection_result(&id).await {
        Some(result) => Ok(HttpResponse::Ok().json(result)),
        None => Err(ApiError::not_found(NOT_FOUND_MESSAGE)),
    }
}

use crate::utils::config::Config;
use crate::utils::logging::*;
use actix_web::{get, post, web, HttpResponse, Responder, Scope};

pub fn initialize() -> Scope {
    web::scope("/config")
        .service(get_config)
        .service(update_config)
}

#[get("/get")]
async fn get_config() -> impl Responder {
    web::Json(Config::now().await)
}

#[post("/update")]
async fn update_config(config: web::Json<Config>) -> impl Responder {
    let config = config.into_inner();
    if config.upload_folder != Config::now().await.upload_folder {
        return HttpResponse::BadRequest().body("Upload folder cannot change while the server is running.");
    }
    if Config::validate(&config) {
        Config::update(config).await;
        logging_notice!(SystemEntry::ConfigUpdated);
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::BadRequest().body("Invalid configuration.")
    }
}

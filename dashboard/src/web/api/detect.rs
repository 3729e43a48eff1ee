use crate::detector::Detector;
use crate::server::post_processor::PostProcessor;
use crate::server::server::UPLOAD_ROUTE;
use crate::storage::{AppStorage, Storage};
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::utils::api_error::ApiError;
use actix_multipart::{Field, Multipart};
use actix_web::{post, web, HttpResponse, Scope};
use common::detection::detection_result::NewDetectionResult;
use futures::{StreamExt, TryStreamExt};
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const IMAGE_FIELD: &str = "image";
const ACCEPTED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

const NO_FILE: &str = "No image file provided";
const NOT_AN_IMAGE: &str = "Only image files are allowed";
const FILE_TOO_LARGE: &str = "File too large";
const INVALID_PAYLOAD: &str = "Invalid payload";
const PROCESSING_FAILED: &str = "Failed to process image";

struct Upload {
    original_name: String,
    stored_name: String,
    path: PathBuf,
}

pub fn initialize() -> Scope {
    web::scope("/detect")
        .service(detect)
}

#[post("")]
async fn detect(
    storage: web::Data<AppStorage>,
    detector: web::Data<Detector>,
    post_processor: web::Data<PostProcessor>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let config = Config::now().await;
    let upload = receive_image(&mut payload, post_processor.output_folder(), config.upload_size_limit).await?;

    let start = Instant::now();
    let detections = detector.detect(&upload.path).await;
    let processing_time = start.elapsed().as_secs_f64();

    let original_url = upload_url(&upload.stored_name);
    let processed_url = match post_processor.render(upload.path.clone(), detections.clone()).await {
        Ok(file_name) => upload_url(&file_name),
        Err(entry) => {
            logging_entry!(entry);
            original_url.clone()
        }
    };

    let total_pedestrians = detections.len() as u32;
    let result = storage.create_detection_result(NewDetectionResult {
        filename: upload.original_name,
        original_url,
        processed_url: Some(processed_url),
        detections,
        processing_time,
        total_pedestrians,
    }).await;
    Ok(HttpResponse::Ok().json(result))
}

fn upload_url(file_name: &str) -> String {
    format!("{}/{}", UPLOAD_ROUTE, file_name)
}

/// The extension and the declared MIME type must both name an accepted format.
pub fn is_accepted_image(file_name: &str, mime_type: &str) -> bool {
    let extension = Path::new(file_name).extension()
        .and_then(|os_str| os_str.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .unwrap_or_default();
    let mime_type = mime_type.to_ascii_lowercase();
    ACCEPTED_TYPES.contains(&extension.as_str())
        && ACCEPTED_TYPES.iter().any(|accepted| mime_type.contains(accepted))
}

async fn receive_image(payload: &mut Multipart, upload_folder: &Path, size_limit: usize) -> Result<Upload, ApiError> {
    let mut upload = None;
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                logging_warning!(NetworkEntry::InvalidPayload(err.to_string()));
                return Err(ApiError::validation(INVALID_PAYLOAD));
            }
        };
        let file_name = field.content_disposition()
            .and_then(|content_disposition| content_disposition.get_filename())
            .map(|file_name| file_name.to_string());
        let file_name = match file_name {
            Some(file_name) if upload.is_none() && field.name() == Some(IMAGE_FIELD) => file_name,
            _ => {
                drain_field(&mut field).await?;
                continue;
            }
        };
        let sanitized_file_name = sanitize(&file_name);
        let mime_type = field.content_type().map(|mime| mime.to_string()).unwrap_or_default();
        if sanitized_file_name.is_empty() || !is_accepted_image(&sanitized_file_name, &mime_type) {
            logging_notice!(NetworkEntry::UploadRejected(file_name, NOT_AN_IMAGE.to_string()), mime_type);
            return Err(ApiError::validation(NOT_AN_IMAGE));
        }
        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitized_file_name);
        let path = upload_folder.join(&stored_name);
        if let Err(err) = create_file(&path, &mut field, size_limit).await {
            remove_partial_file(&path).await;
            if let ApiError::Validation(reason) = &err {
                logging_notice!(NetworkEntry::UploadRejected(file_name, reason.clone()));
            }
            return Err(err);
        }
        upload = Some(Upload {
            original_name: file_name,
            stored_name,
            path,
        });
    }
    upload.ok_or_else(|| ApiError::validation(NO_FILE))
}

async fn drain_field(field: &mut Field) -> Result<(), ApiError> {
    while let Some(chunk) = field.next().await {
        if let Err(err) = chunk {
            logging_warning!(NetworkEntry::InvalidPayload(err.to_string()));
            return Err(ApiError::validation(INVALID_PAYLOAD));
        }
    }
    Ok(())
}

async fn create_file(file_path: &Path, field: &mut Field, size_limit: usize) -> Result<(), ApiError> {
    let mut file = match File::create(file_path).await {
        Ok(file) => file,
        Err(err) => {
            logging_error!(IOEntry::CreateFileError(file_path.display(), err));
            return Err(ApiError::internal(PROCESSING_FAILED));
        }
    };
    let mut written = 0;
    while let Some(chunk) = field.next().await {
        let data = match chunk {
            Ok(data) => data,
            Err(err) => {
                logging_warning!(NetworkEntry::InvalidPayload(err.to_string()));
                return Err(ApiError::validation(INVALID_PAYLOAD));
            }
        };
        written += data.len();
        if written > size_limit {
            return Err(ApiError::validation(FILE_TOO_LARGE));
        }
        if let Err(err) = file.write_all(&data).await {
            logging_error!(IOEntry::WriteFileError(file_path.display(), err));
            return Err(ApiError::internal(PROCESSING_FAILED));
        }
    }
    if let Err(err) = file.flush().await {
        logging_error!(IOEntry::WriteFileError(file_path.display(), err));
        return Err(ApiError::internal(PROCESSING_FAILED));
    }
    Ok(())
}

async fn remove_partial_file(file_path: &Path) {
    if let Err(err) = fs::remove_file(file_path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            logging_warning!(IOEntry::DeleteFileError(file_path.display(), err));
        }
    }
}

use crate::detector::Detector;
use crate::server::post_processor::PostProcessor;
use crate::storage::AppStorage;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub const UPLOAD_ROUTE: &str = "/uploads";

pub struct Server;

impl Server {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = Config::now().await;
        Self::initialize(&config).await;
        let storage = web::Data::new(AppStorage::new());
        let detector = web::Data::new(Detector::from_config(&config));
        let post_processor = web::Data::new(PostProcessor::from_config(&config).await);
        let http_server = loop {
            let config = Config::now().await;
            let storage = storage.clone();
            let detector = detector.clone();
            let post_processor = post_processor.clone();
            let upload_folder = config.upload_folder.clone();
            let http_server = HttpServer::new(move || {
                let cors = Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600);
                App::new()
                    .wrap(cors)
                    .app_data(storage.clone())
                    .app_data(detector.clone())
                    .app_data(post_processor.clone())
                    .service(api::initialize())
                    .service(Files::new(UPLOAD_ROUTE, &upload_folder))
            })
            .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        let config = Config::now().await;
        if config.cleanup_on_exit {
            Self::cleanup(&config).await;
        }
        logging_information!(SystemEntry::TerminateComplete);
    }

    async fn initialize(config: &Config) {
        let path = PathBuf::from(&config.upload_folder);
        if let Err(err) = fs::create_dir_all(&path).await {
            logging_critical!(IOEntry::CreateDirectoryError(path.display(), err));
        }
    }

    async fn cleanup(config: &Config) {
        logging_information!(SystemEntry::Cleaning);
        let path = PathBuf::from(&config.upload_folder);
        if let Err(err) = fs::remove_dir_all(&path).await {
            logging_error!(IOEntry::DeleteDirectoryError(path.display(), err));
        }
        logging_information!(SystemEntry::CleanComplete);
    }
}

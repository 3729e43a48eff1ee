use crate::utils::logging::*;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use tokio::sync::RwLock;

const CONFIG_PATH: &str = "./dashboard.toml";

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub http_server_bind_port: u16, //port
    pub bind_retry_duration: u64, //seconds
    pub upload_folder: String, //path
    pub upload_size_limit: usize, //bytes
    pub detection_delay: [u64; 2], //milliseconds range
    pub font_path: String, //path
    pub font_size: f32, //pixels
    pub border_width: u32, //pixels
    pub border_color: [u8; 3], //RGB
    pub label_color: [u8; 3], //RGB
    pub text_color: [u8; 3], //RGB
    pub cleanup_on_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_server_bind_port: 5000,
            bind_retry_duration: 5,
            upload_folder: "uploads".to_string(),
            upload_size_limit: 10 * 1024 * 1024,
            detection_delay: [200, 500],
            font_path: "fonts/DejaVuSans.ttf".to_string(),
            font_size: 12.0,
            border_width: 2,
            border_color: [54, 211, 153],
            label_color: [54, 211, 153],
            text_color: [15, 19, 26],
            cleanup_on_exit: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        //A broken configuration file must stop the program, a missing one falls back to defaults.
        match fs::read_to_string(CONFIG_PATH) {
            Ok(toml_string) => {
                match Self::from_toml_str(&toml_string) {
                    Ok(config) => {
                        if !Self::validate(&config) {
                            logging_console!(emergency_entry!(SystemEntry::InvalidConfig));
                            panic!("Invalid configuration file");
                        }
                        config
                    }
                    Err(err) => {
                        logging_console!(emergency_entry!(SystemEntry::ConfigParseError(err.to_string())));
                        panic!("Unable to parse configuration file");
                    }
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                logging_console!(warning_entry!(SystemEntry::ConfigNotFound));
                Self::default()
            }
            Err(err) => {
                logging_console!(emergency_entry!(SystemEntry::ConfigParseError(err.to_string())));
                panic!("Unable to read configuration file");
            }
        }
    }

    pub fn from_toml_str(toml_string: &str) -> Result<Config, toml::de::Error> {
        toml::from_str::<ConfigTable>(toml_string).map(|config_table| config_table.config)
    }

    pub async fn now() -> Config {
        CONFIG.read().await.clone()
    }

    pub async fn update(config: Config) {
        *CONFIG.write().await = config
    }

    pub fn validate(config: &Config) -> bool {
        Config::validate_second(config.bind_retry_duration)
            && Config::validate_folder(&config.upload_folder)
            && Config::validate_size_limit(config.upload_size_limit)
            && Config::validate_delay_range(config.detection_delay)
            && Config::validate_font_size(config.font_size)
            && Config::validate_border_width(config.border_width)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_folder(folder: &str) -> bool {
        !folder.trim().is_empty()
    }

    fn validate_size_limit(limit: usize) -> bool {
        limit > 0_usize
    }

    fn validate_delay_range(range: [u64; 2]) -> bool {
        range[1] >= range[0] && range[1] <= 60000
    }

    fn validate_border_width(width: u32) -> bool {
        width > 0_u32
    }

    fn validate_font_size(size: f32) -> bool {
        size > 0_f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_configuration_parses_and_validates() {
        let config = Config::from_toml_str(include_str!("../../dashboard.toml")).unwrap();
        assert!(Config::validate(&config));
        assert_eq!(config.upload_size_limit, 10 * 1024 * 1024);
        assert_eq!(config.detection_delay, [200, 500]);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(Config::validate(&Config::default()));
    }

    #[test]
    fn rejects_inverted_delay_range_and_zero_border() {
        let mut config = Config::default();
        config.detection_delay = [500, 200];
        assert!(!Config::validate(&config));
        let mut config = Config::default();
        config.border_width = 0;
        assert!(!Config::validate(&config));
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        assert!(Config::from_toml_str("http_server_bind_port = 1").is_err());
    }
}

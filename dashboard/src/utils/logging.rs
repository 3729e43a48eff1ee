pub use crate::{logging_alert, logging_console, logging_critical, logging_debug, logging_emergency, logging_entry, logging_error, logging_information, logging_notice, logging_warning};
pub use common::utils::log_entry::detection::DetectionEntry;
pub use common::utils::log_entry::io::IOEntry;
pub use common::utils::log_entry::network::NetworkEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::logging::*;
pub use common::{alert_entry, critical_entry, debug_entry, emergency_entry, error_entry, information_entry, notice_entry, warning_entry};

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::new());
}

pub struct Logger {
    system_log: Vec<LogEntry>,
}

impl Logger {
    fn new() -> Self {
        let log_entry = LogEntry::new(LogLevel::Information, "Logger", "Online now", "");
        Self {
            system_log: vec![log_entry],
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Logger> {
        LOGGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Logger> {
        LOGGER.write().await
    }

    pub async fn add_system_log<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) {
        let log_entry = LogEntry::new(level, position, message, debug_info);
        Self::add_system_log_entry(log_entry).await;
    }

    pub async fn add_system_log_entry(log_entry: LogEntry) {
        Self::logging_console(log_entry.clone());
        let mut logger = Self::instance_mut().await;
        logger.system_log.push(log_entry);
    }

    pub fn logging_console(log_entry: LogEntry) {
        println!("{}", log_entry.to_colored_string());
    }

    pub async fn get_system_logs() -> Vec<LogEntry> {
        Self::instance().await.system_log.clone()
    }

    pub async fn get_system_logs_since(time: DateTime<Local>) -> Vec<LogEntry> {
        let logger = Self::instance().await;
        logger.system_log.iter().filter(|entry| entry.timestamp > time).cloned().collect()
    }
}

#[macro_export]
macro_rules! logging_debug {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Debug, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_information {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Information, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_notice {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_warning {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_error {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Error, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_critical {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_alert {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Alert, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_emergency {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log($crate::utils::logging::LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_entry {
    ($entry:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($entry).await
    };
}

#[macro_export]
macro_rules! logging_console {
    ($entry:expr) => {
        $crate::utils::logging::Logger::logging_console($entry)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn since_filter_returns_only_newer_entries() {
        let before = Local::now();
        logging_notice!("Logger test marker");
        let logs = Logger::get_system_logs_since(before).await;
        assert!(logs.iter().any(|entry| entry.message == "Logger test marker"));
        assert!(logs.iter().all(|entry| entry.timestamp > before));
    }
}

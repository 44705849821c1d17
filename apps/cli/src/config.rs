use std::path::PathBuf;

use borsa_go_core::constants::EXPORT_FILE_NAME;

/// Log output format selected with `BORSA_GO_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub db_path: String,
    pub export_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_path =
            std::env::var("BORSA_GO_DB_PATH").unwrap_or_else(|_| "./db/borsa-go.db".into());
        let export_path = std::env::var("BORSA_GO_EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(EXPORT_FILE_NAME));
        let log_format = match std::env::var("BORSA_GO_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            db_path,
            export_path,
            log_format,
        }
    }
}

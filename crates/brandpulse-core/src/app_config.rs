use std::net::SocketAddr;
use std::path::PathBuf;

use crate::months::MonthName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub brands_path: PathBuf,
    /// Base URL of the sheet-export service the server pulls rows from.
    pub sheets_base_url: String,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    /// Cron expression for the scheduled full refresh.
    pub refresh_cron: String,
    /// Boundaries of the "all months" span (inclusive), applied to the
    /// current year when the sentinel selection is active.
    pub range_start_month: MonthName,
    pub range_end_month: MonthName,
}

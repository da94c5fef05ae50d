use crate::app_config::{AppConfig, Environment};
use crate::error::ConfigError;
use crate::months::MonthName;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which keeps it usable in tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_month = |var: &str, default: &str| -> Result<MonthName, ConfigError> {
        let raw = or_default(var, default);
        let index = raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        MonthName::from_index(index).ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("month index {index} out of range 1-12"),
        })
    };

    let sheets_base_url = require("BRANDPULSE_SHEETS_BASE_URL")?;

    let env = parse_environment(&or_default("BRANDPULSE_ENV", "development"));

    let bind_addr = parse_addr("BRANDPULSE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BRANDPULSE_LOG_LEVEL", "info");
    let brands_path = PathBuf::from(or_default("BRANDPULSE_BRANDS_PATH", "./config/brands.yaml"));

    let fetch_timeout_secs = parse_u64("BRANDPULSE_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_user_agent = or_default(
        "BRANDPULSE_FETCH_USER_AGENT",
        "brandpulse/0.1 (social-analytics)",
    );
    let refresh_cron = or_default("BRANDPULSE_REFRESH_CRON", "0 0 * * * *");

    let range_start_month = parse_month("BRANDPULSE_RANGE_START_MONTH", "2")?;
    let range_end_month = parse_month("BRANDPULSE_RANGE_END_MONTH", "5")?;

    if range_end_month.index() < range_start_month.index() {
        return Err(ConfigError::Validation(format!(
            "all-months span is inverted: {range_start_month} is after {range_end_month}"
        )));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        brands_path,
        sheets_base_url,
        fetch_timeout_secs,
        fetch_user_agent,
        refresh_cron,
        range_start_month,
        range_end_month,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

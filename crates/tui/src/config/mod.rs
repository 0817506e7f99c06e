use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

/// Which backend endpoint account-to-account transfers are posted to.
///
/// Bill and UPI payments always use the extended endpoint: the legacy body
/// has no room for their fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferRoute {
    /// `POST /api/transaction`
    #[default]
    Extended,
    /// `POST /transaction/pay`
    Legacy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Applies to every request; a timeout is reported as a network failure.
    pub timeout_secs: u64,
    pub session_path: String,
    pub log_file: String,
    pub log_level: String,
    /// Look the recipient up before a transfer to others.
    pub resolve_recipients: bool,
    pub transfer_endpoint: TransferRoute,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
            session_path: "config/session.json".to_string(),
            log_file: "mba_tui.log".to_string(),
            log_level: "info".to_string(),
            resolve_recipients: true,
            transfer_endpoint: TransferRoute::Extended,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mba_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override request timeout, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Override where the session is stored.
    #[arg(long)]
    session_path: Option<String>,
    /// Override the log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MBA_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

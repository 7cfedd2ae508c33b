use std::path::Path;

use secrecy::ExposeSecret;

use crate::config::ResolvedConfig;

pub fn config_output(config_path: &Path, config: &ResolvedConfig) -> serde_json::Value {
    serde_json::json!({
        "config_file": config_path.display().to_string(),
        "api": {
            "base_url": config.base_url,
            "application_id": config.application_id,
            "rest_api_key_set": !config.rest_api_key.expose_secret().is_empty(),
        },
        "session_file": config.session_file.display().to_string(),
        "reports": {
            "timezone": config.reports.timezone.as_deref().unwrap_or("local"),
            "page_size": config.reports.page_size,
        },
        "display": {
            "currency_symbol": config.display.currency_symbol,
            "currency_decimals": config.display.currency_decimals,
            "currency_grouping": config.display.currency_grouping,
        }
    })
}

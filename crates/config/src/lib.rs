use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "orgjoin.toml",
    "config/orgjoin.toml",
    "crates/config/orgjoin.toml",
    "../orgjoin.toml",
    "../config/orgjoin.toml",
    "../crates/config/orgjoin.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub routes: RouteConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Where the platform API lives and how requests against it are issued.
///
/// ```
/// use orgjoin_config::ApiConfig;
///
/// let api = ApiConfig::default();
/// assert_eq!(api.base_url, "http://localhost:8080/platform");
/// assert_eq!(api.request_timeout_seconds, 30);
/// assert!(api.access_token.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:8080/platform".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            request_timeout_seconds: Self::default_request_timeout(),
            access_token: None,
        }
    }
}

/// Application paths the join flow navigates to or links at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub post_join_path: String,
    pub post_decline_path: String,
    pub sign_in_path: String,
    pub join_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            post_join_path: "/".to_string(),
            post_decline_path: "/".to_string(),
            sign_in_path: "/".to_string(),
            join_path: "/join".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "UiConfig::default_product_name")]
    pub product_name: String,
}

impl UiConfig {
    fn default_product_name() -> String {
        "Supabase".to_string()
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            product_name: Self::default_product_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "TelemetryConfig::default_log_filter")]
    pub log_filter: String,
}

impl TelemetryConfig {
    fn default_log_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: Self::default_log_filter(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use orgjoin_config::load;
///
/// std::env::remove_var("ORGJOIN_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let timeout = i64::try_from(defaults.api.request_timeout_seconds).unwrap_or(i64::MAX);

    let builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())
        .and_then(|b| b.set_default("api.request_timeout_seconds", timeout))
        .and_then(|b| b.set_default("routes.post_join_path", defaults.routes.post_join_path.clone()))
        .and_then(|b| {
            b.set_default(
                "routes.post_decline_path",
                defaults.routes.post_decline_path.clone(),
            )
        })
        .and_then(|b| b.set_default("routes.sign_in_path", defaults.routes.sign_in_path.clone()))
        .and_then(|b| b.set_default("routes.join_path", defaults.routes.join_path.clone()))
        .and_then(|b| b.set_default("ui.product_name", defaults.ui.product_name.clone()))
        .and_then(|b| b.set_default("telemetry.log_filter", defaults.telemetry.log_filter.clone()))
        .context("unable to register configuration defaults")?;

    let environment_overrides = config::Environment::with_prefix("ORGJOIN").separator("__");

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ORGJOIN_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ORGJOIN_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.api.access_token.as_deref().is_some_and(str::is_empty) {
        config.api.access_token = None;
    }

    debug!(
        base_url = %config.api.base_url,
        has_access_token = config.api.access_token.is_some(),
        "loaded orgjoin configuration"
    );
    Ok(config)
}

use std::sync::Arc;

use anyhow::{Context, Result};
use orgjoin_config::AppConfig;
use orgjoin_invites::{
    Collaborators, HttpClient, InviteResolutionController, Navigator, Notifier, ReqwestHttpClient,
    SessionProvider, StaticSession,
};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use orgjoin_config::TelemetryConfig;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Filter from `RUST_LOG` when set, otherwise from configuration.
    pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|error| {
                anyhow::anyhow!("invalid log filter {:?}: {error}", config.log_filter)
            }),
        }
    }

    pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter(config)?)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Long-lived pieces shared by every join page a host mounts.
#[derive(Clone)]
pub struct JoinServices {
    pub config: AppConfig,
    pub http: Arc<dyn HttpClient>,
    pub session: Arc<dyn SessionProvider>,
}

impl JoinServices {
    pub fn initialise(config: &AppConfig) -> Result<Self> {
        let http = ReqwestHttpClient::new(&config.api).context("failed to build http client")?;
        let services = Self::with_http(config, Arc::new(http));

        info!(
            base_url = %config.api.base_url,
            signed_in = services.session.access_token().is_some(),
            "join services ready"
        );
        Ok(services)
    }

    pub fn with_http(config: &AppConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config: config.clone(),
            http,
            session: Arc::new(StaticSession::new(config.api.access_token.clone())),
        }
    }

    /// A fresh controller for one mounted join page.
    pub fn controller(
        &self,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<InviteResolutionController> {
        InviteResolutionController::new(
            &self.config,
            Collaborators {
                http: self.http.clone(),
                notifier,
                navigator,
                session: self.session.clone(),
            },
        )
        .context("failed to build invite controller")
    }
}

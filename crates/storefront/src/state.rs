use crate::{
    config::Config,
    di::{DependenciesInject, DependenciesInjectDeps},
    payment::StripeConfig,
};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{ConnectionPool, JwtConfig},
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

/// The storefront origin, used as the redirect base when a checkout request
/// carries no `Origin` header.
#[derive(Debug, Clone)]
pub struct ClientUrl(pub String);

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: DynJwtService,
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
    pub client_url: String,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("client_url", &self.client_url)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires Postgres and Stripe and starts the process metrics collector.
    pub fn new(pool: ConnectionPool, config: &Config) -> Self {
        let deps = DependenciesInjectDeps::postgres(
            pool,
            StripeConfig {
                secret_key: config.stripe_secret_key.clone(),
                currency: config.stripe_currency.clone(),
                api_base: config.stripe_api_base.clone(),
            },
            &config.stripe_webhook_secret,
        );

        let state = Self::from_deps(deps, &config.jwt_secret, &config.client_url);

        tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

        state
    }

    pub fn from_deps(deps: DependenciesInjectDeps, jwt_secret: &str, client_url: &str) -> Self {
        let jwt_config = Arc::new(JwtConfig::new(jwt_secret)) as DynJwtService;
        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let di_container = DependenciesInject::new(deps, &mut registry);

        system_metrics.register(&mut registry);

        Self {
            jwt_config,
            di_container,
            registry: Arc::new(Mutex::new(registry)),
            system_metrics,
            client_url: client_url.trim_end_matches('/').to_string(),
        }
    }
}

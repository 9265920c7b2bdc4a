use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
const DEFAULT_OTEL_ENDPOINT: &str = "http://otel-collector:4317";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_currency: String,
    pub stripe_api_base: String,
    pub client_url: String,
    pub otel_endpoint: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("run_migrations", &self.run_migrations)
            .field("port", &self.port)
            .field("db_max_conn", &self.db_max_conn)
            .field("db_min_conn", &self.db_min_conn)
            .field("stripe_currency", &self.stripe_currency)
            .field("stripe_api_base", &self.stripe_api_base)
            .field("client_url", &self.client_url)
            .field("otel_endpoint", &self.otel_endpoint)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, so it can be built from
    /// something other than the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("Missing environment variable: {key}"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let run_migrations_str = required("RUN_MIGRATIONS")?;
        let port_str = required("PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{other}'"
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn = parse_or(&lookup, "DB_MAX_CONNECTION", 5)?;
        let db_min_conn = parse_or(&lookup, "DB_MIN_CONNECTION", 1)?;

        let stripe_secret_key = required("STRIPE_SECRET_KEY")?;
        let stripe_webhook_secret = required("STRIPE_WEBHOOK_SECRET")?;

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            stripe_secret_key,
            stripe_webhook_secret,
            stripe_currency: or_default("STRIPE_CURRENCY", "usd"),
            stripe_api_base: or_default("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            client_url: or_default("CLIENT_URL", DEFAULT_CLIENT_URL),
            otel_endpoint: or_default("OTEL_ENDPOINT", DEFAULT_OTEL_ENDPOINT),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid integer, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use testresult::TestResult;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/shop"),
        ("JWT_SECRET", "secret"),
        ("RUN_MIGRATIONS", "true"),
        ("PORT", "4000"),
        ("STRIPE_SECRET_KEY", "sk_test"),
        ("STRIPE_WEBHOOK_SECRET", "whsec_test"),
    ];

    #[test]
    fn optional_values_fall_back_to_defaults() -> TestResult {
        let config = Config::from_lookup(env(REQUIRED))?;

        assert_eq!(config.port, 4000);
        assert!(config.run_migrations);
        assert_eq!((config.db_min_conn, config.db_max_conn), (1, 5));
        assert_eq!(config.stripe_currency, "usd");
        assert_eq!(config.stripe_api_base, "https://api.stripe.com");
        assert_eq!(config.client_url, "http://localhost:5173");
        assert_eq!(config.otel_endpoint, "http://otel-collector:4317");
        Ok(())
    }

    #[test]
    fn missing_stripe_key_is_reported_by_name() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "STRIPE_SECRET_KEY")
            .collect();

        let err = Config::from_lookup(env(&pairs)).err().map(|e| e.to_string());

        assert_eq!(
            err.as_deref(),
            Some("Missing environment variable: STRIPE_SECRET_KEY")
        );
    }

    #[test]
    fn migration_flag_must_be_a_boolean() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RUN_MIGRATIONS", "yes"));

        assert!(Config::from_lookup(env(&pairs)).is_err());
    }
}

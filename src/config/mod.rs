use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub stripe: StripeConfig,
    pub environment: Environment,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub db_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: Secret<String>,
    pub api_base_url: String,
    /// Where the hosted checkout sends the buyer after completing payment.
    pub success_url: String,
    /// Where the hosted checkout sends the buyer on cancel.
    pub cancel_url: String,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "dev".to_string())
            .to_lowercase()
            .as_str()
        {
            "prod" | "production" => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;

        let host = env::var("EVENTLY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("EVENTLY_PORT")
            .unwrap_or_else(|_| "3005".to_string())
            .parse()?;

        let db_url = get_env("EVENTLY_DATABASE_URL", Some("mongodb://localhost:27017"), is_prod)?;
        let db_name = env::var("EVENTLY_DATABASE_NAME").unwrap_or_else(|_| "evently_db".to_string());

        let origin =
            env::var("EVENTLY_PUBLIC_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let stripe = StripeConfig {
            secret_key: Secret::new(get_env("STRIPE_SECRET_KEY", Some(""), is_prod)?),
            api_base_url: env::var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),
            success_url: format!("{}/profile", origin),
            cancel_url: format!("{}/", origin),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                db_name,
            },
            stripe,
            environment,
            service_name: "evently-service".to_string(),
        })
    }
}

/// Required in production, defaulted in dev.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(anyhow::anyhow!("{} is required in production but not set", key))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(anyhow::anyhow!("{} is required but not set", key))
            }
        }
    }
}

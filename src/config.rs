use std::time::Duration;

use log::{error, info};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::analysis::AnalysisClient;
use crate::model::{
    common::FALLBACK_LANGUAGE,
    db::seed::ensure_survey_exists,
    mongodb::{ensure_indexes_exist, Coll},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    default_language: String,
}

fn default_language() -> String {
    FALLBACK_LANGUAGE.to_string()
}

impl Config {
    /// Language used for insights when a request does not name one.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that loads the MongoDB config, connects to the database,
/// performs any setup necessary, and places both a `Client` and a `Database`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&get_database_name());

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to connect to database: {e}");
            return Err(rocket);
        }

        // Install the climate survey into an empty database.
        if let Err(e) = ensure_survey_exists(&Coll::from_db(&db)).await {
            error!("Failed to seed database: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
pub(crate) fn get_database_name() -> String {
    "survey".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
pub(crate) fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

/// Configuration for the chat-completion service behind `/analysis`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    // non-secrets
    #[serde(default = "default_base_url")]
    analysis_base_url: String,
    #[serde(default = "default_model")]
    analysis_model: String,
    #[serde(default = "default_timeout")]
    analysis_timeout: u64,
    // secrets
    #[serde(default)]
    analysis_api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_base_url: default_base_url(),
            analysis_model: default_model(),
            analysis_timeout: default_timeout(),
            analysis_api_key: None,
        }
    }
}

impl AnalysisConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing path.
    pub fn base_url(&self) -> &str {
        &self.analysis_base_url
    }

    /// Model name sent with every request.
    pub fn model(&self) -> &str {
        &self.analysis_model
    }

    /// Maximum time to wait for a reply.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout)
    }

    /// Bearer token; analysis is disabled without one.
    pub fn api_key(&self) -> Option<&str> {
        self.analysis_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// A fairing that loads the analysis config and places an `AnalysisClient`
/// into managed state.
pub struct AnalysisFairing;

#[rocket::async_trait]
impl Fairing for AnalysisFairing {
    fn info(&self) -> Info {
        Info {
            name: "Analysis",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<AnalysisConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load analysis config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        // Construct the client.
        let client = match AnalysisClient::new(&config) {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to build analysis client: {e}");
                return Err(rocket);
            }
        };
        if client.is_configured() {
            info!("Loaded analysis config for model {}", config.model());
        } else {
            info!("No analysis API key set, analysis is disabled");
        }

        // Manage the state.
        rocket = rocket.manage(client);
        Ok(rocket)
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};

    use super::*;

    #[test]
    fn analysis_defaults() {
        let config: AnalysisConfig = Figment::new().extract().unwrap();
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert_eq!(config.model(), "gpt-3.5-turbo");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.api_key(), None);

        let config: Config = Figment::new().extract().unwrap();
        assert_eq!(config.default_language(), "en");
    }

    #[test]
    fn blank_api_key_disables_analysis() {
        let config: AnalysisConfig = Figment::new()
            .merge(Serialized::default("analysis_api_key", "  "))
            .merge(Serialized::default("analysis_timeout", 5))
            .extract()
            .unwrap();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}

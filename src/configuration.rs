use config::File;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub token: TokenSettings,
    pub hashing: HashingSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Signing material for session tokens. The secret is only ever read from
/// the environment (`APP_TOKEN__SECRET`), never from a committed file.
#[derive(serde::Deserialize, Clone)]
pub struct TokenSettings {
    pub secret: Secret<String>,
    #[serde(
        default = "default_token_ttl",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub ttl_seconds: u64,
}

/// Argon2id cost parameters.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct HashingSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub memory_kib: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub iterations: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub parallelism: u32,
}

fn default_token_ttl() -> u64 {
    5 * 60 * 60
}

impl TokenSettings {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_seconds)
    }
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        let mut options = self.without_db().database(&self.database_name);
        options.log_statements(tracing::log::LevelFilter::Trace);
        options
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("No working directory: {e}")))?;
    let config_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let env_file_name = format!("{}.yaml", environment.as_str());

    // Later sources win: base file, then the environment file, then
    // `APP_`-prefixed variables such as `APP_TOKEN__SECRET`.
    let config = config::Config::builder()
        .add_source(File::from(config_directory.join("base.yaml")))
        .add_source(File::from(config_directory.join(env_file_name)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    config.try_deserialize::<Settings>()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} not a supported environment. Use either `local` or `production`",
                other
            )),
        }
    }
}

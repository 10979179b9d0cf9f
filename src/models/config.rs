use serde::Deserialize;
use thiserror::Error;

/// Minimum length of the cookie signing secret accepted by `actix-web`.
pub const MIN_SECRET_LEN: usize = 64;

/// Configuration options of the club groups service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Cookie domain shared with the authentication service.
    pub domain: String,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Secret used to sign session and flash-message cookies.
    pub secret: String,
    /// Glob passed to Tera when loading templates.
    pub templates_dir: String,
    /// Base URL of the external authentication service.
    pub auth_service_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("secret must be at least {} bytes long", MIN_SECRET_LEN)]
    SecretTooShort,
}

impl ServerConfig {
    /// Loads `config/default.yaml`, then `config/{app_env}.yaml`, then
    /// `APP__*` environment variables, later sources overriding earlier ones.
    pub fn load(app_env: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let server_config: ServerConfig = settings.try_deserialize()?;
        if server_config.secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort);
        }

        Ok(server_config)
    }
}

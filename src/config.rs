use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    pub dialogue: DialogueConfig,
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Catalog backend connection settings.
///
/// When `static_token` is set it is used as the bearer credential as-is;
/// otherwise a token is obtained with the client-credentials grant.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    #[serde(skip_serializing, default)]
    pub client_secret: Option<SecretString>,
    #[serde(skip_serializing, default)]
    pub static_token: Option<SecretString>,
    pub timeout_seconds: u64,
    /// Password attached to customer records created at checkout.
    #[serde(skip_serializing, default = "default_customer_password")]
    pub customer_password: SecretString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Expiry for conversation states in the memory backend (None keeps them forever)
    pub ttl_seconds: Option<u64>,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing, default = "default_database_password")]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
}

/// Where the conversation goes after a quantity button adds a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterAddPolicy {
    ProductDetail,
    Cart,
    Menu,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogueConfig {
    /// Text or payload that restarts the conversation from the menu
    pub reset_command: String,
    pub quantity_choices: Vec<u32>,
    pub unit_label: String,
    pub after_add: AfterAddPolicy,
    /// Process events of one conversation one at a time
    pub serialize_conversations: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AlertsConfig {
    /// Webhook receiving a JSON document for every error-level log event
    pub webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `STOREFRONT__` prefix and `__` separator
            // e.g., STOREFRONT__CATALOG__CLIENT_ID="my_client"
            .add_source(
                config::Environment::with_prefix("STOREFRONT")
                    .prefix_separator("__")
                    .separator("__")
                    // e.g., STOREFRONT__DIALOGUE__QUANTITY_CHOICES="1,2,5"
                    .list_separator(",")
                    .with_list_parse_key("dialogue.quantity_choices")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.dialogue.validate()?;
        Ok(config)
    }
}

impl DialogueConfig {
    /// Every quantity button must carry a quantity the cart accepts.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.quantity_choices.is_empty() {
            return Err(config::ConfigError::Message(
                "dialogue.quantity_choices must not be empty".to_string(),
            ));
        }
        if self.quantity_choices.contains(&0) {
            return Err(config::ConfigError::Message(
                "dialogue.quantity_choices must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database
        ))
    }
}

fn default_customer_password() -> SecretString {
    SecretString::from("storefront-checkout".to_string())
}

fn default_database_password() -> SecretString {
    SecretString::from("password".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.moltin.com".to_string(),
            client_id: None,
            client_secret: None,
            static_token: None,
            timeout_seconds: 30,
            customer_password: default_customer_password(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ttl_seconds: None,
            database: DatabaseConfig::default(),
        }
    }
}

// Default values for the database configuration
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: default_database_password(),
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
        }
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            reset_command: "/start".to_string(),
            quantity_choices: vec![1, 3, 5],
            unit_label: "kg".to_string(),
            after_add: AfterAddPolicy::ProductDetail,
            serialize_conversations: true,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by their serde attributes
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}

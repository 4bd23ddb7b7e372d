use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Prefix for environment overrides, e.g. `NOTIFIER__TEMPLATE_REPO__TOKEN`
const ENV_PREFIX: &str = "NOTIFIER";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub template_repo: TemplateRepoConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    /// Required in `X-API-Key` on `/invoke` when set
    pub key: Option<String>,
}

/// Remote template repository (directory listing + per-file content)
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRepoConfig {
    /// Directory URL; individual files live at `{base_url}/{name}`
    pub base_url: String,
    /// Sent as `Authorization: token <token>`
    pub token: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// Transactional email provider over HTTP
    #[default]
    Http,
    /// Log only, never send
    Noop,
}

impl MailBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailBackend::Http => "http",
            MailBackend::Noop => "noop",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MailConfig {
    #[serde(default)]
    pub backend: MailBackend,
    /// Provider base URL; messages are posted to `{api_base_url}/messages`
    pub api_base_url: Option<String>,
    /// Raw credentials, base64-encoded into the Basic authorization header
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// HTML-escape `{{name}}` substitutions, as mustache.js does
    #[serde(default = "default_escape_html")]
    pub escape_html: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Channels (or patterns) carrying envelopes. Empty disables the trigger.
    #[serde(default)]
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user_agent() -> String {
    concat!("order-email-notifier/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_escape_html() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "order-email-notifier".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("redis.channels"),
            );

        Self::from_builder(builder)
    }

    /// Builder pre-populated with every defaulted key
    pub fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("template_repo.user_agent", default_user_agent())?
            .set_default("mail.backend", MailBackend::default().as_str())?
            .set_default("http.timeout_secs", default_timeout_secs())?
            .set_default("http.connect_timeout_secs", default_connect_timeout_secs())?
            .set_default("render.escape_html", default_escape_html())?
            .set_default("redis.url", default_redis_url())?
            .set_default("log.json", false)?
            .set_default("otel.enabled", false)?
            .set_default("otel.endpoint", default_otel_endpoint())?
            .set_default("otel.service_name", default_service_name())?
            .set_default("otel.sampling_ratio", default_sampling_ratio())
    }

    pub fn from_builder(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_repo.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "template_repo.base_url must not be empty".to_string(),
            ));
        }

        if self.mail.backend == MailBackend::Http {
            if self.mail.api_base_url.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Message(
                    "mail.api_base_url is required for the http mail backend".to_string(),
                ));
            }
            if self.mail.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::Message(
                    "mail.api_key is required for the http mail backend".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            channels: vec![],
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escape_html: default_escape_html(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_builder(
            Settings::defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let http = HttpConfig::default();
        assert_eq!(http.timeout_secs, 10);
        assert_eq!(http.connect_timeout_secs, 5);

        assert!(RenderConfig::default().escape_html);
    }

    #[test]
    fn test_escaping_defaults_on_when_render_section_is_absent() {
        let settings = load(
            r#"
            [template_repo]
            base_url = "https://repo.example.com/templates"
            token = "secret"

            [mail]
            backend = "noop"
            "#,
        )
        .unwrap();

        assert!(settings.render.escape_html);
    }

    #[test]
    fn test_load_full_config() {
        let settings = load(
            r#"
            [template_repo]
            base_url = "https://repo.example.com/templates"
            token = "secret"

            [mail]
            backend = "http"
            api_base_url = "https://mail.example.com/v3/example.org"
            api_key = "api:key-123"

            [render]
            escape_html = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.template_repo.token, "secret");
        assert!(settings.template_repo.user_agent.starts_with("order-email-notifier/"));
        assert_eq!(settings.mail.backend, MailBackend::Http);
        assert!(!settings.render.escape_html);
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
        assert!(settings.redis.channels.is_empty());
        assert!(!settings.otel.enabled);
    }

    #[test]
    fn test_http_backend_requires_credentials() {
        let result = load(
            r#"
            [template_repo]
            base_url = "https://repo.example.com/templates"
            token = "secret"

            [mail]
            api_base_url = "https://mail.example.com"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Message(msg)) if msg.contains("api_key")));
    }

    #[test]
    fn test_noop_backend_needs_no_credentials() {
        let settings = load(
            r#"
            [template_repo]
            base_url = "https://repo.example.com/templates"
            token = "secret"

            [mail]
            backend = "noop"
            "#,
        )
        .unwrap();

        assert_eq!(settings.mail.backend, MailBackend::Noop);
    }

    #[test]
    fn test_missing_template_repo_is_rejected() {
        assert!(load("[mail]\nbackend = \"noop\"\n").is_err());
    }
}

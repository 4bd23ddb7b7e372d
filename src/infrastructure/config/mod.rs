mod settings;

pub use settings::{
    ApiConfig, HttpConfig, LogConfig, MailBackend, MailConfig, OtelConfig, RedisConfig,
    RenderConfig, ServerConfig, Settings, TemplateRepoConfig,
};

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, BootstrapUserConfig, LogFormat, LoggingConfig, ServerConfig,
    StorageConfig,
};

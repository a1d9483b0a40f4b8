use crate::chat::DEFAULT_REQUEST_TIMEOUT;
use crate::contact::DEFAULT_CONFIRMATION_DURATION;
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, LlmSettings};
use crate::session::DEFAULT_SESSION_TIMEOUT;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Seconds to wait for the completion service
    #[arg(long, env = "CHAT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Seconds an idle chat session is kept
    #[arg(long, env = "CHAT_SESSION_TTL_SECS")]
    pub session_ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub contact: ContactConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub request_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    pub confirmation_secs: u64,
}

/// Completion service settings. The API key is deliberately absent; it is
/// only ever read from `LLM_API_KEY`.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl ContactConfig {
    #[must_use]
    pub fn confirmation(&self) -> Duration {
        Duration::from_secs(self.confirmation_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                static_dir: "static".to_string(),
            },
            chat: ChatConfig {
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
                session_ttl_secs: DEFAULT_SESSION_TIMEOUT.as_secs(),
                sweep_interval_secs: 60,
            },
            contact: ContactConfig {
                confirmation_secs: DEFAULT_CONFIRMATION_DURATION.as_secs(),
            },
            llm: LlmConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
                max_tokens: DEFAULT_MAX_TOKENS,
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        let defaults = Self::default();

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", defaults.server.port)?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.static_dir", defaults.server.static_dir)?
            .set_default("chat.request_timeout_secs", defaults.chat.request_timeout_secs)?
            .set_default("chat.session_ttl_secs", defaults.chat.session_ttl_secs)?
            .set_default("chat.sweep_interval_secs", defaults.chat.sweep_interval_secs)?
            .set_default("contact.confirmation_secs", defaults.contact.confirmation_secs)?
            .set_default("llm.base_url", defaults.llm.base_url)?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("llm.temperature", f64::from(defaults.llm.temperature))?
            .set_default("llm.max_tokens", defaults.llm.max_tokens)?;

        // 2. Config file: explicit path must exist, ./config.yaml is optional
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG_FILE).required(false));
        }

        // 3. Environment, e.g. SOFTSELL_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("SOFTSELL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. Completion service env vars shared with other deployments
        if let Some(val) = non_empty_env("LLM_BASE_URL") {
            builder = builder.set_override("llm.base_url", val)?;
        }
        if let Some(val) = non_empty_env("LLM_MODEL") {
            builder = builder.set_override("llm.model", val)?;
        }

        // 5. CLI flags (clap also folds in their plain env vars)
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(secs) = cli.request_timeout_secs {
            builder = builder.set_override("chat.request_timeout_secs", secs)?;
        }
        if let Some(secs) = cli.session_ttl_secs {
            builder = builder.set_override("chat.session_ttl_secs", secs)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Resolve completion settings from `config` plus `LLM_API_KEY`.
///
/// # Errors
///
/// Returns an error when the base URL is not an absolute http(s) URL or the
/// model is empty.
pub fn load_llm_settings(config: &AppConfig) -> Result<LlmSettings, String> {
    let base_url = config.llm.base_url.trim();
    let parsed = url::Url::parse(base_url).map_err(|e| format!("Invalid llm.base_url {base_url:?}: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("llm.base_url must be http or https, got {}", parsed.scheme()));
    }

    let model = config.llm.model.trim();
    if model.is_empty() {
        return Err("llm.model cannot be empty".to_string());
    }

    let api_key = non_empty_env("LLM_API_KEY");

    let mut settings = LlmSettings::new(base_url, model, api_key);
    settings.temperature = config.llm.temperature;
    settings.max_tokens = config.llm.max_tokens;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_module_constants() {
        let config = AppConfig::default();
        assert_eq!(config.chat.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.chat.session_ttl(), DEFAULT_SESSION_TIMEOUT);
        assert_eq!(config.contact.confirmation(), DEFAULT_CONFIRMATION_DURATION);
    }

    #[test]
    fn test_settings_from_defaults() {
        let settings = load_llm_settings(&AppConfig::default()).unwrap();
        assert_eq!(settings.chat_url(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert!((settings.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(settings.max_tokens, 800);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = AppConfig::default();
        config.llm.base_url = "ftp://example.com".to_string();
        assert!(load_llm_settings(&config).is_err());

        config.llm.base_url = "not a url".to_string();
        assert!(load_llm_settings(&config).is_err());
    }

    #[test]
    fn test_rejects_blank_model() {
        let mut config = AppConfig::default();
        config.llm.model = "  ".to_string();
        assert_eq!(
            load_llm_settings(&config).unwrap_err(),
            "llm.model cannot be empty"
        );
    }

    #[test]
    fn test_sweep_interval_never_zero() {
        let mut config = AppConfig::default();
        config.chat.sweep_interval_secs = 0;
        assert_eq!(config.chat.sweep_interval(), Duration::from_secs(1));
    }
}

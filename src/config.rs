//! Configuration management for the Talkie gateway
//!
//! Settings come from an optional TOML file overlaid with environment
//! variables. The upstream API credential is deliberately NOT part of the
//! file or the loaded struct: it is read from the environment at call time,
//! so a key added after startup is picked up without a restart.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::{Error, Result};

/// Default HTTP API port
pub const DEFAULT_PORT: u16 = 18990;

/// Default upstream chat-completion endpoint
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default upstream model identifier
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable holding the upstream credential
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// Talkie gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API server settings
    pub server: ServerConfig,

    /// Upstream chat-completion service settings
    pub upstream: UpstreamConfig,

    /// Speech capture/synthesis settings
    pub voice: VoiceSettings,

    /// Response-engine client settings
    pub engine: EngineConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// Upstream chat-completion service configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Chat-completion endpoint URL
    pub url: String,

    /// Model identifier sent with every completion request
    pub model: String,
}

/// Speech capture and synthesis settings
#[derive(Debug, Clone)]
pub struct VoiceSettings {
    /// Recognition locale (BCP 47 tag)
    pub locale: String,

    /// Synthesis rate relative to the platform default
    pub rate: f32,

    /// Synthesis pitch
    pub pitch: f32,

    /// Synthesis volume (0.0 to 1.0)
    pub volume: f32,
}

/// Response-engine client configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Chat proxy endpoint used by the remote engine
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: DEFAULT_PORT },
            upstream: UpstreamConfig {
                url: DEFAULT_UPSTREAM_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
            voice: VoiceSettings::default(),
            engine: EngineConfig {
                endpoint: format!("http://127.0.0.1:{DEFAULT_PORT}/chat"),
            },
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
        }
    }
}

impl Config {
    /// Load configuration from the default file location plus env overrides
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        match path {
            Some(p) if p.exists() => Self::load_from(&p),
            _ => {
                let mut config = Self::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific TOML file plus env overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let file: ConfigFile = toml::from_str(&content)?;

        let mut config = Self::default();
        config.apply_file(file);
        config.apply_env();

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Overlay values from a parsed config file
    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(port) = file.server.port {
            self.server.port = port;
            self.engine.endpoint = format!("http://127.0.0.1:{port}/chat");
        }
        if let Some(url) = file.upstream.url {
            self.upstream.url = url;
        }
        if let Some(model) = file.upstream.model {
            self.upstream.model = model;
        }
        if let Some(locale) = file.voice.locale {
            self.voice.locale = locale;
        }
        if let Some(rate) = file.voice.rate {
            self.voice.rate = rate;
        }
        if let Some(pitch) = file.voice.pitch {
            self.voice.pitch = pitch;
        }
        if let Some(volume) = file.voice.volume {
            self.voice.volume = volume;
        }
        if let Some(endpoint) = file.engine.endpoint {
            self.engine.endpoint = endpoint;
        }
    }

    /// Overlay values from environment variables
    fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("TALKIE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
                self.engine.endpoint = format!("http://127.0.0.1:{port}/chat");
            }
        }
        if let Ok(url) = std::env::var("TALKIE_UPSTREAM_URL") {
            self.upstream.url = url;
        }
        if let Ok(model) = std::env::var("TALKIE_MODEL") {
            self.upstream.model = model;
        }
        if let Ok(endpoint) = std::env::var("TALKIE_CHAT_ENDPOINT") {
            self.engine.endpoint = endpoint;
        }
    }
}

/// Read the upstream credential from the environment
///
/// Read at call time rather than at startup: a missing key is a recoverable,
/// reported condition, and adding one does not require a restart.
#[must_use]
pub fn upstream_api_key() -> Option<SecretString> {
    std::env::var(CREDENTIAL_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

/// Default config file path (`~/.config/talkie/config.toml` on Linux)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "talkie", "talkie")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// TOML configuration file schema
///
/// All fields are optional — the file is a partial overlay on top of defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerFileConfig,

    #[serde(default)]
    upstream: UpstreamFileConfig,

    #[serde(default)]
    voice: VoiceFileConfig,

    #[serde(default)]
    engine: EngineFileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ServerFileConfig {
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamFileConfig {
    url: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VoiceFileConfig {
    locale: Option<String>,
    rate: Option<f32>,
    pitch: Option<f32>,
    volume: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct EngineFileConfig {
    endpoint: Option<String>,
}

//! Configuration loading and validation.
//!
//! Loads `config.toml` from `$IYM_CONFIG` or `~/.iym/config.toml`. A missing
//! file yields defaults. Environment variables override file values; file
//! values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::{info, warn};

use crate::agent::mood::{find_mood, DEFAULT_MOOD_ID};
use crate::credentials::Credentials;
use crate::providers::dispatcher::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::providers::openai::ProviderEndpoint;
use crate::safety::{CrisisCatalog, CrisisCategory};

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "IYM_CONFIG";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Providers in failover order. Empty means the built-in pair.
    pub providers: Vec<ProviderConfig>,
    /// Dispatch limits.
    pub dispatch: DispatchConfig,
    /// Conversation shaping.
    pub conversation: ConversationConfig,
    /// Custom crisis catalog replacing the built-in one.
    pub crisis: Option<CrisisConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            dispatch: DispatchConfig::default(),
            conversation: ConversationConfig::default(),
            crisis: None,
        }
    }
}

/// One upstream provider entry (`[[providers]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Short name used in logs.
    pub name: String,
    /// Chat completions URL.
    pub url: String,
    /// Model identifier.
    pub model: String,
    /// Credential key looked up in `.env` and then the process environment.
    pub api_key_env: String,
}

/// Dispatch limits (`[dispatch]`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Per-provider attempt limit in seconds.
    pub attempt_timeout_secs: u64,
    /// Completion token ceiling.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: 8,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Conversation shaping (`[conversation]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Prior entries forwarded per call.
    pub history_window: usize,
    /// Mood selected when a session starts.
    pub default_mood: String,
    /// Replacement persona prompt, relative to the config file's directory.
    pub persona_file: Option<PathBuf>,
    /// Replacement offline replies.
    pub fallback_replies: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_window: crate::agent::composer::DEFAULT_HISTORY_WINDOW,
            default_mood: DEFAULT_MOOD_ID.to_owned(),
            persona_file: None,
            fallback_replies: Vec::new(),
        }
    }
}

/// Custom crisis catalog (`[crisis]` with `[[crisis.categories]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CrisisConfig {
    /// Categories in priority order.
    pub categories: Vec<CrisisCategory>,
    /// Imminent-risk keywords.
    #[serde(default)]
    pub urgent_keywords: Vec<String>,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "fireworks".to_owned(),
            url: "https://api.fireworks.ai/inference/v1/chat/completions".to_owned(),
            model: "accounts/fireworks/models/llama-v3p1-8b-instruct".to_owned(),
            api_key_env: "FIREWORKS_API_KEY".to_owned(),
        },
        ProviderConfig {
            name: "groq".to_owned(),
            url: "https://api.groq.com/openai/v1/chat/completions".to_owned(),
            model: "llama-3.1-8b-instant".to_owned(),
            api_key_env: "GROQ_API_KEY".to_owned(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration with env overrides applied and validate it.
    ///
    /// `explicit` wins over `$IYM_CONFIG`, which wins over
    /// `~/.iym/config.toml`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => config_path_with(|key| std::env::var(key).ok())?,
        };
        let mut config = Self::load_from_path(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file only, no env overrides.
    ///
    /// A relative `persona_file` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                info!(path = %path.display(), "loading config from file");
                let mut config = Self::from_toml(&contents)
                    .with_context(|| format!("failed to parse config at {}", path.display()))?;
                if let (Some(persona), Some(parent)) =
                    (config.conversation.persona_file.as_mut(), path.parent())
                {
                    if persona.is_relative() {
                        *persona = parent.join(&*persona);
                    }
                }
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            )),
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unknown value types.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }

    /// Apply environment overrides through a resolver function.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("IYM_ATTEMPT_TIMEOUT_SECS") {
            match v.trim().parse() {
                Ok(n) => self.dispatch.attempt_timeout_secs = n,
                Err(_) => warn!(
                    var = "IYM_ATTEMPT_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("IYM_HISTORY_WINDOW") {
            match v.trim().parse() {
                Ok(n) => self.conversation.history_window = n,
                Err(_) => warn!(
                    var = "IYM_HISTORY_WINDOW",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("IYM_DEFAULT_MOOD") {
            self.conversation.default_mood = v.trim().to_owned();
        }
    }

    /// Check values that TOML typing cannot.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid value.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dispatch.attempt_timeout_secs == 0 {
            anyhow::bail!("dispatch.attempt_timeout_secs must be greater than zero");
        }
        if self.dispatch.max_tokens == 0 {
            anyhow::bail!("dispatch.max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.dispatch.temperature) {
            anyhow::bail!(
                "dispatch.temperature must be within 0.0..=2.0, found {}",
                self.dispatch.temperature
            );
        }
        if find_mood(&self.conversation.default_mood).is_none() {
            anyhow::bail!(
                "conversation.default_mood '{}' is not a known mood",
                self.conversation.default_mood
            );
        }
        for provider in &self.providers {
            validate_provider_url(provider)?;
        }
        if let Some(crisis) = &self.crisis {
            if crisis.categories.is_empty() {
                anyhow::bail!("crisis.categories must not be empty when [crisis] is present");
            }
        }
        Ok(())
    }

    /// Providers in failover order, falling back to the built-in pair.
    pub fn provider_list(&self) -> Vec<ProviderConfig> {
        if self.providers.is_empty() {
            return default_providers();
        }
        self.providers.clone()
    }

    /// Resolve provider endpoints against loaded credentials.
    ///
    /// A provider whose credential is missing or blank is skipped.
    pub fn resolve_endpoints(&self, credentials: &Credentials) -> Vec<ProviderEndpoint> {
        self.resolve_endpoints_with(credentials, |key| std::env::var(key).ok())
    }

    /// Resolve endpoints using a custom process-environment resolver.
    #[doc(hidden)]
    pub fn resolve_endpoints_with(
        &self,
        credentials: &Credentials,
        env: impl Fn(&str) -> Option<String>,
    ) -> Vec<ProviderEndpoint> {
        self.provider_list()
            .into_iter()
            .filter_map(|provider| {
                match credentials.resolve_with(&provider.api_key_env, &env) {
                    Some(credential) => Some(ProviderEndpoint {
                        name: provider.name,
                        url: provider.url,
                        model: provider.model,
                        credential,
                    }),
                    None => {
                        warn!(
                            provider = %provider.name,
                            key = %provider.api_key_env,
                            "credential missing, skipping provider"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Crisis catalog in effect.
    pub fn crisis_catalog(&self) -> CrisisCatalog {
        match &self.crisis {
            Some(custom) => {
                CrisisCatalog::new(custom.categories.clone(), custom.urgent_keywords.clone())
            }
            None => CrisisCatalog::builtin(),
        }
    }

    /// Persona override text, if a persona file is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is empty.
    pub fn persona_override(&self) -> anyhow::Result<Option<String>> {
        let Some(path) = &self.conversation.persona_file else {
            return Ok(None);
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read persona file {}", path.display()))?;
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("persona file {} is empty", path.display());
        }
        Ok(Some(text.to_owned()))
    }
}

fn validate_provider_url(provider: &ProviderConfig) -> anyhow::Result<()> {
    let parsed = url::Url::parse(&provider.url)
        .with_context(|| format!("provider '{}' has an invalid url", provider.name))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow::anyhow!(
            "provider '{}' url must be http or https, found '{other}'",
            provider.name
        )),
    }
}

// ---------------------------------------------------------------------------
// Runtime paths
// ---------------------------------------------------------------------------

/// Well-known files under the runtime directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// `~/.iym`
    pub root: PathBuf,
    /// `~/.iym/config.toml`
    pub config_file: PathBuf,
    /// `~/.iym/.env`
    pub env_file: PathBuf,
    /// `~/.iym/logs`
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    /// Paths rooted at an arbitrary directory.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join("config.toml"),
            env_file: root.join(".env"),
            logs_dir: root.join("logs"),
            root,
        }
    }
}

/// Resolve the default runtime directory (`~/.iym/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".iym"))
}

/// Runtime paths under `~/.iym/`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths() -> anyhow::Result<RuntimePaths> {
    Ok(RuntimePaths::under(config_dir()?))
}

/// Resolve the config file path using a custom env resolver.
///
/// # Errors
///
/// Returns an error if `$IYM_CONFIG` is unset and the home directory cannot
/// be determined.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(path) = env(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(runtime_paths()?.config_file)
}

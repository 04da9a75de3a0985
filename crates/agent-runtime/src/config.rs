//! Provider Configuration
//!
//! Read once at process start; read-only afterwards.

use std::sync::Arc;

use agent_core::{AgentError, GenerationOptions, LlmProvider, Result};

/// Which transport to use
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Gemini,
    Ollama,
}

impl Backend {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(AgentError::Config(format!("Unknown LLM_PROVIDER '{other}'"))),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

/// Gemini settings
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key; requests fail with an auth error when absent
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash-exp".into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
        }
    }
}

/// Ollama settings
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            model: "llama3.2".into(),
        }
    }
}

impl OllamaConfig {
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// Full transport configuration
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub backend: Backend,
    pub gemini: GeminiConfig,
    pub ollama: OllamaConfig,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Gemini,
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match var("LLM_PROVIDER") {
            Some(name) => Backend::parse(&name)?,
            None => defaults.backend,
        };

        let gemini = GeminiConfig {
            api_key: var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
            model: var("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
            base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini.base_url),
        };

        let ollama = OllamaConfig {
            host: var("OLLAMA_HOST").unwrap_or(defaults.ollama.host),
            port: parse_number(var("OLLAMA_PORT"), "OLLAMA_PORT", defaults.ollama.port)?,
            model: var("OLLAMA_MODEL").unwrap_or(defaults.ollama.model),
        };

        let timeout_secs = parse_number(var("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS", defaults.timeout_secs)?;

        Ok(Self {
            backend,
            gemini,
            ollama,
            timeout_secs,
        })
    }

    /// Model of the selected backend
    pub fn model(&self) -> &str {
        match self.backend {
            Backend::Gemini => &self.gemini.model,
            Backend::Ollama => &self.ollama.model,
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::for_model(self.model())
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    value.map_or(Ok(default), |v| {
        v.trim()
            .parse()
            .map_err(|_| AgentError::Config(format!("{key} must be a number, got '{v}'")))
    })
}

/// Construct the configured transport
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.backend {
        #[cfg(feature = "gemini")]
        Backend::Gemini => {
            if config.gemini.api_key.is_none() {
                tracing::warn!("GEMINI_API_KEY is not set; model calls will fail");
            }
            Ok(Arc::new(crate::gemini::GeminiProvider::new(
                config.gemini.clone(),
                config.timeout_secs,
            )?))
        }
        #[cfg(feature = "ollama")]
        Backend::Ollama => Ok(Arc::new(crate::ollama::OllamaProvider::new(
            config.ollama.clone(),
            config.timeout_secs,
        )?)),
        #[allow(unreachable_patterns)]
        other => Err(AgentError::Config(format!(
            "Backend '{other}' is not compiled in"
        ))),
    }
}

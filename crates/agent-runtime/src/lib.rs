//! # agent-runtime
//!
//! Model transports for the resort concierge.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google `generateContent` REST API
//! - **Ollama**: Local LLM inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{ProviderConfig, build_provider};
//!
//! let config = ProviderConfig::from_env()?;
//! let provider = build_provider(&config)?;
//! let session = AgentBuilder::new()
//!     .provider(provider)
//!     .build()?;
//! ```

pub mod config;
mod http;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use config::{Backend, GeminiConfig, OllamaConfig, ProviderConfig, build_provider};

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

// Re-export core types for convenience
pub use agent_core::{AgentError, LlmProvider, Result};

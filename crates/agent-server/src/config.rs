//! Server Configuration

use agent_core::{AgentError, Result};
use agent_runtime::ProviderConfig;
use resort_concierge::RouterFailurePolicy;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    pub router_failure: RouterFailurePolicy,

    /// Model transport selection
    pub provider: ProviderConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "0.0.0.0:8000".into());

        let router_failure = match lookup("ROUTER_FALLBACK").as_deref().map(str::trim) {
            None | Some("" | "false" | "0" | "no") => RouterFailurePolicy::Propagate,
            Some("true" | "1" | "yes") => RouterFailurePolicy::FallbackToReceptionist,
            Some(other) => {
                return Err(AgentError::Config(format!(
                    "ROUTER_FALLBACK must be true or false, got '{other}'"
                )));
            }
        };

        Ok(Self {
            bind_addr,
            router_failure,
            provider: ProviderConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.router_failure, RouterFailurePolicy::Propagate);
    }

    #[test]
    fn test_router_fallback_flag() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "ROUTER_FALLBACK").then(|| "true".to_string())
        })
        .unwrap();
        assert_eq!(config.router_failure, RouterFailurePolicy::FallbackToReceptionist);

        let bad = ServerConfig::from_lookup(|key| (key == "ROUTER_FALLBACK").then(|| "maybe".to_string()));
        assert!(bad.is_err());
    }
}

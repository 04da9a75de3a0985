//! Shared HTTP plumbing for the REST transports.

use std::time::Duration;

use agent_core::{AgentError, Result};

/// Build a client with the configured request timeout
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))
}

/// Map a transport-level reqwest failure
pub fn request_error(err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::ProviderUnavailable(err.to_string())
    } else if err.is_decode() {
        AgentError::Parse(err.to_string())
    } else {
        AgentError::Provider(err.to_string())
    }
}

/// Map a non-success HTTP status and body
pub fn status_to_error(status: u16, body: &str) -> AgentError {
    match status {
        401 | 403 => AgentError::Auth(body.to_string()),
        429 => AgentError::RateLimited(body.to_string()),
        502..=504 => AgentError::ProviderUnavailable(format!("HTTP {status}: {body}")),
        _ => AgentError::Provider(format!("HTTP {status}: {body}")),
    }
}

/// Send a JSON request and decode a JSON response, mapping failures
pub async fn post_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
) -> Result<T> {
    let resp = request.json(body).send().await.map_err(|e| request_error(&e))?;

    let status = resp.status();
    if !status.is_success() {
        let body_text = resp.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body_text));
    }

    resp.json::<T>().await.map_err(|e| AgentError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status_to_error(403, "denied"), AgentError::Auth(_)));
        assert!(matches!(status_to_error(429, "slow down"), AgentError::RateLimited(_)));
        assert!(matches!(status_to_error(503, ""), AgentError::ProviderUnavailable(_)));
        assert!(matches!(status_to_error(400, "bad"), AgentError::Provider(_)));
    }
}

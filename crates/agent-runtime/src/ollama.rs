//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference over the
//! `/api/chat` endpoint with native tool calling.

use agent_core::{
    AgentError, LlmProvider, ModelContext, ModelReply, ResponsePart, Result,
    provider::{ContextEntry, FinishReason, ProviderInfo},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::OllamaConfig;
use crate::http;

/// Ollama LLM provider
pub struct OllamaProvider {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            config,
        })
    }

    /// Create with default localhost settings
    pub fn localhost() -> Result<Self> {
        Self::new(OllamaConfig::default(), 120)
    }

    /// Convert the context to Ollama chat messages
    fn convert_messages(context: &ModelContext) -> Vec<Value> {
        let mut messages = Vec::with_capacity(context.len() + 1);
        if !context.system_prompt().is_empty() {
            messages.push(json!({ "role": "system", "content": context.system_prompt() }));
        }

        for entry in context.entries() {
            match entry {
                ContextEntry::User { text } => {
                    messages.push(json!({ "role": "user", "content": text }));
                }
                ContextEntry::Model { parts } => {
                    let mut content = String::new();
                    let mut tool_calls = Vec::new();
                    for part in parts {
                        match part {
                            ResponsePart::Text { text } => content.push_str(text),
                            ResponsePart::FunctionCall { name, args } => tool_calls.push(json!({
                                "function": { "name": name, "arguments": args }
                            })),
                            ResponsePart::Unsupported { .. } => {}
                        }
                    }
                    let mut message = json!({ "role": "assistant", "content": content });
                    if !tool_calls.is_empty() {
                        message["tool_calls"] = Value::Array(tool_calls);
                    }
                    messages.push(message);
                }
                ContextEntry::FunctionResponse { name, response } => {
                    messages.push(json!({
                        "role": "tool",
                        "tool_name": name,
                        "content": response.to_string(),
                    }));
                }
            }
        }

        messages
    }

    fn build_request(context: &ModelContext, model: &str) -> Value {
        let options = context.options();
        let mut body = json!({
            "model": model,
            "messages": Self::convert_messages(context),
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "top_p": options.top_p,
                "num_predict": options.max_tokens,
            },
        });

        if !context.tools().is_empty() {
            let tools: Vec<Value> = context
                .tools()
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.to_json_schema(),
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tools);
        }

        body
    }

    /// Convert an Ollama chat response into a reply
    ///
    /// Tool calls come before any preamble text in the same message.
    fn convert_response(response: OllamaChatResponse) -> ModelReply {
        let mut parts: Vec<ResponsePart> = response
            .message
            .tool_calls
            .into_iter()
            .map(|call| ResponsePart::function_call(call.function.name, call.function.arguments))
            .collect();
        if !response.message.content.trim().is_empty() {
            parts.push(ResponsePart::text(response.message.content));
        }

        let finish_reason = response.done_reason.map(|reason| match reason.as_str() {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            _ => FinishReason::Other(reason),
        });

        ModelReply {
            parts,
            prompt_feedback: None,
            finish_reason,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Ollama".into(),
            model: self.config.model.clone(),
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url());
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                tracing::warn!("Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, context: &ModelContext) -> Result<ModelReply> {
        let model = if context.options().model.is_empty() {
            self.config.model.as_str()
        } else {
            context.options().model.as_str()
        };

        tracing::debug!(model, entries = context.len(), "Ollama chat");

        let url = format!("{}/api/chat", self.config.base_url());
        let body = Self::build_request(context, model);
        let response: OllamaChatResponse = http::post_json(self.client.post(&url), &body)
            .await
            .map_err(|e| match e {
                AgentError::ProviderUnavailable(msg) => AgentError::ProviderUnavailable(format!(
                    "Ollama at {} is unreachable: {msg}",
                    self.config.base_url()
                )),
                other => other,
            })?;

        Ok(Self::convert_response(response))
    }
}

// Ollama wire types

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    done_reason: Option<String>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<OllamaToolCall>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::GenerationOptions;
    use agent_core::tool::{ParameterSchema, ToolSchema};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OllamaProvider {
        let address = server.address();
        OllamaProvider::new(
            OllamaConfig {
                host: format!("http://{}", address.ip()),
                port: address.port(),
                model: "llama3.2".into(),
            },
            5,
        )
        .unwrap()
    }

    fn service_context() -> ModelContext {
        let tools = vec![ToolSchema {
            name: "create_room_service_request".into(),
            description: "Create a room service request".into(),
            parameters: vec![
                ParameterSchema::required("room_number", "string", "Guest room"),
                ParameterSchema::required("request_type", "string", "Kind of request"),
            ],
            has_side_effects: true,
        }];
        ModelContext::new("You are the room service agent.", tools, GenerationOptions::for_model(""))
    }

    #[test]
    fn test_message_conversion() {
        let mut context = service_context();
        context.push(ContextEntry::User { text: "Towels to 101".into() });
        context.push(ContextEntry::Model {
            parts: vec![ResponsePart::function_call(
                "create_room_service_request",
                json!({ "room_number": "101", "request_type": "towels" }),
            )],
        });
        context.push(ContextEntry::FunctionResponse {
            name: "create_room_service_request".into(),
            response: json!({ "result": "Request #1 created" }),
        });

        let messages = OllamaProvider::convert_messages(&context);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[2]["tool_calls"][0]["function"]["name"], "create_room_service_request");
        assert_eq!(messages[3]["role"], "tool");

        let body = OllamaProvider::build_request(&context, "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["tools"][0]["function"]["parameters"]["required"][1], "request_type");
    }

    #[tokio::test]
    async fn test_generate_parses_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "function": {
                            "name": "create_room_service_request",
                            "arguments": { "room_number": "101", "request_type": "towels" }
                        }
                    }]
                },
                "done": true,
                "done_reason": "stop"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = provider_for(&server).generate(&service_context()).await.unwrap();

        assert_eq!(reply.parts.len(), 1);
        assert!(matches!(
            &reply.parts[0],
            ResponsePart::FunctionCall { name, .. } if name == "create_room_service_request"
        ));
        assert_eq!(reply.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_tool_call_precedes_preamble_text() {
        let response: OllamaChatResponse = serde_json::from_value(json!({
            "message": {
                "role": "assistant",
                "content": "Let me arrange that for you.",
                "tool_calls": [{
                    "function": {
                        "name": "create_room_service_request",
                        "arguments": { "room_number": "101", "request_type": "towels" }
                    }
                }]
            },
            "done_reason": "stop"
        }))
        .unwrap();

        let reply = OllamaProvider::convert_response(response);
        assert_eq!(reply.parts.len(), 2);
        assert!(matches!(
            &reply.parts[0],
            ResponsePart::FunctionCall { name, .. } if name == "create_room_service_request"
        ));
        assert_eq!(reply.parts[1], ResponsePart::text("Let me arrange that for you."));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
            .mount(&server)
            .await;

        assert!(provider_for(&server).health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let provider = OllamaProvider::new(
            OllamaConfig {
                host: "http://127.0.0.1".into(),
                port: 9,
                model: "llama3.2".into(),
            },
            2,
        )
        .unwrap();

        assert!(!provider.health_check().await.unwrap());
        let result = provider.generate(&service_context()).await;
        assert!(matches!(result, Err(AgentError::ProviderUnavailable(_))));
    }
}

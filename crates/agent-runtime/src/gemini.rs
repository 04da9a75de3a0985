//! Google Gemini Provider
//!
//! Implementation of `LlmProvider` over the `generateContent` REST API with
//! native function calling.

use agent_core::{
    AgentError, GenerationOptions, LlmProvider, ModelContext, ModelReply, PromptFeedback,
    ResponsePart, Result,
    provider::{ContextEntry, FinishReason, ProviderInfo, SafetyRating},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::GeminiConfig;
use crate::http;

/// Gemini provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::build_client(timeout_secs)?,
            config,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::Auth("GEMINI_API_KEY is not set".into()))
    }

    fn model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        if options.model.is_empty() {
            &self.config.model
        } else {
            &options.model
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Render a context as a `generateContent` request body
fn build_request_body(context: &ModelContext) -> Value {
    let contents: Vec<Value> = context
        .entries()
        .iter()
        .filter_map(|entry| match entry {
            ContextEntry::User { text } => Some(json!({
                "role": "user",
                "parts": [{ "text": text }],
            })),
            ContextEntry::Model { parts } => {
                let parts: Vec<Value> = parts.iter().filter_map(part_to_json).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(json!({ "role": "model", "parts": parts }))
                }
            }
            ContextEntry::FunctionResponse { name, response } => Some(json!({
                "role": "function",
                "parts": [{
                    "functionResponse": { "name": name, "response": response }
                }],
            })),
        })
        .collect();

    let options = context.options();
    let mut body = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": options.temperature,
            "topP": options.top_p,
            "maxOutputTokens": options.max_tokens,
        },
    });

    if !context.system_prompt().is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": context.system_prompt() }] });
    }

    if !context.tools().is_empty() {
        let declarations: Vec<Value> = context
            .tools()
            .iter()
            .map(|tool| {
                let mut decl = json!({ "name": tool.name, "description": tool.description });
                if !tool.parameters.is_empty() {
                    decl["parameters"] = tool.to_json_schema();
                }
                decl
            })
            .collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }

    body
}

fn part_to_json(part: &ResponsePart) -> Option<Value> {
    match part {
        ResponsePart::Text { text } => Some(json!({ "text": text })),
        ResponsePart::FunctionCall { name, args } => {
            Some(json!({ "functionCall": { "name": name, "args": args } }))
        }
        ResponsePart::Unsupported { .. } => None,
    }
}

fn part_from_json(part: Value) -> ResponsePart {
    if let Some(call) = part.get("functionCall") {
        let name = call.get("name").and_then(Value::as_str).unwrap_or_default();
        let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
        return ResponsePart::function_call(name, args);
    }
    if let Some(text) = part.get("text").and_then(Value::as_str) {
        return ResponsePart::text(text);
    }
    let kind = part
        .as_object()
        .and_then(|obj| obj.keys().next().cloned())
        .unwrap_or_else(|| "unknown".into());
    ResponsePart::Unsupported { kind }
}

fn finish_reason(raw: &str) -> FinishReason {
    match raw {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        other => FinishReason::Other(other.to_string()),
    }
}

fn convert_ratings(ratings: Vec<GeminiSafetyRating>) -> Vec<SafetyRating> {
    ratings
        .into_iter()
        .map(|r| SafetyRating {
            category: r.category,
            probability: r.probability,
        })
        .collect()
}

/// Convert a decoded response into a reply
fn convert_response(response: GeminiResponse) -> ModelReply {
    let mut prompt_feedback = response.prompt_feedback.map(|fb| PromptFeedback {
        block_reason: fb.block_reason,
        safety_ratings: convert_ratings(fb.safety_ratings),
    });

    let Some(candidate) = response.candidates.into_iter().next() else {
        return ModelReply {
            parts: Vec::new(),
            prompt_feedback,
            finish_reason: None,
        };
    };

    let parts: Vec<ResponsePart> = candidate
        .content
        .map(|c| c.parts.into_iter().map(part_from_json).collect())
        .unwrap_or_default();

    let finish = candidate.finish_reason.as_deref().map(finish_reason);

    if parts.is_empty() && prompt_feedback.is_none() && finish == Some(FinishReason::ContentFilter) {
        prompt_feedback = Some(PromptFeedback {
            block_reason: candidate.finish_reason.clone(),
            safety_ratings: convert_ratings(candidate.safety_ratings),
        });
    }

    ModelReply {
        parts,
        prompt_feedback,
        finish_reason: finish,
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Gemini".into(),
            model: self.config.model.clone(),
            supports_tools: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let Ok(key) = self.api_key() else {
            return Ok(false);
        };

        let url = format!(
            "{}/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        match self.client.get(&url).header("x-goog-api-key", key).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, context: &ModelContext) -> Result<ModelReply> {
        let key = self.api_key()?;
        let model = self.model(context.options());
        let body = build_request_body(context);

        tracing::debug!(
            model,
            entries = context.len(),
            tools = context.tools().len(),
            "Gemini generateContent"
        );

        let request = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", key);
        let response: GeminiResponse = http::post_json(request, &body).await?;

        Ok(convert_response(response))
    }
}

// Gemini wire types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<GeminiSafetyRating>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<GeminiSafetyRating>,
}

#[derive(Deserialize)]
struct GeminiSafetyRating {
    category: String,
    probability: String,
}

//! OpenAI-compatible chat client behind the story-interpreter port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fateweaver_core::error::EngineError;
use fateweaver_core::interpreter::{SceneAnalysis, StoryInterpreter};

/// Default interpreter base URL (a local Ollama instance).
pub const DEFAULT_INTERPRETER_BASE_URL: &str = "http://localhost:11434";

/// Default interpreter model.
pub const DEFAULT_INTERPRETER_MODEL: &str = "qwen2.5:3b";

const CLASSIFY_INSTRUCTION: &str = "You are the referee of a tabletop RPG turn. \
Read the story and classify it into exactly one phase: \
COMBAT, NEGOTIATION, DIALOGUE, EXPLORATION, REST, RECOVERY, or UNKNOWN. \
Respond with only a JSON object, no prose and no code fences: \
{\"phase\": \"<PHASE>\", \"reason\": \"<one short sentence>\", \"confidence\": <0.0-1.0>}";

/// Story interpreter speaking the OpenAI chat-completions wire format.
#[derive(Clone)]
pub struct HttpInterpreter {
    client: Client,
    base_url: String,
    model: String,
}

impl HttpInterpreter {
    /// Creates a client against the given chat endpoint and model.
    #[must_use]
    pub fn new(base_url: &str, model: &str) -> Self {
        // Interpreter calls can be slow; allow up to two minutes.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, EngineError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Interpreter(format!("chat request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Interpreter(format!(
                "chat endpoint answered {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            EngineError::Interpreter(format!("chat response was not valid JSON: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EngineError::Interpreter("chat response held no choices".to_string()))
    }
}

#[async_trait]
impl StoryInterpreter for HttpInterpreter {
    async fn classify_story(&self, story: &str) -> Result<SceneAnalysis, EngineError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: CLASSIFY_INSTRUCTION.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!("Story: {story}"),
            },
        ];

        let answer = self.chat(messages).await?;
        let analysis = parse_analysis(&answer)?;
        debug!(phase = %analysis.phase, confidence = analysis.confidence, "scene classified");

        Ok(analysis)
    }

    async fn choose_item(
        &self,
        candidates: &[String],
        story: &str,
    ) -> Result<String, EngineError> {
        let listing = candidates.join(", ");
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: format!(
                "The player holds these potions: {listing}.\n\
                 Latest story: \"{story}\"\n\
                 Answer with exactly one potion name from the list and nothing else."
            ),
        }];

        let answer = self.chat(messages).await?;

        Ok(answer.trim().to_string())
    }
}

/// Parses the classification answer, tolerating a fenced code block around
/// the JSON object.
fn parse_analysis(answer: &str) -> Result<SceneAnalysis, EngineError> {
    serde_json::from_str(strip_code_fence(answer)).map_err(|e| {
        EngineError::Interpreter(format!("classification answer was not the expected JSON: {e}"))
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Debug, Deserialize)]
struct ChatAnswer {
    #[serde(default)]
    content: Option<String>,
}

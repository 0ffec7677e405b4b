//! Gemini `generateContent` client.
//!
//! Uses the blocking `ureq` agent; calls are short and the CLI is synchronous.

use super::{AssistError, AssistProvider};
use crate::models::PlannedTask;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Gemini API base URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("taskflow/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the Gemini REST API.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint (proxies, local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// POST a request body and return the first candidate's text.
    fn generate(&self, body: Value) -> Result<String, AssistError> {
        if self.api_key.is_empty() {
            return Err(AssistError::MissingApiKey);
        }

        let response = self
            .agent
            .post(&self.endpoint())
            .set("x-goog-api-key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_json(body);

        match response {
            Ok(resp) => {
                let parsed: GenerateContentResponse = resp
                    .into_json()
                    .map_err(|e| AssistError::Parse(e.to_string()))?;
                parsed.first_text()
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(AssistError::Status { code, body })
            }
            Err(e) => Err(AssistError::Http(e.to_string())),
        }
    }
}

impl AssistProvider for GeminiClient {
    fn generate_plan(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Vec<PlannedTask>, AssistError> {
        let text = self.generate(plan_request(title, description))?;
        parse_plan(&text)
    }

    fn improve_description(&self, title: &str, description: &str) -> Result<String, AssistError> {
        self.generate(improve_request(title, description))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn plan_request(title: &str, description: &str) -> Value {
    let prompt = format!(
        "A new project is starting.\n\
         Title: \"{title}\"\n\
         Description: \"{description}\"\n\n\
         Propose 3 to 5 first tasks for it. Use status TODO for most tasks; \
         at most one may be IN_PROGRESS."
    );

    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "status": {
                            "type": "STRING",
                            "enum": ["TODO", "IN_PROGRESS", "DONE"]
                        }
                    },
                    "required": ["title", "description", "status"]
                }
            }
        }
    })
}

fn improve_request(title: &str, description: &str) -> Value {
    let prompt = format!(
        "Task title: \"{title}\"\n\
         Current description: \"{description}\"\n\n\
         Rewrite the description so it is concrete and actionable. \
         Reply with the new description only, in at most three sentences."
    );

    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

fn parse_plan(text: &str) -> Result<Vec<PlannedTask>, AssistError> {
    serde_json::from_str(text).map_err(|e| AssistError::Parse(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Result<String, AssistError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(AssistError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::{Enrichment, Paper, Recommendation};

const MISTRAL_API_URL: &str = "https://api.mistral.ai";
const MISTRAL_MODEL: &str = "mistral-small-latest";

const DEFAULT_NICHE: &str = "Just be general";
const DEFAULT_FOCUS: &str = "Highlight research significance to the field as a whole";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct Enricher {
    client: Client,
    api_key: String,
    base_url: String,
}

impl Enricher {
    pub fn new(client: Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: MISTRAL_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint, e.g. a local proxy.
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }

    /// Summarize and score one paper. A missing paper id is the only hard
    /// failure; an upstream error persists an all-absent enrichment so the
    /// attempt is always recorded on the row.
    pub async fn enrich(&self, repo: &Repository, id: i64) -> Result<Paper> {
        let paper = repo
            .get_paper_by_id(id)
            .await?
            .ok_or(AppError::PaperNotFound(id))?;

        let enrichment = match self.produce_enrichment(repo, &paper).await {
            Ok(enrichment) => enrichment,
            Err(e) => {
                tracing::error!("Error enriching paper {}: {}", id, e);
                Enrichment::absent()
            }
        };

        repo.update_paper_enrichment(&paper.arxiv_id, &enrichment)
            .await?;
        Ok(paper.with_enrichment(enrichment))
    }

    async fn produce_enrichment(&self, repo: &Repository, paper: &Paper) -> Result<Enrichment> {
        let settings = repo.get_user_settings().await?;
        let niche = non_empty_or(&settings.niche_interests, DEFAULT_NICHE);
        let focus = non_empty_or(&settings.additional_params, DEFAULT_FOCUS);

        let prompt = build_prompt(&paper.title, &paper.summary, niche, focus);
        let content = self.complete(&prompt).await?;
        tracing::info!("Model response for paper {}: {}", paper.arxiv_id, content);

        Ok(parse_verdict(&content))
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: MISTRAL_MODEL.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::MistralApi(format!("API error: {}", error_text)));
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::MistralApi("Empty response from model".to_string()))
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn build_prompt(title: &str, abstract_text: &str, niche: &str, focus: &str) -> String {
    format!(
        r#"You are a highly critical AI research assistant evaluating papers for an advanced LLM researcher.
Be selective and skeptical - most papers are incremental and not worth full attention.

User focus:
- Research niche: {niche}
- Summary focus: {focus}

Your task:
1. Summarize the paper in 4-5 sentences, emphasizing information most relevant to the user's focus.
2. Evaluate the paper's novelty and relevance on a scale of 1-10.
    - **Novelty (1-10):** How original or groundbreaking is the work? Penalize rehashed methods or minor extensions.
    - **Relevance (1-10):** How directly important is this to advancing core LLM research or to the user's interests?
3. Provide a **recommendation** based on these criteria:
    - "Yes" -> Both novelty >= 8 and relevance >= 8 (breakthrough or highly relevant)
    - "Maybe" -> Either novelty or relevance 5-7 (solid but incremental)
    - "No" -> Both novelty and relevance < 5 (derivative, niche, or unimpactful)
4. Explain *briefly* why you gave these scores.

Return **only strict JSON** in this format (no extra commentary):
{{
    "summary": "string",
    "novelty": int,
    "relevance": int,
    "recommendation": "Yes | Maybe | No",
    "reasoning": "string (one-sentence justification for your evaluation)"
}}

Title: {title}

Abstract:
{abstract_text}
"#
    )
}

/// Interpret the model's reply. A parseable JSON object yields the full
/// enrichment; anything else degrades to the raw text as the summary with
/// every score absent.
fn parse_verdict(content: &str) -> Enrichment {
    let body = strip_code_fence(content);

    match serde_json::from_str::<Value>(body) {
        Ok(data) => Enrichment {
            ai_summary: data
                .get("summary")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string()),
            novelty_score: coerce_score(data.get("novelty")),
            relevance_score: coerce_score(data.get("relevance")),
            read_recommendation: data
                .get("recommendation")
                .and_then(|v| v.as_str())
                .and_then(Recommendation::parse),
        },
        Err(e) => {
            tracing::error!("Failed to parse JSON from model response: {}", e);
            Enrichment {
                ai_summary: Some(body.trim().to_string()),
                ..Default::default()
            }
        }
    }
}

/// Remove a surrounding markdown code fence, with or without a `json` tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Scores may come back as integers or numeric strings. Zero and absent
/// both count as absent; a score is never stored as 0.
fn coerce_score(value: Option<&Value>) -> Option<i64> {
    let score = match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (score != 0).then_some(score)
}

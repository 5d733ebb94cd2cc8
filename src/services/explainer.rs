//! Natural-language explanations for recommended builds
//!
//! The recommender itself never talks to a language model; handlers pass the
//! winning build to an [`Explainer`]. The OpenAI-backed implementation is used
//! when an API key is configured, the template one otherwise and whenever the
//! model call fails.

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Build, PartType, UsageProfile},
};

const EXPLANATION_CACHE_TTL: u64 = 86_400; // 1 day

/// Everything an explainer needs to describe a build
#[derive(Debug, Clone)]
pub struct ExplanationRequest {
    pub budget: f64,
    pub usage: UsageProfile,
    pub build: Build,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Explainer: Send + Sync {
    /// Writes a short justification of the build for the given budget and usage
    async fn explain(&self, request: &ExplanationRequest) -> AppResult<String>;

    /// Explainer name for logging and debugging
    fn name(&self) -> &'static str;
}

/// One line per part, e.g. `- Video Card: RTX 4070 ($399.00)`
pub fn format_build_details(build: &Build) -> String {
    build
        .parts
        .iter()
        .map(|(part_type, part)| format!("- {}: {} (${:.2})", part_type.label(), part.name, part.price))
        .collect::<Vec<_>>()
        .join("\n")
}

fn usage_focus(usage: UsageProfile) -> &'static str {
    match usage {
        UsageProfile::Gaming => {
            "The video card gets the biggest share of the budget, since it drives frame rates more than anything else."
        }
        UsageProfile::Design => {
            "The CPU and memory are prioritised so large design files stay responsive."
        }
        UsageProfile::VideoEditing => {
            "The CPU and memory carry most of the weight for rendering and smooth timeline playback."
        }
        UsageProfile::OfficeWork => {
            "Fast storage and a capable CPU are favoured over graphics power for everyday productivity."
        }
    }
}

fn usage_name(usage: UsageProfile) -> String {
    usage.as_str().replace('_', " ")
}

// ============================================================================
// Template Explainer
// ============================================================================

/// Deterministic, offline explanation built from the parts list
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn render(request: &ExplanationRequest) -> String {
        let build = &request.build;
        let total = build.total_price();
        let part_name = |t: PartType| build.get(t).map(|p| p.name.as_str()).unwrap_or("n/a");

        let mut text = format!(
            "This {} build comes to ${:.2} of your ${:.2} budget. It pairs the {} with the {}",
            usage_name(request.usage),
            total,
            request.budget,
            part_name(PartType::Cpu),
            part_name(PartType::VideoCard),
        );
        match build.cpu_socket() {
            Some(socket) => text.push_str(&format!(
                ", on a {} motherboard sharing the {} socket. ",
                part_name(PartType::Motherboard),
                socket
            )),
            None => text.push_str(". "),
        }
        text.push_str(usage_focus(request.usage));

        let remaining = request.budget - total;
        if remaining >= 0.01 {
            text.push_str(&format!(
                " That leaves ${:.2} for peripherals or a future upgrade.",
                remaining
            ));
        }

        text.push_str("\n\n");
        text.push_str(&format_build_details(build));
        text
    }
}

#[async_trait::async_trait]
impl Explainer for TemplateExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> AppResult<String> {
        Ok(Self::render(request))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

// ============================================================================
// OpenAI Explainer
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Explainer backed by an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct OpenAiExplainer {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiExplainer {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn prompt(request: &ExplanationRequest) -> String {
        format!(
            "You are an experienced PC hardware advisor.\n\
             A customer asked for a PC with:\n\
             - Budget: ${:.2}\n\
             - Primary use: {}\n\n\
             This build was recommended:\n{}\n\n\
             In 100 to 150 friendly, encouraging words, explain why this build suits the \
             customer's use and budget. Focus on why the CPU and video card fit the intended \
             use, and mention any sensible trade-offs made to stay within budget.",
            request.budget,
            usage_name(request.usage),
            format_build_details(&request.build),
        )
    }
}

#[async_trait::async_trait]
impl Explainer for OpenAiExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: 0.7,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(request),
            }],
        };

        tracing::debug!(model = %self.model, "Requesting build explanation");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Explanation API error");
            return Err(AppError::ExternalApi(format!(
                "Explanation API returned {}",
                status
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AppError::ExternalApi("Explanation API returned no content".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// Caching Explainer
// ============================================================================

/// Wraps another explainer with a Redis read-through cache
#[derive(Clone)]
pub struct CachingExplainer {
    inner: Arc<dyn Explainer>,
    cache: Cache,
}

impl CachingExplainer {
    pub fn new(inner: Arc<dyn Explainer>, cache: Cache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait::async_trait]
impl Explainer for CachingExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> AppResult<String> {
        let key = CacheKey::explanation(request.usage, request.budget, &request.build);
        let inner = self.inner.clone();

        cached!(self.cache, key, EXPLANATION_CACHE_TTL, async move {
            inner.explain(request).await
        })
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

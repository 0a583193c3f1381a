use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::credibility::CredibilityAssessment;
use super::{
    EnrichmentError, ResultEnricher, CREDIBILITY_UNAVAILABLE, SUMMARY_FAILED,
    SUMMARY_NOT_CONFIGURED, SUMMARY_UNAVAILABLE,
};
use crate::config::LLMConfig;
use crate::llm::provider::{LLMProviderConfig, LLM};
use crate::models::RawResult;
use crate::types::{LLMMessage, LLMRequest};

/// Characters of result content the summarizer sees.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 3000;

const SUMMARY_SYSTEM_PROMPT: &str = "You are a medical AI assistant helping healthcare professionals understand clinical evidence. Provide accurate, evidence-based summaries.";
const CREDIBILITY_SYSTEM_PROMPT: &str = "You are a medical information specialist assessing source credibility for healthcare professionals.";
const QUESTIONS_SYSTEM_PROMPT: &str = "You are a medical educator helping healthcare professionals formulate clinical questions.";

/// Language-model backed enrichment. Without a credential it never calls
/// out and answers every request with a sentinel.
pub struct EnrichmentClient {
    llm: Option<LLM>,
    model: String,
}

impl EnrichmentClient {
    pub fn from_config(config: &LLMConfig) -> Self {
        if config.openai_api_key.is_empty() {
            warn!("OPENAI_API_KEY environment variable not set");
            return Self::unconfigured();
        }

        let llm = LLM::new(LLMProviderConfig {
            name: "openai".to_string(),
            api_key: config.openai_api_key.clone(),
            base_url: config.base_url.clone(),
        });

        match llm {
            Ok(llm) => Self::with_llm(llm, config.default_model.clone()),
            Err(e) => {
                error!(error = %e, "Failed to create LLM client, enrichment disabled");
                Self::unconfigured()
            }
        }
    }

    pub fn with_llm(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm: Some(llm),
            model: model.into(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            llm: None,
            model: String::new(),
        }
    }

    async fn complete(
        &self,
        system: &str,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
        json_mode: bool,
    ) -> Result<String, EnrichmentError> {
        let llm = self.llm.as_ref().ok_or(EnrichmentError::NotConfigured)?;

        let request = LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::system(system), LLMMessage::user(prompt)],
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            json_mode,
        };

        let response = llm
            .create_chat_completion(&request)
            .await
            .map_err(|e| EnrichmentError::Llm(e.to_string()))?;

        debug!(
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Language model call completed"
        );

        let content = response.content.trim();
        if content.is_empty() {
            return Err(EnrichmentError::EmptyResponse);
        }
        Ok(content.to_string())
    }

    pub async fn try_summarize(
        &self,
        content: &str,
        query_context: &str,
    ) -> Result<String, EnrichmentError> {
        self.complete(
            SUMMARY_SYSTEM_PROMPT,
            summary_prompt(content, query_context),
            400,
            0.3,
            false,
        )
        .await
    }

    pub async fn try_assess_credibility(
        &self,
        source: &RawResult,
    ) -> Result<String, EnrichmentError> {
        let reply = self
            .complete(
                CREDIBILITY_SYSTEM_PROMPT,
                credibility_prompt(source),
                200,
                0.2,
                true,
            )
            .await?;

        Ok(CredibilityAssessment::parse(&reply)?.label())
    }

    pub async fn try_generate_questions(&self, topic: &str) -> Result<Vec<String>, EnrichmentError> {
        let reply = self
            .complete(QUESTIONS_SYSTEM_PROMPT, questions_prompt(topic), 300, 0.4, false)
            .await?;
        Ok(parse_questions(&reply))
    }
}

#[async_trait]
impl ResultEnricher for EnrichmentClient {
    async fn summarize(&self, content: &str, query_context: &str) -> String {
        match self.try_summarize(content, query_context).await {
            Ok(summary) => summary,
            Err(EnrichmentError::NotConfigured) => SUMMARY_NOT_CONFIGURED.to_string(),
            Err(EnrichmentError::EmptyResponse) => SUMMARY_UNAVAILABLE.to_string(),
            Err(e) => {
                error!(error = %e, "Summarization failed");
                SUMMARY_FAILED.to_string()
            }
        }
    }

    async fn assess_credibility(&self, source: &RawResult) -> String {
        match self.try_assess_credibility(source).await {
            Ok(label) => label,
            Err(EnrichmentError::NotConfigured) => CREDIBILITY_UNAVAILABLE.to_string(),
            Err(EnrichmentError::Parse(e)) => {
                warn!(error = %e, url = %source.url, "Credibility reply was not valid JSON");
                CREDIBILITY_UNAVAILABLE.to_string()
            }
            Err(e) => {
                error!(error = %e, url = %source.url, "Credibility assessment failed");
                CREDIBILITY_UNAVAILABLE.to_string()
            }
        }
    }

    async fn generate_questions(&self, topic: &str) -> Vec<String> {
        match self.try_generate_questions(topic).await {
            Ok(questions) => questions,
            Err(EnrichmentError::NotConfigured) => Vec::new(),
            Err(e) => {
                error!(error = %e, "Question generation failed");
                Vec::new()
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.llm.is_some()
    }
}

fn summary_prompt(content: &str, query_context: &str) -> String {
    let context = if query_context.trim().is_empty() {
        String::new()
    } else {
        format!(" in relation to the medical query about '{}'", query_context.trim())
    };
    let excerpt: String = content.chars().take(MAX_SUMMARY_INPUT_CHARS).collect();

    format!(
        r#"Write a concise clinical summary of the medical content below{context}.

Cover:
- Key clinical findings and the evidence behind them
- Diagnostic criteria or treatment recommendations
- Level of evidence and study quality
- Relevance for practising clinicians
- Contraindications or warnings, if any

MEDICAL CONTENT:
{excerpt}

Answer in 2-3 short paragraphs written for healthcare professionals."#
    )
}

fn credibility_prompt(source: &RawResult) -> String {
    format!(
        r#"Rate the medical credibility of this source for healthcare professionals:

Title: {title}
URL: {url}
Source Type: {source_type}

Consider the source's reputation in medicine, peer-review status, editorial standards and evidence level.

Respond with ONLY a JSON object of this shape:
{{"credibility_level": "High|Medium|Low", "confidence": 0.85, "reasoning": "Brief explanation"}}"#,
        title = source.title,
        url = source.url,
        source_type = source.source_type,
    )
}

fn questions_prompt(topic: &str) -> String {
    format!(
        r#"List 5 clinical questions healthcare professionals commonly ask about {topic}.

Spread them over diagnosis, treatment options, risk factors, prognosis and management guidelines.

Return only the questions, one per line."#
    )
}

fn parse_questions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(|line| line.trim().trim_matches(|c: char| c == '-' || c == ' ').trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

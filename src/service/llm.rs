//! Shared LLM client and structured extraction
//!
//! The reasoning backend is consumed through [`StructuredReasoner`]: given a
//! system prompt, a user prompt and a target type, it returns a value of that
//! type or fails. [`RigReasoner`] implements it with rig extractors over OpenAI
//! or Azure OpenAI.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::CompletionModel;
use rig::extractor::{ExtractionError, ExtractorBuilder};
use rig::providers::{azure, openai};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::config::{LlmBackend, ReasoningSettings};

/// Temperature used for every call, so identical inputs yield reproducible answers
pub const DETERMINISTIC_TEMPERATURE: f64 = 0.0;

/// Shared LLM client for the configured provider
#[derive(Clone)]
pub enum LlmClient {
    OpenAi(openai::Client),
    Azure(azure::Client),
}

impl LlmClient {
    /// Create the client selected by `backend`
    pub fn new(backend: &LlmBackend) -> Result<Self, String> {
        match backend {
            LlmBackend::OpenAi { api_key } => openai::Client::new(api_key.as_str())
                .map(LlmClient::OpenAi)
                .map_err(|e| format!("Failed to create OpenAI client: {}", e)),
            LlmBackend::Azure(settings) => azure::Client::builder()
                .api_key(azure::AzureOpenAIAuth::ApiKey(settings.api_key.clone()))
                .azure_endpoint(settings.endpoint.clone())
                .api_version(&settings.api_version)
                .build()
                .map(LlmClient::Azure)
                .map_err(|e| format!("Failed to create Azure OpenAI client: {}", e)),
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            LlmClient::OpenAi(_) => "openai",
            LlmClient::Azure(_) => "azure",
        }
    }
}

/// Kind of judgment requested from the reasoning backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningTask {
    Classification,
    ContradictionDetection,
}

impl ReasoningTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningTask::Classification => "classification",
            ReasoningTask::ContradictionDetection => "contradiction_detection",
        }
    }
}

/// One structured call to the reasoning backend
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub task: ReasoningTask,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f64,
    pub max_output_tokens: u64,
}

impl ReasoningRequest {
    /// Build a request decoded at temperature 0
    pub fn deterministic(
        task: ReasoningTask,
        system_prompt: String,
        user_prompt: String,
        max_output_tokens: u64,
    ) -> Self {
        Self {
            task,
            system_prompt,
            user_prompt,
            temperature: DETERMINISTIC_TEMPERATURE,
            max_output_tokens,
        }
    }
}

/// Error type for calls to the reasoning backend
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReasoningError {
    /// The call itself failed (network, authentication, rate limit)
    #[error("LLM call failed: {0}")]
    Provider(String),

    /// The answer could not be parsed into the requested structure
    #[error("LLM response did not match the expected structure: {0}")]
    MalformedResponse(String),

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<ExtractionError> for ReasoningError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoData => {
                ReasoningError::MalformedResponse("no structured data returned".to_string())
            }
            ExtractionError::DeserializationError(e) => {
                ReasoningError::MalformedResponse(e.to_string())
            }
            ExtractionError::CompletionError(e) => ReasoningError::Provider(e.to_string()),
        }
    }
}

/// Bound a reasoning call by `limit`
///
/// An elapsed limit becomes [`ReasoningError::Timeout`]; the call is not retried.
pub async fn with_timeout<F, T, E>(limit: Duration, call: F) -> Result<T, ReasoningError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ReasoningError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(outcome) => outcome.map_err(Into::into),
        Err(_) => Err(ReasoningError::Timeout(limit)),
    }
}

/// Types the reasoning backend can be asked to produce
pub trait Extractable: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static {}

impl<T> Extractable for T where T: JsonSchema + DeserializeOwned + Serialize + Send + Sync + 'static {}

/// Reasoning backend returning structured answers
#[async_trait]
pub trait StructuredReasoner: Send + Sync {
    async fn extract<T: Extractable>(&self, request: ReasoningRequest) -> Result<T, ReasoningError>;
}

/// Reasoner using rig extractors against the configured provider
#[derive(Clone)]
pub struct RigReasoner {
    llm_client: LlmClient,
    model: String,
    timeout: Duration,
}

impl RigReasoner {
    pub fn new(llm_client: LlmClient, settings: &ReasoningSettings) -> Self {
        tracing::info!(
            model = %settings.model,
            max_output_tokens = settings.max_output_tokens,
            timeout_secs = settings.request_timeout_secs,
            "Reasoning backend initialized"
        );

        Self {
            llm_client,
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }

    /// Run one extraction with the request's preamble and decoding settings
    async fn run<M, T>(
        &self,
        builder: ExtractorBuilder<M, T>,
        request: &ReasoningRequest,
    ) -> Result<T, ReasoningError>
    where
        M: CompletionModel,
        T: Extractable,
    {
        let extractor = builder
            .preamble(&request.system_prompt)
            .max_tokens(request.max_output_tokens)
            .additional_params(serde_json::json!({
                "temperature": request.temperature
            }))
            .build();

        with_timeout(self.timeout, extractor.extract(request.user_prompt.as_str())).await
    }
}

#[async_trait]
impl StructuredReasoner for RigReasoner {
    async fn extract<T: Extractable>(&self, request: ReasoningRequest) -> Result<T, ReasoningError> {
        let start_time = Instant::now();
        let task = request.task.as_str();
        let prompt_length = request.user_prompt.len();

        tracing::debug!(
            task = task,
            model = %self.model,
            prompt_length = prompt_length,
            max_output_tokens = request.max_output_tokens,
            provider = self.llm_client.provider(),
            "Initiating LLM API call"
        );

        let outcome = match &self.llm_client {
            LlmClient::OpenAi(client) => {
                self.run(client.extractor::<T>(self.model.as_str()), &request).await
            }
            LlmClient::Azure(client) => {
                self.run(client.extractor::<T>(self.model.as_str()), &request).await
            }
        };
        let elapsed = start_time.elapsed();

        match &outcome {
            Ok(_) => tracing::info!(
                task = task,
                model = %self.model,
                elapsed_ms = elapsed.as_millis(),
                prompt_length = prompt_length,
                "LLM API call completed successfully"
            ),
            Err(e) => tracing::error!(
                task = task,
                model = %self.model,
                elapsed_ms = elapsed.as_millis(),
                prompt_length = prompt_length,
                error = %e,
                "LLM API call failed"
            ),
        }

        outcome
    }
}

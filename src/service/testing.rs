//! Test doubles for the reasoning backend

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::service::llm::{
    Extractable, ReasoningError, ReasoningRequest, ReasoningTask, StructuredReasoner,
};
use crate::service::prompts::{PromptError, PromptParams, PromptProvider};

/// Prompt provider without any template
pub struct NoPrompts;

impl PromptProvider for NoPrompts {
    fn system_prompt(&self, template: &str, _params: &PromptParams) -> Result<String, PromptError> {
        Err(PromptError::NotFound(template.to_string()))
    }

    fn user_prompt(&self, template: &str, _params: &PromptParams) -> Result<String, PromptError> {
        Err(PromptError::NotFound(template.to_string()))
    }
}

enum Reply {
    Json(Value),
    Fail(String),
}

struct Rule {
    task: ReasoningTask,
    /// Matched against the user prompt; `None` matches any prompt
    needle: Option<String>,
    reply: Reply,
}

/// Reasoner answering from scripted JSON and recording every request
///
/// Replies go through the real serde shapes, so a scripted value that does
/// not fit the requested type fails like a malformed model answer.
#[derive(Default)]
pub struct ScriptedReasoner {
    rules: Vec<Rule>,
    requests: Mutex<Vec<ReasoningRequest>>,
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_classification(mut self, reply: Value) -> Self {
        self.rules.push(Rule {
            task: ReasoningTask::Classification,
            needle: None,
            reply: Reply::Json(reply),
        });
        self
    }

    /// Answer contradiction detection for categories whose listing contains `needle`
    pub fn on_contradiction(mut self, needle: &str, reply: Value) -> Self {
        self.rules.push(Rule {
            task: ReasoningTask::ContradictionDetection,
            needle: Some(needle.to_string()),
            reply: Reply::Json(reply),
        });
        self
    }

    pub fn failing(mut self, task: ReasoningTask, message: &str) -> Self {
        self.rules.push(Rule {
            task,
            needle: None,
            reply: Reply::Fail(message.to_string()),
        });
        self
    }

    pub fn requests(&self) -> Vec<ReasoningRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, task: ReasoningTask) -> Vec<ReasoningRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.task == task)
            .collect()
    }
}

#[async_trait]
impl StructuredReasoner for ScriptedReasoner {
    async fn extract<T: Extractable>(&self, request: ReasoningRequest) -> Result<T, ReasoningError> {
        self.requests.lock().unwrap().push(request.clone());

        let rule = self.rules.iter().find(|rule| {
            rule.task == request.task
                && rule
                    .needle
                    .as_deref()
                    .is_none_or(|needle| request.user_prompt.contains(needle))
        });

        match rule.map(|r| &r.reply) {
            Some(Reply::Json(value)) => serde_json::from_value(value.clone())
                .map_err(|e| ReasoningError::MalformedResponse(e.to_string())),
            Some(Reply::Fail(message)) => Err(ReasoningError::Provider(message.clone())),
            None => Err(ReasoningError::Provider(format!(
                "no scripted reply for {} request",
                request.task.as_str()
            ))),
        }
    }
}

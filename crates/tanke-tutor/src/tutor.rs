//! Socratic tutor client.
//!
//! [`TutorClient`] is the single failure boundary between the progression
//! engine and the remote model: whatever goes wrong on the way, the caller
//! receives a [`TutorReply`], falling back to [`FALLBACK_REPLY`].

use std::sync::Arc;

use async_trait::async_trait;
use tanke_core::diagnosis;
use tanke_models::{ChatMessage, LearningStatus, Role};
use tracing::{debug, error};

use crate::client::{Content, GenerateRequest, GenerationConfig, Part};
use crate::config::ModelConfig;
use crate::error::{Result, TutorError};
use crate::model::GenerativeModel;
use crate::prompts;

/// Reply shown when the model cannot be reached or answers with nothing usable.
pub const FALLBACK_REPLY: &str = "老师连接中途开小差了，请再说一遍好吗？";

/// A tutor turn: text for the student plus an optional hidden diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorReply {
    pub text: String,
    pub diagnosis: Option<LearningStatus>,
}

impl TutorReply {
    /// Reply without a diagnosis.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            diagnosis: None,
        }
    }

    /// The fixed transient-failure reply.
    pub fn fallback() -> Self {
        Self::text(FALLBACK_REPLY)
    }

    /// Check if this is the transient-failure reply.
    pub fn is_fallback(&self) -> bool {
        self.text == FALLBACK_REPLY && self.diagnosis.is_none()
    }
}

/// Something that answers a student's turn.
///
/// `ask` never fails: implementations convert every collaborator failure
/// into a normal reply.
#[async_trait]
pub trait Tutor: Send + Sync {
    /// Answer given the full transcript and the question in focus.
    async fn ask(&self, transcript: &[ChatMessage], active_question: &str) -> TutorReply;
}

/// Tutor backed by a [`GenerativeModel`].
///
/// Stateless between calls; the transcript is passed in every time.
pub struct TutorClient {
    model: Arc<dyn GenerativeModel>,
    config: ModelConfig,
}

impl TutorClient {
    /// Create a client with the default tutor configuration.
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self::with_config(model, ModelConfig::tutor())
    }

    /// Create a client with an explicit configuration.
    pub fn with_config(model: Arc<dyn GenerativeModel>, config: ModelConfig) -> Self {
        Self { model, config }
    }

    /// Model configuration in use.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Build the request for one turn.
    pub fn build_request(&self, transcript: &[ChatMessage], active_question: &str) -> GenerateRequest {
        GenerateRequest {
            contents: to_contents(transcript),
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
                max_output_tokens: self.config.max_output_tokens,
                ..Default::default()
            }),
        }
        .with_system_instruction(prompts::tutor_directive(active_question))
    }

    async fn try_ask(&self, transcript: &[ChatMessage], active_question: &str) -> Result<String> {
        let request = self.build_request(transcript, active_question);
        let response = self.model.generate(&self.config.model, &request).await?;
        response.text().ok_or(TutorError::EmptyResponse("text"))
    }
}

#[async_trait]
impl Tutor for TutorClient {
    async fn ask(&self, transcript: &[ChatMessage], active_question: &str) -> TutorReply {
        match self.try_ask(transcript, active_question).await {
            Ok(raw) => {
                let outcome = diagnosis::extract(&raw);
                let (text, diagnosis) = outcome.into_reply(&raw);
                debug!(
                    reply_len = text.len(),
                    mastery = diagnosis.as_ref().map(|d| d.mastery_level),
                    "Tutor replied"
                );
                TutorReply { text, diagnosis }
            }
            Err(e) => {
                error!(error = %e, "Tutor request failed, using fallback reply");
                TutorReply::fallback()
            }
        }
    }
}

/// Map transcript messages to role-tagged contents.
///
/// Consecutive messages with the same role are merged into one turn, since
/// the API expects user and model turns to alternate.
pub fn to_contents(transcript: &[ChatMessage]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();

    for message in transcript {
        let role = match message.role {
            Role::User => "user",
            Role::Model => "model",
        };

        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => {
                last.parts.push(Part::text(&message.text));
            }
            _ => contents.push(Content {
                role: Some(role.to_string()),
                parts: vec![Part::text(&message.text)],
            }),
        }
    }

    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenerateResponse;
    use std::sync::Mutex;

    /// Scripted model returning canned results and recording requests.
    struct ScriptedModel {
        result: Mutex<Option<Result<GenerateResponse>>>,
        requests: Mutex<Vec<(String, GenerateRequest)>>,
    }

    impl ScriptedModel {
        fn new(result: Result<GenerateResponse>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn replying(text: &str) -> Arc<Self> {
            let json = serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            });
            Self::new(Ok(serde_json::from_value(json).unwrap()))
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(TutorError::ModelInvocation("exhausted".into())))
        }
    }

    fn transcript() -> Vec<ChatMessage> {
        vec![
            ChatMessage::model("第一个挑战：木块和石块都受浮力吗？"),
            ChatMessage::user("木块受浮力"),
        ]
    }

    #[tokio::test]
    async fn test_ask_extracts_diagnosis() {
        let model = ScriptedModel::replying(
            "石块也受浮力哦，想想测力计示数。\n<diagnosis>{\"masteryLevel\": 73, \"identifiedGaps\": [\"下沉物体的浮力\"], \"recommendedAction\": \"观察称重法实验\"}</diagnosis>",
        );
        let tutor = TutorClient::with_config(model.clone(), ModelConfig::new("gemini-test"));

        let reply = tutor.ask(&transcript(), "木块和石块都受浮力吗？").await;

        assert_eq!(reply.text, "石块也受浮力哦，想想测力计示数。");
        assert_eq!(reply.diagnosis.unwrap().mastery_level, 73);

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (model_id, request) = &requests[0];
        assert_eq!(model_id, "gemini-test");
        assert_eq!(request.contents.len(), 2);
        let directive = request.system_instruction.as_ref().unwrap().parts[0]
            .text
            .as_deref()
            .unwrap();
        assert!(directive.ends_with("当前目标问题：木块和石块都受浮力吗？"));
    }

    #[tokio::test]
    async fn test_ask_keeps_text_on_malformed_diagnosis() {
        let raw = "再想想。<diagnosis>{\"masteryLevel\": 7</diagnosis>";
        let tutor = TutorClient::new(ScriptedModel::replying(raw));

        let reply = tutor.ask(&transcript(), "Q").await;
        assert_eq!(reply.text, raw);
        assert!(reply.diagnosis.is_none());
        assert!(!reply.is_fallback());
    }

    #[tokio::test]
    async fn test_ask_falls_back_on_transport_error() {
        let model = ScriptedModel::new(Err(TutorError::ModelInvocation("timeout".into())));
        let tutor = TutorClient::new(model);

        let reply = tutor.ask(&transcript(), "Q").await;
        assert!(reply.is_fallback());
        assert_eq!(reply.text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_ask_falls_back_on_empty_response() {
        let model = ScriptedModel::new(Ok(GenerateResponse::default()));
        let tutor = TutorClient::new(model);

        let reply = tutor.ask(&transcript(), "Q").await;
        assert!(reply.is_fallback());
    }

    #[test]
    fn test_to_contents_merges_same_role() {
        let transcript = vec![
            ChatMessage::model("intro"),
            ChatMessage::model("next question"),
            ChatMessage::user("answer"),
            ChatMessage::model("reply"),
        ];

        let contents = to_contents(&transcript);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("model"));
        assert_eq!(contents[0].parts.len(), 2);
        assert_eq!(contents[1].role.as_deref(), Some("user"));
        assert_eq!(contents[2].parts[0].text.as_deref(), Some("reply"));
    }

    #[test]
    fn test_request_uses_config_temperature() {
        let tutor = TutorClient::with_config(
            ScriptedModel::replying("x"),
            ModelConfig::new("m").with_temperature(0.3),
        );
        let request = tutor.build_request(&transcript(), "Q");
        assert_eq!(request.generation_config.unwrap().temperature, Some(0.3));
    }
}

//! Studio content generators.
//!
//! Each tool makes one structured request and either returns a complete,
//! validated artifact or an error. There are no partial results.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tanke_core::config;
use tanke_models::Dimension;
use tracing::{debug, info};

use crate::client::{GenerateRequest, GenerationConfig};
use crate::config::ModelConfig;
use crate::error::{Result, TutorError};
use crate::model::GenerativeModel;
use crate::prompts;

/// Sample rate of speech output.
pub const AUDIO_SAMPLE_RATE: u32 = 24_000;

/// Prebuilt voice used for audio overviews.
pub const AUDIO_VOICE: &str = "Kore";

const QUIZ_OPTIONS: usize = 4;
const GAME_OPTIONS: usize = 3;

/// A single-choice quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Check whether `choice` is the correct option.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// Concept on the front, short explanation on the back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// One slide of a lesson outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
    /// Description used to render the slide's illustration.
    pub visual_prompt: String,
}

/// A decision the player can take in a game scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOption {
    pub label: String,
    pub outcome: String,
    pub is_correct: bool,
    pub scientific_reason: String,
}

/// A one-decision science adventure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScenario {
    pub title: String,
    pub mission: String,
    pub context: String,
    pub options: Vec<GameOption>,
}

/// Studio tools backed by a [`GenerativeModel`].
pub struct Studio {
    model: Arc<dyn GenerativeModel>,
    config: ModelConfig,
    image_model: String,
    speech_model: String,
}

impl Studio {
    /// Create a Studio with the default model selection.
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            config: ModelConfig::studio(),
            image_model: config::DEFAULT_IMAGE_MODEL.to_string(),
            speech_model: config::DEFAULT_SPEECH_MODEL.to_string(),
        }
    }

    /// Override the model used for structured text output.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate three single-choice questions.
    pub async fn quiz(&self, topic: &str, dimension: Dimension) -> Result<Vec<QuizQuestion>> {
        let questions: Vec<QuizQuestion> = self
            .structured("quiz", prompts::quiz_prompt(topic, dimension), quiz_schema())
            .await?;
        validate_quiz(&questions)?;
        Ok(questions)
    }

    /// Generate concept flashcards.
    pub async fn flashcards(&self, topic: &str, dimension: Dimension) -> Result<Vec<Flashcard>> {
        let cards: Vec<Flashcard> = self
            .structured(
                "flashcards",
                prompts::flashcards_prompt(topic, dimension),
                flashcards_schema(),
            )
            .await?;
        if cards.is_empty() {
            return Err(invalid("flashcards", "no cards returned"));
        }
        Ok(cards)
    }

    /// Generate a slide outline.
    pub async fn slides(&self, topic: &str, dimension: Dimension) -> Result<Vec<Slide>> {
        let slides: Vec<Slide> = self
            .structured("slides", prompts::slides_prompt(topic, dimension), slides_schema())
            .await?;
        if slides.is_empty() {
            return Err(invalid("slides", "no slides returned"));
        }
        Ok(slides)
    }

    /// Render one slide illustration as a `data:` URL.
    pub async fn slide_image(&self, visual_prompt: &str) -> Result<String> {
        self.image(prompts::slide_image_prompt(visual_prompt), "16:9")
            .await
    }

    /// Render an infographic as a `data:` URL.
    pub async fn infographic(&self, topic: &str, dimension: Dimension) -> Result<String> {
        self.image(prompts::infographic_prompt(topic, dimension), "3:4")
            .await
    }

    /// Generate a spoken overview and return its base64 PCM payload.
    pub async fn audio_overview(&self, topic: &str, dimension: Dimension) -> Result<String> {
        let request = GenerateRequest::prompt(prompts::audio_prompt(topic, dimension))
            .with_generation_config(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(json!({
                    "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": AUDIO_VOICE}}
                })),
                ..Default::default()
            });

        let response = self.model.generate(&self.speech_model, &request).await?;
        let data = response
            .parts()
            .first()
            .and_then(|p| p.inline_data.as_ref())
            .map(|d| d.data.clone())
            .ok_or(TutorError::EmptyResponse("audio data"))?;

        info!(%dimension, bytes = data.len(), "Generated audio overview");
        Ok(data)
    }

    /// Generate a game scenario.
    pub async fn game(&self, topic: &str, dimension: Dimension) -> Result<GameScenario> {
        let scenario: GameScenario = self
            .structured("game", prompts::game_prompt(topic, dimension), game_schema())
            .await?;
        validate_game(&scenario)?;
        Ok(scenario)
    }

    async fn structured<T: DeserializeOwned>(
        &self,
        tool: &'static str,
        prompt: String,
        schema: Value,
    ) -> Result<T> {
        let mut generation = GenerationConfig::json(schema);
        generation.temperature = Some(self.config.temperature);
        generation.max_output_tokens = self.config.max_output_tokens;

        let request = GenerateRequest::prompt(prompt).with_generation_config(generation);
        let response = self.model.generate(&self.config.model, &request).await?;
        let text = response.text().ok_or(TutorError::EmptyResponse("text"))?;

        debug!(tool, len = text.len(), "Structured Studio output received");
        serde_json::from_str(&text).map_err(|e| invalid(tool, e.to_string()))
    }

    async fn image(&self, prompt: String, aspect_ratio: &str) -> Result<String> {
        let request = GenerateRequest::prompt(prompt).with_generation_config(GenerationConfig {
            image_config: Some(json!({ "aspectRatio": aspect_ratio })),
            ..Default::default()
        });

        let response = self.model.generate(&self.image_model, &request).await?;
        response
            .inline_data()
            .map(|d| d.to_data_url())
            .ok_or(TutorError::EmptyResponse("image data"))
    }
}

fn invalid(tool: &'static str, message: impl Into<String>) -> TutorError {
    TutorError::InvalidPayload {
        tool,
        message: message.into(),
    }
}

/// Check quiz shape: non-empty, four options each, answer index in bounds.
pub fn validate_quiz(questions: &[QuizQuestion]) -> Result<()> {
    if questions.is_empty() {
        return Err(invalid("quiz", "no questions returned"));
    }
    for (i, q) in questions.iter().enumerate() {
        if q.options.len() != QUIZ_OPTIONS {
            return Err(invalid(
                "quiz",
                format!("question {} has {} options", i + 1, q.options.len()),
            ));
        }
        if q.correct_answer >= q.options.len() {
            return Err(invalid(
                "quiz",
                format!("answer index {} out of range", q.correct_answer),
            ));
        }
    }
    Ok(())
}

/// Check game shape: three options with at least one correct.
pub fn validate_game(scenario: &GameScenario) -> Result<()> {
    if scenario.options.len() != GAME_OPTIONS {
        return Err(invalid(
            "game",
            format!("expected {} options, got {}", GAME_OPTIONS, scenario.options.len()),
        ));
    }
    if !scenario.options.iter().any(|o| o.is_correct) {
        return Err(invalid("game", "no correct option"));
    }
    Ok(())
}

/// Count correct answers. Unanswered questions (`None`) count as wrong.
pub fn score_quiz(questions: &[QuizQuestion], answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| a.is_some_and(|choice| q.is_correct(choice)))
        .count()
}

/// Decode a base64 16-bit little-endian PCM payload into samples in `[-1, 1)`.
///
/// A trailing odd byte is ignored.
pub fn decode_pcm16(payload: &str) -> Result<Vec<f32>> {
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

fn string_array() -> Value {
    json!({"type": "ARRAY", "items": {"type": "STRING"}})
}

fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": {"type": "STRING"},
                "options": {
                    "type": "ARRAY",
                    "items": {"type": "STRING"},
                    "minItems": QUIZ_OPTIONS,
                    "maxItems": QUIZ_OPTIONS
                },
                "correctAnswer": {"type": "INTEGER"},
                "explanation": {"type": "STRING"}
            },
            "required": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

fn flashcards_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "front": {"type": "STRING"},
                "back": {"type": "STRING"}
            },
            "required": ["front", "back"]
        }
    })
}

fn slides_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "bullets": string_array(),
                "visualPrompt": {"type": "STRING"}
            },
            "required": ["title", "bullets", "visualPrompt"]
        }
    })
}

fn game_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {"type": "STRING"},
            "mission": {"type": "STRING"},
            "context": {"type": "STRING"},
            "options": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": {"type": "STRING"},
                        "outcome": {"type": "STRING"},
                        "isCorrect": {"type": "BOOLEAN"},
                        "scientificReason": {"type": "STRING"}
                    },
                    "required": ["label", "outcome", "isCorrect", "scientificReason"]
                },
                "minItems": GAME_OPTIONS,
                "maxItems": GAME_OPTIONS
            }
        },
        "required": ["title", "mission", "context", "options"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenerateResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed body and records the model ID and request.
    struct CannedModel {
        body: Value,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl CannedModel {
        fn text(text: &str) -> Arc<Self> {
            Self::body(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            }))
        }

        fn inline(mime: &str, data: &str) -> Arc<Self> {
            Self::body(json!({
                "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": mime, "data": data}}]}}]
            }))
        }

        fn body(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn last_call(&self) -> (String, Value) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), serde_json::to_value(request)?));
            Ok(serde_json::from_value(self.body.clone())?)
        }
    }

    fn quiz_json(answer: usize) -> String {
        json!([{
            "question": "浮力的方向是？",
            "options": ["竖直向上", "竖直向下", "水平", "不确定"],
            "correctAnswer": answer,
            "explanation": "浮力总是竖直向上"
        }])
        .to_string()
    }

    #[tokio::test]
    async fn test_quiz_parses_and_sends_schema() {
        let model = CannedModel::text(&quiz_json(0));
        let studio = Studio::new(model.clone()).with_config(ModelConfig::new("studio-test"));

        let quiz = studio.quiz("水的浮力", Dimension::What).await.unwrap();
        assert_eq!(quiz.len(), 1);
        assert!(quiz[0].is_correct(0));

        let (model_id, request) = model.last_call();
        assert_eq!(model_id, "studio-test");
        let generation = &request["generationConfig"];
        assert_eq!(generation["responseMimeType"], "application/json");
        assert_eq!(generation["responseSchema"]["items"]["properties"]["options"]["maxItems"], 4);
        assert!(request["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("\"是何\"维度"));
    }

    #[tokio::test]
    async fn test_quiz_rejects_out_of_range_answer() {
        let studio = Studio::new(CannedModel::text(&quiz_json(4)));
        let err = studio.quiz("水的浮力", Dimension::What).await.unwrap_err();
        assert!(matches!(err, TutorError::InvalidPayload { tool: "quiz", .. }));
    }

    #[tokio::test]
    async fn test_flashcards_reject_garbage() {
        let studio = Studio::new(CannedModel::text("not json"));
        let err = studio.flashcards("水的浮力", Dimension::Why).await.unwrap_err();
        assert!(matches!(err, TutorError::InvalidPayload { tool: "flashcards", .. }));
    }

    #[tokio::test]
    async fn test_slides_parse_camel_case() {
        let body = json!([{"title": "浮力", "bullets": ["a", "b", "c"], "visualPrompt": "a boat"}]);
        let studio = Studio::new(CannedModel::text(&body.to_string()));

        let slides = studio.slides("水的浮力", Dimension::How).await.unwrap();
        assert_eq!(slides[0].visual_prompt, "a boat");
        assert_eq!(slides[0].bullets.len(), 3);
    }

    #[tokio::test]
    async fn test_game_requires_a_correct_option() {
        let option = |correct: bool| {
            json!({"label": "l", "outcome": "o", "isCorrect": correct, "scientificReason": "r"})
        };
        let body = json!({
            "title": "沉船打捞",
            "mission": "m",
            "context": "c",
            "options": [option(false), option(false), option(false)]
        });
        let studio = Studio::new(CannedModel::text(&body.to_string()));
        assert!(studio.game("水的浮力", Dimension::WhatIf).await.is_err());

        let body = json!({
            "title": "沉船打捞",
            "mission": "m",
            "context": "c",
            "options": [option(false), option(true), option(false)]
        });
        let studio = Studio::new(CannedModel::text(&body.to_string()));
        let game = studio.game("水的浮力", Dimension::WhatIf).await.unwrap();
        assert_eq!(game.options.iter().filter(|o| o.is_correct).count(), 1);
    }

    #[tokio::test]
    async fn test_infographic_returns_data_url() {
        let model = CannedModel::inline("image/png", "iVBORw0KGgo=");
        let studio = Studio::new(model.clone());

        let url = studio.infographic("水的浮力", Dimension::Whence).await.unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");

        let (model_id, request) = model.last_call();
        assert_eq!(model_id, config::DEFAULT_IMAGE_MODEL);
        assert_eq!(request["generationConfig"]["imageConfig"]["aspectRatio"], "3:4");
    }

    #[tokio::test]
    async fn test_image_without_inline_data_fails() {
        let studio = Studio::new(CannedModel::text("sorry"));
        let err = studio.slide_image("a ship").await.unwrap_err();
        assert!(matches!(err, TutorError::EmptyResponse("image data")));
    }

    #[tokio::test]
    async fn test_audio_overview_requests_speech() {
        let model = CannedModel::inline("audio/pcm", "AAABAA==");
        let studio = Studio::new(model.clone());

        let payload = studio.audio_overview("水的浮力", Dimension::What).await.unwrap();
        assert_eq!(payload, "AAABAA==");

        let (model_id, request) = model.last_call();
        assert_eq!(model_id, config::DEFAULT_SPEECH_MODEL);
        assert_eq!(request["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            request["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_decode_pcm16() {
        // 0x0000, 0x0001, 0x8000 little-endian
        let payload = STANDARD.encode([0x00u8, 0x00, 0x01, 0x00, 0x00, 0x80]);
        let samples = decode_pcm16(&payload).unwrap();
        assert_eq!(samples, vec![0.0, 1.0 / 32768.0, -1.0]);
    }

    #[test]
    fn test_decode_pcm16_rejects_bad_base64() {
        assert!(matches!(decode_pcm16("%%%"), Err(TutorError::Decode(_))));
    }

    #[test]
    fn test_score_quiz() {
        let q = |answer| QuizQuestion {
            question: "q".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: answer,
            explanation: String::new(),
        };
        let questions = vec![q(0), q(1), q(2)];

        assert_eq!(score_quiz(&questions, &[Some(0), Some(1), Some(2)]), 3);
        assert_eq!(score_quiz(&questions, &[Some(0), None, Some(3)]), 1);
        assert_eq!(score_quiz(&questions, &[]), 0);
    }
}

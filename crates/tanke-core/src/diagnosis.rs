//! Extraction of the mastery diagnosis embedded in tutor replies.
//!
//! The tutor is instructed to append a block like:
//!
//! ```text
//! 想一想，木块受到的力有哪些？
//! <diagnosis>{"masteryLevel": 73, "identifiedGaps": ["浮力方向"], "recommendedAction": "复习受力分析"}</diagnosis>
//! ```
//!
//! Parsing happens in two steps that can be tested on their own:
//! [`scan_block`] locates the first marker pair and [`decode_status`] turns
//! its payload into a validated [`LearningStatus`]. [`extract`] combines them
//! and never fails: a malformed block leaves the reply untouched so the
//! student still sees the tutor's prose.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tanke_models::{InvalidStatus, LearningStatus};
use tracing::{trace, warn};

/// Opening marker of a diagnosis block.
pub const OPEN_MARKER: &str = "<diagnosis>";

/// Closing marker of a diagnosis block.
pub const CLOSE_MARKER: &str = "</diagnosis>";

/// Matches a diagnosis block across lines, non-greedy.
static BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<diagnosis>(.*?)</diagnosis>").expect("Invalid diagnosis regex")
});

/// A located diagnosis block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisBlock<'a> {
    /// Byte span of the block including both markers.
    pub span: Range<usize>,
    /// Text between the markers, trimmed.
    pub payload: &'a str,
}

/// Why a located block could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    /// Payload is not JSON or lacks a required field.
    #[error("invalid diagnosis JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload decoded but failed validation.
    #[error("invalid diagnosis: {0}")]
    Invalid(#[from] InvalidStatus),
}

/// Outcome of parsing one tutor reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnosis {
    /// A valid block was found and removed.
    Parsed {
        clean_text: String,
        status: LearningStatus,
    },
    /// The reply contains no block.
    Absent,
    /// A block was found but could not be decoded.
    Malformed { reason: String },
}

impl Diagnosis {
    /// Get the parsed status, if any.
    pub fn status(&self) -> Option<&LearningStatus> {
        match self {
            Self::Parsed { status, .. } => Some(status),
            Self::Absent | Self::Malformed { .. } => None,
        }
    }

    /// Resolve into the text to show and the optional status.
    ///
    /// `raw` must be the reply this outcome was parsed from; it is returned
    /// unchanged unless a block was parsed.
    pub fn into_reply(self, raw: &str) -> (String, Option<LearningStatus>) {
        match self {
            Self::Parsed { clean_text, status } => (clean_text, Some(status)),
            Self::Absent | Self::Malformed { .. } => (raw.to_string(), None),
        }
    }
}

/// Wire shape of the payload; numeric mastery is validated separately.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    mastery_level: serde_json::Number,
    identified_gaps: Vec<String>,
    recommended_action: String,
}

/// Locate the first diagnosis block in `text`.
pub fn scan_block(text: &str) -> Option<DiagnosisBlock<'_>> {
    let captures = BLOCK_REGEX.captures(text)?;
    let whole = captures.get(0)?;
    let payload = captures.get(1)?;

    Some(DiagnosisBlock {
        span: whole.range(),
        payload: payload.as_str().trim(),
    })
}

/// Decode and validate a block payload.
pub fn decode_status(payload: &str) -> Result<LearningStatus, DiagnosisError> {
    let raw: RawStatus = serde_json::from_str(payload)?;

    let level = match raw.mastery_level.as_i64() {
        Some(level) => level,
        None if raw.mastery_level.is_u64() => {
            return Err(InvalidStatus::MasteryOutOfRange(i64::MAX).into())
        }
        None => {
            let value = raw.mastery_level.as_f64().unwrap_or(f64::NAN);
            return Err(InvalidStatus::MasteryNotInteger(value).into());
        }
    };

    Ok(LearningStatus::new(
        level,
        raw.identified_gaps,
        raw.recommended_action,
    )?)
}

/// Parse a tutor reply.
///
/// Only the first block is decoded. When it is valid, every diagnosis block
/// is stripped from the returned text so no markers leak to the student.
pub fn extract(text: &str) -> Diagnosis {
    let Some(block) = scan_block(text) else {
        trace!("No diagnosis block in reply");
        return Diagnosis::Absent;
    };

    match decode_status(block.payload) {
        Ok(status) => {
            let clean_text = BLOCK_REGEX.replace_all(text, "").trim().to_string();
            Diagnosis::Parsed { clean_text, status }
        }
        Err(e) => {
            warn!(error = %e, "Discarding malformed diagnosis block");
            Diagnosis::Malformed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "很好！你注意到了示数变小。\n\n<diagnosis>\n{\"masteryLevel\": 73, \"identifiedGaps\": [\"浮力方向\"], \"recommendedAction\": \"复习受力分析\"}\n</diagnosis>\n";

    #[test]
    fn test_scan_block_finds_payload() {
        let block = scan_block(REPLY).unwrap();
        assert!(block.payload.starts_with('{'));
        assert!(block.payload.ends_with('}'));
        assert!(REPLY[block.span.clone()].starts_with(OPEN_MARKER));
        assert!(REPLY[block.span].ends_with(CLOSE_MARKER));
    }

    #[test]
    fn test_scan_block_absent() {
        assert!(scan_block("没有诊断").is_none());
        assert!(scan_block("<diagnosis>unterminated").is_none());
    }

    #[test]
    fn test_extract_well_formed() {
        match extract(REPLY) {
            Diagnosis::Parsed { clean_text, status } => {
                assert_eq!(clean_text, "很好！你注意到了示数变小。");
                assert_eq!(status.mastery_level, 73);
                assert_eq!(status.identified_gaps, vec!["浮力方向".to_string()]);
                assert_eq!(status.recommended_action, "复习受力分析");
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_truncated_json_keeps_text() {
        let corrupted = REPLY.replace("\"recommendedAction\": \"复习受力分析\"}", "\"recommendedAction\": \"复");
        let outcome = extract(&corrupted);
        assert!(matches!(outcome, Diagnosis::Malformed { .. }));

        let (text, status) = outcome.into_reply(&corrupted);
        assert_eq!(text, corrupted);
        assert!(status.is_none());
    }

    #[test]
    fn test_extract_absent() {
        let reply = "浮力的方向是怎样的？";
        let outcome = extract(reply);
        assert_eq!(outcome, Diagnosis::Absent);
        assert_eq!(outcome.into_reply(reply), (reply.to_string(), None));
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        let err = decode_status(
            r#"{"masteryLevel": 150, "identifiedGaps": [], "recommendedAction": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Invalid(InvalidStatus::MasteryOutOfRange(150))
        ));

        let err = decode_status(
            r#"{"masteryLevel": -5, "identifiedGaps": [], "recommendedAction": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DiagnosisError::Invalid(_)));
    }

    #[test]
    fn test_decode_rejects_non_integer() {
        let err = decode_status(
            r#"{"masteryLevel": 72.5, "identifiedGaps": [], "recommendedAction": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Invalid(InvalidStatus::MasteryNotInteger(_))
        ));

        let err = decode_status(
            r#"{"masteryLevel": "73", "identifiedGaps": [], "recommendedAction": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DiagnosisError::Json(_)));
    }

    #[test]
    fn test_decode_requires_all_fields() {
        let err = decode_status(r#"{"masteryLevel": 50, "identifiedGaps": []}"#).unwrap_err();
        assert!(matches!(err, DiagnosisError::Json(_)));
    }

    #[test]
    fn test_out_of_range_block_is_malformed() {
        let reply = r#"继续努力<diagnosis>{"masteryLevel": 101, "identifiedGaps": [], "recommendedAction": "x"}</diagnosis>"#;
        let (text, status) = extract(reply).into_reply(reply);
        assert_eq!(text, reply);
        assert!(status.is_none());
    }

    #[test]
    fn test_only_first_block_is_decoded() {
        let reply = concat!(
            "前言",
            r#"<diagnosis>{"masteryLevel": 20, "identifiedGaps": ["a"], "recommendedAction": "first"}</diagnosis>"#,
            "中间",
            r#"<diagnosis>{"masteryLevel": 90, "identifiedGaps": ["b"], "recommendedAction": "second"}</diagnosis>"#,
        );

        match extract(reply) {
            Diagnosis::Parsed { clean_text, status } => {
                assert_eq!(status.mastery_level, 20);
                assert_eq!(status.recommended_action, "first");
                assert_eq!(clean_text, "前言中间");
            }
            other => panic!("expected Parsed, got {:?}", other),
        }
    }
}

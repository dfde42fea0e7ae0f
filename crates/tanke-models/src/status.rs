//! Mastery diagnosis produced by the tutor.

use serde::{Deserialize, Serialize};

/// Upper bound of [`LearningStatus::mastery_level`].
pub const MAX_MASTERY: u8 = 100;

/// Structured mastery assessment embedded in a tutor reply.
///
/// Field names follow the camelCase wire format the tutor model emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStatus {
    /// Estimated mastery, 0 to 100 inclusive.
    pub mastery_level: u8,

    /// Knowledge gaps or misconceptions spotted in the student's answers.
    pub identified_gaps: Vec<String>,

    /// Concrete next step suggested to the student.
    pub recommended_action: String,
}

/// Reasons a diagnosis payload fails validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidStatus {
    /// Mastery level is numeric but outside 0..=100.
    #[error("mastery level {0} is outside 0..=100")]
    MasteryOutOfRange(i64),

    /// Mastery level is not an integer.
    #[error("mastery level {0} is not an integer")]
    MasteryNotInteger(f64),
}

impl LearningStatus {
    /// Create a validated status.
    pub fn new(
        mastery_level: i64,
        identified_gaps: Vec<String>,
        recommended_action: impl Into<String>,
    ) -> Result<Self, InvalidStatus> {
        let mastery_level = u8::try_from(mastery_level)
            .ok()
            .filter(|level| *level <= MAX_MASTERY)
            .ok_or(InvalidStatus::MasteryOutOfRange(mastery_level))?;

        Ok(Self {
            mastery_level,
            identified_gaps,
            recommended_action: recommended_action.into(),
        })
    }

    /// Whether the tutor reported any gaps.
    pub fn has_gaps(&self) -> bool {
        !self.identified_gaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_bounds() {
        assert_eq!(LearningStatus::new(0, vec![], "").unwrap().mastery_level, 0);
        assert_eq!(
            LearningStatus::new(100, vec![], "").unwrap().mastery_level,
            100
        );
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            LearningStatus::new(101, vec![], ""),
            Err(InvalidStatus::MasteryOutOfRange(101))
        );
        assert_eq!(
            LearningStatus::new(-1, vec![], ""),
            Err(InvalidStatus::MasteryOutOfRange(-1))
        );
        assert_eq!(
            LearningStatus::new(300, vec![], ""),
            Err(InvalidStatus::MasteryOutOfRange(300))
        );
    }

    #[test]
    fn test_camel_case_wire_format() {
        let status = LearningStatus::new(73, vec!["压力差".into()], "复习称重法").unwrap();
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["masteryLevel"], 73);
        assert_eq!(json["identifiedGaps"][0], "压力差");
        assert_eq!(json["recommendedAction"], "复习称重法");
        assert!(status.has_gaps());
    }
}

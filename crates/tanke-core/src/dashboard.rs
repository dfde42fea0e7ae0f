//! Lesson-plan rows for the teacher dashboard.

use serde::Serialize;
use tanke_models::Dimension;

use crate::question_bank::QuestionBank;

/// Rows shown when no limit is given.
pub const DEFAULT_PLAN_ROWS: usize = 6;

/// Expected mastery for the first row; each later row drops by [`EXPECTED_STEP`].
const EXPECTED_BASE: u8 = 80;
const EXPECTED_STEP: u8 = 5;

/// One row of the lesson plan table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonPlanRow {
    pub id: u32,
    pub dimension: Dimension,
    pub question: String,
    pub context: String,
    /// Expected class mastery in percent.
    pub expected_mastery: u8,
}

/// First `limit` questions of the bank with their expected mastery.
pub fn lesson_plan(bank: &QuestionBank, limit: usize) -> Vec<LessonPlanRow> {
    bank.iter()
        .take(limit)
        .enumerate()
        .map(|(row, item)| LessonPlanRow {
            id: item.id,
            dimension: item.dimension,
            question: item.question.clone(),
            context: item.context.clone(),
            expected_mastery: expected_mastery(row),
        })
        .collect()
}

fn expected_mastery(row: usize) -> u8 {
    let drop = u8::try_from(row)
        .unwrap_or(u8::MAX)
        .saturating_mul(EXPECTED_STEP);
    EXPECTED_BASE.saturating_sub(drop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let bank = QuestionBank::buoyancy();
        let rows = lesson_plan(&bank, DEFAULT_PLAN_ROWS);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].expected_mastery, 80);
        assert_eq!(rows[5].expected_mastery, 55);
        assert_eq!(rows[5].dimension, Dimension::How);
    }

    #[test]
    fn test_limit_beyond_bank() {
        let bank = QuestionBank::buoyancy();
        let rows = lesson_plan(&bank, 100);
        assert_eq!(rows.len(), bank.len());
    }

    #[test]
    fn test_expected_mastery_saturates() {
        assert_eq!(expected_mastery(16), 0);
        assert_eq!(expected_mastery(1000), 0);
    }
}

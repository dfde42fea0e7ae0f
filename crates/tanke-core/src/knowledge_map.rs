//! Per-dimension progress projection used by the map and chain views.

use serde::Serialize;
use tanke_models::{Dimension, NodeStatus, QuestionItem};

use crate::question_bank::QuestionBank;

/// One dimension as shown in the knowledge map.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionNode {
    pub dimension: Dimension,
    pub status: NodeStatus,
    pub description: &'static str,
    pub sub_topics: &'static [&'static str],
    pub questions: Vec<QuestionItem>,
}

/// The full map: every dimension in progression order.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeMap {
    pub nodes: Vec<DimensionNode>,
    pub completed: usize,
    pub total: usize,
}

impl KnowledgeMap {
    /// Project the map from the bank and the current progress.
    ///
    /// The active dimension is reported as `Active` even if it was completed
    /// earlier and revisited.
    pub fn build(bank: &QuestionBank, current: Dimension, completed: &[Dimension]) -> Self {
        let nodes = Dimension::ALL
            .into_iter()
            .map(|dimension| DimensionNode {
                dimension,
                status: status_of(dimension, current, completed),
                description: dimension.description(),
                sub_topics: dimension.sub_topics(),
                questions: bank.questions_for(dimension).to_vec(),
            })
            .collect();

        Self {
            nodes,
            completed: completed.len(),
            total: Dimension::ALL.len(),
        }
    }

    /// Node for a given dimension.
    pub fn node(&self, dimension: Dimension) -> &DimensionNode {
        &self.nodes[dimension.ordinal()]
    }
}

fn status_of(dimension: Dimension, current: Dimension, completed: &[Dimension]) -> NodeStatus {
    if dimension == current {
        NodeStatus::Active
    } else if completed.contains(&dimension) {
        NodeStatus::Completed
    } else {
        NodeStatus::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_map() {
        let bank = QuestionBank::buoyancy();
        let map = KnowledgeMap::build(&bank, Dimension::What, &[]);

        assert_eq!(map.total, 5);
        assert_eq!(map.completed, 0);
        assert_eq!(map.node(Dimension::What).status, NodeStatus::Active);
        assert_eq!(map.node(Dimension::Why).status, NodeStatus::Locked);
        assert_eq!(map.node(Dimension::What).questions.len(), 3);
    }

    #[test]
    fn test_completed_and_revisited() {
        let bank = QuestionBank::buoyancy();
        let completed = [Dimension::What, Dimension::Why];
        let map = KnowledgeMap::build(&bank, Dimension::What, &completed);

        assert_eq!(map.completed, 2);
        assert_eq!(map.node(Dimension::What).status, NodeStatus::Active);
        assert_eq!(map.node(Dimension::Why).status, NodeStatus::Completed);
        assert_eq!(map.node(Dimension::How).status, NodeStatus::Locked);
    }
}

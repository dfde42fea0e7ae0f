//! Scaffold resources and knowledge-map node status.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// Kind of supplementary resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Exercise,
    Reading,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Exercise => write!(f, "exercise"),
            Self::Reading => write!(f, "reading"),
        }
    }
}

/// A supplementary resource aimed at one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldResource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub description: String,
    pub link: String,
    pub target_dimension: Dimension,
}

/// Display status of a dimension in the knowledge map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Not yet reached.
    Locked,
    /// The dimension currently being worked on.
    Active,
    /// Finished through forward progression.
    Completed,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_wire_format() {
        let json = r##"{
            "id": "v1",
            "type": "video",
            "title": "浮力产生的微观解释",
            "description": "3分钟动画",
            "link": "#",
            "targetDimension": "WHY"
        }"##;

        let resource: ScaffoldResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.kind, ResourceKind::Video);
        assert_eq!(resource.target_dimension, Dimension::Why);
    }
}

//! Scaffold resource catalog and recommendation.

use tanke_models::{Dimension, ResourceKind, ScaffoldResource};

/// The built-in supplementary resources.
pub fn default_catalog() -> Vec<ScaffoldResource> {
    vec![
        resource("v1", ResourceKind::Video, "浮力产生的微观解释", "3分钟动画演示压力差如何汇聚成浮力", Dimension::Why),
        resource("e1", ResourceKind::Exercise, "称重法测浮力专项练", "巩固测力计法计算浮力的基本功", Dimension::What),
        resource("r1", ResourceKind::Reading, "阿基米德的浴室灵感", "科学史阅读：发现浮力定律的故事", Dimension::Whence),
        resource("v2", ResourceKind::Video, "潜水艇浮沉实验", "探究如何通过改变自重控制浮沉", Dimension::How),
    ]
}

fn resource(
    id: &str,
    kind: ResourceKind,
    title: &str,
    description: &str,
    target_dimension: Dimension,
) -> ScaffoldResource {
    ScaffoldResource {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        link: "#".to_string(),
        target_dimension,
    }
}

/// Resources targeting exactly `dimension`, in catalog order.
pub fn recommend(catalog: &[ScaffoldResource], dimension: Dimension) -> Vec<&ScaffoldResource> {
    catalog
        .iter()
        .filter(|r| r.target_dimension == dimension)
        .collect()
}

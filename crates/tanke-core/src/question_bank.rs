//! Ordered question catalog for the 5D chain.
//!
//! A bank is validated once at construction: every dimension must have at
//! least one question and ids must be unique. After that it is read-only, so
//! `questions_for` always returns the same non-empty slice for a dimension.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use tanke_models::{Dimension, QuestionItem};
use tracing::debug;

use crate::error::{CoreError, Result};

static BUOYANCY: LazyLock<QuestionBank> = LazyLock::new(|| {
    QuestionBank::new(buoyancy_chain()).expect("Invalid built-in question bank")
});

/// Validated, read-only question catalog.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// All items in bank order.
    items: Vec<QuestionItem>,
    /// Items grouped by `Dimension::ordinal`, preserving bank order.
    by_dimension: Vec<Vec<QuestionItem>>,
}

impl QuestionBank {
    /// Build a bank from items in progression order.
    pub fn new(items: Vec<QuestionItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CoreError::DuplicateQuestionId(item.id));
            }
        }

        let mut by_dimension = vec![Vec::new(); Dimension::ALL.len()];
        for item in &items {
            by_dimension[item.dimension.ordinal()].push(item.clone());
        }

        if let Some(empty) = Dimension::ALL
            .into_iter()
            .find(|d| by_dimension[d.ordinal()].is_empty())
        {
            return Err(CoreError::EmptyDimension(empty));
        }

        debug!(questions = items.len(), "Question bank loaded");

        Ok(Self {
            items,
            by_dimension,
        })
    }

    /// Parse a bank from a JSON array of question items.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let items: Vec<QuestionItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Load a bank from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// The built-in 《水的浮力》 question chain.
    pub fn buoyancy() -> Self {
        BUOYANCY.clone()
    }

    /// Questions for a dimension, in progression order. Never empty.
    pub fn questions_for(&self, dimension: Dimension) -> &[QuestionItem] {
        &self.by_dimension[dimension.ordinal()]
    }

    /// Number of questions in a dimension.
    pub fn len_for(&self, dimension: Dimension) -> usize {
        self.questions_for(dimension).len()
    }

    /// The question at `index` within `dimension`.
    pub fn question(&self, dimension: Dimension, index: usize) -> Result<&QuestionItem> {
        let questions = self.questions_for(dimension);
        questions.get(index).ok_or(CoreError::QuestionOutOfRange {
            dimension,
            index,
            len: questions.len(),
        })
    }

    /// Find a question by id.
    pub fn get(&self, id: u32) -> Option<&QuestionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Iterate over all items in bank order.
    pub fn iter(&self) -> impl Iterator<Item = &QuestionItem> {
        self.items.iter()
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a validated bank; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::buoyancy()
    }
}

fn buoyancy_chain() -> Vec<QuestionItem> {
    use Dimension::*;

    vec![
        QuestionItem::new(1, What, "将木块放入水中会漂浮，将石块放入水中会下沉，这两种现象中都存在浮力吗？", "基础现象观察"),
        QuestionItem::new(2, What, "什么是浮力？物理学中对浮力的定义是什么？", "核心概念定义"),
        QuestionItem::new(3, What, "用弹簧测力计吊着物体浸入水中时，示数会发生什么变化？", "验证性实验现象"),
        QuestionItem::new(9, Why, "浸在水中的物体为什么会受到浮力？浮力的产生与液体的压力有什么关系？", "浮力成因解析"),
        QuestionItem::new(10, Why, "为什么物体浸在水中的体积越大，受到的浮力就越大？", "压力差深度关联"),
        QuestionItem::new(17, How, "如何用弹簧测力计和溢水杯，测量浸在水中的物体所受到的浮力大小？", "实验操作方法"),
        QuestionItem::new(22, How, "如何通过实验，验证阿基米德原理？", "原理验证步骤"),
        QuestionItem::new(25, WhatIf, "若将同一物体逐渐浸入水中，随着浸入体积的增大，浮力如何变化？", "变量控制推理"),
        QuestionItem::new(29, WhatIf, "若没有浮力现象，生活中的交通工具还能正常使用吗？", "思维拓展"),
        QuestionItem::new(33, Whence, "轮船的船身为什么设计成空心的？这是如何利用浮力原理的？", "工程应用实例"),
        QuestionItem::new(35, Whence, "救生圈、救生衣为什么能帮助人漂浮在水面上？", "生活场景应用"),
    ]
}

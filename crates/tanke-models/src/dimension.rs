//! The five inquiry dimensions of the question chain.
//!
//! Dimensions are traversed in a fixed order: 是何 → 为何 → 如何 → 若何 → 由何.
//! The order lives in [`Dimension::ALL`] and is the only legal forward path;
//! nothing depends on the declaration order of the enum variants.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One stage of the 5D question chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    /// 是何: phenomena and definitions.
    #[serde(alias = "是何")]
    What,
    /// 为何: causes and principles.
    #[serde(alias = "为何")]
    Why,
    /// 如何: methods and experiments.
    #[serde(alias = "如何")]
    How,
    /// 若何: hypothetical reasoning.
    #[serde(alias = "若何")]
    WhatIf,
    /// 由何: transfer to real-world applications.
    #[serde(alias = "由何")]
    Whence,
}

impl Dimension {
    /// Every dimension in progression order.
    pub const ALL: [Dimension; 5] = [
        Dimension::What,
        Dimension::Why,
        Dimension::How,
        Dimension::WhatIf,
        Dimension::Whence,
    ];

    /// The dimension a new session starts in.
    pub fn first() -> Self {
        Self::ALL[0]
    }

    /// The final dimension; completing it ends the chain.
    pub fn last() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// Zero-based position in the progression order.
    pub fn ordinal(self) -> usize {
        match self {
            Self::What => 0,
            Self::Why => 1,
            Self::How => 2,
            Self::WhatIf => 3,
            Self::Whence => 4,
        }
    }

    /// Look up a dimension by its zero-based ordinal.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// The dimension immediately after this one, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Whether this is the final dimension.
    pub fn is_last(self) -> bool {
        self == Self::last()
    }

    /// Machine-readable code, e.g. `what_if`.
    pub fn code(self) -> &'static str {
        match self {
            Self::What => "what",
            Self::Why => "why",
            Self::How => "how",
            Self::WhatIf => "what_if",
            Self::Whence => "whence",
        }
    }

    /// Chinese display label, e.g. `若何`.
    pub fn label(self) -> &'static str {
        match self {
            Self::What => "是何",
            Self::Why => "为何",
            Self::How => "如何",
            Self::WhatIf => "若何",
            Self::Whence => "由何",
        }
    }

    /// Teaching goal shown alongside the active question.
    pub fn description(self) -> &'static str {
        match self {
            Self::What => "基础概念：聚焦现象与定义。识别浮力的存在及其方向，掌握‘称重法’测浮力的基本操作。",
            Self::Why => "原理解析：探索浮力成因。从压力差的角度理解浮力的本质，探讨浮力大小与排开液体重力的定量关系。",
            Self::How => "实验探究：掌握测量方法。设计并实施‘阿基米德原理’实验，提升科学探究与动手实验能力。",
            Self::WhatIf => "逻辑推理：多变量假设思维。推理密度、深度、形状等变量对浮力的影响，纠正认知误区。",
            Self::Whence => "生活迁移：跨情境综合应用。通过轮船、潜水艇、热气球等案例，将物理规律转化为工程实践认知。",
        }
    }

    /// Concept tags covered by this dimension.
    pub fn sub_topics(self) -> &'static [&'static str] {
        match self {
            Self::What => &["浮力的方向", "称重法原理", "液体托力感知"],
            Self::Why => &["上下表面压力差", "阿基米德原理推导", "成因定量分析"],
            Self::How => &["测力计技巧", "溢水杯精准测量", "实验误差控制"],
            Self::WhatIf => &["密度变量控制", "失重环境猜想", "深度无关性验证"],
            Self::Whence => &["轮船排水量", "潜水艇沉浮机制", "救生器材设计"],
        }
    }
}

impl PartialOrd for Dimension {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dimension {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when a string does not name a dimension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dimension: {0}")]
pub struct ParseDimensionError(pub String);

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    /// Accepts the code (`what_if`, `WHAT-IF`), the Chinese label (`若何`)
    /// or the 1-based position (`4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(position) = trimmed.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(Self::from_ordinal)
                .ok_or_else(|| ParseDimensionError(s.to_string()));
        }

        let normalized = trimmed.to_lowercase().replace(|c: char| c == '-' || c.is_whitespace(), "_");
        Self::ALL
            .into_iter()
            .find(|d| d.code() == normalized || d.label() == trimmed)
            .ok_or_else(|| ParseDimensionError(s.to_string()))
    }
}

//! Prompt text for tutor turns and Studio generators.

use tanke_models::Dimension;

/// Fixed Socratic policy for the tutor avatar.
pub const SYSTEM_INSTRUCTION: &str = r#"你现在是“探课AI”平台的“教师分身”（Student Avatar）。
你的任务是引导学生学习《水的浮力》这一章节。

## 核心任务
1. **引导式对话**：遵循5D问题链逻辑（是何->为何->如何->若何->由何）。
2. **学习诊断**：在回答的最后，必须包含一个特殊的JSON标记（被<diagnosis>标签包裹），用于系统后台分析。JSON格式：
{
  "masteryLevel": 0-100间的数字,
  "identifiedGaps": ["遗漏的知识点1", "理解偏差2"],
  "recommendedAction": "具体的学习建议"
}
3. **脚手架支持**：如果学生连续两次回答不出，提供具体的线索（Scaffold），而不是答案。

## 限制
- 严禁直接给出阿基米德原理的公式。
- 回复内容应简洁、具启发性，每次不超过150字。"#;

/// System directive for one tutor turn, focused on `question`.
pub fn tutor_directive(question: &str) -> String {
    format!("{}\n\n当前目标问题：{}", SYSTEM_INSTRUCTION, question)
}

/// Intro message opening a session.
pub fn intro_message(dimension: Dimension, question: &str) -> String {
    format!(
        "你好！我是你的探课助手。我们即将开始对“水的浮力”进行深度探索。\n\n第一个挑战属于【{}】维度：\n{}",
        dimension, question
    )
}

/// Transition to the next question within a dimension.
pub fn next_question_message(question: &str) -> String {
    format!("回答得不错，我们要更进一步了：\n\n{}", question)
}

/// Transition into the next dimension.
pub fn next_dimension_message(finished: Dimension, next: Dimension, question: &str) -> String {
    format!(
        "🎉 太棒了！【{}】环节已点亮。接下来进入更具挑战性的【{}】环节：\n\n{}",
        finished, next, question
    )
}

/// Message appended once every dimension is finished.
pub const COMPLETION_MESSAGE: &str =
    "🏆 恭喜你！5D浮力问题链的全部五个维度都已点亮。你可以随时回到任意维度复习，或者打开工具箱继续巩固。";

/// Message appended when the last dimension is finished with `completed`
/// dimensions done.
pub fn completion_message(completed: usize) -> String {
    let total = Dimension::ALL.len();
    if completed >= total {
        return COMPLETION_MESSAGE.to_string();
    }
    format!(
        "🏁 你已走完问题链的最后一个维度，目前点亮了 {}/{} 个维度。回到尚未点亮的维度继续挑战吧！",
        completed, total
    )
}

pub(crate) fn quiz_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "针对话题\"{}\"中的\"{}\"维度，生成3个具有挑战性的单选题。返回结果必须严格符合指定的JSON格式。",
        topic, dimension
    )
}

pub(crate) fn flashcards_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "针对\"{}\"中\"{}\"维度的知识点，生成4张知识闪卡。每张卡片包含一个核心概念（正面）和简明解析（背面）。请返回JSON数组格式。",
        topic, dimension
    )
}

pub(crate) fn slides_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "为主题\"{}\"的\"{}\"维度生成一份教学幻灯片大纲。共生成5页幻灯片。每页包含标题、3-4个核心要点以及对该页配图的文字描述。请返回JSON格式。",
        topic, dimension
    )
}

pub(crate) fn game_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "针对话题\"{}\"中的\"{}\"维度，生成一个科学探究冒险小游戏。学生需要做出一个关于浮力的关键决策。返回结果必须严格符合指定的JSON格式。",
        topic, dimension
    )
}

pub(crate) fn infographic_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "A professional, clean, and modern educational infographic about \"{}\" specifically focusing on the \"{}\" aspect. Minimalist scientific style, clear vector-style diagrams showing buoyancy mechanisms, soft educational colors (blue, amber, white), high resolution, extremely clear and educational layout.",
        topic, dimension
    )
}

pub(crate) fn slide_image_prompt(visual: &str) -> String {
    format!(
        "A high-quality educational illustration for a slide deck showing: {}. Professional scientific diagram style, clean white background, vibrant educational colors, minimalist vector art, extremely clear and labeled where appropriate.",
        visual
    )
}

pub(crate) fn audio_prompt(topic: &str, dimension: Dimension) -> String {
    format!(
        "Say cheerfully: 你好！针对\"{}\"中\"{}\"维度的知识，我为你准备了一份音频概述。在这个维度，我们需要重点关注...（请根据物理学知识生成一段约100字的概述内容并转换成语音）",
        topic, dimension
    )
}

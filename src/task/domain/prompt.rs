//! System prompts selected by task type.

use super::TaskType;

const SUMMARIZATION: &str = "You are an expert at condensing complex information into clear, concise summaries. Identify key points and present them in an easily digestible format.";
const ANALYSIS: &str = "You are a skilled data analyst. Analyze the provided information, identify trends and patterns, and provide actionable insights.";
const RESEARCH: &str = "You are an expert research analyst. Conduct thorough research, gather comprehensive information, and synthesize findings into clear insights.";
const CONTENT_GENERATION: &str = "You are a professional content writer. Create engaging, well-structured content that resonates with the target audience.";
const CODE_GENERATION: &str = "You are an experienced software developer. Generate clean, efficient, and well-documented code following best practices.";
const TRANSLATION: &str = "You are an expert translator. Provide accurate translations while preserving the original meaning and tone.";
const CUSTOM: &str = "You are a helpful AI assistant. Provide comprehensive and accurate responses to user queries.";

/// Returns the fixed system prompt for a task type.
#[must_use]
pub const fn system_prompt(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Summarization => SUMMARIZATION,
        TaskType::Analysis => ANALYSIS,
        TaskType::Research => RESEARCH,
        TaskType::ContentGeneration => CONTENT_GENERATION,
        TaskType::CodeGeneration => CODE_GENERATION,
        TaskType::Translation => TRANSLATION,
        TaskType::Custom => CUSTOM,
    }
}

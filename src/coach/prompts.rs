//! Prompt construction for hints and code review

use super::models::Language;

/// System instruction fixing the assistant persona and output language
pub fn system_prompt(language: Language) -> String {
    format!("You are a helpful assistant that provides code in {}.", language)
}

/// Ask for step-by-step hints that stop short of a full solution
pub fn hint_prompt(problem: &str, language: Language) -> String {
    format!(
        "Provide step-by-step hints for '{}' without giving full solution, in {}.",
        problem, language
    )
}

/// Ask for a review of submitted code
pub fn review_prompt(problem: &str, code: &str, language: Language) -> String {
    format!(
        "Validate this {} code for problem '{}':\n{}\nCheck correctness, suggest optimizations, and note errors.",
        language, problem, code
    )
}

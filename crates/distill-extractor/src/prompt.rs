//! LLM prompt engineering for principle extraction

use crate::heuristics::truncate_chars;

/// JSON schema hint passed to providers that support structured output
pub const PRINCIPLE_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "core_principle": {"type": "string"},
    "confidence": {"type": "number", "minimum": 0, "maximum": 1},
    "reasoning": {"type": "string"}
  },
  "required": ["core_principle", "confidence", "reasoning"]
}"#;

/// Builds prompts asking the LLM for a document's core principle
pub struct PromptBuilder<'a> {
    text: &'a str,
    char_limit: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder with the default 2000-character window
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            char_limit: 2_000,
        }
    }

    /// Limit how much of the document is included
    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nDocument:\n");
        prompt.push_str(&truncate_chars(self.text, self.char_limit));
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str =
    "Analyze this document and extract the SINGLE most important timeless lesson.";

const OUTPUT_FORMAT_REMINDER: &str = r#"Respond with JSON:
{
    "core_principle": "One sentence capturing the essence",
    "confidence": 0.0-1.0,
    "reasoning": "Why this is the core principle"
}

Remember: Return ONLY valid JSON, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_and_instructions() {
        let prompt = PromptBuilder::new("Patience beats activity.").build();
        assert!(prompt.contains("SINGLE most important timeless lesson"));
        assert!(prompt.contains("Patience beats activity."));
        assert!(prompt.contains("\"core_principle\""));
        assert!(prompt.contains("\"reasoning\""));
    }

    #[test]
    fn test_prompt_truncates_document() {
        let text = format!("{}{}", "a".repeat(2_000), "TAIL");
        let prompt = PromptBuilder::new(&text).build();
        assert!(prompt.contains(&"a".repeat(2_000)));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_custom_char_limit() {
        let prompt = PromptBuilder::new("abcdefghij").with_char_limit(4).build();
        assert!(prompt.contains("Document:\nabcd\n"));
        assert!(!prompt.contains("abcde"));
    }
}

/// Marker used by repetition prompts: `... AT LEAST 10 TIMES: w1, w2. ...`
pub const AT_LEAST_MARKER: &str = "AT LEAST";
/// Marker used by stored practice prompts: `Practice: w1, w2`
pub const PRACTICE_MARKER: &str = "Practice:";

const REPETITION_SUFFIX: &str = "\n\nAdditional instructions: Make the text flow naturally while \
    incorporating the required words. Use simple sentence structures that are easy to type.";

const TYPING_INSTRUCTIONS: &str = "
Generate a typing practice text with the following characteristics:
1. Keep it between 30-50 words unless a different length is specified
2. Use a mix of common and less common words to practice different finger movements
3. Include some punctuation for practice (commas, periods, question marks)
4. Avoid very long words or extremely technical terms unless specifically requested
5. Create coherent, meaningful content that's engaging to type
6. Include a balanced mix of letters that exercise both hands evenly
7. Incorporate some capital letters naturally within the text
8. Use simple sentence structures that flow well for typing practice

Based on this request: ";

/// What a prompt asks the offline generator to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeDirective {
    /// Repeat each of these words
    Repetition(Vec<String>),
    /// A repetition marker is present but no words could be extracted
    EmptyWordList,
    /// No repetition marker, pick a reference text by keyword
    Freeform,
}

impl PracticeDirective {
    pub fn parse(prompt: &str) -> Self {
        if !has_repetition_marker(prompt) {
            return PracticeDirective::Freeform;
        }

        let words = at_least_words(prompt)
            .or_else(|| practice_words(prompt))
            .unwrap_or_default();

        if words.is_empty() {
            PracticeDirective::EmptyWordList
        } else {
            PracticeDirective::Repetition(words)
        }
    }
}

pub fn has_repetition_marker(prompt: &str) -> bool {
    prompt.contains(AT_LEAST_MARKER) || prompt.contains(PRACTICE_MARKER)
}

/// Wrap a caller prompt with typing-practice instructions for the online provider.
///
/// Repetition prompts already carry their word list, so they only get a short
/// clarifying suffix. The caller's text is never modified.
pub fn enhance_prompt(prompt: &str) -> String {
    if has_repetition_marker(prompt) {
        format!("{prompt}{REPETITION_SUFFIX}")
    } else {
        format!("{TYPING_INSTRUCTIONS}{prompt}")
    }
}

// The word list sits between the first colon after the marker and the next period.
fn at_least_words(prompt: &str) -> Option<Vec<String>> {
    let after_marker = prompt.split(AT_LEAST_MARKER).nth(1)?;
    let after_colon = after_marker.split(':').nth(1)?;
    let list = after_colon.split('.').next().unwrap_or_default();
    Some(split_word_list(list))
}

fn practice_words(prompt: &str) -> Option<Vec<String>> {
    let (_, list) = prompt.split_once(PRACTICE_MARKER)?;
    Some(split_word_list(list))
}

fn split_word_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> PracticeDirective {
        PracticeDirective::Repetition(list.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_parse_at_least_directive() {
        assert_eq!(
            PracticeDirective::parse("... AT LEAST 10 TIMES: apple, banana ."),
            words(&["apple", "banana"])
        );
    }

    #[test]
    fn test_parse_generated_practice_prompt() {
        let prompt = "Create a typing practice paragraph that includes EACH of these words \
            AT LEAST 10 TIMES: their, receive, necessary. \
            Make sure each word appears multiple times throughout the text.";
        assert_eq!(
            PracticeDirective::parse(prompt),
            words(&["their", "receive", "necessary"])
        );
    }

    #[test]
    fn test_parse_practice_prefix() {
        assert_eq!(PracticeDirective::parse("Practice: cat, dog"), words(&["cat", "dog"]));
        assert_eq!(
            PracticeDirective::parse("Practice:  cat ,, dog ,"),
            words(&["cat", "dog"])
        );
    }

    #[test]
    fn test_parse_at_least_without_colon_falls_back_to_practice() {
        assert_eq!(
            PracticeDirective::parse("Practice: owl, lynx AT LEAST once"),
            words(&["owl", "lynx AT LEAST once"])
        );
    }

    #[test]
    fn test_parse_empty_word_list() {
        assert_eq!(
            PracticeDirective::parse("AT LEAST 3 TIMES: ."),
            PracticeDirective::EmptyWordList
        );
        assert_eq!(
            PracticeDirective::parse("Practice:"),
            PracticeDirective::EmptyWordList
        );
        assert_eq!(
            PracticeDirective::parse("type AT LEAST something"),
            PracticeDirective::EmptyWordList
        );
    }

    #[test]
    fn test_parse_freeform() {
        assert_eq!(
            PracticeDirective::parse("write me a poem"),
            PracticeDirective::Freeform
        );
        assert_eq!(PracticeDirective::parse(""), PracticeDirective::Freeform);
        // markers are case sensitive
        assert_eq!(
            PracticeDirective::parse("at least: a, b."),
            PracticeDirective::Freeform
        );
    }

    #[test]
    fn test_enhance_freeform_prompt() {
        let enhanced = enhance_prompt("a story about ships");

        assert!(enhanced.starts_with("\nGenerate a typing practice text"));
        assert!(enhanced.contains("balanced mix of letters"));
        assert!(enhanced.ends_with("Based on this request: a story about ships"));
    }

    #[test]
    fn test_enhance_repetition_prompt_only_appends() {
        let prompt = "includes EACH of these words AT LEAST 10 TIMES: cat, dog.";
        let enhanced = enhance_prompt(prompt);

        assert!(enhanced.starts_with(prompt));
        assert!(enhanced.ends_with("easy to type."));
        assert!(!enhanced.contains("Based on this request"));
    }
}

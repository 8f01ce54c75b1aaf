use include_dir::{include_dir, Dir};

static TEXT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/generator/texts");

/// Fixed reference texts chosen by matching keywords in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum KeywordBucket {
    Programming,
    Poetry,
    Science,
    General,
}

impl KeywordBucket {
    /// Buckets checked in order; the first match wins
    pub const PRIORITY: [KeywordBucket; 3] = [
        KeywordBucket::Programming,
        KeywordBucket::Poetry,
        KeywordBucket::Science,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            KeywordBucket::Programming => &["python", "code", "programming"],
            KeywordBucket::Poetry => &["poem", "poetry"],
            KeywordBucket::Science => &["science", "tech"],
            KeywordBucket::General => &[],
        }
    }

    pub fn for_prompt(prompt: &str) -> Self {
        let prompt = prompt.to_lowercase();
        Self::PRIORITY
            .into_iter()
            .find(|bucket| bucket.keywords().iter().any(|kw| prompt.contains(kw)))
            .unwrap_or(KeywordBucket::General)
    }

    pub fn reference_text(self) -> &'static str {
        TEXT_DIR
            .get_file(format!("{self}.txt"))
            .and_then(|file| file.contents_utf8())
            .map(str::trim_end)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bucket_has_text() {
        for bucket in [
            KeywordBucket::Programming,
            KeywordBucket::Poetry,
            KeywordBucket::Science,
            KeywordBucket::General,
        ] {
            assert!(!bucket.reference_text().is_empty(), "{bucket} text missing");
        }
    }

    #[test]
    fn test_poem_prompt() {
        assert_eq!(KeywordBucket::for_prompt("write me a poem"), KeywordBucket::Poetry);
        assert!(KeywordBucket::Poetry
            .reference_text()
            .starts_with("The Programmer's Lament"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            KeywordBucket::for_prompt("Some PYTHON please"),
            KeywordBucket::Programming
        );
        assert_eq!(KeywordBucket::for_prompt("TECH news"), KeywordBucket::Science);
    }

    #[test]
    fn test_priority_order() {
        // programming outranks poetry
        assert_eq!(
            KeywordBucket::for_prompt("a poem about code"),
            KeywordBucket::Programming
        );
        assert_eq!(
            KeywordBucket::for_prompt("poetry and science"),
            KeywordBucket::Poetry
        );
    }

    #[test]
    fn test_unmatched_prompt_uses_general_text() {
        assert_eq!(
            KeywordBucket::for_prompt("tell me about gardening"),
            KeywordBucket::General
        );
        assert!(KeywordBucket::General
            .reference_text()
            .starts_with("The ability to type quickly"));
    }

    #[test]
    fn test_programming_text_keeps_indentation() {
        let text = KeywordBucket::Programming.reference_text();
        assert!(text.starts_with("def calculate_fibonacci(n):"));
        assert!(text.contains("\n    if n <= 0:"));
        assert!(text.ends_with("return fibonacci"));
    }
}

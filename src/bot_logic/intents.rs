use regex::Regex;

/// Symbolic label for the purpose of a user's free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AddRed,
    AddWhite,
    CreateAccount,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::AddRed => "add_red",
            Intent::AddWhite => "add_white",
            Intent::CreateAccount => "create_account",
        }
    }
}

/// Classifies raw message text into an optional intent. Implementations are
/// pure functions of their input; the handler takes one as an injected
/// dependency so tests can substitute a fixed classifier.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<Intent>;
}

/// Keyword classifier: first matching pattern wins. Account requests are
/// checked before wine colors so "create an account for red wine" does not
/// turn into a bottle.
pub struct KeywordClassifier {
    patterns: Vec<(Regex, Intent)>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        let patterns = vec![
            (
                Regex::new(r"(?i)\b(create|open|set\s*up|make)\b.*\baccount\b|\bsign\s*up\b")
                    .unwrap(),
                Intent::CreateAccount,
            ),
            (Regex::new(r"(?i)\bred\b").unwrap(), Intent::AddRed),
            (Regex::new(r"(?i)\bwhite\b").unwrap(), Intent::AddWhite),
        ];
        KeywordClassifier { patterns }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Option<Intent> {
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|&(_, intent)| intent)
    }
}

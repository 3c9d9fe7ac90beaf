// SPDX-FileCopyrightText: 2026 Lokal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat/code query classification.
//!
//! Classifies a user message as [`QueryType::Code`] or [`QueryType::Chat`]
//! using a keyword table and a regex pattern table. No LLM pre-call, no
//! network, no latency.
//!
//! Matching is plain case-insensitive substring search with no word
//! boundaries, so short keywords such as `api` or `git` also fire inside
//! unrelated words ("capital", "digital").

use std::sync::LazyLock;

use lokal_config::model::RoutingConfig;
use lokal_core::{LokalError, QueryType};
use regex::{Regex, RegexBuilder};

/// Code keywords (contains, case-insensitive), checked in order.
pub const DEFAULT_CODE_KEYWORDS: &[&str] = &[
    "코드", "함수", "변수", "클래스", "메서드", "알고리즘", "디버깅", "버그",
    "리팩토링", "최적화", "프로그래밍", "개발", "스크립트", "API", "데이터베이스",
    "code", "function", "variable", "class", "method", "algorithm", "debug", "bug",
    "refactor", "optimize", "programming", "development", "script", "api", "database",
    "python", "javascript", "java", "cpp", "html", "css", "sql", "git", "docker",
    "framework", "library", "import", "export",
    "def ", "class ", "function ", "var ", "let ", "const ", "if ", "for ", "while ",
    "return", "print(", "console.log", "import ", "from ", "#include",
];

/// Code patterns (regex search, case-insensitive), checked in order after the keywords.
pub const DEFAULT_CODE_PATTERNS: &[&str] = &[
    r"def\s+\w+",
    r"function\s+\w+",
    r"class\s+\w+",
    r"import\s+\w+",
    r"console\.log",
    r"print\s*\(",
    r"if\s*\(",
    r"for\s*\(",
    r"\{\s*.*\s*\}",
    r"#\s*TODO",
];

static DEFAULT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_CODE_PATTERNS
        .iter()
        .map(|p| compile_pattern(p).expect("default code patterns are valid regexes"))
        .collect()
});

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Keyword and pattern based query classifier.
///
/// Immutable after construction; safe to share across threads and call
/// concurrently.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    /// Keywords, lower-cased once at construction.
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl QueryClassifier {
    /// Create a classifier with the built-in keyword and pattern tables.
    pub fn new() -> Self {
        Self {
            keywords: DEFAULT_CODE_KEYWORDS.iter().map(|k| k.to_lowercase()).collect(),
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }

    /// Create a classifier from externally supplied tables.
    ///
    /// Order is preserved. Fails if any pattern is not a valid regex.
    pub fn from_tables<K, P>(keywords: K, patterns: P) -> Result<Self, LokalError>
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();

        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                compile_pattern(p).map_err(|e| {
                    LokalError::Config(format!("invalid code pattern `{p}`: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { keywords, patterns })
    }

    /// Create a classifier from routing configuration.
    ///
    /// Each table is replaced only when the config supplies it; the other
    /// keeps its built-in default.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, LokalError> {
        let defaults = Self::new();

        let keywords = match &config.code_keywords {
            Some(k) => k.iter().map(|k| k.to_lowercase()).collect(),
            None => defaults.keywords,
        };

        let patterns = match &config.code_patterns {
            Some(p) => Self::from_tables(std::iter::empty::<&str>(), p)?.patterns,
            None => defaults.patterns,
        };

        Ok(Self { keywords, patterns })
    }

    /// Classify a message as code or chat.
    ///
    /// Keywords are checked first, then patterns; the first hit wins.
    /// Anything else, including the empty string, is chat.
    pub fn classify(&self, query: &str) -> QueryType {
        let lower = query.to_lowercase();

        if self.keywords.iter().any(|k| lower.contains(k.as_str())) {
            return QueryType::Code;
        }

        if self.patterns.iter().any(|p| p.is_match(query)) {
            return QueryType::Code;
        }

        QueryType::Chat
    }

    /// Number of keywords in the active table.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Number of patterns in the active table.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

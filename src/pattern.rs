//! Glob-lite key patterns
//!
//! Turns a pattern string into a key predicate for the bulk operations.
//!
//! Supported patterns:
//! - `*` : matches all keys
//! - `prefix*` : matches keys starting with prefix
//! - `*suffix` : matches keys ending with suffix
//! - `*infix*` : matches keys containing infix
//! - anything else : exact match

use std::fmt;

/// Parsed key pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    All,
    Prefix(String),
    Suffix(String),
    Contains(String),
    Exact(String),
}

impl KeyPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return KeyPattern::All;
        }

        if pattern.len() >= 2 && pattern.starts_with('*') && pattern.ends_with('*') {
            return KeyPattern::Contains(pattern[1..pattern.len() - 1].to_string());
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            return KeyPattern::Suffix(suffix.to_string());
        }

        if let Some(prefix) = pattern.strip_suffix('*') {
            return KeyPattern::Prefix(prefix.to_string());
        }

        KeyPattern::Exact(pattern.to_string())
    }

    /// Check if a key matches
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::All => true,
            KeyPattern::Prefix(prefix) => key.starts_with(prefix.as_str()),
            KeyPattern::Suffix(suffix) => key.ends_with(suffix.as_str()),
            KeyPattern::Contains(inner) => key.contains(inner.as_str()),
            KeyPattern::Exact(exact) => key == exact,
        }
    }

    /// Borrowing predicate, for passing straight to the bulk operations
    pub fn predicate(&self) -> impl Fn(&str) -> bool + '_ {
        move |key: &str| self.matches(key)
    }
}

impl Default for KeyPattern {
    fn default() -> Self {
        KeyPattern::All
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPattern::All => write!(f, "*"),
            KeyPattern::Prefix(p) => write!(f, "{}*", p),
            KeyPattern::Suffix(s) => write!(f, "*{}", s),
            KeyPattern::Contains(c) => write!(f, "*{}*", c),
            KeyPattern::Exact(e) => write!(f, "{}", e),
        }
    }
}

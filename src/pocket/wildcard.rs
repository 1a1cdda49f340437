//! Glob-style key patterns.
//!
//! Only two characters are special: `*` matches any run of characters
//! (including none) and `?` matches exactly one.  Everything else is
//! literal.  Matching is anchored and case-sensitive.

use regex::Regex;

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Option<Regex>,
}

impl WildcardPattern {
    /// Compile a pattern.  Every input string is a valid pattern.
    pub fn compile(pattern: &str) -> Self {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push_str("(?s)^");
        let mut buf = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut buf))),
            }
        }
        expr.push('$');

        // Only pathological lengths can exceed the regex size limit.
        let regex = match Regex::new(&expr) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::debug!(error = %e, "wildcard pattern too large for regex, using glob walk");
                None
            }
        };

        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// Whether `text` matches the whole pattern.
    pub fn matches(&self, text: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(text),
            None => glob_match(&self.source, text),
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Backtracking walk over characters; only the last `*` is revisited.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position after the last `*` and the text position it resumes from.
    let mut resume: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                resume = Some((p + 1, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match resume {
                Some((after_star, from)) => {
                    p = after_star;
                    t = from + 1;
                    resume = Some((after_star, from + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Whether a user-supplied key should be treated as a pattern.
pub fn is_pattern(text: &str) -> bool {
    text.contains(['*', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_any_suffix() {
        let p = WildcardPattern::compile("test-*");
        assert!(p.matches("test-1"));
        assert!(p.matches("test-anything"));
        assert!(p.matches("test-"));
        assert!(!p.matches("prod-1"));
        assert!(!p.matches("my-test-1"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        let p = WildcardPattern::compile("v?");
        assert!(p.matches("v1"));
        assert!(p.matches("v2"));
        assert!(!p.matches("v10"));
        assert!(!p.matches("v"));
    }

    #[test]
    fn mixed_pattern() {
        let p = WildcardPattern::compile("app-*-?");
        assert!(p.matches("app-dev-1"));
        assert!(!p.matches("app-dev-10"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = WildcardPattern::compile("a.b+(c)[d]^$|{2}\\");
        assert!(p.matches("a.b+(c)[d]^$|{2}\\"));
        assert!(!p.matches("axb+(c)[d]^$|{2}\\"));

        let dot = WildcardPattern::compile("a.c");
        assert!(!dot.matches("abc"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let p = WildcardPattern::compile("DB_*");
        assert!(p.matches("DB_URL"));
        assert!(!p.matches("db_url"));
    }

    #[test]
    fn question_mark_counts_characters_not_bytes() {
        let p = WildcardPattern::compile("caf?");
        assert!(p.matches("café"));
    }

    #[test]
    fn edge_patterns() {
        assert!(WildcardPattern::compile("*").matches(""));
        assert!(WildcardPattern::compile("*").matches("anything"));
        assert!(WildcardPattern::compile("").matches(""));
        assert!(!WildcardPattern::compile("").matches("x"));
    }

    #[test]
    fn glob_walk_agrees_with_regex() {
        let cases = [
            ("test-*", "test-1", true),
            ("test-*", "prod-1", false),
            ("v?", "v1", true),
            ("v?", "v10", false),
            ("app-*-?", "app-dev-1", true),
            ("app-*-?", "app-dev-10", false),
            ("*a*b", "xaxxb", true),
            ("*a*b", "xaxxbc", false),
            ("caf?", "café", true),
            ("a.c", "abc", false),
            ("**", "", true),
            ("", "x", false),
        ];
        for (pattern, text, expected) in cases {
            assert_eq!(glob_match(pattern, text), expected, "{pattern} vs {text}");
            assert_eq!(
                WildcardPattern::compile(pattern).matches(text),
                expected,
                "{pattern} vs {text}"
            );
        }
    }

    #[test]
    fn pattern_without_regex_keeps_wildcards() {
        let p = WildcardPattern {
            source: "app-*-?".to_string(),
            regex: None,
        };
        assert!(p.matches("app-dev-1"));
        assert!(!p.matches("app-dev-10"));
        assert!(!p.matches("app-*-?x"));
    }

    #[test]
    fn detects_patterns() {
        assert!(is_pattern("test-*"));
        assert!(is_pattern("v?"));
        assert!(!is_pattern("db-url"));
    }
}

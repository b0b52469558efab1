//! Shell style wildcard matching for file names.

use regex_lite::Regex;

use super::error::SelectorError;

/// Whether `name` contains `*` or `?`.
pub fn has_wildcard(name: &str) -> bool {
    name.contains(['*', '?'])
}

/// A compiled file name wildcard.
///
/// `*` matches any run of characters and `?` matches exactly one. Names
/// starting with `.` only match patterns that also start with `.`, as in a
/// shell glob. Matching is case-insensitive on Windows, like the shell there.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
    hidden: bool,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, SelectorError> {
        let mut source = String::with_capacity(pattern.len() + 8);
        if cfg!(windows) {
            source.push_str("(?i)");
        }
        source.push('^');

        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '*' | '?' => {
                    source.push_str(&regex_lite::escape(&literal));
                    literal.clear();
                    source.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        source.push_str(&regex_lite::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| SelectorError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            hidden: pattern.starts_with('.'),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.hidden {
            return false;
        }
        self.regex.is_match(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_wildcard() {
        assert!(has_wildcard("*.txt"));
        assert!(has_wildcard("chapter?.txt"));
        assert!(!has_wildcard("speech.txt"));
    }

    #[test]
    fn test_star_matches_any_run() {
        let pattern = WildcardPattern::new("*.txt").unwrap();
        assert!(pattern.matches("speech.txt"));
        assert!(pattern.matches("a.b.txt"));
        assert!(!pattern.matches("speech.txt.bak"));
        assert!(!pattern.matches("speech.mp3"));
    }

    #[test]
    fn test_dotfiles_need_a_leading_dot() {
        let star = WildcardPattern::new("*.txt").unwrap();
        assert!(!star.matches(".txt"));
        assert!(!star.matches(".notes.txt"));
        assert!(!WildcardPattern::new("?notes.txt").unwrap().matches(".notes.txt"));

        let dotted = WildcardPattern::new(".*.txt").unwrap();
        assert!(dotted.matches(".notes.txt"));
        assert!(!dotted.matches("notes.txt"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let pattern = WildcardPattern::new("ch?.txt").unwrap();
        assert!(pattern.matches("ch1.txt"));
        assert!(!pattern.matches("ch10.txt"));
        assert!(!pattern.matches("ch.txt"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = WildcardPattern::new("notes (v1+2)[a].*").unwrap();
        assert!(pattern.matches("notes (v1+2)[a].txt"));
        assert!(!pattern.matches("notes v1+2a.txt"));

        let dot = WildcardPattern::new("a.txt*").unwrap();
        assert!(!dot.matches("abtxt"));
    }
}

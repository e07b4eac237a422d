//! Rotation date patterns (`YYYY-MM-DD`, `YYYY-MM-DD-HH`, ...)

use time::OffsetDateTime;

use crate::core::{LogError, LogResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Literal(String),
}

const TOKENS: [(&str, Token); 7] = [
    ("YYYY", Token::Year),
    ("YY", Token::ShortYear),
    ("MM", Token::Month),
    ("DD", Token::Day),
    ("HH", Token::Hour),
    ("mm", Token::Minute),
    ("ss", Token::Second),
];

/// Parsed date pattern used in rotated file names
///
/// Recognizes `YYYY`, `YY`, `MM`, `DD`, `HH`, `mm` and `ss`; text inside
/// `[...]` and any other character is copied verbatim. A file rotates
/// whenever the rendered pattern changes, so `YYYY-MM-DD-HH` rotates hourly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Parse a pattern
    pub fn parse(pattern: &str) -> LogResult<Self> {
        let invalid = |reason: &str| LogError::InvalidDatePattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut tokens = Vec::new();
        let mut rest = pattern;
        while !rest.is_empty() {
            if let Some(escaped) = rest.strip_prefix('[') {
                let end = escaped.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                push_literal(&mut tokens, &escaped[..end]);
                rest = &escaped[end + 1..];
                continue;
            }
            if let Some((name, token)) = TOKENS.iter().find(|(name, _)| rest.starts_with(name)) {
                tokens.push(token.clone());
                rest = &rest[name.len()..];
                continue;
            }
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                if matches!(c, '/' | '\\') {
                    return Err(invalid("path separators are not allowed"));
                }
                push_literal(&mut tokens, c.encode_utf8(&mut [0; 4]));
            }
            rest = chars.as_str();
        }

        if !tokens.iter().any(|t| !matches!(t, Token::Literal(_))) {
            return Err(invalid("no date fields"));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// Pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render for a point in time
    pub fn render(&self, at: OffsetDateTime) -> String {
        let mut out = String::with_capacity(self.source.len() + 4);
        for token in &self.tokens {
            match token {
                Token::Year => out.push_str(&format!("{:04}", at.year())),
                Token::ShortYear => out.push_str(&format!("{:02}", at.year().rem_euclid(100))),
                Token::Month => out.push_str(&format!("{:02}", u8::from(at.month()))),
                Token::Day => out.push_str(&format!("{:02}", at.day())),
                Token::Hour => out.push_str(&format!("{:02}", at.hour())),
                Token::Minute => out.push_str(&format!("{:02}", at.minute())),
                Token::Second => out.push_str(&format!("{:02}", at.second())),
                Token::Literal(text) => out.push_str(text),
            }
        }
        out
    }
}

impl Default for DatePattern {
    /// `YYYY-MM-DD`
    fn default() -> Self {
        Self {
            source: crate::config::DEFAULT_DATE_PATTERN.to_string(),
            tokens: vec![
                Token::Year,
                Token::Literal("-".into()),
                Token::Month,
                Token::Literal("-".into()),
                Token::Day,
            ],
        }
    }
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[rstest]
    #[case("YYYY-MM-DD", "2024-03-05")]
    #[case("YYYY-MM-DD-HH", "2024-03-05-07")]
    #[case("YY.MM.DD_HHmmss", "24.03.05_070809")]
    #[case("[week]-YYYY", "week-2024")]
    fn test_render(#[case] pattern: &str, #[case] expected: &str) {
        let pattern = DatePattern::parse(pattern).unwrap();
        assert_eq!(pattern.render(datetime!(2024-03-05 07:08:09 UTC)), expected);
    }

    #[test]
    fn test_default_matches_parsed() {
        assert_eq!(
            DatePattern::default(),
            DatePattern::parse(crate::config::DEFAULT_DATE_PATTERN).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("static")]
    #[case("YYYY/MM")]
    #[case("[YYYY")]
    fn test_rejects(#[case] pattern: &str) {
        assert!(matches!(
            DatePattern::parse(pattern),
            Err(LogError::InvalidDatePattern { .. })
        ));
    }
}

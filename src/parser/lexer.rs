//! Lexers for placeholder templates and argument suffixes using logos
//!
//! Both token sets are single-character classes or runs of one class, so the
//! lexers never need to backtrack. Assembling spans and quoted arguments out of
//! these tokens is done by [`super::scan`] and [`super::arguments`].

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Tokens of a text template such as `Hello %name%!`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    /// Placeholder delimiter
    #[token("%")]
    Percent,

    /// Whitespace ends an open span unless it is inside quotes
    #[regex(r"\s+")]
    Whitespace,

    /// Anything else
    #[regex(r"[^%\s]+")]
    Text,
}

/// Tokens of a placeholder argument suffix such as `balance_"Larkyy_Jr"`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentToken {
    #[token("_")]
    Separator,

    #[token("\"")]
    Quote,

    #[regex(r#"[^_"]+"#)]
    Chunk,
}

/// Lex a template into tokens with spans
pub fn lex_template(input: &str) -> impl Iterator<Item = (TemplateToken, Span)> + '_ {
    TemplateToken::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(TemplateToken::Text), span))
}

/// Lex an argument suffix into tokens with spans
pub fn lex_arguments(input: &str) -> impl Iterator<Item = (ArgumentToken, Span)> + '_ {
    ArgumentToken::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(ArgumentToken::Chunk), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_tokens() {
        let tokens: Vec<_> = lex_template("Hello %name%!").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                TemplateToken::Text,
                TemplateToken::Whitespace,
                TemplateToken::Percent,
                TemplateToken::Text,
                TemplateToken::Percent,
                TemplateToken::Text,
            ]
        );
    }

    #[test]
    fn test_template_spans_cover_input() {
        let input = "a  %b%\n%";
        let spans: Vec<_> = lex_template(input).map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..1, 1..3, 3..4, 4..5, 5..6, 6..7, 7..8]);
    }

    #[test]
    fn test_argument_tokens() {
        let tokens: Vec<_> = lex_arguments(r#"stat_"a_b""#).map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                ArgumentToken::Chunk,
                ArgumentToken::Separator,
                ArgumentToken::Quote,
                ArgumentToken::Chunk,
                ArgumentToken::Separator,
                ArgumentToken::Chunk,
                ArgumentToken::Quote,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex_template("").count(), 0);
        assert_eq!(lex_arguments("").count(), 0);
    }
}

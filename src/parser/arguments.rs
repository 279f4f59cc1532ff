//! Tokenizer for the underscore-delimited argument suffix of a placeholder

use super::lexer::{lex_arguments, ArgumentToken};

/// Split an argument suffix on `_`, honouring `"…"` quoting.
///
/// Inside a quoted span `_` is kept literally; quote characters never appear
/// in the output. An unterminated quote extends to the end of the input.
/// Empty tokens are dropped.
pub fn tokenize_arguments(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for (tok, span) in lex_arguments(input) {
        match tok {
            ArgumentToken::Quote => in_quotes = !in_quotes,
            ArgumentToken::Separator if in_quotes => current.push('_'),
            ArgumentToken::Separator => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ArgumentToken::Chunk => current.push_str(&input[span]),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tokens() {
        assert_eq!(tokenize_arguments("level_50"), vec!["level", "50"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize_arguments("").is_empty());
    }

    #[test]
    fn test_quoted_underscore() {
        assert_eq!(tokenize_arguments(r#""Larkyy_Jr""#), vec!["Larkyy_Jr"]);
        assert_eq!(
            tokenize_arguments(r#"balance_"a_b"_gems"#),
            vec!["balance", "a_b", "gems"]
        );
    }

    #[test]
    fn test_quotes_inside_token() {
        assert_eq!(tokenize_arguments(r#"a"b_c"d"#), vec!["ab_cd"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize_arguments(r#"x_"y_z"#), vec!["x", "y_z"]);
    }

    #[test]
    fn test_repeated_separators() {
        assert_eq!(tokenize_arguments("a__b_"), vec!["a", "b"]);
        assert!(tokenize_arguments(r#""""#).is_empty());
    }
}

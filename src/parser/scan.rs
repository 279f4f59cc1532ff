//! Placeholder span scanning for text templates

use std::collections::BTreeSet;

use super::lexer::{lex_template, Span, TemplateToken};

/// A piece of a scanned template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text, passed through unchanged
    Text(&'a str),
    /// A `%…%` span
    Placeholder {
        /// Span content without delimiters, e.g. `stat_coins`
        content: &'a str,
        /// Span including delimiters, e.g. `%stat_coins%`
        raw: &'a str,
    },
}

/// Split a template into literal text and placeholder spans.
///
/// A span is a `%`, content starting with a non-whitespace character, and a
/// closing `%`. Whitespace may appear in the content only inside a `"…"`
/// quoted argument. A `%` that does not open such a span is literal text.
/// Adjacent literal pieces are merged.
pub fn scan(template: &str) -> Vec<Segment<'_>> {
    let tokens: Vec<_> = lex_template(template).collect();
    let mut segments = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut i = 0;

    while i < tokens.len() {
        let (tok, span) = &tokens[i];
        if *tok == TemplateToken::Percent {
            if let Some(close) = closing_delimiter(template, &tokens, i) {
                if let Some(start) = text_start.take() {
                    segments.push(Segment::Text(&template[start..span.start]));
                }
                let close_span = &tokens[close].1;
                segments.push(Segment::Placeholder {
                    content: &template[span.end..close_span.start],
                    raw: &template[span.start..close_span.end],
                });
                i = close + 1;
                continue;
            }
        }
        text_start.get_or_insert(span.start);
        i += 1;
    }

    if let Some(start) = text_start {
        segments.push(Segment::Text(&template[start..]));
    }
    segments
}

/// Index of the `%` closing the span opened at `tokens[open]`, if any
fn closing_delimiter(template: &str, tokens: &[(TemplateToken, Span)], open: usize) -> Option<usize> {
    if !matches!(tokens.get(open + 1), Some((TemplateToken::Text, _))) {
        return None;
    }
    let mut quoted = false;
    for (index, (tok, span)) in tokens.iter().enumerate().skip(open + 1) {
        match tok {
            TemplateToken::Percent => return Some(index),
            TemplateToken::Whitespace if !quoted => return None,
            TemplateToken::Whitespace => {}
            TemplateToken::Text => {
                if template[span.clone()].matches('"').count() % 2 == 1 {
                    quoted = !quoted;
                }
            }
        }
    }
    None
}

/// Whether the text contains at least one placeholder span
pub fn has_placeholders(text: &str) -> bool {
    scan(text)
        .iter()
        .any(|s| matches!(s, Segment::Placeholder { .. }))
}

/// Collect the contents of every placeholder span in the text
pub fn find_placeholders(text: &str) -> BTreeSet<String> {
    scan(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Placeholder { content, .. } => Some(content.to_string()),
            Segment::Text(_) => None,
        })
        .collect()
}

/// Replace every span with the result of `resolve(content)`.
///
/// Spans for which `resolve` returns `None` are kept verbatim.
pub fn replace_spans<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    for segment in scan(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { content, raw } => match resolve(content) {
                Some(value) => out.push_str(&value),
                None => out.push_str(raw),
            },
        }
    }
    out
}

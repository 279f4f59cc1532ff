//! Values placeholders can be substituted into

use crate::component::Component;
use crate::parser;
use crate::placeholder::Output;

/// A template a [`PlaceholderContext`](crate::PlaceholderContext) can render
///
/// Implemented for plain strings and rich-text [`Component`]s.
pub trait Template: Clone {
    /// Substitute every `%…%` span using `resolve`. Spans for which it returns
    /// `None` are kept verbatim.
    fn render_with(&self, resolve: &mut dyn FnMut(&str) -> Option<Output>) -> Self;
}

impl Template for String {
    /// Component outputs are flattened to their plain text
    fn render_with(&self, resolve: &mut dyn FnMut(&str) -> Option<Output>) -> Self {
        parser::replace_spans(self, |content| resolve(content).map(Output::into_plain))
    }
}

impl Template for Component {
    fn render_with(&self, resolve: &mut dyn FnMut(&str) -> Option<Output>) -> Self {
        self.substitute_with(resolve)
    }
}

//! Placeholder sets for one binding type

use std::fmt;
use std::time::Duration;

use tracing::trace;

use crate::config::{ContextConfig, UnknownPlaceholders};
use crate::placeholder::{Output, Placeholder};
use crate::template::Template;

use super::item::ResolvedItem;

/// What a substitution pass matched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Substitution {
    pub matched: usize,
    pub all_const: bool,
}

impl Substitution {
    /// Whether re-rendering can never change the result
    pub fn is_constant(&self) -> bool {
        self.matched == 0 || self.all_const
    }
}

/// The ordered placeholders available for bindings of type `T`
pub struct PlaceholderContext<T> {
    placeholders: Vec<Placeholder<T>>,
    max_update_interval: Duration,
    unknown_placeholders: UnknownPlaceholders,
}

impl<T> Clone for PlaceholderContext<T> {
    fn clone(&self) -> Self {
        Self {
            placeholders: self.placeholders.clone(),
            max_update_interval: self.max_update_interval,
            unknown_placeholders: self.unknown_placeholders,
        }
    }
}

impl<T> fmt::Debug for PlaceholderContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceholderContext")
            .field("placeholders", &self.placeholders)
            .field("max_update_interval", &self.max_update_interval)
            .field("unknown_placeholders", &self.unknown_placeholders)
            .finish()
    }
}

impl<T> PlaceholderContext<T> {
    pub fn new(placeholders: Vec<Placeholder<T>>, config: &ContextConfig) -> Self {
        Self {
            placeholders,
            max_update_interval: config.max_update_interval,
            unknown_placeholders: config.unknown_placeholders,
        }
    }

    pub fn placeholders(&self) -> &[Placeholder<T>] {
        &self.placeholders
    }

    pub fn max_update_interval(&self) -> Duration {
        self.max_update_interval
    }

    pub fn unknown_placeholders(&self) -> UnknownPlaceholders {
        self.unknown_placeholders
    }

    /// Add a placeholder to this context only; the registry is not touched
    pub fn add_placeholder(&mut self, placeholder: Placeholder<T>) -> &mut Self {
        self.placeholders.push(placeholder);
        self
    }

    /// The placeholder claiming a span's content.
    ///
    /// The longest matching identifier wins, so `stat_coins` beats `stat`
    /// for `%stat_coins_total%`. Among equally long identifiers the first
    /// in context order wins.
    pub fn find(&self, content: &str) -> Option<&Placeholder<T>> {
        let mut best: Option<&Placeholder<T>> = None;
        for placeholder in &self.placeholders {
            if !placeholder.matches(content) {
                continue;
            }
            let longer = best
                .map(|b| placeholder.identifier().len() > b.identifier().len())
                .unwrap_or(true);
            if longer {
                best = Some(placeholder);
            }
        }
        best
    }

    /// Output for a span no placeholder claims. `None` keeps the span verbatim.
    fn unknown_span(&self, content: &str) -> Option<Output> {
        trace!(content, "no placeholder matched");
        match self.unknown_placeholders {
            UnknownPlaceholders::Keep => None,
            UnknownPlaceholders::Empty => Some(Output::Text(String::new())),
        }
    }

    /// Render a template, substituting every placeholder this context knows
    pub fn substitute<V: Template>(&self, binder: &T, template: &V) -> V {
        self.substitute_tracked(binder, template).0
    }

    pub(crate) fn substitute_tracked<V: Template>(&self, binder: &T, template: &V) -> (V, Substitution) {
        let mut report = Substitution {
            matched: 0,
            all_const: true,
        };
        let value = template.render_with(&mut |content| match self.find(content) {
            Some(placeholder) => {
                report.matched += 1;
                report.all_const &= placeholder.is_const();
                Some(placeholder.compute(binder, content))
            }
            None => self.unknown_span(content),
        });
        (value, report)
    }

    /// Bind a template to a binding, computing its value immediately
    pub fn create_item<V: Template>(&self, binder: T, template: V) -> ResolvedItem<T, V> {
        ResolvedItem::new(self.clone(), binder, template)
    }
}

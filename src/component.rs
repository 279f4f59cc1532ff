//! Rich-text components
//!
//! A small styled-text tree: each node has literal content, a style and child
//! nodes rendered after the content. Children inherit the parent's style unless
//! they set their own. Styles may carry text of their own (hover text, click
//! values, insertions), and placeholder substitution reaches into all of it.

use std::collections::BTreeSet;

use crate::parser::{self, Segment};
use crate::placeholder::Output;

/// What happens when a component is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
    SuggestCommand,
    CopyToClipboard,
}

/// Click behaviour attached to a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

impl ClickEvent {
    pub fn new(action: ClickAction, value: impl Into<String>) -> Self {
        Self {
            action,
            value: value.into(),
        }
    }
}

/// Styling of a component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    /// Named or hex color, e.g. `gold` or `#ffaa00`
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    /// Text shown when hovering
    pub hover: Option<Box<Component>>,
    pub click: Option<ClickEvent>,
    /// Text inserted into the chat input on shift-click
    pub insertion: Option<String>,
}

/// A styled text node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    content: String,
    style: Style,
    children: Vec<Component>,
}

impl Component {
    /// Create an unstyled text component
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// Set the color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.italic = true;
        self
    }

    /// Attach hover text
    pub fn hover(mut self, hover: Component) -> Self {
        self.style.hover = Some(Box::new(hover));
        self
    }

    /// Attach a click event
    pub fn click(mut self, click: ClickEvent) -> Self {
        self.style.click = Some(click);
        self
    }

    pub fn insertion(mut self, insertion: impl Into<String>) -> Self {
        self.style.insertion = Some(insertion.into());
        self
    }

    /// Replace the whole style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Append a child component
    pub fn append(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    /// Visible text of this node and its children, without styling
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.write_plain(out);
        }
    }

    /// Contents of every placeholder span in this tree, including hover text
    /// and style values
    pub fn find_placeholders(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_placeholders(&mut found);
        found
    }

    fn collect_placeholders(&self, found: &mut BTreeSet<String>) {
        found.extend(parser::find_placeholders(&self.content));
        if let Some(hover) = &self.style.hover {
            hover.collect_placeholders(found);
        }
        if let Some(click) = &self.style.click {
            found.extend(parser::find_placeholders(&click.value));
        }
        if let Some(insertion) = &self.style.insertion {
            found.extend(parser::find_placeholders(insertion));
        }
        for child in &self.children {
            child.collect_placeholders(found);
        }
    }

    /// Replace every span in the tree with `f(span_content)`
    pub fn replace_placeholders<F>(&self, mut f: F) -> Component
    where
        F: FnMut(&str) -> String,
    {
        self.substitute_with(&mut |content| Some(Output::Text(f(content))))
    }

    /// Substitute every span in the tree.
    ///
    /// Text results are merged into the surrounding content; component results
    /// are inserted as children at the matched position. Spans for which
    /// `resolve` returns `None` are kept verbatim. Text-only attributes (click
    /// value, insertion) receive the plain text of component results.
    pub fn substitute_with(&self, resolve: &mut dyn FnMut(&str) -> Option<Output>) -> Component {
        let mut head = String::new();
        let mut inserted: Vec<Component> = Vec::new();
        let mut pending = String::new();

        for segment in parser::scan(&self.content) {
            let output = match segment {
                Segment::Text(text) => Output::Text(text.to_string()),
                Segment::Placeholder { content, raw } => {
                    resolve(content).unwrap_or_else(|| Output::Text(raw.to_string()))
                }
            };
            match output {
                Output::Text(text) if inserted.is_empty() => head.push_str(&text),
                Output::Text(text) => pending.push_str(&text),
                Output::Component(component) => {
                    if !pending.is_empty() {
                        inserted.push(Component::text(std::mem::take(&mut pending)));
                    }
                    inserted.push(component);
                }
            }
        }
        if !pending.is_empty() {
            inserted.push(Component::text(pending));
        }

        let style = Style {
            hover: self
                .style
                .hover
                .as_ref()
                .map(|hover| Box::new(hover.substitute_with(resolve))),
            click: self.style.click.as_ref().map(|click| ClickEvent {
                action: click.action,
                value: substitute_plain(&click.value, resolve),
            }),
            insertion: self
                .style
                .insertion
                .as_ref()
                .map(|insertion| substitute_plain(insertion, resolve)),
            ..self.style.clone()
        };

        inserted.extend(self.children.iter().map(|c| c.substitute_with(resolve)));

        Component {
            content: head,
            style,
            children: inserted,
        }
    }
}

fn substitute_plain(text: &str, resolve: &mut dyn FnMut(&str) -> Option<Output>) -> String {
    parser::replace_spans(text, |content| resolve(content).map(Output::into_plain))
}

impl From<&str> for Component {
    fn from(text: &str) -> Self {
        Component::text(text)
    }
}

impl From<String> for Component {
    fn from(text: String) -> Self {
        Component::text(text)
    }
}

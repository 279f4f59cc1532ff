//! Resolver tree nodes and the backtracking resolution walk

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use super::context::{ArgValue, Arguments, DslContext};

type Handler<T> = Arc<dyn Fn(&DslContext<'_, T>) -> String + Send + Sync>;
type ArgumentParser = Arc<dyn Fn(&str) -> Option<ArgValue> + Send + Sync>;

struct ArgumentBranch<T> {
    parser: ArgumentParser,
    node: DslNode<T>,
}

/// A node of a placeholder's resolver tree
///
/// Children are either literal (matched case-insensitively against the next
/// token) or typed arguments (matched when their parser accepts the token).
/// A node may carry a handler and children at the same time; the handler is
/// then the fallback when no child matches.
pub struct DslNode<T> {
    id: Option<String>,
    handler: Option<Handler<T>>,
    literal_children: HashMap<String, DslNode<T>>,
    argument_children: Vec<ArgumentBranch<T>>,
}

impl<T> Default for DslNode<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> DslNode<T> {
    fn new(id: Option<String>) -> Self {
        Self {
            id,
            handler: None,
            literal_children: HashMap::new(),
            argument_children: Vec::new(),
        }
    }

    /// Create an unnamed root node
    pub fn root() -> Self {
        Self::default()
    }

    /// Literal key or argument id of this node
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Add a literal branch. Keys are case-insensitive; redeclaring a key
    /// replaces the earlier branch.
    pub fn literal<F>(&mut self, key: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut DslNode<T>),
    {
        let key = key.to_lowercase();
        let mut node = DslNode::new(Some(key.clone()));
        block(&mut node);
        self.literal_children.insert(key, node);
        self
    }

    /// Add a typed-argument branch. Argument branches are tried in the order
    /// they are declared.
    pub fn argument<P, F>(&mut self, id: &str, parser: P, block: F) -> &mut Self
    where
        P: Fn(&str) -> Option<ArgValue> + Send + Sync + 'static,
        F: FnOnce(&mut DslNode<T>),
    {
        let mut node = DslNode::new(Some(id.to_string()));
        block(&mut node);
        self.argument_children.push(ArgumentBranch {
            parser: Arc::new(parser),
            node,
        });
        self
    }

    /// Argument accepting any token
    pub fn string_argument<F>(&mut self, id: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut DslNode<T>),
    {
        self.argument(id, |token| Some(ArgValue::Text(token.to_string())), block)
    }

    pub fn int_argument<F>(&mut self, id: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut DslNode<T>),
    {
        self.argument(id, |token| token.parse().ok().map(ArgValue::Int), block)
    }

    pub fn float_argument<F>(&mut self, id: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut DslNode<T>),
    {
        self.argument(id, |token| token.parse().ok().map(ArgValue::Float), block)
    }

    /// Argument accepting `true`/`false` in any case
    pub fn bool_argument<F>(&mut self, id: &str, block: F) -> &mut Self
    where
        F: FnOnce(&mut DslNode<T>),
    {
        self.argument(
            id,
            |token| match token.to_ascii_lowercase().as_str() {
                "true" => Some(ArgValue::Bool(true)),
                "false" => Some(ArgValue::Bool(false)),
                _ => None,
            },
            block,
        )
    }

    /// Argument produced by a lookup, e.g. a host object found by name.
    /// Handlers read it back with [`DslContext::custom`].
    pub fn custom_argument<R, P, F>(&mut self, id: &str, lookup: P, block: F) -> &mut Self
    where
        R: Any + Send + Sync,
        P: Fn(&str) -> Option<R> + Send + Sync + 'static,
        F: FnOnce(&mut DslNode<T>),
    {
        self.argument(
            id,
            move |token| {
                lookup(token)
                    .map(|value| ArgValue::Custom(Arc::new(value) as Arc<dyn Any + Send + Sync>))
            },
            block,
        )
    }

    /// Attach the handler producing this node's output
    pub fn handle<H>(&mut self, handler: H) -> &mut Self
    where
        H: Fn(&DslContext<'_, T>) -> String + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Resolve `tokens[index..]` below this node.
    ///
    /// Literal children are tried before argument children. For an argument
    /// child that parses the token but yields nothing deeper, this node's
    /// handler is tried with the argument bound before moving to the next
    /// argument child. With no matching child, this node's own handler is the
    /// fallback. Returns `None` when no handler is reachable.
    pub fn resolve(
        &self,
        binder: &T,
        tokens: &[String],
        args: &Arguments,
        index: usize,
    ) -> Option<String> {
        let Some(token) = tokens.get(index).map(String::as_str) else {
            return self.invoke(binder, args);
        };

        if let Some(child) = self.literal_children.get(&token.to_lowercase()) {
            if let Some(result) = child.resolve(binder, tokens, args, index + 1) {
                return Some(result);
            }
        }

        for branch in &self.argument_children {
            let Some(value) = (branch.parser)(token) else {
                continue;
            };
            let mut extended = args.clone();
            if let Some(id) = &branch.node.id {
                extended.insert(id.clone(), value);
            }
            if let Some(result) = branch.node.resolve(binder, tokens, &extended, index + 1) {
                return Some(result);
            }
            if let Some(result) = self.invoke(binder, &extended) {
                return Some(result);
            }
        }

        self.invoke(binder, args)
    }

    fn invoke(&self, binder: &T, args: &Arguments) -> Option<String> {
        self.handler
            .as_ref()
            .map(|handler| handler(&DslContext::new(binder, args)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(root: &DslNode<()>, parts: &[&str]) -> Option<String> {
        root.resolve(&(), &tokens(parts), &Arguments::new(), 0)
    }

    #[test]
    fn test_literal_case_insensitive() {
        let mut root = DslNode::<()>::root();
        root.literal("Rank", |n| {
            n.handle(|_| "Admin".to_string());
        });
        assert_eq!(resolve(&root, &["rank"]).as_deref(), Some("Admin"));
        assert_eq!(resolve(&root, &["RANK"]).as_deref(), Some("Admin"));
    }

    #[test]
    fn test_no_handler_is_none() {
        let mut root = DslNode::<()>::root();
        root.literal("rank", |_| {});
        assert_eq!(resolve(&root, &[]), None);
        assert_eq!(resolve(&root, &["rank"]), None);
        assert_eq!(resolve(&root, &["other"]), None);
    }

    #[test]
    fn test_literal_before_argument() {
        let mut root = DslNode::<()>::root();
        root.string_argument("any", |n| {
            n.handle(|ctx| format!("arg {}", ctx.string("any").unwrap_or_default()));
        });
        root.literal("top", |n| {
            n.handle(|_| "literal".to_string());
        });
        assert_eq!(resolve(&root, &["top"]).as_deref(), Some("literal"));
        assert_eq!(resolve(&root, &["x"]).as_deref(), Some("arg x"));
    }

    #[test]
    fn test_argument_order_and_parse_failure() {
        let mut root = DslNode::<()>::root();
        root.int_argument("n", |n| {
            n.handle(|ctx| format!("int {}", ctx.int("n").unwrap_or_default()));
        });
        root.string_argument("s", |n| {
            n.handle(|ctx| format!("str {}", ctx.string("s").unwrap_or_default()));
        });
        assert_eq!(resolve(&root, &["12"]).as_deref(), Some("int 12"));
        assert_eq!(resolve(&root, &["abc"]).as_deref(), Some("str abc"));
    }

    #[test]
    fn test_argument_child_without_handler_defers_to_parent() {
        let mut root = DslNode::<()>::root();
        root.handle(|ctx| match ctx.string("suffix") {
            Some(s) => format!("parent with {}", s),
            None => "parent".to_string(),
        });
        root.string_argument("suffix", |_| {});

        assert_eq!(resolve(&root, &[]).as_deref(), Some("parent"));
        assert_eq!(resolve(&root, &["x"]).as_deref(), Some("parent with x"));
    }

    #[test]
    fn test_deeper_failure_falls_back_to_ancestor() {
        let mut root = DslNode::<()>::root();
        root.literal("a", |n| {
            n.handle(|_| "a".to_string());
            n.literal("b", |n| {
                n.literal("c", |n| {
                    n.handle(|_| "abc".to_string());
                });
            });
        });
        assert_eq!(resolve(&root, &["a", "b", "c"]).as_deref(), Some("abc"));
        // "b" has no handler and "zzz" matches nothing below it
        assert_eq!(resolve(&root, &["a", "b", "zzz"]).as_deref(), Some("a"));
    }

    #[test]
    fn test_custom_argument() {
        let mut root = DslNode::<()>::root();
        root.custom_argument(
            "who",
            |token| (token == "steve").then_some(7u32),
            |n| {
                n.handle(|ctx| format!("id {}", ctx.custom::<u32>("who").copied().unwrap_or(0)));
            },
        );
        assert_eq!(resolve(&root, &["steve"]).as_deref(), Some("id 7"));
        assert_eq!(resolve(&root, &["alex"]), None);
    }

    #[test]
    fn test_bool_and_float_arguments() {
        let mut root = DslNode::<()>::root();
        root.bool_argument("flag", |n| {
            n.float_argument("ratio", |n| {
                n.handle(|ctx| {
                    format!(
                        "{} {}",
                        ctx.bool("flag").unwrap_or_default(),
                        ctx.float("ratio").unwrap_or_default()
                    )
                });
            });
        });
        assert_eq!(resolve(&root, &["TRUE", "0.25"]).as_deref(), Some("true 0.25"));
        assert_eq!(resolve(&root, &["maybe", "0.25"]), None);
    }

    #[test]
    fn test_node_accessors() {
        let mut root = DslNode::<()>::root();
        assert_eq!(root.id(), None);
        assert!(!root.has_handler());
        root.literal("Rank", |n| {
            assert_eq!(n.id(), Some("rank"));
            n.handle(|_| String::new());
            assert!(n.has_handler());
        });
        root.string_argument("who", |n| assert_eq!(n.id(), Some("who")));
    }
}

//! Declarative placeholders with argument suffixes
//!
//! A DSL placeholder interprets the part of a span after its identifier as a
//! path through a tree of literal and typed-argument branches:
//!
//! ```
//! use placeholder_replace::dsl::dsl_placeholder;
//!
//! let test = dsl_placeholder::<(), _>("test", false, |root| {
//!     root.literal("rank", |n| {
//!         n.handle(|_| "Admin".to_string());
//!     });
//!     root.literal("level", |n| {
//!         n.int_argument("value", |n| {
//!             n.handle(|ctx| format!("Level: {}", ctx.int("value").unwrap_or(0)));
//!         });
//!     });
//! })
//! .unwrap();
//!
//! assert_eq!(test.compute(&(), "test_rank").into_plain(), "Admin");
//! assert_eq!(test.compute(&(), "test_level_50").into_plain(), "Level: 50");
//! ```

mod context;
mod node;

pub use context::{ArgValue, Arguments, DslContext};
pub use node::DslNode;

use std::sync::Arc;

use tracing::trace;

use crate::error::{validate_identifier, PlaceholderError};
use crate::parser::tokenize_arguments;
use crate::placeholder::Placeholder;

/// Build a literal placeholder whose output is computed by a resolver tree.
///
/// `block` declares the tree on the root node. Spans reaching no handler
/// resolve to the empty string.
pub fn dsl_placeholder<T, F>(
    identifier: impl Into<String>,
    is_const: bool,
    block: F,
) -> Result<Placeholder<T>, PlaceholderError>
where
    T: 'static,
    F: FnOnce(&mut DslNode<T>),
{
    let identifier = identifier.into();
    validate_identifier(&identifier)?;

    let mut root = DslNode::root();
    block(&mut root);

    let id = identifier.clone();
    let func = Arc::new(move |binder: &T, text: &str| {
        let tokens = invocation_tokens(&id, text);
        root.resolve(binder, &tokens, &Arguments::new(), 0)
            .unwrap_or_else(|| {
                trace!(identifier = %id, text, "no handler reachable");
                String::new()
            })
    });

    Ok(Placeholder::from_literal(identifier, func).with_const(is_const))
}

/// Argument tokens of a span matched by `identifier`.
///
/// `<identifier>_<args>` yields the tokens of `<args>`; the bare identifier
/// yields none. Any other text is tokenized whole.
pub fn invocation_tokens(identifier: &str, text: &str) -> Vec<String> {
    if text == identifier {
        return Vec::new();
    }
    match text
        .strip_prefix(identifier)
        .and_then(|rest| rest.strip_prefix('_'))
    {
        Some(args) => tokenize_arguments(args),
        None => tokenize_arguments(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Wallet {
        coins: u32,
        gems: u32,
    }

    fn stats() -> Placeholder<Wallet> {
        dsl_placeholder("stats", false, |root| {
            root.literal("balance", |n| {
                n.handle(|ctx| {
                    let wallet: &Wallet = ctx.binder();
                    match ctx.string("currency") {
                        Some("gems") => format!("{} Gems", wallet.gems),
                        Some(_) => format!("{} Coins", wallet.coins),
                        None => format!("Total: {}", wallet.coins),
                    }
                });
                n.string_argument("currency", |_| {});
            });
        })
        .unwrap()
    }

    #[test]
    fn test_invocation_tokens() {
        assert!(invocation_tokens("stat", "stat").is_empty());
        assert!(invocation_tokens("stat", "stat_").is_empty());
        assert_eq!(invocation_tokens("stat", "stat_coins"), vec!["coins"]);
        assert_eq!(
            invocation_tokens("stat", r#"stat_"Larkyy_Jr""#),
            vec!["Larkyy_Jr"]
        );
        assert_eq!(invocation_tokens("stat", "other_x"), vec!["other", "x"]);
    }

    #[test]
    fn test_optional_argument() {
        let wallet = Wallet {
            coins: 500,
            gems: 10,
        };
        let p = stats();
        assert_eq!(p.compute(&wallet, "stats_balance").into_plain(), "Total: 500");
        assert_eq!(p.compute(&wallet, "stats_balance_gems").into_plain(), "10 Gems");
        assert_eq!(
            p.compute(&wallet, "stats_balance_money").into_plain(),
            "500 Coins"
        );
    }

    #[test]
    fn test_unmatched_path_is_empty() {
        let wallet = Wallet { coins: 1, gems: 1 };
        let p = stats();
        assert_eq!(p.compute(&wallet, "stats").into_plain(), "");
        assert_eq!(p.compute(&wallet, "stats_unknown").into_plain(), "");
    }

    #[test]
    fn test_const_flag_and_identifier_validation() {
        let p = dsl_placeholder::<(), _>("server", true, |root| {
            root.handle(|_| "lobby".to_string());
        })
        .unwrap();
        assert!(p.is_const());
        assert_eq!(p.compute(&(), "server").into_plain(), "lobby");

        let err = dsl_placeholder::<(), _>("has space", false, |_| {}).unwrap_err();
        assert!(matches!(err, PlaceholderError::InvalidIdentifier { .. }));
    }
}

//! Integration tests for placeholder substitution in rich text

use std::time::Duration;

use placeholder_replace::{ClickAction, ClickEvent, Component, Placeholder, Registry};
use pretty_assertions::assert_eq;

#[test]
fn test_recursive_placeholder_replacement_in_components() {
    let original =
        Component::text("Hello %user%!").hover(Component::text("Click here, %user%"));

    let replaced = original.replace_placeholders(|_| "Larkyy".to_string());

    assert_eq!(replaced.content(), "Hello Larkyy!");
    let hover = replaced.style().hover.as_ref().expect("hover text survives");
    assert_eq!(hover.content(), "Click here, Larkyy");
}

#[test]
fn test_find_placeholders_extracts_correct_names() {
    let component = Component::text("Welcome %player% to %server%!");
    let found: Vec<_> = component.find_placeholders().into_iter().collect();
    assert_eq!(found, vec!["player".to_string(), "server".to_string()]);
}

#[test]
fn test_context_substitutes_into_every_text_attribute() {
    struct Player {
        name: String,
    }

    let registry = Registry::new();
    registry.register([
        Placeholder::<Player>::literal("name", |p, _| p.name.clone()).unwrap(),
        Placeholder::<Player>::component("badge", |_, _| Component::text("[VIP]").color("gold").bold())
            .unwrap(),
    ]);
    let context = registry.resolver_for::<Player>(Duration::from_secs(5), []);

    let template = Component::text("%badge% %name% joined")
        .hover(Component::text("Profile of %name%").italic())
        .click(ClickEvent::new(ClickAction::SuggestCommand, "/msg %name% %badge%"))
        .append(Component::text(" (%name%)").color("gray"));

    let rendered = context.substitute(
        &Player {
            name: "Larkyy".into(),
        },
        &template,
    );

    assert_eq!(rendered.to_plain(), "[VIP] Larkyy joined (Larkyy)");
    assert_eq!(rendered.content(), "");
    assert_eq!(
        rendered.children(),
        &[
            Component::text("[VIP]").color("gold").bold(),
            Component::text(" Larkyy joined"),
            Component::text(" (Larkyy)").color("gray"),
        ]
    );

    let hover = rendered.style().hover.as_ref().unwrap();
    assert_eq!(**hover, Component::text("Profile of Larkyy").italic());

    let click = rendered.style().click.as_ref().unwrap();
    assert_eq!(click.value, "/msg Larkyy [VIP]");
}

#[test]
fn test_component_item_without_placeholders_is_constant() {
    let registry = Registry::new();
    let context = registry.resolver_for::<()>(Duration::ZERO, []);
    let item = context.create_item((), Component::text("static").bold());
    assert!(item.is_constant());
    assert_eq!(item.latest(), &Component::text("static").bold());
}

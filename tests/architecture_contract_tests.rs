//! Layer boundary tests.

mod support;

use support::architecture::find_lines_containing;

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
            "axum::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_do_not_depend_on_adapters() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_uses_ports_not_adapters() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "diesel::", "teloxide::"],
    );

    assert!(
        hits.is_empty(),
        "found adapter imports in application layer: {hits:#?}"
    );
}

#[test]
fn only_the_telegram_adapter_talks_to_telegram() {
    let hits: Vec<_> = find_lines_containing("src", &["teloxide::"])
        .into_iter()
        .filter(|(path, _, _)| !path.starts_with("src/adapter/outbound/notifier/telegram/"))
        .collect();

    assert!(hits.is_empty(), "teloxide used outside its adapter: {hits:#?}");
}

//! Resource resolution through the public API

use infogen::resources::{placeholder, ResourceResolver, ResourceToken};
use serde_json::json;

#[test]
fn bundled_icon_resolves_to_svg() {
    let mut resolver = ResourceResolver::default();
    let svg = resolver.resolve(&ResourceToken::Icon("rocket".into())).expect("rocket is bundled");
    assert!(svg.contains("<svg"));
    assert!(resolver.resolve_value(&json!("icon:__nonexistent__")).is_none());
}

#[test]
fn missing_illustration_uses_stable_placeholder() {
    let mut resolver = ResourceResolver::new(None, None);
    let first = resolver.resolve_value(&json!("illus:missing")).unwrap();
    let second = resolver.resolve_value(&json!("illus:missing")).unwrap();
    assert!(first.contains("missing"));
    assert_eq!(first, second);
    assert_eq!(first, placeholder("missing"));
}

#[test]
fn illustrations_come_from_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("step-1.svg"),
        r#"<?xml version="1.0"?><svg viewBox="0 0 10 10"><!-- drawn by hand --><circle r="4"/></svg>"#,
    )
    .unwrap();

    let mut resolver = ResourceResolver::new(Some(dir.path().to_path_buf()), None);
    let data = resolver.resolve_data(&json!({
        "items": [{"label": "One", "illus": "illus:step-1", "children": [{"illus": "illus:step-9"}]}]
    }));

    let illus = data["items"][0]["illus"]["data"].as_str().unwrap();
    assert!(illus.contains("<circle"));
    assert!(!illus.contains("<!--"));
    assert!(!illus.contains("<?xml"));

    let child = data["items"][0]["children"][0]["illus"]["data"].as_str().unwrap();
    assert_eq!(child, placeholder("step-9"));
}

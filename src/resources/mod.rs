//! Resource resolution: icon and illustration tokens to inline SVG.
//!
//! Resolution happens before rendering. [`ResourceResolver::resolve_data`]
//! rewrites every token in the item tree to `{"type":"custom","data":<svg>}`,
//! which the diagram library's resource loader passes through untouched.

pub mod icons;
pub mod illustrations;
pub mod token;

pub use icons::{IconSet, IconStyle, ICON_CATEGORIES};
pub use illustrations::{placeholder, IllustrationCheck, IllustrationLibrary, IllustrationReport};
pub use token::ResourceToken;

use log::{debug, warn};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

/// Names that could escape a resource directory are never looked up.
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Resolves tokens to SVG markup, memoizing by token identity.
///
/// The caches are unbounded; a resolver is expected to live for one
/// generation run.
#[derive(Debug, Default)]
pub struct ResourceResolver {
    icons: IconSet,
    illustrations: IllustrationLibrary,
    icon_style: IconStyle,
    icon_cache: HashMap<(String, String, u32), Option<String>>,
    illustration_cache: HashMap<String, String>,
}

impl ResourceResolver {
    pub fn new(illustrations_dir: Option<PathBuf>, icons_dir: Option<PathBuf>) -> Self {
        Self {
            icons: IconSet::new(icons_dir),
            illustrations: IllustrationLibrary::new(illustrations_dir),
            ..Default::default()
        }
    }

    /// Style applied to every icon this resolver returns.
    pub fn with_icon_style(mut self, style: IconStyle) -> Self {
        self.icon_style = style;
        self
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    pub fn illustrations(&self) -> &IllustrationLibrary {
        &self.illustrations
    }

    /// Point at a different illustrations directory, dropping cached loads.
    pub fn set_illustrations_dir(&mut self, dir: Option<PathBuf>) {
        self.illustrations = IllustrationLibrary::new(dir);
        self.illustration_cache.clear();
    }

    /// Resolve one token to SVG markup.
    pub fn resolve(&mut self, token: &ResourceToken) -> Option<String> {
        match token {
            ResourceToken::Icon(name) => self.icon(name),
            ResourceToken::Illustration(name) => Some(self.illustration(name)),
            ResourceToken::InlineSvg(svg) => Some(svg.clone()),
            ResourceToken::Custom(data) => {
                if data.starts_with("%3C") || data.starts_with("%3c") {
                    Some(token::percent_decode(data))
                } else {
                    Some(data.clone())
                }
            }
        }
    }

    /// Parse and resolve a raw JSON value. Non-tokens give `None`.
    pub fn resolve_value(&mut self, value: &Value) -> Option<String> {
        ResourceToken::parse(value).and_then(|t| self.resolve(&t))
    }

    fn icon(&mut self, name: &str) -> Option<String> {
        let key = (name.to_string(), self.icon_style.color.clone(), self.icon_style.size);
        if let Some(hit) = self.icon_cache.get(&key) {
            return hit.clone();
        }
        let svg = self.icons.get(name, &self.icon_style);
        match &svg {
            Some(_) => debug!("Loaded icon: {}", name),
            None => warn!("Icon not found: {}", name),
        }
        self.icon_cache.insert(key, svg.clone());
        svg
    }

    fn illustration(&mut self, name: &str) -> String {
        if let Some(hit) = self.illustration_cache.get(name) {
            return hit.clone();
        }
        let svg = match self.illustrations.load(name) {
            Ok(Some(svg)) => {
                debug!("Loaded illustration: {}", name);
                svg
            }
            Ok(None) => {
                if self.illustrations.dir().is_some() {
                    warn!("Illustration not found: {}, using placeholder", name);
                }
                placeholder(name)
            }
            Err(e) => {
                warn!("{}, using placeholder", e);
                placeholder(name)
            }
        };
        self.illustration_cache.insert(name.to_string(), svg.clone());
        svg
    }

    /// Rewrite every resource token in `data.items` (and nested `children`).
    ///
    /// Resolved fields become `{"type":"custom","data":<svg>}`. A field that
    /// fails to resolve is dropped from its item so the renderer does not
    /// try to fetch it.
    pub fn resolve_data(&mut self, data: &Value) -> Value {
        let mut out = data.clone();
        if let Some(items) = out.get_mut("items").and_then(Value::as_array_mut) {
            for item in items.iter_mut() {
                self.resolve_item(item);
            }
        }
        out
    }

    fn resolve_item(&mut self, item: &mut Value) {
        let Some(fields) = item.as_object_mut() else { return };

        let keys: Vec<String> = fields.keys().filter(|k| *k != "children").cloned().collect();
        for key in keys {
            let Some(token) = fields.get(&key).and_then(ResourceToken::parse) else {
                continue;
            };
            match self.resolve(&token) {
                Some(svg) => {
                    fields.insert(key, custom_resource(svg));
                }
                None => {
                    warn!("Dropping unresolved resource field '{}'", key);
                    fields.remove(&key);
                }
            }
        }

        if let Some(children) = fields.get_mut("children").and_then(Value::as_array_mut) {
            for child in children.iter_mut() {
                self.resolve_item(child);
            }
        }
    }
}

fn custom_resource(svg: String) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!("custom"));
    map.insert("data".to_string(), Value::String(svg));
    Value::Object(map)
}

/// Illustration names referenced by `illus:` tokens anywhere in the items.
pub fn referenced_illustrations(data: &Value) -> Vec<String> {
    fn walk(items: &[Value], out: &mut Vec<String>) {
        for item in items {
            let Some(fields) = item.as_object() else { continue };
            for (key, value) in fields {
                if key == "children" {
                    if let Some(children) = value.as_array() {
                        walk(children, out);
                    }
                } else if let Some(ResourceToken::Illustration(name)) = ResourceToken::parse(value) {
                    if !out.contains(&name) {
                        out.push(name);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    if let Some(items) = data.get("items").and_then(Value::as_array) {
        walk(items, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_and_custom_pass_through() {
        let mut r = ResourceResolver::default();
        assert_eq!(
            r.resolve(&ResourceToken::InlineSvg("<svg/>".into())).as_deref(),
            Some("<svg/>")
        );
        assert_eq!(
            r.resolve(&ResourceToken::Custom("%3Csvg%2F%3E".into())).as_deref(),
            Some("<svg/>")
        );
        assert_eq!(r.resolve_value(&json!("Plain label")), None);
    }

    #[test]
    fn icon_misses_are_cached_as_misses() {
        let mut r = ResourceResolver::default();
        assert_eq!(r.resolve_value(&json!("icon:__nonexistent__")), None);
        assert_eq!(r.icon_cache.len(), 1);
        assert_eq!(r.resolve_value(&json!("icon:__nonexistent__")), None);
        assert_eq!(r.icon_cache.len(), 1);
    }

    #[test]
    fn changing_directory_clears_illustrations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hero.svg"), "<svg id=\"hero\"/>").unwrap();

        let mut r = ResourceResolver::default();
        let before = r.resolve_value(&json!("illus:hero")).unwrap();
        assert!(before.contains("(missing)"));

        r.set_illustrations_dir(Some(dir.path().to_path_buf()));
        assert_eq!(r.resolve_value(&json!("illus:hero")).as_deref(), Some("<svg id=\"hero\"/>"));
    }

    #[test]
    fn resolve_data_rewrites_nested_items() {
        let mut r = ResourceResolver::default();
        let data = json!({
            "title": "icon:star",
            "items": [
                { "label": "A", "icon": "icon:rocket", "children": [
                    { "label": "A1", "illus": "illus:diagram" },
                    { "label": "A2", "icon": "icon:__nonexistent__" }
                ]},
                { "label": "B", "icon": { "type": "custom", "data": "icon:check" } }
            ]
        });
        let out = r.resolve_data(&data);

        assert_eq!(out["title"], "icon:star");
        let a = &out["items"][0];
        assert_eq!(a["label"], "A");
        assert_eq!(a["icon"]["type"], "custom");
        assert!(a["icon"]["data"].as_str().unwrap().starts_with("<svg"));
        assert!(a["children"][0]["illus"]["data"].as_str().unwrap().contains("diagram"));
        assert!(a["children"][1].get("icon").is_none());
        assert!(out["items"][1]["icon"]["data"].as_str().unwrap().starts_with("<svg"));
        // input untouched
        assert_eq!(data["items"][0]["icon"], "icon:rocket");
    }

    #[test]
    fn icon_style_applies_to_resolved_icons() {
        let mut plain = ResourceResolver::default();
        let mut styled = ResourceResolver::default()
            .with_icon_style(IconStyle { color: "#ff0000".into(), size: 32 });

        let svg = styled.resolve(&ResourceToken::Icon("rocket".into())).unwrap();
        assert!(svg.contains(r#"width="32""#));
        assert!(svg.contains(r##"stroke="#ff0000""##));

        let default = plain.resolve(&ResourceToken::Icon("rocket".into())).unwrap();
        assert!(default.contains(r#"width="24""#));
        assert!(default.contains(r#"stroke="currentColor""#));
    }

    #[test]
    fn finds_referenced_illustrations() {
        let data = json!({"items": [
            {"illus": "illus:a", "children": [{"illus": "illus:b"}, {"illus": "illus:a"}]},
            {"icon": "icon:x"}
        ]});
        assert_eq!(referenced_illustrations(&data), vec!["a", "b"]);
    }
}

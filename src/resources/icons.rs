//! Lucide icons as inline SVG.
//!
//! Icons come from an optional directory laid out like `lucide-static/icons`
//! (`<dir>/<name>.svg`), falling back to a small table compiled into the
//! binary.

use super::is_plain_name;
use super::token::percent_encode;
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Stroke color and edge length applied to an icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconStyle {
    pub color: String,
    pub size: u32,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self { color: "currentColor".to_string(), size: 24 }
    }
}

/// Icon names grouped by the kind of content they suit.
pub const ICON_CATEGORIES: &[(&str, &[&str])] = &[
    ("process", &["play", "pause", "stop", "skip-forward", "skip-back", "refresh-cw", "repeat"]),
    ("business", &["briefcase", "building", "building-2", "landmark", "store", "factory", "warehouse"]),
    ("growth", &["trending-up", "trending-down", "chart-bar", "chart-line", "chart-pie", "target", "award"]),
    ("people", &["user", "users", "user-plus", "user-check", "contact", "smile", "heart"]),
    ("communication", &["mail", "message-circle", "message-square", "phone", "video", "radio", "megaphone"]),
    ("technology", &["laptop", "smartphone", "tablet", "monitor", "server", "cloud", "database", "cpu"]),
    ("actions", &["check", "check-circle", "x", "x-circle", "plus", "minus", "edit", "trash-2"]),
    ("navigation", &["arrow-right", "arrow-left", "arrow-up", "arrow-down", "chevron-right", "chevron-left"]),
    ("time", &["clock", "calendar", "timer", "hourglass", "history", "calendar-days"]),
    ("documents", &["file", "file-text", "folder", "clipboard", "book", "notebook", "newspaper"]),
    ("security", &["lock", "unlock", "shield", "shield-check", "key", "eye", "eye-off"]),
    ("money", &["dollar-sign", "credit-card", "wallet", "coins", "banknote", "receipt"]),
    ("nature", &["sun", "moon", "cloud", "zap", "droplet", "leaf", "tree", "flower"]),
    ("transport", &["car", "truck", "plane", "ship", "train", "bike", "bus"]),
    ("misc", &["star", "heart", "flag", "bookmark", "tag", "gift", "lightbulb", "rocket"]),
];

/// Icons compiled into the binary, sorted by name.
const BUNDLED: &[(&str, &str)] = &[
    ("arrow-down", r#"<path d="M12 5v14" /><path d="m19 12-7 7-7-7" />"#),
    ("arrow-left", r#"<path d="m12 19-7-7 7-7" /><path d="M19 12H5" />"#),
    ("arrow-right", r#"<path d="M5 12h14" /><path d="m12 5 7 7-7 7" />"#),
    ("arrow-up", r#"<path d="m5 12 7-7 7 7" /><path d="M12 19V5" />"#),
    ("award", r#"<circle cx="12" cy="8" r="6" /><path d="M15.477 12.89 17 22l-5-3-5 3 1.523-9.11" />"#),
    ("bookmark", r#"<path d="m19 21-7-4-7 4V5a2 2 0 0 1 2-2h10a2 2 0 0 1 2 2v16z" />"#),
    ("briefcase", r#"<rect width="20" height="14" x="2" y="7" rx="2" ry="2" /><path d="M16 21V5a2 2 0 0 0-2-2h-4a2 2 0 0 0-2 2v16" />"#),
    ("calendar", r#"<path d="M8 2v4" /><path d="M16 2v4" /><rect width="18" height="18" x="3" y="4" rx="2" /><path d="M3 10h18" />"#),
    ("check", r#"<path d="M20 6 9 17l-5-5" />"#),
    ("check-circle", r#"<path d="M22 11.08V12a10 10 0 1 1-5.93-9.14" /><path d="m9 11 3 3L22 4" />"#),
    ("chevron-left", r#"<path d="m15 18-6-6 6-6" />"#),
    ("chevron-right", r#"<path d="m9 18 6-6-6-6" />"#),
    ("clock", r#"<circle cx="12" cy="12" r="10" /><polyline points="12 6 12 12 16 14" />"#),
    ("cloud", r#"<path d="M17.5 19H9a7 7 0 1 1 6.71-9h1.79a4.5 4.5 0 1 1 0 9Z" />"#),
    ("database", r#"<ellipse cx="12" cy="5" rx="9" ry="3" /><path d="M3 5V19A9 3 0 0 0 21 19V5" /><path d="M3 12A9 3 0 0 0 21 12" />"#),
    ("dollar-sign", r#"<line x1="12" x2="12" y1="2" y2="22" /><path d="M17 5H9.5a3.5 3.5 0 0 0 0 7h5a3.5 3.5 0 0 1 0 7H6" />"#),
    ("eye", r#"<path d="M2 12s3-7 10-7 10 7 10 7-3 7-10 7-10-7-10-7Z" /><circle cx="12" cy="12" r="3" />"#),
    ("file", r#"<path d="M15 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V7Z" /><path d="M14 2v4a2 2 0 0 0 2 2h4" />"#),
    ("flag", r#"<path d="M4 15s1-1 4-1 5 2 8 2 4-1 4-1V3s-1 1-4 1-5-2-8-2-4 1-4 1z" /><line x1="4" x2="4" y1="22" y2="15" />"#),
    ("folder", r#"<path d="M20 20a2 2 0 0 0 2-2V8a2 2 0 0 0-2-2h-7.9a2 2 0 0 1-1.69-.9L9.6 3.9A2 2 0 0 0 7.93 3H4a2 2 0 0 0-2 2v13a2 2 0 0 0 2 2Z" />"#),
    ("globe", r#"<circle cx="12" cy="12" r="10" /><path d="M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20" /><path d="M2 12h20" />"#),
    ("heart", r#"<path d="M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z" />"#),
    ("lightbulb", r#"<path d="M15 14c.2-1 .7-1.7 1.5-2.5 1-.9 1.5-2.2 1.5-3.5A6 6 0 0 0 6 8c0 1 .2 2.2 1.5 3.5.7.7 1.3 1.5 1.5 2.5" /><path d="M9 18h6" /><path d="M10 22h4" />"#),
    ("lock", r#"<rect width="18" height="11" x="3" y="11" rx="2" ry="2" /><path d="M7 11V7a5 5 0 0 1 10 0v4" />"#),
    ("mail", r#"<rect width="20" height="16" x="2" y="4" rx="2" /><path d="m22 7-8.97 5.7a1.94 1.94 0 0 1-2.06 0L2 7" />"#),
    ("message-circle", r#"<path d="M7.9 20A9 9 0 1 0 4 16.1L2 22Z" />"#),
    ("minus", r#"<path d="M5 12h14" />"#),
    ("monitor", r#"<rect width="20" height="14" x="2" y="3" rx="2" /><line x1="8" x2="16" y1="21" y2="21" /><line x1="12" x2="12" y1="17" y2="21" />"#),
    ("play", r#"<polygon points="6 3 20 12 6 21 6 3" />"#),
    ("plus", r#"<path d="M5 12h14" /><path d="M12 5v14" />"#),
    ("refresh-cw", r#"<path d="M3 12a9 9 0 0 1 9-9 9.75 9.75 0 0 1 6.74 2.74L21 8" /><path d="M21 3v5h-5" /><path d="M21 12a9 9 0 0 1-9 9 9.75 9.75 0 0 1-6.74-2.74L3 16" /><path d="M8 16H3v5" />"#),
    ("rocket", r#"<path d="M4.5 16.5c-1.5 1.26-2 5-2 5s3.74-.5 5-2c.71-.84.7-2.13-.09-2.91a2.18 2.18 0 0 0-2.91-.09z" /><path d="m12 15-3-3a22 22 0 0 1 2-3.95A12.88 12.88 0 0 1 22 2c0 2.72-.78 7.5-6 11a22.35 22.35 0 0 1-4 2z" /><path d="M9 12H4s.55-3.03 2-4c1.62-1.08 5 0 5 0" /><path d="M12 15v5s3.03-.55 4-2c1.08-1.62 0-5 0-5" />"#),
    ("shield", r#"<path d="M20 13c0 5-3.5 7.5-7.66 8.95a1 1 0 0 1-.67-.01C7.5 20.5 4 18 4 13V6a1 1 0 0 1 1-1c2 0 4.5-1.2 6.24-2.72a1.17 1.17 0 0 1 1.52 0C14.51 3.81 17 5 19 5a1 1 0 0 1 1 1z" />"#),
    ("smartphone", r#"<rect width="14" height="20" x="5" y="2" rx="2" ry="2" /><path d="M12 18h.01" />"#),
    ("star", r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2" />"#),
    ("sun", r#"<circle cx="12" cy="12" r="4" /><path d="M12 2v2" /><path d="M12 20v2" /><path d="m4.93 4.93 1.41 1.41" /><path d="m17.66 17.66 1.41 1.41" /><path d="M2 12h2" /><path d="M20 12h2" /><path d="m6.34 17.66-1.41 1.41" /><path d="m19.07 4.93-1.41 1.41" />"#),
    ("target", r#"<circle cx="12" cy="12" r="10" /><circle cx="12" cy="12" r="6" /><circle cx="12" cy="12" r="2" />"#),
    ("trending-down", r#"<polyline points="22 17 13.5 8.5 8.5 13.5 2 7" /><polyline points="16 17 22 17 22 11" />"#),
    ("trending-up", r#"<polyline points="22 7 13.5 15.5 8.5 10.5 2 17" /><polyline points="16 7 22 7 22 13" />"#),
    ("user", r#"<path d="M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2" /><circle cx="12" cy="7" r="4" />"#),
    ("users", r#"<path d="M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2" /><circle cx="9" cy="7" r="4" /><path d="M22 21v-2a4 4 0 0 0-3-3.87" /><path d="M16 3.13a4 4 0 0 1 0 7.75" />"#),
    ("x", r#"<path d="M18 6 6 18" /><path d="m6 6 12 12" />"#),
    ("x-circle", r#"<circle cx="12" cy="12" r="10" /><path d="m15 9-6 6" /><path d="m9 9 6 6" />"#),
    ("zap", r#"<polygon points="13 2 3 14 12 14 11 22 21 10 12 10 13 2" />"#),
];

/// Wrap a bundled body the way `lucide-static` ships its files.
fn lucide_file(name: &str, body: &str) -> String {
    format!(
        "<!-- @license lucide-static - ISC -->\n<svg class=\"lucide lucide-{name}\" xmlns=\"http://www.w3.org/2000/svg\" width=\"24\" height=\"24\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">{body}</svg>"
    )
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->\s*").expect("static regex"))
}

/// Icon source: an optional Lucide directory over the bundled table.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    dir: Option<PathBuf>,
}

impl IconSet {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn raw(&self, name: &str) -> Option<String> {
        if !is_plain_name(name) {
            return None;
        }
        if let Some(dir) = &self.dir {
            if let Ok(svg) = std::fs::read_to_string(dir.join(format!("{}.svg", name))) {
                return Some(svg);
            }
        }
        BUNDLED
            .binary_search_by(|(n, _)| n.cmp(&name))
            .ok()
            .map(|i| lucide_file(name, BUNDLED[i].1))
    }

    /// Load `name` with `style` applied; `None` when no such icon exists.
    pub fn get(&self, name: &str, style: &IconStyle) -> Option<String> {
        let raw = self.raw(name)?;
        let svg = comment_re().replace_all(&raw, "");
        Some(
            svg.trim()
                .replace("width=\"24\"", &format!("width=\"{}\"", style.size))
                .replace("height=\"24\"", &format!("height=\"{}\"", style.size))
                .replace("stroke=\"currentColor\"", &format!("stroke=\"{}\"", style.color)),
        )
    }

    /// All known icon names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = BUNDLED.iter().map(|(n, _)| n.to_string()).collect();
        if let Some(dir) = &self.dir {
            if let Ok(entries) = std::fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) == Some("svg") {
                        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
        }
        names.sort();
        names.dedup();
        names
    }

    /// Names containing `keyword`, case-insensitively.
    pub fn search(&self, keyword: &str) -> Vec<String> {
        let term = keyword.to_lowercase();
        self.list().into_iter().filter(|n| n.contains(&term)).collect()
    }

    /// `data:image/svg+xml,<percent-encoded>`
    pub fn data_uri(&self, name: &str, style: &IconStyle) -> Option<String> {
        self.get(name, style)
            .map(|svg| format!("data:image/svg+xml,{}", percent_encode(&svg)))
    }

    /// `data:image/svg+xml;base64,<…>`
    pub fn base64_data_uri(&self, name: &str, style: &IconStyle) -> Option<String> {
        self.get(name, style)
            .map(|svg| format!("data:image/svg+xml;base64,{}", general_purpose::STANDARD.encode(svg)))
    }
}

/// Icon names for a category from [`ICON_CATEGORIES`].
pub fn icons_in_category(category: &str) -> &'static [&'static str] {
    ICON_CATEGORIES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

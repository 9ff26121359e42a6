//! User-provided illustrations loaded from a directory.
//!
//! Supported formats, in lookup priority: `.svg`, `.png`, `.jpg`, `.jpeg`.
//! Raster images are wrapped in an SVG with a fixed `0 0 100 100` viewBox.

use super::is_plain_name;
use crate::{Error, Result};
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const EXTENSIONS: [&str; 4] = ["svg", "png", "jpg", "jpeg"];

const PLACEHOLDER_COLORS: [&str; 6] =
    ["#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899"];

/// Result of looking for an illustration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationCheck {
    pub exists: bool,
    /// Found file, or the expected `.svg` path when missing
    pub path: PathBuf,
    pub format: Option<&'static str>,
}

/// Names split by whether a file backs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IllustrationReport {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl IllustrationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

fn sanitize_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<\?xml.*?\?>|<!DOCTYPE[^>]*>|<!--.*?-->").expect("static regex")
    })
}

/// Strip the XML declaration, DOCTYPE and comments so the markup can be
/// inlined into another document.
pub fn sanitize_svg(svg: &str) -> String {
    sanitize_re().replace_all(svg, "").trim().to_string()
}

/// Illustration lookup rooted at an optional directory.
#[derive(Debug, Clone, Default)]
pub struct IllustrationLibrary {
    dir: Option<PathBuf>,
}

impl IllustrationLibrary {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Look for `name` in priority order.
    ///
    /// `None` when no directory is set, or when `name` is not a plain file
    /// name (path separators or `..`).
    pub fn check(&self, name: &str) -> Option<IllustrationCheck> {
        let dir = self.dir.as_ref()?;
        if !is_plain_name(name) {
            return None;
        }
        for ext in EXTENSIONS {
            let path = dir.join(format!("{}.{}", name, ext));
            if path.is_file() {
                return Some(IllustrationCheck { exists: true, path, format: Some(ext) });
            }
        }
        Some(IllustrationCheck {
            exists: false,
            path: dir.join(format!("{}.svg", name)),
            format: None,
        })
    }

    /// Sorted, de-duplicated stems of supported files.
    pub fn list(&self) -> Vec<String> {
        let Some(dir) = &self.dir else { return Vec::new() };
        let Ok(entries) = std::fs::read_dir(dir) else { return Vec::new() };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Load `name` as inlineable SVG.
    ///
    /// `Ok(None)` when there is no such file; `Err` when it exists but cannot
    /// be read.
    pub fn load(&self, name: &str) -> Result<Option<String>> {
        let check = match self.check(name) {
            Some(c) if c.exists => c,
            _ => return Ok(None),
        };

        let read_err =
            |e: std::io::Error| Error::ResourceError(format!("Error loading illustration '{}': {}", name, e));

        match check.format {
            Some("svg") => {
                let svg = std::fs::read_to_string(&check.path).map_err(read_err)?;
                Ok(Some(sanitize_svg(&svg)))
            }
            Some(format) => {
                let bytes = std::fs::read(&check.path).map_err(read_err)?;
                let mime = if format == "png" { "image/png" } else { "image/jpeg" };
                Ok(Some(embed_raster(mime, &bytes)))
            }
            None => Ok(None),
        }
    }

    /// Split `names` into those with and without a backing file.
    pub fn validate<S: AsRef<str>>(&self, names: &[S]) -> IllustrationReport {
        let mut report = IllustrationReport::default();
        for name in names {
            let name = name.as_ref();
            match self.check(name) {
                Some(c) if c.exists => report.found.push(name.to_string()),
                _ => report.missing.push(name.to_string()),
            }
        }
        report
    }
}

/// Wrap raster bytes in an SVG that crops to fill a square.
fn embed_raster(mime: &str, bytes: &[u8]) -> String {
    format!(
        "<svg viewBox=\"0 0 100 100\" xmlns=\"http://www.w3.org/2000/svg\">\
         <image width=\"100\" height=\"100\" preserveAspectRatio=\"xMidYMid slice\" href=\"data:{};base64,{}\"/></svg>",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Color card for an illustration that has no file.
///
/// The color is picked from the sum of the name's UTF-16 code units, so the
/// same name always gets the same color.
pub fn placeholder(name: &str) -> String {
    let units: Vec<u16> = name.encode_utf16().collect();
    let sum: u64 = units.iter().map(|&u| u as u64).sum();
    let color = PLACEHOLDER_COLORS[(sum % PLACEHOLDER_COLORS.len() as u64) as usize];
    let label = String::from_utf16_lossy(&units[..units.len().min(12)]);
    format!(
        "<svg viewBox=\"0 0 100 100\" xmlns=\"http://www.w3.org/2000/svg\">\
         <rect width=\"100\" height=\"100\" fill=\"{color}\" rx=\"8\"/>\
         <text x=\"50\" y=\"45\" text-anchor=\"middle\" dominant-baseline=\"middle\" fill=\"white\" font-size=\"10\" font-family=\"sans-serif\">{label}</text>\
         <text x=\"50\" y=\"60\" text-anchor=\"middle\" fill=\"rgba(255,255,255,0.7)\" font-size=\"6\" font-family=\"sans-serif\">(missing)</text></svg>",
        color = color,
        label = escape_text(&label),
    )
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

//! Invocation configuration: the JSON config file, CLI overrides and
//! pre-flight validation.

use crate::resources::{referenced_illustrations, IllustrationLibrary};
use crate::templates::template_info;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Everything needed to generate one infographic.
///
/// Field names follow the camelCase keys of the JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfographicConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Free-form design block handed to the renderer in place of a template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Background preset name; absent means the library's own background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub illustrations_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
    /// Diagram library bundle (UMD script)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer_script: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,
    /// Chrome tab timeout for rendering and rasterizing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_global: Option<String>,
}

/// Values given inline on the command line. JSON-valued fields are raw text.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub template: Option<String>,
    pub data: Option<String>,
    pub theme: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<String>,
    pub illustrations_dir: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub renderer_script: Option<PathBuf>,
}

impl InfographicConfig {
    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigError(format!("Config file not found: {}", path.display())));
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigError(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Apply inline values; each one present replaces the file's value.
    pub fn apply_overrides(&mut self, o: &ConfigOverrides) -> Result<()> {
        if let Some(t) = &o.template {
            self.template = Some(t.clone());
        }
        if let Some(raw) = &o.data {
            let data = parse_json_data(raw)
                .map_err(|e| Error::ConfigError(format!("Invalid JSON in --data: {}", e)))?;
            self.data = Some(data);
        }
        if let Some(raw) = &o.theme {
            let theme = serde_json::from_str(raw)
                .map_err(|e| Error::ConfigError(format!("Invalid JSON in --theme: {}", e)))?;
            self.theme_config = Some(theme);
        }
        if o.width.is_some() {
            self.width = o.width;
        }
        if o.height.is_some() {
            self.height = o.height;
        }
        if let Some(b) = &o.background {
            self.background = Some(b.clone());
        }
        if let Some(d) = &o.illustrations_dir {
            self.illustrations_dir = Some(d.clone());
        }
        if let Some(d) = &o.icons_dir {
            self.icons_dir = Some(d.clone());
        }
        if let Some(s) = &o.renderer_script {
            self.renderer_script = Some(s.clone());
        }
        Ok(())
    }

    /// Load an optional file and layer the overrides on top.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides)?;
        Ok(config)
    }

    /// The minimum the renderer needs: a template or design, and data.
    pub fn ensure_renderable(&self) -> Result<()> {
        if self.template.is_none() && self.design.is_none() {
            return Err(Error::ConfigError(
                "Either --template or --config with template/design is required".into(),
            ));
        }
        if self.data.is_none() {
            return Err(Error::ConfigError("--data or config.data is required".into()));
        }
        Ok(())
    }
}

/// Illustration readiness for a template that uses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IllustrationStatus {
    NotRequired,
    NoDirectory { expected: Vec<String> },
    Complete { found: Vec<String>, directory: PathBuf },
    Missing { found: Vec<String>, missing: Vec<String>, directory: PathBuf },
}

/// Outcome of pre-flight checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub guidance: Vec<String>,
    pub illustrations: IllustrationStatus,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check required fields and template-specific expectations.
pub fn validate_config(config: &InfographicConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.template.is_none() {
        errors.push("Missing required field: template".to_string());
    }

    match &config.data {
        None => errors.push("Missing required field: data".to_string()),
        Some(data) => {
            let has_title = data
                .get("title")
                .map(|t| !t.is_null() && t.as_str() != Some(""))
                .unwrap_or(false);
            if !has_title {
                warnings.push("Missing data.title - infographic will have no main title".to_string());
            }
            match data.get("items").and_then(Value::as_array) {
                None => errors.push("Missing or invalid data.items - must be an array".to_string()),
                Some(items) if items.is_empty() => {
                    errors.push("data.items is empty - infographic needs at least one item".to_string())
                }
                Some(_) => {}
            }
        }
    }

    if let Some(template) = &config.template {
        if template_info(template).is_none() {
            warnings.push(format!("Unknown template: {}. Proceeding anyway.", template));
        }
    }

    ValidationReport {
        errors,
        warnings,
        guidance: Vec::new(),
        illustrations: IllustrationStatus::NotRequired,
    }
}

/// [`validate_config`] plus a check that every illustration the items
/// reference exists in `library`.
pub fn validate_with_illustrations(
    config: &InfographicConfig,
    library: &IllustrationLibrary,
) -> ValidationReport {
    let mut report = validate_config(config);

    let needs_illustrations = config
        .template
        .as_deref()
        .and_then(template_info)
        .map(|i| i.has_illustrations)
        .unwrap_or(false);
    if !needs_illustrations {
        return report;
    }

    let mut expected = Vec::new();
    let items = config
        .data
        .as_ref()
        .and_then(|d| d.get("items"))
        .and_then(Value::as_array);
    for (index, item) in items.into_iter().flatten().enumerate() {
        match item.get("illus") {
            Some(illus) => {
                let name = illus
                    .as_str()
                    .and_then(|s| s.strip_prefix("illus:"))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("item-{}", index + 1));
                expected.push(name);
            }
            None => {
                let label = item.get("label").and_then(Value::as_str).unwrap_or("unnamed");
                report
                    .warnings
                    .push(format!("Item {} ({}) has no illustration", index + 1, label));
                expected.push(format!("step-{}", index + 1));
            }
        }
    }

    if let Some(data) = &config.data {
        for name in referenced_illustrations(data) {
            if !expected.contains(&name) {
                expected.push(name);
            }
        }
    }

    let Some(directory) = library.dir().map(Path::to_path_buf) else {
        report.guidance.push(
            "To use illustrations, set illustrationsDir in the config or pass --illustrations <dir>"
                .to_string(),
        );
        report.illustrations = IllustrationStatus::NoDirectory { expected };
        return report;
    };

    let check = library.validate(expected.as_slice());
    if check.is_valid() {
        report.illustrations = IllustrationStatus::Complete { found: check.found, directory };
    } else {
        report.guidance.push(format!(
            "Missing {} illustration(s). Please create the following files:",
            check.missing.len()
        ));
        for name in &check.missing {
            report
                .guidance
                .push(format!("  - {}/{}.svg (or .png, .jpg)", directory.display(), name));
        }
        report.illustrations = IllustrationStatus::Missing {
            found: check.found,
            missing: check.missing,
            directory,
        };
    }
    report
}

/// Render a report as markdown for the user.
pub fn format_guidance(report: &ValidationReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !report.errors.is_empty() {
        lines.push("## Errors (must fix)\n".into());
        lines.extend(report.errors.iter().map(|e| format!("- {}", e)));
        lines.push(String::new());
    }

    if !report.warnings.is_empty() {
        lines.push("## Warnings\n".into());
        lines.extend(report.warnings.iter().map(|w| format!("- {}", w)));
        lines.push(String::new());
    }

    if let IllustrationStatus::Missing { found, missing, directory } = &report.illustrations {
        lines.push("## Missing Illustrations\n".into());
        lines.push(format!("Directory: `{}`\n", directory.display()));
        lines.push("**Found:**".into());
        if found.is_empty() {
            lines.push("- (none)".into());
        } else {
            lines.extend(found.iter().map(|n| format!("- {} ✓", n)));
        }
        lines.push("\n**Missing:**".into());
        lines.extend(missing.iter().map(|n| format!("- {}.svg (or .png, .jpg)", n)));
        lines.push(String::new());
    }

    if !report.guidance.is_empty() {
        lines.push("## Next Steps\n".into());
        lines.extend(report.guidance.iter().cloned());
    }

    let missing = matches!(report.illustrations, IllustrationStatus::Missing { .. });
    if report.is_valid() && !missing {
        lines.push("## Status: Ready to Generate\n".into());
        lines.push("All requirements met. You can now generate the infographic.".into());
    }

    lines.join("\n")
}

fn json_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("static regex"))
}

/// Parse JSON, taking the first ```` ```json ```` fenced block when the text
/// is markdown.
pub fn parse_json_data(text: &str) -> serde_json::Result<Value> {
    let body = json_fence_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);
    serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_values_yield_to_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r##"{"template":"list-row-simple","width":600,"background":"spotlight","themeConfig":{"colorBg":"#000000"},"settleMs":50}"##,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            template: Some("compare-swot".into()),
            data: Some(r#"{"title":"X","items":[{"label":"A"}]}"#.into()),
            height: Some(400),
            ..Default::default()
        };
        let config = InfographicConfig::load(Some(&path), &overrides).unwrap();
        assert_eq!(config.template.as_deref(), Some("compare-swot"));
        assert_eq!(config.width, Some(600));
        assert_eq!(config.height, Some(400));
        assert_eq!(config.background.as_deref(), Some("spotlight"));
        assert_eq!(config.settle_ms, Some(50));
        assert_eq!(config.data.unwrap()["items"][0]["label"], "A");
    }

    #[test]
    fn bad_inputs_are_config_errors() {
        let missing = InfographicConfig::load(Some(Path::new("/no/such/config.json")), &Default::default());
        assert!(matches!(missing, Err(Error::ConfigError(ref m)) if m.starts_with("Config file not found")));

        let overrides = ConfigOverrides { theme: Some("{nope".into()), ..Default::default() };
        let bad_theme = InfographicConfig::load(None, &overrides);
        assert!(matches!(bad_theme, Err(Error::ConfigError(ref m)) if m.starts_with("Invalid JSON in --theme")));

        let empty = InfographicConfig::default();
        assert!(empty.ensure_renderable().is_err());
        let design_only = InfographicConfig {
            design: Some(json!({})),
            data: Some(json!({})),
            ..Default::default()
        };
        assert!(design_only.ensure_renderable().is_ok());
    }

    #[test]
    fn validation_flags_missing_fields() {
        let config = InfographicConfig {
            template: Some("made-up".into()),
            data: Some(json!({"items": []})),
            ..Default::default()
        };
        let report = validate_config(&config);
        assert!(!report.is_valid());
        assert_eq!(report.errors, vec!["data.items is empty - infographic needs at least one item"]);
        assert_eq!(report.warnings.len(), 2);
        assert!(format_guidance(&report).starts_with("## Errors (must fix)"));
    }

    #[test]
    fn child_illustrations_are_checked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("step-1.svg"), "<svg/>").unwrap();
        let config = InfographicConfig {
            template: Some("sequence-steps-simple-illus".into()),
            data: Some(json!({"title": "T", "items": [
                {"label": "One", "illus": "illus:step-1", "children": [
                    {"label": "Sub", "illus": "illus:detail-a"},
                    {"label": "Again", "illus": "illus:step-1"}
                ]}
            ]})),
            ..Default::default()
        };

        let report = validate_with_illustrations(&config, &IllustrationLibrary::new(None));
        assert_eq!(
            report.illustrations,
            IllustrationStatus::NoDirectory { expected: vec!["step-1".into(), "detail-a".into()] }
        );

        let library = IllustrationLibrary::new(Some(dir.path().to_path_buf()));
        match validate_with_illustrations(&config, &library).illustrations {
            IllustrationStatus::Missing { found, missing, .. } => {
                assert_eq!(found, vec!["step-1".to_string()]);
                assert_eq!(missing, vec!["detail-a".to_string()]);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn illustrations_are_checked_against_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("step-1.svg"), "<svg/>").unwrap();
        let config = InfographicConfig {
            template: Some("sequence-steps-simple-illus".into()),
            data: Some(json!({"title": "T", "items": [
                {"label": "One", "illus": "illus:step-1"},
                {"label": "Two"}
            ]})),
            ..Default::default()
        };

        let report = validate_with_illustrations(&config, &IllustrationLibrary::new(None));
        assert_eq!(
            report.illustrations,
            IllustrationStatus::NoDirectory { expected: vec!["step-1".into(), "step-2".into()] }
        );

        let library = IllustrationLibrary::new(Some(dir.path().to_path_buf()));
        let report = validate_with_illustrations(&config, &library);
        assert!(report.warnings.contains(&"Item 2 (Two) has no illustration".to_string()));
        match &report.illustrations {
            IllustrationStatus::Missing { found, missing, .. } => {
                assert_eq!(found, &vec!["step-1".to_string()]);
                assert_eq!(missing, &vec!["step-2".to_string()]);
            }
            other => panic!("unexpected status: {:?}", other),
        }
        let text = format_guidance(&report);
        assert!(text.contains("- step-1 ✓"));
        assert!(text.contains("- step-2.svg (or .png, .jpg)"));
        assert!(!text.contains("Ready to Generate"));
    }

    #[test]
    fn json_can_be_fenced() {
        let md = "Here you go:\n```json\n{\"title\": \"X\"}\n```\nthanks";
        assert_eq!(parse_json_data(md).unwrap(), json!({"title": "X"}));
        assert_eq!(parse_json_data("[1,2]").unwrap(), json!([1, 2]));
        assert!(parse_json_data("not json").is_err());
    }
}

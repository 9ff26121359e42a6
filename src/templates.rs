//! Known diagram templates, data prompts and JSON schemas.
//!
//! Unknown templates are still passed to the renderer; the catalogue only
//! drives validation hints and prompt generation.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt::Write as _;

/// What a template expects from its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub has_illustrations: bool,
    pub has_icons: bool,
    pub default_items: usize,
}

const fn info(kind: &'static str, has_illustrations: bool, has_icons: bool, default_items: usize) -> TemplateInfo {
    TemplateInfo { kind, has_illustrations, has_icons, default_items }
}

/// Catalogue in display order.
pub const TEMPLATE_INFO: &[(&str, TemplateInfo)] = &[
    ("sequence-timeline-simple", info("timeline", false, false, 5)),
    ("sequence-timeline-simple-illus", info("timeline", true, false, 5)),
    ("sequence-steps-simple", info("steps", false, false, 4)),
    ("sequence-steps-simple-illus", info("steps", true, false, 4)),
    ("sequence-zigzag-steps-underline-text", info("steps", false, false, 4)),
    ("sequence-roadmap-vertical-badge-card", info("roadmap", false, false, 5)),
    ("sequence-color-snake-steps-simple-illus", info("steps", true, false, 4)),
    ("list-row-simple", info("list", false, false, 4)),
    ("list-row-simple-illus", info("list", true, false, 4)),
    ("list-column-simple", info("list", false, false, 3)),
    ("list-column-simple-illus", info("list", true, false, 3)),
    ("list-grid-simple", info("grid", false, false, 6)),
    ("list-grid-simple-illus", info("grid", true, false, 6)),
    ("list-row-horizontal-icon-line", info("list", false, true, 4)),
    ("compare-binary-horizontal-badge-card-vs", info("comparison", false, false, 2)),
    ("compare-swot", info("swot", false, false, 4)),
    ("chart-column-simple", info("chart", false, false, 4)),
    ("chart-pie-simple", info("chart", false, false, 4)),
    ("hierarchy-tree-simple-pill", info("hierarchy", false, false, 3)),
    ("quadrant-simple", info("quadrant", false, false, 4)),
    ("quadrant-simple-illus", info("quadrant", true, false, 4)),
];

pub fn template_info(name: &str) -> Option<&'static TemplateInfo> {
    TEMPLATE_INFO.iter().find(|(n, _)| *n == name).map(|(_, i)| i)
}

pub fn available_templates() -> impl Iterator<Item = &'static str> {
    TEMPLATE_INFO.iter().map(|(n, _)| *n)
}

pub fn templates_by_type(kind: &str) -> Vec<&'static str> {
    TEMPLATE_INFO
        .iter()
        .filter(|(_, i)| i.kind == kind)
        .map(|(n, _)| *n)
        .collect()
}

pub fn illustration_templates() -> Vec<&'static str> {
    TEMPLATE_INFO
        .iter()
        .filter(|(_, i)| i.has_illustrations)
        .map(|(n, _)| *n)
        .collect()
}

fn unknown(name: &str) -> Error {
    Error::ConfigError(format!("Unknown template: {}. Use --list-templates to see options.", name))
}

fn item_example(info: &TemplateInfo) -> String {
    let mut item = String::from(
        "    {\n      \"label\": \"Item Title\",\n      \"desc\": \"Brief description of this item\"",
    );
    if info.kind == "chart" {
        item.push_str(",\n      \"value\": 100");
    }
    if info.has_icons {
        item.push_str(",\n      \"icon\": \"icon:rocket\"");
    }
    if info.has_illustrations {
        item.push_str(",\n      \"illus\": \"illus:step-1\"");
    }
    item.push_str("\n    },\n    // ... more items");
    item
}

/// Prompt asking an assistant to shape raw content into `template`'s data.
pub fn generate_data_prompt(template: &str, item_count: Option<usize>, assets_path: &str) -> Result<String> {
    let info = template_info(template).ok_or_else(|| unknown(template))?;
    let items = item_count.unwrap_or(info.default_items);

    let mut p = String::new();
    write_prompt(&mut p, template, info, items, assets_path)
        .map_err(|e| Error::Other(format!("Failed to build prompt: {}", e)))?;
    Ok(p)
}

fn write_prompt(
    p: &mut String,
    template: &str,
    info: &TemplateInfo,
    items: usize,
    assets_path: &str,
) -> std::fmt::Result {
    let is_chart = info.kind == "chart";
    writeln!(
        p,
        "I need help structuring my content for an infographic. I have a specific template that requires data in a particular format.\n"
    )?;
    writeln!(p, "## TEMPLATE INFORMATION\n")?;
    writeln!(p, "**Template**: {}", template)?;
    writeln!(p, "**Type**: {}", info.kind)?;
    writeln!(p, "**Items**: {} items expected", items)?;
    writeln!(
        p,
        "**Illustrations**: {}",
        if info.has_illustrations { "Yes - each item needs an illustration" } else { "No illustrations needed" }
    )?;
    if info.has_icons {
        writeln!(p, "**Icons**: Yes - each item can have an icon")?;
    }

    writeln!(p, "\n## DATA STRUCTURE\n")?;
    writeln!(p, "The infographic needs data in this JSON format:\n")?;
    writeln!(
        p,
        "```json\n{{\n  \"title\": \"Main Title\",\n  \"desc\": \"Subtitle or description\",\n  \"items\": [\n{}\n  ]\n}}\n```\n",
        item_example(info)
    )?;

    writeln!(p, "### Field Guidelines\n")?;
    writeln!(p, "- **title**: Clear, concise main heading (3-7 words)")?;
    writeln!(p, "- **desc**: Supporting context or subtitle (10-20 words max)")?;
    writeln!(
        p,
        "- **item.label**: Short, descriptive title for each {} (2-5 words)",
        if info.kind == "timeline" { "phase/step" } else { "item" }
    )?;
    writeln!(p, "- **item.desc**: Brief explanation (10-30 words)")?;
    if is_chart {
        writeln!(p, "- **item.value**: Numeric data value (required for charts)")?;
    }
    if info.has_icons {
        writeln!(p, "- **item.icon**: Icon reference like \"icon:rocket\", \"icon:users\" (Lucide icons)")?;
    }
    if info.has_illustrations {
        writeln!(p, "- **item.illus**: Illustration filename \"illus:step-1\", \"illus:step-2\", etc.")?;
    }

    writeln!(p, "\n## MY RAW CONTENT\n")?;
    writeln!(
        p,
        "[PASTE YOUR CONTENT HERE - meeting notes, bullet points, research data, project plan, etc.]\n"
    )?;
    writeln!(p, "## INSTRUCTIONS\n")?;
    writeln!(p, "Please transform my content into the JSON format above. For each item:\n")?;
    let mut steps = vec![
        "Extract or create a clear, concise label (2-5 words)",
        "Write a brief description based on available content",
    ];
    if is_chart {
        steps.push("Extract or estimate numeric values for each item");
    }
    if info.has_illustrations {
        steps.push("Assign illustration filenames: step-1, step-2, step-3, etc.");
    }
    if info.has_icons {
        steps.push("Suggest appropriate Lucide icons (rocket, users, chart-bar, target, lightbulb, etc.)");
    }
    for (i, step) in steps.iter().enumerate() {
        writeln!(p, "{}. {}", i + 1, step)?;
    }

    if info.has_illustrations {
        writeln!(p, "\n## ILLUSTRATION REQUIREMENTS\n")?;
        writeln!(p, "After providing the JSON, I need to create {} illustrations.\n", items)?;
        writeln!(p, "**Required illustration files:**")?;
        for i in 1..=items {
            writeln!(p, "- step-{}.svg (or .png/.jpg)", i)?;
        }
        writeln!(p, "\n**Place files in:** `{}`\n", assets_path)?;
        writeln!(p, "Please also describe what each illustration should depict based on the content.")?;
    }

    writeln!(p, "\n## OUTPUT FORMAT\n")?;
    writeln!(p, "Provide the complete JSON data structure:\n")?;
    writeln!(
        p,
        "```json\n{{\n  \"title\": \"Your suggested title\",\n  \"desc\": \"Your suggested subtitle\",\n  \"items\": [\n    // ... all items with proper structure\n  ]\n}}\n```"
    )?;

    if info.has_illustrations {
        writeln!(p, "\n**Illustration Descriptions:**")?;
        writeln!(p, "1. step-1.svg - [Describe what this illustration should show]")?;
        writeln!(p, "2. step-2.svg - [Description]")?;
        writeln!(p, "... and so on for all {} illustrations", items)?;
    }
    Ok(())
}

/// JSON schema for `template`'s data; `None` for unknown templates.
pub fn generate_json_schema(template: &str) -> Option<Value> {
    let info = template_info(template)?;

    let mut item_properties = Map::new();
    item_properties.insert("label".into(), json!({"type": "string", "description": "Item title (2-5 words)"}));
    item_properties.insert("desc".into(), json!({"type": "string", "description": "Item description (10-30 words)"}));
    if info.kind == "chart" {
        item_properties.insert("value".into(), json!({"type": "number", "description": "Numeric value"}));
    }
    if info.has_icons {
        item_properties.insert(
            "icon".into(),
            json!({"type": "string", "pattern": "^icon:", "description": "Lucide icon reference"}),
        );
    }
    if info.has_illustrations {
        item_properties.insert(
            "illus".into(),
            json!({"type": "string", "pattern": "^illus:", "description": "Illustration filename"}),
        );
    }

    Some(json!({
        "type": "object",
        "required": ["title", "items"],
        "properties": {
            "title": {"type": "string", "description": "Main title"},
            "desc": {"type": "string", "description": "Subtitle"},
            "items": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["label"],
                    "properties": item_properties
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_lookups() {
        assert_eq!(template_info("compare-swot").map(|i| i.kind), Some("swot"));
        assert!(template_info("nope").is_none());
        assert_eq!(templates_by_type("chart"), vec!["chart-column-simple", "chart-pie-simple"]);
        assert!(illustration_templates().iter().all(|t| t.ends_with("-illus")));
        assert_eq!(available_templates().count(), TEMPLATE_INFO.len());
    }

    #[test]
    fn prompt_lists_illustration_files() {
        let prompt = generate_data_prompt("list-column-simple-illus", None, "./assets").unwrap();
        assert!(prompt.contains("**Items**: 3 items expected"));
        assert!(prompt.contains("- step-3.svg (or .png/.jpg)"));
        assert!(!prompt.contains("step-4.svg"));
        assert!(prompt.contains("3. Assign illustration filenames"));
        assert!(prompt.contains("`./assets`"));
    }

    #[test]
    fn chart_prompt_asks_for_values() {
        let prompt = generate_data_prompt("chart-pie-simple", Some(7), "./assets").unwrap();
        assert!(prompt.contains("**Items**: 7 items expected"));
        assert!(prompt.contains("\"value\": 100"));
        assert!(prompt.contains("3. Extract or estimate numeric values"));
        assert!(!prompt.contains("ILLUSTRATION REQUIREMENTS"));
        assert!(generate_data_prompt("nope", None, ".").is_err());
    }

    #[test]
    fn schema_follows_template_traits() {
        let schema = generate_json_schema("list-row-horizontal-icon-line").unwrap();
        let props = &schema["properties"]["items"]["items"]["properties"];
        assert_eq!(props["icon"]["pattern"], "^icon:");
        assert!(props.get("illus").is_none());
        assert!(props.get("value").is_none());
        assert_eq!(schema["required"], json!(["title", "items"]));
        assert!(generate_json_schema("nope").is_none());
    }
}

//! Synthetic backgrounds composited into a rendered infographic.
//!
//! The diagram library only paints solid backgrounds. After rendering, a
//! gradient or tiled pattern (flat), or a gradient with a translucent pattern
//! overlay (layered), is inserted as the first drawable content after `<defs>`
//! so everything the library drew paints on top.
//!
//! Resource ids are fixed strings and an existing resource with the same id is
//! replaced, so applying the same background twice leaves one background.

use crate::color::BrandPalette;
use crate::dom::{SvgElement, BACKGROUND_ATTR, BACKGROUND_VALUE};
use log::{debug, info};
use serde::{Deserialize, Serialize};

const DEFAULT_WIDTH: f64 = 720.0;
const DEFAULT_HEIGHT: f64 = 600.0;

const DEFAULT_TILE: f64 = 20.0;
const DEFAULT_LINE_WIDTH: f64 = 0.5;
const DEFAULT_OVERLAY_OPACITY: f64 = 0.15;

const FLAT_LINEAR_ID: &str = "custom-bg-gradient";
const FLAT_RADIAL_ID: &str = "custom-bg-radial";
const FLAT_PATTERN_ID: &str = "custom-bg-pattern";
const LAYERED_LINEAR_ID: &str = "layered-bg-linear";
const LAYERED_RADIAL_ID: &str = "layered-bg-radial";
const LAYERED_PATTERN_ID: &str = "layered-bg-pattern";

/// One color stop of a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Explicit offset such as `"60%"`; evenly spaced when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl GradientStop {
    pub fn at(offset: &str, color: &str) -> Self {
        Self { offset: Some(offset.to_string()), color: color.to_string(), opacity: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GradientSpec {
    #[serde(rename = "linear-gradient", alias = "gradient")]
    Linear {
        #[serde(default)]
        x1: Option<String>,
        #[serde(default)]
        y1: Option<String>,
        #[serde(default)]
        x2: Option<String>,
        #[serde(default)]
        y2: Option<String>,
        #[serde(default)]
        stops: Vec<GradientStop>,
    },
    #[serde(rename = "radial-gradient")]
    Radial {
        #[serde(default)]
        cx: Option<String>,
        #[serde(default)]
        cy: Option<String>,
        #[serde(default)]
        r: Option<String>,
        #[serde(default)]
        stops: Vec<GradientStop>,
    },
}

/// Glyph drawn in each pattern tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternShape {
    #[default]
    Dots,
    Grid,
    Diagonal,
    Crosshatch,
}

impl PatternShape {
    /// Unknown names fall back to dots.
    pub fn from_name(name: &str) -> Self {
        match name {
            "grid" => Self::Grid,
            "diagonal" => Self::Diagonal,
            "crosshatch" => Self::Crosshatch,
            _ => Self::Dots,
        }
    }
}

impl<'de> Deserialize<'de> for PatternShape {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(PatternShape::from_name(&name))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSpec {
    #[serde(default, rename = "pattern")]
    pub shape: PatternShape,
    /// Tile edge length
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, rename = "dotSize")]
    pub dot_radius: Option<f64>,
    #[serde(default)]
    pub line_width: Option<f64>,
    /// Solid backing color (flat patterns only)
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub foreground_color: Option<String>,
}

/// Pattern drawn at partial opacity over a layered gradient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternOverlay {
    #[serde(flatten)]
    pub pattern: PatternSpec,
    #[serde(default)]
    pub opacity: Option<f64>,
}

/// A single-fill background.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSpec {
    Gradient(GradientSpec),
    Pattern(PatternSpec),
}

/// Gradient base with a pattern overlay; either layer may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayeredBackground {
    #[serde(default)]
    pub gradient: Option<GradientSpec>,
    #[serde(default)]
    pub pattern: Option<PatternOverlay>,
}

/// The background requested for an export.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundOption {
    Flat(BackgroundSpec),
    Layered(LayeredBackground),
}

/// Flat preset names, in display order.
pub const FLAT_PRESETS: &[&str] = &[
    "spotlight",
    "diagonal-fade",
    "top-down",
    "subtle-dots",
    "tech-grid",
    "crosshatch",
];

/// Layered preset names, in display order.
pub const LAYERED_PRESETS: &[&str] = &[
    "spotlight-dots",
    "spotlight-grid",
    "diagonal-crosshatch",
    "tech-matrix",
];

/// Preset used when a background name is not recognized.
pub const FALLBACK_PRESET: &str = "spotlight-dots";

fn pct(v: &str) -> Option<String> {
    Some(v.to_string())
}

fn spotlight(p: &BrandPalette) -> GradientSpec {
    GradientSpec::Radial {
        cx: pct("50%"),
        cy: pct("40%"),
        r: pct("80%"),
        stops: vec![
            GradientStop::at("0%", &p.primary),
            GradientStop::at("60%", &p.dark),
            GradientStop::at("100%", &p.darker),
        ],
    }
}

fn linear(x1: &str, y1: &str, x2: &str, y2: &str, stops: Vec<GradientStop>) -> GradientSpec {
    GradientSpec::Linear { x1: pct(x1), y1: pct(y1), x2: pct(x2), y2: pct(y2), stops }
}

fn pattern(shape: PatternShape, size: f64, p: &BrandPalette) -> PatternSpec {
    PatternSpec {
        shape,
        size: Some(size),
        background_color: Some(p.dark.clone()),
        foreground_color: Some(p.primary.clone()),
        ..Default::default()
    }
}

/// Build a flat preset; unknown names give `spotlight`.
pub fn background_preset(name: &str, p: &BrandPalette) -> BackgroundSpec {
    match name {
        "diagonal-fade" => BackgroundSpec::Gradient(linear(
            "0%",
            "0%",
            "100%",
            "100%",
            vec![
                GradientStop::at("0%", &p.dark),
                GradientStop::at("50%", &p.primary),
                GradientStop::at("100%", &p.dark),
            ],
        )),
        "top-down" => BackgroundSpec::Gradient(linear(
            "50%",
            "0%",
            "50%",
            "100%",
            vec![GradientStop::at("0%", &p.primary), GradientStop::at("100%", &p.darker)],
        )),
        "subtle-dots" => BackgroundSpec::Pattern(PatternSpec {
            dot_radius: Some(1.5),
            ..pattern(PatternShape::Dots, 24.0, p)
        }),
        "tech-grid" => BackgroundSpec::Pattern(PatternSpec {
            line_width: Some(0.3),
            ..pattern(PatternShape::Grid, 30.0, p)
        }),
        "crosshatch" => BackgroundSpec::Pattern(PatternSpec {
            line_width: Some(0.3),
            ..pattern(PatternShape::Crosshatch, 16.0, p)
        }),
        _ => BackgroundSpec::Gradient(spotlight(p)),
    }
}

fn overlay(shape: PatternShape, size: f64, opacity: f64, p: &BrandPalette) -> PatternOverlay {
    PatternOverlay {
        pattern: PatternSpec {
            shape,
            size: Some(size),
            foreground_color: Some(p.accent.clone()),
            ..Default::default()
        },
        opacity: Some(opacity),
    }
}

/// Build a layered preset; unknown names give `spotlight-dots`.
pub fn layered_preset(name: &str, p: &BrandPalette) -> LayeredBackground {
    let (gradient, mut pattern) = match name {
        "spotlight-grid" => (spotlight(p), overlay(PatternShape::Grid, 30.0, 0.1, p)),
        "diagonal-crosshatch" => (
            linear(
                "0%",
                "0%",
                "100%",
                "100%",
                vec![
                    GradientStop::at("0%", &p.darker),
                    GradientStop::at("50%", &p.primary),
                    GradientStop::at("100%", &p.darker),
                ],
            ),
            overlay(PatternShape::Crosshatch, 16.0, 0.06, p),
        ),
        "tech-matrix" => (
            linear(
                "0%",
                "0%",
                "0%",
                "100%",
                vec![
                    GradientStop::at("0%", &p.darker),
                    GradientStop::at("50%", &p.dark),
                    GradientStop::at("100%", &p.darker),
                ],
            ),
            overlay(PatternShape::Grid, 24.0, 0.12, p),
        ),
        _ => (spotlight(p), overlay(PatternShape::Dots, 20.0, 0.08, p)),
    };
    match (name, pattern.pattern.shape) {
        ("tech-matrix", _) => pattern.pattern.line_width = Some(0.5),
        (_, PatternShape::Dots) => pattern.pattern.dot_radius = Some(1.0),
        _ => pattern.pattern.line_width = Some(0.3),
    }
    LayeredBackground { gradient: Some(gradient), pattern: Some(pattern) }
}

/// Map a `--background` value to what the extractor should apply.
///
/// `solid` keeps the library's own background. Unrecognized names fall back
/// to the `spotlight-dots` layered preset.
pub fn select_background(name: &str, palette: &BrandPalette) -> Option<BackgroundOption> {
    if LAYERED_PRESETS.contains(&name) {
        info!("Applying layered background: {}", name);
        Some(BackgroundOption::Layered(layered_preset(name, palette)))
    } else if FLAT_PRESETS.contains(&name) {
        info!("Applying simple background: {}", name);
        Some(BackgroundOption::Flat(background_preset(name, palette)))
    } else if name == "solid" {
        None
    } else {
        info!("Unknown preset \"{}\", using {}", name, FALLBACK_PRESET);
        Some(BackgroundOption::Layered(layered_preset(FALLBACK_PRESET, palette)))
    }
}

fn canvas_size(svg: &SvgElement) -> (f64, f64) {
    match svg.view_box() {
        Some([_, _, w, h]) if w > 0.0 && h > 0.0 => (w, h),
        _ => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    }
}

/// Index of the root's `<defs>`, prepending one when missing.
fn ensure_defs(svg: &mut SvgElement) -> usize {
    match svg.child_index("defs") {
        Some(idx) => idx,
        None => {
            svg.insert_child(0, SvgElement::new("defs"));
            0
        }
    }
}

/// Append `resource` to `<defs>`, dropping any earlier resource with its id.
fn put_resource(svg: &mut SvgElement, resource: SvgElement) {
    let idx = ensure_defs(svg);
    let id = resource.attr("id").map(str::to_string);
    if let Some(defs) = svg.child_mut(idx) {
        if let Some(id) = id {
            defs.remove_children_where(|e| e.attr("id") == Some(id.as_str()));
        }
        defs.append_child(resource);
    }
}

fn full_bleed_rect(width: f64, height: f64) -> SvgElement {
    SvgElement::new("rect")
        .with_attr("x", 0)
        .with_attr("y", 0)
        .with_attr("width", width)
        .with_attr("height", height)
}

fn gradient_element(spec: &GradientSpec, id: &str) -> SvgElement {
    let (mut el, stops) = match spec {
        GradientSpec::Linear { x1, y1, x2, y2, stops } => (
            SvgElement::new("linearGradient")
                .with_attr("id", id)
                .with_attr("x1", x1.as_deref().unwrap_or("0%"))
                .with_attr("y1", y1.as_deref().unwrap_or("0%"))
                .with_attr("x2", x2.as_deref().unwrap_or("100%"))
                .with_attr("y2", y2.as_deref().unwrap_or("100%")),
            stops,
        ),
        GradientSpec::Radial { cx, cy, r, stops } => (
            SvgElement::new("radialGradient")
                .with_attr("id", id)
                .with_attr("cx", cx.as_deref().unwrap_or("50%"))
                .with_attr("cy", cy.as_deref().unwrap_or("50%"))
                .with_attr("r", r.as_deref().unwrap_or("70%")),
            stops,
        ),
    };

    let span = stops.len().saturating_sub(1).max(1) as f64;
    for (i, stop) in stops.iter().enumerate() {
        let offset = match &stop.offset {
            Some(o) => o.clone(),
            None => format!("{}%", i as f64 * 100.0 / span),
        };
        let mut stop_el = SvgElement::new("stop")
            .with_attr("offset", offset)
            .with_attr("stop-color", &stop.color);
        if let Some(opacity) = stop.opacity {
            stop_el.set_attr("stop-opacity", opacity);
        }
        el.append_child(stop_el);
    }
    el
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) -> SvgElement {
    SvgElement::new("line")
        .with_attr("x1", x1)
        .with_attr("y1", y1)
        .with_attr("x2", x2)
        .with_attr("y2", y2)
        .with_attr("stroke", color)
        .with_attr("stroke-width", width)
}

/// Glyphs for one tile of `spec`.
fn glyphs(spec: &PatternSpec, size: f64, color: &str, default_dot: f64) -> Vec<SvgElement> {
    let lw = spec.line_width.unwrap_or(DEFAULT_LINE_WIDTH);
    match spec.shape {
        PatternShape::Dots => vec![SvgElement::new("circle")
            .with_attr("cx", size / 2.0)
            .with_attr("cy", size / 2.0)
            .with_attr("r", spec.dot_radius.unwrap_or(default_dot))
            .with_attr("fill", color)],
        PatternShape::Grid => vec![
            line(0.0, 0.0, size, 0.0, color, lw),
            line(0.0, 0.0, 0.0, size, color, lw),
        ],
        PatternShape::Diagonal => vec![line(0.0, size, size, 0.0, color, lw)],
        PatternShape::Crosshatch => vec![
            line(0.0, 0.0, size, size, color, lw),
            line(size, 0.0, 0.0, size, color, lw),
        ],
    }
}

fn pattern_tile(spec: &PatternSpec, id: &str) -> SvgElement {
    SvgElement::new("pattern")
        .with_attr("id", id)
        .with_attr("patternUnits", "userSpaceOnUse")
        .with_attr("width", spec.size.unwrap_or(DEFAULT_TILE))
        .with_attr("height", spec.size.unwrap_or(DEFAULT_TILE))
}

fn flat_pattern_element(spec: &PatternSpec) -> SvgElement {
    let size = spec.size.unwrap_or(DEFAULT_TILE);
    let fg = spec.foreground_color.as_deref().unwrap_or("#194582");
    let mut el = pattern_tile(spec, FLAT_PATTERN_ID).with_child(
        SvgElement::new("rect")
            .with_attr("width", size)
            .with_attr("height", size)
            .with_attr("fill", spec.background_color.as_deref().unwrap_or("#0D2B5C")),
    );
    for g in glyphs(spec, size, fg, 2.0) {
        el.append_child(g);
    }
    el
}

fn overlay_pattern_element(spec: &PatternSpec) -> SvgElement {
    let size = spec.size.unwrap_or(DEFAULT_TILE);
    let fg = spec.foreground_color.as_deref().unwrap_or("#ffffff");
    let mut el = pattern_tile(spec, LAYERED_PATTERN_ID);
    for g in glyphs(spec, size, fg, 1.5) {
        el.append_child(g);
    }
    el
}

/// Position right after `<defs>`.
fn front_position(svg: &SvgElement) -> usize {
    svg.child_index("defs").map(|i| i + 1).unwrap_or(0)
}

/// Apply a flat gradient or pattern background to `svg`.
pub fn apply_background(svg: &mut SvgElement, spec: &BackgroundSpec) {
    let (width, height) = canvas_size(svg);
    ensure_defs(svg);

    let fill_id = match spec {
        BackgroundSpec::Gradient(g @ GradientSpec::Linear { .. }) => {
            put_resource(svg, gradient_element(g, FLAT_LINEAR_ID));
            FLAT_LINEAR_ID
        }
        BackgroundSpec::Gradient(g @ GradientSpec::Radial { .. }) => {
            put_resource(svg, gradient_element(g, FLAT_RADIAL_ID));
            FLAT_RADIAL_ID
        }
        BackgroundSpec::Pattern(p) => {
            put_resource(svg, flat_pattern_element(p));
            FLAT_PATTERN_ID
        }
    };
    let fill = format!("url(#{})", fill_id);

    let is_tagged = |e: &SvgElement| e.is_tagged_background();
    if let Some(existing) = svg.find_descendant_mut(&is_tagged) {
        if existing.name == "rect" {
            debug!("Reusing existing background rect");
            existing.set_attr("width", width);
            existing.set_attr("height", height);
            existing.set_attr("fill", fill);
            return;
        }
        svg.remove_descendants_where(&is_tagged);
    }

    let rect = full_bleed_rect(width, height)
        .with_attr(BACKGROUND_ATTR, BACKGROUND_VALUE)
        .with_attr("fill", fill);
    let pos = front_position(svg);
    svg.insert_child(pos, rect);
}

/// Apply a gradient base with a translucent pattern overlay to `svg`.
///
/// Any previous background element is removed first; the new group is never
/// merged with it.
pub fn apply_layered_background(svg: &mut SvgElement, layered: &LayeredBackground) {
    let (width, height) = canvas_size(svg);
    ensure_defs(svg);

    let removed = svg.remove_descendants_where(&|e: &SvgElement| e.is_tagged_background());
    if removed > 0 {
        debug!("Removed {} existing background element(s)", removed);
    }

    let mut group = SvgElement::new("g").with_attr(BACKGROUND_ATTR, BACKGROUND_VALUE);

    if let Some(gradient) = &layered.gradient {
        let id = match gradient {
            GradientSpec::Radial { .. } => LAYERED_RADIAL_ID,
            GradientSpec::Linear { .. } => LAYERED_LINEAR_ID,
        };
        put_resource(svg, gradient_element(gradient, id));
        group.append_child(full_bleed_rect(width, height).with_attr("fill", format!("url(#{})", id)));
    }

    if let Some(overlay) = &layered.pattern {
        put_resource(svg, overlay_pattern_element(&overlay.pattern));
        group.append_child(
            full_bleed_rect(width, height)
                .with_attr("fill", format!("url(#{})", LAYERED_PATTERN_ID))
                .with_attr("opacity", overlay.opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY)),
        );
    }

    let pos = front_position(svg);
    svg.insert_child(pos, group);
}

/// Apply whichever background `option` describes.
pub fn apply(svg: &mut SvgElement, option: &BackgroundOption) {
    match option {
        BackgroundOption::Flat(spec) => apply_background(svg, spec),
        BackgroundOption::Layered(layered) => apply_layered_background(svg, layered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SvgNode;

    fn doc() -> SvgElement {
        SvgElement::new("svg")
            .with_attr("viewBox", "0 0 800 400")
            .with_child(SvgElement::new("g").with_attr("id", "content"))
    }

    fn tagged(svg: &SvgElement) -> usize {
        svg.count_descendants(&|e: &SvgElement| e.is_tagged_background())
    }

    #[test]
    fn flat_gradient_goes_right_after_defs() {
        let mut svg = doc();
        apply_background(&mut svg, &background_preset("spotlight", &BrandPalette::default()));
        let names: Vec<_> = svg.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["defs", "rect", "g"]);
        let rect = svg.child_elements().nth(1).unwrap();
        assert_eq!(rect.attr("width"), Some("800"));
        assert_eq!(rect.attr("height"), Some("400"));
        assert_eq!(rect.attr("fill"), Some("url(#custom-bg-radial)"));
    }

    #[test]
    fn flat_background_is_idempotent() {
        let spec = background_preset("tech-grid", &BrandPalette::default());
        let mut once = doc();
        apply_background(&mut once, &spec);
        let mut twice = once.clone();
        apply_background(&mut twice, &spec);
        assert_eq!(tagged(&twice), 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn layered_background_is_idempotent() {
        let spec = layered_preset("spotlight-grid", &BrandPalette::default());
        let mut once = doc();
        apply_layered_background(&mut once, &spec);
        let mut twice = once.clone();
        apply_layered_background(&mut twice, &spec);
        assert_eq!(tagged(&twice), 1);
        assert_eq!(once, twice);

        let group = twice.child_elements().nth(1).unwrap();
        assert_eq!(group.name, "g");
        let overlay = group.child_elements().nth(1).unwrap();
        assert_eq!(overlay.attr("opacity"), Some("0.1"));
    }

    #[test]
    fn layered_replaces_existing_background_rect() {
        let mut svg = doc();
        svg.insert_child(
            0,
            SvgElement::new("rect").with_attr(BACKGROUND_ATTR, BACKGROUND_VALUE),
        );
        apply_layered_background(&mut svg, &layered_preset("tech-matrix", &BrandPalette::default()));
        assert_eq!(tagged(&svg), 1);
        assert_eq!(svg.child_elements().next().unwrap().name, "defs");
        assert_eq!(svg.child_elements().nth(1).unwrap().name, "g");
    }

    #[test]
    fn flat_after_layered_swaps_group_for_rect() {
        let mut svg = doc();
        apply_layered_background(&mut svg, &layered_preset("spotlight-dots", &BrandPalette::default()));
        apply_background(&mut svg, &background_preset("top-down", &BrandPalette::default()));
        assert_eq!(tagged(&svg), 1);
        assert_eq!(svg.child_elements().nth(1).unwrap().name, "rect");
    }

    #[test]
    fn stops_are_evenly_spaced_without_offsets() {
        let spec = GradientSpec::Linear {
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            stops: vec![
                GradientStop { offset: None, color: "#000".into(), opacity: None },
                GradientStop { offset: None, color: "#444".into(), opacity: Some(0.5) },
                GradientStop { offset: None, color: "#888".into(), opacity: None },
            ],
        };
        let el = gradient_element(&spec, "g");
        let offsets: Vec<_> = el.child_elements().map(|s| s.attr("offset").unwrap()).collect();
        assert_eq!(offsets, ["0%", "50%", "100%"]);
        assert_eq!(el.child_elements().nth(1).unwrap().attr("stop-opacity"), Some("0.5"));
        assert_eq!(el.attr("x2"), Some("100%"));
    }

    #[test]
    fn pattern_glyph_catalogue() {
        let p = PatternSpec { shape: PatternShape::Crosshatch, size: Some(16.0), ..Default::default() };
        let tile = flat_pattern_element(&p);
        let names: Vec<_> = tile.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["rect", "line", "line"]);

        let unknown: PatternSpec = serde_json::from_str(r#"{"pattern":"zigzag","size":10}"#).unwrap();
        assert_eq!(unknown.shape, PatternShape::Dots);
        let tile = overlay_pattern_element(&unknown);
        let circle = tile.child_elements().next().unwrap();
        assert_eq!(circle.attr("cx"), Some("5"));
        assert_eq!(circle.attr("r"), Some("1.5"));
    }

    #[test]
    fn missing_view_box_uses_default_canvas() {
        let mut svg = SvgElement::new("svg");
        apply_background(&mut svg, &background_preset("subtle-dots", &BrandPalette::default()));
        let rect = svg
            .children
            .iter()
            .find_map(|c| match c {
                SvgNode::Element(e) if e.name == "rect" => Some(e),
                _ => None,
            })
            .unwrap();
        assert_eq!(rect.attr("width"), Some("720"));
        assert_eq!(rect.attr("height"), Some("600"));
    }

    #[test]
    fn unknown_background_falls_back_to_spotlight_dots() {
        let palette = BrandPalette::default();
        assert_eq!(select_background("solid", &palette), None);
        assert_eq!(
            select_background("unknownPreset", &palette),
            Some(BackgroundOption::Layered(layered_preset("spotlight-dots", &palette)))
        );
        assert!(matches!(
            select_background("spotlight", &palette),
            Some(BackgroundOption::Flat(BackgroundSpec::Gradient(GradientSpec::Radial { .. })))
        ));
    }

    #[test]
    fn gradient_spec_reads_original_json_shape() {
        let spec: GradientSpec = serde_json::from_str(
            r##"{"type":"radial-gradient","cx":"50%","stops":[{"color":"#fff"}]}"##,
        )
        .unwrap();
        assert!(matches!(spec, GradientSpec::Radial { ref cx, .. } if cx.as_deref() == Some("50%")));
    }
}

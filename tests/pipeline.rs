//! Generation pipeline tests against stub renderer and rasterizer

use infogen::config::InfographicConfig;
use infogen::{
    DiagramRenderer, DiagramRequest, Error, Generator, OutputFormat, RasterJob, Rasterizer, Result,
    VirtualDocument,
};
use serde_json::json;
use std::cell::RefCell;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Draws a fixed 640x360 diagram and remembers the last request.
#[derive(Default)]
struct StubRenderer {
    last: RefCell<Option<DiagramRequest>>,
}

impl DiagramRenderer for StubRenderer {
    fn render(&self, request: &DiagramRequest) -> Result<VirtualDocument> {
        *self.last.borrow_mut() = Some(request.clone());
        Ok(VirtualDocument::from_svg(
            r#"<svg viewBox="0 0 640 360"><defs></defs><g id="content"><text x="10" y="20">X</text></g></svg>"#,
        ))
    }
}

/// Renders into a page without any `<svg>`.
struct EmptyRenderer;

impl DiagramRenderer for EmptyRenderer {
    fn render(&self, _request: &DiagramRequest) -> Result<VirtualDocument> {
        Ok(VirtualDocument::parse("<html><body><div id=\"container\"></div></body></html>"))
    }
}

#[derive(Default)]
struct StubRasterizer {
    jobs: RefCell<Vec<RasterJob>>,
}

impl Rasterizer for StubRasterizer {
    fn capture(&self, job: &RasterJob) -> Result<Vec<u8>> {
        self.jobs.borrow_mut().push(job.clone());
        let mut png = PNG_MAGIC.to_vec();
        png.extend_from_slice(&[0u8; 16]);
        Ok(png)
    }
}

fn config(background: &str) -> InfographicConfig {
    InfographicConfig {
        template: Some("t".into()),
        data: Some(json!({"title": "X", "items": [{"label": "A"}]})),
        background: Some(background.into()),
        ..Default::default()
    }
}

fn generator() -> Generator<StubRenderer, StubRasterizer> {
    Generator::new(StubRenderer::default(), StubRasterizer::default())
}

struct Stubs {
    renderer: StubRenderer,
    rasterizer: StubRasterizer,
}

impl Stubs {
    fn new() -> Self {
        Self { renderer: StubRenderer::default(), rasterizer: StubRasterizer::default() }
    }

    fn generator(&self) -> Generator<&StubRenderer, &StubRasterizer> {
        Generator::new(&self.renderer, &self.rasterizer)
    }
}

#[test]
fn svg_output_has_background_first_and_explicit_size() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.svg");

    let result = generator().generate(&config("spotlight"), &out, 2.0).unwrap();
    assert!(result.success);
    assert_eq!(result.format, OutputFormat::Svg);

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="640""#));
    assert!(svg.contains(r#"height="360""#));

    let bg = svg.find(r#"data-element-type="Background""#).expect("background element");
    let content = svg.find(r#"<g id="content""#).expect("content group");
    assert!(bg < content);
    assert!(svg.contains(r#"fill="url(#custom-bg-radial)""#));
}

#[test]
fn png_output_goes_through_rasterizer_with_scale() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    let stubs = Stubs::new();

    let result = stubs.generator().generate(&config("spotlight"), &out, 3.0).unwrap();
    assert_eq!(result.format, OutputFormat::Png);

    let jobs = stubs.rasterizer.jobs.borrow();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].scale_factor, 3.0);
    assert_eq!((jobs[0].viewport.width, jobs[0].viewport.height), (640, 360));
    assert!(jobs[0].html.contains("<svg"));

    let bytes = std::fs::read(&out).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(PNG_MAGIC));
}

#[test]
fn unknown_background_falls_back_to_layered_dots() {
    let svg = generator().compose(&config("unknownPreset")).unwrap();
    assert!(svg.contains(r#"<g data-element-type="Background">"#));
    assert!(svg.contains(r#"id="layered-bg-radial""#));
    assert!(svg.contains(r#"id="layered-bg-pattern""#));
    assert!(svg.contains("<circle"));
}

#[test]
fn solid_keeps_library_background() {
    let svg = generator().compose(&config("solid")).unwrap();
    assert!(!svg.contains("data-element-type"));
    assert!(svg.contains(r#"width="640""#));
}

#[test]
fn tokens_are_resolved_before_rendering() {
    let stubs = Stubs::new();
    let mut cfg = config("solid");
    cfg.data = Some(json!({
        "title": "X",
        "items": [
            {"label": "A", "icon": "icon:rocket", "illus": "illus:missing"},
            {"label": "B", "icon": "icon:__nonexistent__"}
        ]
    }));
    stubs.generator().compose(&cfg).unwrap();

    let request = stubs.renderer.last.borrow().clone().expect("renderer called");
    let items = request.data["items"].as_array().unwrap();
    assert_eq!(items[0]["icon"]["type"], "custom");
    assert!(items[0]["icon"]["data"].as_str().unwrap().contains("<svg"));
    assert!(items[0]["illus"]["data"].as_str().unwrap().contains("missing"));
    assert!(items[1].get("icon").is_none());
    assert_eq!(items[1]["label"], "B");
    assert_eq!((request.width, request.height), (800, 600));
}

#[test]
fn missing_template_fails_before_rendering() {
    let mut cfg = config("spotlight");
    cfg.template = None;
    let stubs = Stubs::new();
    let err = stubs.generator().compose(&cfg).unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
    assert!(stubs.renderer.last.borrow().is_none());
}

#[test]
fn page_without_svg_is_element_not_found() {
    let gen = Generator::new(EmptyRenderer, StubRasterizer::default());
    let err = gen.compose(&config("spotlight")).unwrap_err();
    assert!(matches!(err, Error::ElementNotFound(_)));
}

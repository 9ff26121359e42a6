//! Chrome DevTools Protocol diagram renderer

use crate::dom::VirtualDocument;
use crate::{DiagramRenderer, DiagramRequest, Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, info};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the diagram library bundle
pub const RENDERER_SCRIPT_ENV: &str = "INFOGEN_RENDERER_SCRIPT";

/// Global the UMD bundle installs on `window`
pub const DEFAULT_LIBRARY_GLOBAL: &str = "AntVInfographic";

pub const DEFAULT_SETTLE_MS: u64 = 300;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// Installs a loader that hands pre-resolved SVG straight back to the library,
// then constructs and renders. Returns a JSON string: {"ok":true} or {"error":...}.
const RENDER_TEMPLATE: &str = r#"(function(){
    const lib = window[{{GLOBAL}}];
    if (!lib || !lib.Infographic) {
        return JSON.stringify({ error: 'diagram library global not found: ' + {{GLOBAL}} });
    }
    try {
        if (typeof lib.registerResourceLoader === 'function' && typeof lib.loadSVGResource === 'function') {
            lib.registerResourceLoader(async function(config) {
                const data = config && config.data;
                if (config && config.type === 'custom' && typeof data === 'string'
                    && (data.startsWith('<svg') || data.startsWith('<symbol'))) {
                    return lib.loadSVGResource(data);
                }
                return null;
            });
        }
        const infographic = new lib.Infographic({{OPTIONS}});
        infographic.render();
        return JSON.stringify({ ok: true });
    } catch (e) {
        return JSON.stringify({ error: String((e && e.message) || e) });
    }
})()"#;

/// Renders infographics by running the diagram library in headless Chrome.
///
/// Each call launches its own browser, which is shut down when the call
/// returns.
#[derive(Debug, Clone)]
pub struct CdpRenderer {
    script: Option<PathBuf>,
    global: String,
    settle: Duration,
    timeout: Duration,
}

impl Default for CdpRenderer {
    fn default() -> Self {
        Self {
            script: None,
            global: DEFAULT_LIBRARY_GLOBAL.to_string(),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl CdpRenderer {
    /// Renderer loading the library from `script`, or from
    /// `INFOGEN_RENDERER_SCRIPT` when `None`.
    pub fn new(script: Option<PathBuf>) -> Self {
        Self { script, ..Default::default() }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_library_global(mut self, global: impl Into<String>) -> Self {
        self.global = global.into();
        self
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn library_global(&self) -> &str {
        &self.global
    }

    fn script_path(&self) -> Result<PathBuf> {
        self.script
            .clone()
            .or_else(|| std::env::var_os(RENDERER_SCRIPT_ENV).map(PathBuf::from))
            .ok_or_else(|| {
                Error::ConfigError(format!(
                    "No diagram library bundle configured (use --renderer-script or {})",
                    RENDERER_SCRIPT_ENV
                ))
            })
    }

    fn load_bundle(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Cannot read renderer script {}: {}", path.display(), e))
        })
    }

    fn open_tab(&self, request: &DiagramRequest) -> Result<(Browser, Arc<Tab>)> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((request.width.max(1), request.height.max(1))))
            .build()
            .map_err(|e| Error::RenderError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::RenderError(format!("Failed to launch browser: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::RenderError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(self.timeout);

        tab.navigate_to("about:blank")
            .map_err(|e| Error::RenderError(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::RenderError(format!("Wait for navigation failed: {}", e)))?;

        Ok((browser, tab))
    }

    fn evaluate(tab: &Tab, script: &str, what: &str) -> Result<Option<Value>> {
        let result = tab
            .evaluate(script, false)
            .map_err(|e| Error::RenderError(format!("{} failed: {}", what, e)))?;
        Ok(result.value)
    }
}

/// The element id behind a `#id` container selector.
fn container_id(selector: &str) -> &str {
    selector.strip_prefix('#').unwrap_or(selector)
}

fn construction_script(global: &str, request: &DiagramRequest) -> String {
    let mut options = json!({
        "container": request.container,
        "template": request.template,
        "data": request.data,
        "themeConfig": request.theme_config.clone().unwrap_or_else(|| json!({})),
        "width": request.width,
        "height": request.height,
    });
    if let (Some(design), Some(map)) = (&request.design, options.as_object_mut()) {
        map.insert("design".to_string(), design.clone());
    }
    RENDER_TEMPLATE
        .replace("{{GLOBAL}}", &Value::String(global.to_string()).to_string())
        .replace("{{OPTIONS}}", &options.to_string())
}

fn check_outcome(value: Option<Value>) -> Result<()> {
    let raw = value.as_ref().and_then(Value::as_str).unwrap_or("{}");
    let outcome: Value = serde_json::from_str(raw).unwrap_or(Value::Null);
    match outcome.get("error") {
        Some(err) => Err(Error::RenderError(
            err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string()),
        )),
        None if outcome.get("ok").is_some() => Ok(()),
        None => Err(Error::RenderError(format!("Unexpected render result: {}", raw))),
    }
}

impl DiagramRenderer for CdpRenderer {
    fn render(&self, request: &DiagramRequest) -> Result<VirtualDocument> {
        let bundle = Self::load_bundle(&self.script_path()?)?;

        info!("Rendering template: {}", request.template);
        let (_browser, tab) = self.open_tab(request)?;

        let mount = format!(
            "(function(){{ const el = document.createElement('div'); el.id = {}; document.body.appendChild(el); return true; }})()",
            Value::String(container_id(&request.container).to_string())
        );
        Self::evaluate(&tab, &mount, "Container setup")?;
        Self::evaluate(&tab, &bundle, "Loading diagram library")?;
        debug!("Diagram library loaded ({} bytes)", bundle.len());

        let outcome = Self::evaluate(&tab, &construction_script(self.library_global(), request), "Render")?;
        check_outcome(outcome)?;

        // The library loads resources asynchronously and exposes no completion
        // signal.
        std::thread::sleep(self.settle);

        let html = Self::evaluate(&tab, "document.documentElement.outerHTML", "Reading document")?
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| Error::RenderError("No document returned from page".into()))?;
        debug!("Rendered document: {} bytes", html.len());

        Ok(VirtualDocument::parse(&html))
    }
}

//! End-to-end generation: config in, SVG or PNG file out.

use crate::background::select_background;
use crate::color::{theme_contrast_issues, BrandPalette, WCAG_AA};
use crate::config::{validate_config, InfographicConfig};
use crate::extract::{extract_svg, ExtractOptions, DEFAULT_CONTAINER};
use crate::raster::{RasterJob, Rasterizer};
use crate::resources::ResourceResolver;
use crate::{DiagramRenderer, DiagramRequest, Result, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Output file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// `.svg` (any case) is SVG; everything else is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

/// Report of a finished generation, printed under `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateResult {
    pub success: bool,
    pub path: PathBuf,
    pub format: OutputFormat,
}

/// The generation pipeline over a renderer and a rasterizer.
pub struct Generator<R, Z> {
    renderer: R,
    rasterizer: Z,
}

#[cfg(feature = "cdp")]
impl Generator<crate::cdp::CdpRenderer, crate::raster::CdpRasterizer> {
    /// Headless Chrome for both rendering and rasterizing.
    pub fn with_chrome(config: &InfographicConfig) -> Self {
        use std::time::Duration;

        let mut renderer = crate::cdp::CdpRenderer::new(config.renderer_script.clone());
        let mut rasterizer = crate::raster::CdpRasterizer::default();
        if let Some(ms) = config.settle_ms {
            renderer = renderer.with_settle(Duration::from_millis(ms));
        }
        if let Some(ms) = config.timeout_ms {
            renderer = renderer.with_timeout(Duration::from_millis(ms));
            rasterizer.timeout = Duration::from_millis(ms);
        }
        if let Some(global) = &config.library_global {
            renderer = renderer.with_library_global(global.as_str());
        }
        Self::new(renderer, rasterizer)
    }
}

impl<R: DiagramRenderer, Z: Rasterizer> Generator<R, Z> {
    pub fn new(renderer: R, rasterizer: Z) -> Self {
        Self { renderer, rasterizer }
    }

    /// Render `config` and return the finished SVG markup.
    pub fn compose(&self, config: &InfographicConfig) -> Result<String> {
        config.ensure_renderable()?;

        let report = validate_config(config);
        for problem in report.errors.iter().chain(report.warnings.iter()) {
            warn!("{}", problem);
        }

        if let Some(theme) = &config.theme_config {
            let issues = theme_contrast_issues(theme);
            if !issues.is_empty() {
                warn!("Contrast warnings (WCAG AA {}:1):", WCAG_AA);
                for issue in &issues {
                    warn!("  - {}", issue);
                }
            }
        }

        let mut resolver =
            ResourceResolver::new(config.illustrations_dir.clone(), config.icons_dir.clone());
        if let Some(dir) = &config.illustrations_dir {
            info!("Using illustrations from: {}", dir.display());
        }
        let data = resolver.resolve_data(config.data.as_ref().unwrap_or(&Value::Null));

        let container = config.container.clone().unwrap_or_else(|| DEFAULT_CONTAINER.to_string());
        let request = DiagramRequest {
            container: container.clone(),
            template: config.template.clone().unwrap_or_default(),
            design: config.design.clone(),
            data,
            theme_config: config.theme_config.clone(),
            width: config.width.unwrap_or(DEFAULT_WIDTH),
            height: config.height.unwrap_or(DEFAULT_HEIGHT),
        };
        info!(
            "Creating infographic with template: {}",
            config.template.as_deref().unwrap_or("custom design")
        );
        let doc = self.renderer.render(&request)?;

        let background = config.background.as_deref().and_then(|name| {
            let palette = config
                .theme_config
                .as_ref()
                .map(BrandPalette::from_theme)
                .unwrap_or_default();
            select_background(name, &palette)
        });
        let options = ExtractOptions { container, ..Default::default() }.with_background(background);

        extract_svg(&doc, &options)
    }

    /// Render `config` and write it to `output`.
    pub fn generate(
        &self,
        config: &InfographicConfig,
        output: &Path,
        scale_factor: f64,
    ) -> Result<GenerateResult> {
        let svg = self.compose(config)?;

        let format = OutputFormat::from_path(output);
        info!("Exporting as {:?}...", format);
        match format {
            OutputFormat::Svg => std::fs::write(output, svg.as_bytes())?,
            OutputFormat::Png => {
                let job = RasterJob::prepare(&svg, scale_factor);
                let png = self.rasterizer.capture(&job)?;
                std::fs::write(output, png)?;
            }
        }
        info!("Generated: {}", output.display());

        Ok(GenerateResult { success: true, path: output.to_path_buf(), format })
    }
}

//! SVG to PNG rasterization through a headless browser.

use crate::{Result, Viewport};
use regex::Regex;
use std::sync::OnceLock;

/// Size used when the root `<svg>` declares no usable width/height.
pub const DEFAULT_DIMENSIONS: (u32, u32) = (800, 600);

fn root_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<svg\b[^>]*>").expect("static regex"))
}

fn dimension_re(attr: &str) -> Regex {
    // Leading whitespace keeps `stroke-width` and friends from matching.
    Regex::new(&format!(r#"\s{}\s*=\s*"([0-9]*\.?[0-9]+)"#, attr)).expect("dimension regex")
}

/// Read `width`/`height` from the root `<svg>` start tag, rounding decimals up.
pub fn parse_dimensions(svg: &str) -> (u32, u32) {
    let Some(tag) = root_tag_re().find(svg) else {
        return DEFAULT_DIMENSIONS;
    };
    let read = |attr: &str, fallback: u32| -> u32 {
        dimension_re(attr)
            .captures(tag.as_str())
            .and_then(|c| c[1].parse::<f64>().ok())
            .filter(|v| *v > 0.0)
            .map(|v| v.ceil() as u32)
            .unwrap_or(fallback)
    };
    (read("width", DEFAULT_DIMENSIONS.0), read("height", DEFAULT_DIMENSIONS.1))
}

/// Minimal page whose body is exactly `width`×`height` and holds `svg`.
pub fn html_shell(svg: &str, width: u32, height: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
* {{ margin: 0; padding: 0; }}
body {{ width: {w}px; height: {h}px; overflow: hidden; }}
svg {{ display: block; }}
</style>
</head>
<body>{svg}</body>
</html>"#,
        w = width,
        h = height,
        svg = svg
    )
}

/// Everything a rasterizer needs for one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterJob {
    pub html: String,
    pub viewport: Viewport,
    pub scale_factor: f64,
}

impl RasterJob {
    pub fn prepare(svg: &str, scale_factor: f64) -> Self {
        let (width, height) = parse_dimensions(svg);
        Self {
            html: html_shell(svg, width, height),
            viewport: Viewport { width, height },
            scale_factor,
        }
    }
}

/// Produces PNG bytes from a prepared page.
pub trait Rasterizer {
    fn capture(&self, job: &RasterJob) -> Result<Vec<u8>>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for &T {
    fn capture(&self, job: &RasterJob) -> Result<Vec<u8>> {
        (**self).capture(job)
    }
}

#[cfg(feature = "cdp")]
pub use self::chrome::{CdpRasterizer, RasterSession};

#[cfg(feature = "cdp")]
mod chrome {
    use super::{RasterJob, Rasterizer};
    use crate::{Error, Result};
    use headless_chrome::browser::tab::Tab;
    use headless_chrome::protocol::cdp::Page;
    use headless_chrome::{Browser, LaunchOptions};
    use log::{debug, info};
    use std::ffi::OsStr;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn raster_err(context: &str) -> impl Fn(anyhow::Error) -> Error + '_ {
        move |e| Error::RasterizationError(format!("{}: {}", context, e))
    }

    /// Write `html` to a temporary `.html` file, removed when dropped.
    ///
    /// Chrome caps URLs at 2 MB, which pages with embedded raster
    /// illustrations exceed as `data:` URLs.
    pub(super) fn stage_page(html: &str) -> Result<NamedTempFile> {
        let stage_err = |e: std::io::Error| Error::RasterizationError(format!("Failed to stage page: {}", e));
        let mut file = tempfile::Builder::new()
            .prefix("infogen-")
            .suffix(".html")
            .tempfile()
            .map_err(stage_err)?;
        file.write_all(html.as_bytes()).map_err(stage_err)?;
        file.flush().map_err(stage_err)?;
        Ok(file)
    }

    pub(super) fn file_url(path: &Path) -> String {
        let path = path.to_string_lossy().replace('\\', "/");
        if path.starts_with('/') {
            format!("file://{}", path)
        } else {
            format!("file:///{}", path)
        }
    }

    /// A browser launched for one capture; dropping it shuts Chrome down.
    pub struct RasterSession {
        tab: Arc<Tab>,
        _browser: Browser,
    }

    impl RasterSession {
        pub fn launch(job: &RasterJob, timeout: Duration) -> Result<Self> {
            let scale_arg = format!("--force-device-scale-factor={}", job.scale_factor);
            let launch_options = LaunchOptions::default_builder()
                .headless(true)
                .window_size(Some((job.viewport.width, job.viewport.height)))
                .args(vec![OsStr::new(&scale_arg), OsStr::new("--hide-scrollbars")])
                .build()
                .map_err(|e| Error::RasterizationError(format!("Failed to build launch options: {}", e)))?;

            let browser = Browser::new(launch_options).map_err(raster_err("Failed to launch browser"))?;
            let tab = browser.new_tab().map_err(raster_err("Failed to create tab"))?;
            tab.set_default_timeout(timeout);

            Ok(Self { tab, _browser: browser })
        }

        /// Load the job's page and screenshot its viewport.
        pub fn capture(&self, job: &RasterJob) -> Result<Vec<u8>> {
            let page = stage_page(&job.html)?;
            let url = file_url(page.path());
            debug!("Loading staged page {}", url);

            self.tab.navigate_to(&url).map_err(raster_err("Navigation failed"))?;
            self.tab
                .wait_until_navigated()
                .map_err(raster_err("Wait for navigation failed"))?;

            let clip = Page::Viewport {
                x: 0.0,
                y: 0.0,
                width: job.viewport.width as f64,
                height: job.viewport.height as f64,
                scale: 1.0,
            };
            let png = self
                .tab
                .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
                .map_err(raster_err("Screenshot failed"))?;
            debug!("Captured {} bytes", png.len());
            Ok(png)
        }
    }

    /// Rasterizer that launches a fresh headless Chrome per capture.
    #[derive(Debug, Clone)]
    pub struct CdpRasterizer {
        pub timeout: Duration,
    }

    impl Default for CdpRasterizer {
        fn default() -> Self {
            Self { timeout: Duration::from_millis(30_000) }
        }
    }

    impl Rasterizer for CdpRasterizer {
        fn capture(&self, job: &RasterJob) -> Result<Vec<u8>> {
            info!(
                "Rasterizing {}x{} at {}x",
                job.viewport.width, job.viewport.height, job.scale_factor
            );
            let session = RasterSession::launch(job, self.timeout)?;
            session.capture(job)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_come_from_root_tag_only() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" stroke-width="3" width="720.2" height="600"><rect width="10" height="10"/></svg>"#;
        assert_eq!(parse_dimensions(svg), (721, 600));

        let no_dims = r#"<svg viewBox="0 0 10 10"><rect width="10" height="10"/></svg>"#;
        assert_eq!(parse_dimensions(no_dims), DEFAULT_DIMENSIONS);
        assert_eq!(parse_dimensions("not svg"), DEFAULT_DIMENSIONS);
        assert_eq!(parse_dimensions(r#"<svg width="100%" height="50">"#), (800, 50));
    }

    #[test]
    fn shell_sizes_body() {
        let html = html_shell("<svg/>", 320, 200);
        assert!(html.contains("width: 320px; height: 200px"));
        assert!(html.contains("<body><svg/></body>"));
        assert!(html.contains("display: block"));
    }

    #[test]
    fn job_carries_viewport_and_scale() {
        let job = RasterJob::prepare(r#"<svg width="640" height="480"></svg>"#, 3.0);
        assert_eq!(job.viewport, Viewport { width: 640, height: 480 });
        assert_eq!(job.scale_factor, 3.0);
    }

    #[cfg(feature = "cdp")]
    #[test]
    fn pages_are_staged_as_files() {
        // Larger than Chrome's 2 MB URL limit once base64-encoded.
        let big = "x".repeat(3 * 1024 * 1024);
        let html = html_shell(&format!("<svg><desc>{}</desc></svg>", big), 10, 10);
        let page = chrome::stage_page(&html).unwrap();

        assert_eq!(std::fs::read_to_string(page.path()).unwrap(), html);
        let url = chrome::file_url(page.path());
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with(".html"));

        let path = page.path().to_path_buf();
        drop(page);
        assert!(!path.exists());
    }

    #[cfg(feature = "cdp")]
    #[test]
    #[ignore = "requires a local Chrome install"]
    fn cdp_rasterizer_produces_png() {
        let job = RasterJob::prepare(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#f00"/></svg>"##,
            2.0,
        );
        let png = CdpRasterizer::default().capture(&job).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}

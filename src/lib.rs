//! Infogen
//!
//! Generates brand-styled infographics. A diagram library lays the
//! infographic out as SVG; this crate feeds it resolved icons and
//! illustrations, then post-processes the SVG (explicit dimensions, gradient
//! and pattern backgrounds) and writes SVG or a rasterized PNG.
//!
//! # Features
//!
//! - **CDP Backend** (default): renders and rasterizes through headless
//!   Chrome via the `headless_chrome` crate
//! - **Pluggable boundaries**: [`DiagramRenderer`] and [`raster::Rasterizer`]
//!   are traits, so the pipeline runs against any implementation
//!
//! # Example
//!
//! ```no_run
//! use infogen::config::{ConfigOverrides, InfographicConfig};
//! use infogen::generate::Generator;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let overrides = ConfigOverrides {
//!     template: Some("list-row-simple".to_string()),
//!     data: Some(r#"{"title":"Q3","items":[{"label":"Ship","icon":"icon:rocket"}]}"#.to_string()),
//!     background: Some("spotlight-dots".to_string()),
//!     ..Default::default()
//! };
//! let config = InfographicConfig::load(None, &overrides)?;
//!
//! let generator = Generator::with_chrome(&config);
//! let result = generator.generate(&config, Path::new("q3.png"), 2.0)?;
//! println!("Generated: {}", result.path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod background;
pub mod color;
pub mod config;
pub mod dom;
pub mod extract;
pub mod generate;
pub mod raster;
pub mod resources;
pub mod templates;

#[cfg(feature = "cdp")]
pub mod cdp;

pub use dom::VirtualDocument;
pub use extract::{extract_svg, ExtractOptions};
pub use generate::{GenerateResult, Generator, OutputFormat};
pub use raster::{RasterJob, Rasterizer};
pub use resources::{ResourceResolver, ResourceToken};

use serde_json::Value;

/// Default canvas width handed to the renderer
pub const DEFAULT_WIDTH: u32 = 800;
/// Default canvas height handed to the renderer
pub const DEFAULT_HEIGHT: u32 = 600;

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

/// Input to a diagram renderer.
///
/// `data` is expected to have had its resource tokens resolved already.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramRequest {
    /// Selector of the element the library draws into
    pub container: String,
    pub template: String,
    /// Free-form design block, passed through when present
    pub design: Option<Value>,
    pub data: Value,
    pub theme_config: Option<Value>,
    pub width: u32,
    pub height: u32,
}

impl Default for DiagramRequest {
    fn default() -> Self {
        Self {
            container: extract::DEFAULT_CONTAINER.to_string(),
            template: String::new(),
            design: None,
            data: Value::Null,
            theme_config: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Lays out an infographic and returns the document it was drawn into.
///
/// The returned document must hold exactly one `<svg>` under the request's
/// container once the call returns.
pub trait DiagramRenderer {
    fn render(&self, request: &DiagramRequest) -> Result<VirtualDocument>;
}

impl<T: DiagramRenderer + ?Sized> DiagramRenderer for &T {
    fn render(&self, request: &DiagramRequest) -> Result<VirtualDocument> {
        (**self).render(request)
    }
}

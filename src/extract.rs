//! Pull the infographic `<svg>` out of a rendered document.

use crate::background::{self, BackgroundOption, BackgroundSpec, LayeredBackground};
use crate::dom::VirtualDocument;
use crate::Result;
use log::debug;

/// Selector of the element the renderer draws into.
pub const DEFAULT_CONTAINER: &str = "#container";

/// How to post-process the extracted SVG.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub container: String,
    pub background: Option<BackgroundSpec>,
    pub layered_background: Option<LayeredBackground>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            background: None,
            layered_background: None,
        }
    }
}

impl ExtractOptions {
    /// Options carrying whichever background `option` describes.
    pub fn with_background(mut self, option: Option<BackgroundOption>) -> Self {
        match option {
            Some(BackgroundOption::Flat(spec)) => self.background = Some(spec),
            Some(BackgroundOption::Layered(layered)) => self.layered_background = Some(layered),
            None => {}
        }
        self
    }
}

/// Serialize the container's SVG with explicit dimensions and background.
///
/// The document is not modified; all changes are made on a copy.
pub fn extract_svg(doc: &VirtualDocument, options: &ExtractOptions) -> Result<String> {
    let mut svg = doc.svg_in(&options.container)?;

    if let Some([_, _, width, height]) = svg.view_box() {
        svg.set_attr("width", width);
        svg.set_attr("height", height);
    }

    if let Some(spec) = &options.background {
        debug!("Compositing flat background");
        background::apply_background(&mut svg, spec);
    }
    if let Some(layered) = &options.layered_background {
        debug!("Compositing layered background");
        background::apply_layered_background(&mut svg, layered);
    }

    Ok(svg.to_markup())
}

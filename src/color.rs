//! Color math used for palette derivation and contrast checks.
//!
//! Luminance follows WCAG 2.1 relative luminance (gamma-linearized channels,
//! 0.2126/0.7152/0.0722 weights).

use serde_json::Value;

/// Default brand colors used when a theme does not provide its own.
pub const DEFAULT_PRIMARY: &str = "#194582";
pub const DEFAULT_DARK: &str = "#0D2B5C";
pub const DEFAULT_DARKER: &str = "#061120";
pub const DEFAULT_ACCENT: &str = "#00f3ff";

/// Minimum WCAG AA contrast ratio for body text.
pub const WCAG_AA: f64 = 4.5;

/// Parse `#RRGGBB`, `RRGGBB` or `#RGB` into channels.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim().trim_start_matches('#');
    let full = match h.len() {
        3 => h.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => h.to_string(),
        _ => return None,
    };
    let num = u32::from_str_radix(&full, 16).ok()?;
    Some(((num >> 16) as u8, ((num >> 8) & 0xFF) as u8, (num & 0xFF) as u8))
}

fn to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:06x}", ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
}

fn linearize(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in `[0, 1]`. Unparseable input counts as black.
pub fn luminance(hex: &str) -> f64 {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let l = 0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b);
    l.clamp(0.0, 1.0)
}

/// Contrast ratio between two colors, in `[1, 21]`.
pub fn contrast_ratio(a: &str, b: &str) -> f64 {
    let la = luminance(a);
    let lb = luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

pub fn is_light(hex: &str) -> bool {
    luminance(hex) > 0.5
}

/// Multiply every channel by `1 - pct`, flooring and clamping.
pub fn darken(hex: &str, pct: f64) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((0, 0, 0));
    let scale = |c: u8| -> u8 { (c as f64 * (1.0 - pct)).floor().clamp(0.0, 255.0) as u8 };
    to_hex(scale(r), scale(g), scale(b))
}

/// Colors the background presets are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandPalette {
    pub primary: String,
    pub dark: String,
    pub darker: String,
    pub accent: String,
}

impl Default for BrandPalette {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            dark: DEFAULT_DARK.to_string(),
            darker: DEFAULT_DARKER.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl BrandPalette {
    /// Derive a palette from a theme config (`colorBg`, `colorPrimary`, `palette`).
    ///
    /// `colorBg` is treated as the dark base of the background; darker shades
    /// are derived from it. The accent is the first light, non-white palette
    /// entry when the palette has more than one color, else `colorPrimary`.
    pub fn from_theme(theme: &Value) -> Self {
        let base = theme
            .get("colorBg")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DARK)
            .to_string();

        let mut accent = theme
            .get("colorPrimary")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ACCENT)
            .to_string();

        if let Some(palette) = theme.get("palette").and_then(Value::as_array) {
            if palette.len() > 1 {
                let candidate = palette
                    .iter()
                    .filter_map(Value::as_str)
                    .find(|c| is_light(c) && !c.eq_ignore_ascii_case("#ffffff"));
                if let Some(c) = candidate {
                    accent = c.to_string();
                }
            }
        }

        Self {
            dark: darken(&base, 0.3),
            darker: darken(&base, 0.6),
            primary: base,
            accent,
        }
    }
}

/// Outcome of a single text/background contrast check.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastCheck {
    /// `None` when the ratio could not be computed (opaque rgba syntax)
    pub ratio: Option<f64>,
    pub is_valid: bool,
    /// Suggested replacement text color when the check fails
    pub recommended: Option<&'static str>,
}

fn rgba_to_hex(color: &str) -> Option<String> {
    let inner = color.trim().strip_prefix("rgba(")?;
    let mut parts = inner.split(',').map(str::trim);
    let mut channel = || parts.next()?.parse::<u8>().ok();
    let (r, g, b) = (channel()?, channel()?, channel()?);
    Some(to_hex(r, g, b))
}

/// Check text against a background at `min_ratio`.
pub fn validate_contrast(text: &str, background: &str, min_ratio: f64) -> ContrastCheck {
    let text = if text.trim_start().starts_with("rgba") {
        match rgba_to_hex(text) {
            Some(hex) => hex,
            None => {
                return ContrastCheck { ratio: None, is_valid: true, recommended: None };
            }
        }
    } else {
        text.to_string()
    };

    let ratio = contrast_ratio(&text, background);
    let is_valid = ratio >= min_ratio;
    let recommended = if is_valid {
        None
    } else if is_light(background) {
        Some("#1A202C")
    } else {
        Some("#FFFFFF")
    };

    ContrastCheck { ratio: Some(ratio), is_valid, recommended }
}

/// Contrast issues for the text fills a theme declares, as readable lines.
pub fn theme_contrast_issues(theme: &Value) -> Vec<String> {
    let bg = theme.get("colorBg").and_then(Value::as_str).unwrap_or("#FFFFFF");
    let fields: [(&str, &[&str]); 4] = [
        ("Title", &["title", "fill"]),
        ("Description", &["desc", "fill"]),
        ("Item label", &["item", "label", "fill"]),
        ("Item desc", &["item", "desc", "fill"]),
    ];

    let mut issues = Vec::new();
    for (label, path) in fields {
        let fill = path.iter().try_fold(theme, |v, key| v.get(*key)).and_then(Value::as_str);
        let Some(fill) = fill else { continue };
        let check = validate_contrast(fill, bg, WCAG_AA);
        if let (false, Some(ratio), Some(rec)) = (check.is_valid, check.ratio, check.recommended) {
            issues.push(format!(
                "{} contrast: {:.2}:1 (need {}:1). Use {}",
                label, ratio, WCAG_AA, rec
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn luminance_extremes() {
        assert_eq!(luminance("#000000"), 0.0);
        assert!((luminance("#FFFFFF") - 1.0).abs() < 1e-12);
        for c in ["#194582", "#00f3ff", "#EC4899", "#777", "bogus"] {
            let l = luminance(c);
            assert!((0.0..=1.0).contains(&l), "{} -> {}", c, l);
        }
    }

    #[test]
    fn contrast_is_symmetric() {
        let pairs = [("#000000", "#ffffff"), ("#194582", "#00f3ff"), ("#10B981", "#061120")];
        for (a, b) in pairs {
            assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
            assert!((contrast_ratio(a, a) - 1.0).abs() < 1e-12);
        }
        assert!((contrast_ratio("#000000", "#ffffff") - 21.0).abs() < 1e-9);
    }

    #[test]
    fn darken_bounds() {
        assert_eq!(darken("#194582", 0.0), "#194582");
        assert_eq!(darken("#ABCDEF", 1.0), "#000000");
        assert_eq!(darken("#0D2B5C", 0.3), "#091e40");
    }

    #[test]
    fn light_classification() {
        assert!(is_light("#FFFFFF"));
        assert!(is_light("#00f3ff"));
        assert!(!is_light("#0D2B5C"));
    }

    #[test]
    fn palette_from_theme_picks_light_accent() {
        let theme = json!({
            "colorBg": "#0D2B5C",
            "colorPrimary": "#3B82F6",
            "palette": ["#FFFFFF", "#0D2B5C", "#00f3ff"]
        });
        let p = BrandPalette::from_theme(&theme);
        assert_eq!(p.primary, "#0D2B5C");
        assert_eq!(p.dark, darken("#0D2B5C", 0.3));
        assert_eq!(p.darker, darken("#0D2B5C", 0.6));
        assert_eq!(p.accent, "#00f3ff");

        let p = BrandPalette::from_theme(&json!({}));
        assert_eq!(p.primary, DEFAULT_DARK);
        assert_eq!(p.accent, DEFAULT_ACCENT);
    }

    #[test]
    fn contrast_checks_flag_low_contrast_fills() {
        let theme = json!({
            "colorBg": "#FFFFFF",
            "title": { "fill": "#EEEEEE" },
            "item": { "label": { "fill": "#111111" } }
        });
        let issues = theme_contrast_issues(&theme);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Title contrast"));
        assert!(issues[0].contains("#1A202C"));

        let rgba = validate_contrast("rgba(255, 255, 255, 0.7)", "#061120", WCAG_AA);
        assert!(rgba.is_valid);
        let opaque = validate_contrast("rgba(var(--x))", "#061120", WCAG_AA);
        assert_eq!(opaque.ratio, None);
    }
}

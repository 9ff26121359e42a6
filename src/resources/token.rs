//! Resource tokens found in infographic item data.

use serde_json::Value;

/// A reference to a resource, classified once when the data is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceToken {
    /// `icon:<name>`
    Icon(String),
    /// `illus:<name>`
    Illustration(String),
    /// Raw `<svg …>` or `<symbol …>` markup
    InlineSvg(String),
    /// Percent-encoded markup, either bare or from a `{"type":"custom"}` object
    Custom(String),
}

impl ResourceToken {
    /// Classify a JSON value. Non-token values give `None`.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse_str(s),
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) != Some("custom") {
                    return None;
                }
                let data = map.get("data").and_then(Value::as_str)?;
                match Self::parse_str(data) {
                    Some(token) => Some(token),
                    None => Some(ResourceToken::Custom(data.to_string())),
                }
            }
            _ => None,
        }
    }

    /// Classify a string token.
    pub fn parse_str(s: &str) -> Option<Self> {
        if let Some(name) = s.strip_prefix("icon:") {
            Some(ResourceToken::Icon(name.to_string()))
        } else if let Some(name) = s.strip_prefix("illus:") {
            Some(ResourceToken::Illustration(name.to_string()))
        } else if s.starts_with("<svg") || s.starts_with("<symbol") {
            Some(ResourceToken::InlineSvg(s.to_string()))
        } else if s.starts_with("%3C") || s.starts_with("%3c") {
            Some(ResourceToken::Custom(s.to_string()))
        } else {
            None
        }
    }
}

/// Decode `%XX` escapes. Malformed escapes are kept literally.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Encode like `encodeURIComponent`: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for b in input.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

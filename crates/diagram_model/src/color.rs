//! Fill and stroke colors
//!
//! Shapes keep their colors as the CSS strings the editor UI produced
//! (`Paint`), so a load/save cycle never rewrites them. Exporters that need
//! concrete channel values resolve a `Paint` into a `ShapeColor`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Color Types
// =============================================================================

/// Resolved RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    /// Create an opaque RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create an RGBA color
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Common colors
    pub const BLACK: ShapeColor = ShapeColor::rgb(0, 0, 0);
    pub const WHITE: ShapeColor = ShapeColor::rgb(255, 255, 255);
    pub const TRANSPARENT: ShapeColor = ShapeColor::rgba(0, 0, 0, 0);
    pub const BLUE: ShapeColor = ShapeColor::rgb(68, 114, 196);
    pub const YELLOW: ShapeColor = ShapeColor::rgb(255, 192, 0);
    pub const GRAY: ShapeColor = ShapeColor::rgb(128, 128, 128);

    /// Convert to hex string (e.g., "#RRGGBB" or "#RRGGBBAA")
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Hex digits without the leading `#` and without alpha, as DrawingML wants them
    pub fn to_rgb_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in 0.0..=1.0
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse from hex string (#RGB, #RRGGBB or #RRGGBBAA)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` function notation
    fn from_function(css: &str) -> Option<Self> {
        let (name, rest) = css.split_once('(')?;
        let args = rest.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        match (name.trim(), parts.as_slice()) {
            ("rgb", [r, g, b]) => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            ("rgba", [r, g, b, a]) => {
                let alpha = a.parse::<f64>().ok()?.clamp(0.0, 1.0);
                Some(Self::rgba(channel(r)?, channel(g)?, channel(b)?, (alpha * 255.0).round() as u8))
            }
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "gray" | "grey" => Self::GRAY,
            "transparent" | "none" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::BLACK
    }
}

// =============================================================================
// Paint
// =============================================================================

/// A CSS color string as stored on a shape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Paint(String);

impl Paint {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn none() -> Self {
        Self("transparent".to_string())
    }

    pub fn from_color(color: ShapeColor) -> Self {
        Self(color.to_hex())
    }

    pub fn as_css(&self) -> &str {
        &self.0
    }

    /// Resolve to channel values; `None` when the string is not understood
    pub fn resolve(&self) -> Option<ShapeColor> {
        let css = self.0.trim();
        if css.is_empty() {
            return Some(ShapeColor::TRANSPARENT);
        }
        if css.starts_with('#') {
            return ShapeColor::from_hex(css);
        }
        let lower = css.to_ascii_lowercase();
        ShapeColor::from_function(&lower).or_else(|| ShapeColor::from_name(&lower))
    }

    /// Whether this paint draws nothing
    pub fn is_none(&self) -> bool {
        matches!(self.resolve(), Some(c) if c.is_transparent())
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::from_color(ShapeColor::BLUE)
    }
}

impl From<&str> for Paint {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ShapeColor> for Paint {
    fn from(color: ShapeColor) -> Self {
        Self::from_color(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = ShapeColor::from_hex("#4472C4").unwrap();
        assert_eq!(c, ShapeColor::BLUE);
        assert_eq!(c.to_hex(), "#4472C4");
        assert_eq!(c.to_rgb_hex(), "4472C4");
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(ShapeColor::from_hex("#fff"), Some(ShapeColor::WHITE));
        assert_eq!(ShapeColor::from_hex("#12"), None);
    }

    #[test]
    fn test_paint_resolves_functions_and_names() {
        assert_eq!(Paint::new("rgb(255, 0, 0)").resolve(), Some(ShapeColor::rgb(255, 0, 0)));
        assert_eq!(
            Paint::new("rgba(0,0,0,0.5)").resolve(),
            Some(ShapeColor::rgba(0, 0, 0, 128))
        );
        assert_eq!(Paint::new("White").resolve(), Some(ShapeColor::WHITE));
        assert_eq!(Paint::new("chartreuse-ish").resolve(), None);
    }

    #[test]
    fn test_paint_none() {
        assert!(Paint::none().is_none());
        assert!(Paint::new("").is_none());
        assert!(!Paint::default().is_none());
    }

    #[test]
    fn test_paint_keeps_original_string() {
        let paint: Paint = serde_json::from_str("\"rgba(10, 20, 30, 1)\"").unwrap();
        assert_eq!(serde_json::to_string(&paint).unwrap(), "\"rgba(10, 20, 30, 1)\"");
    }
}

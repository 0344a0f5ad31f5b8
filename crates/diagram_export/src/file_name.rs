//! Export targets and the file names derived from a diagram title

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when a title has nothing usable left after sanitizing
const FALLBACK_STEM: &str = "diagram";

/// Longest stem kept, in characters
const MAX_STEM_CHARS: usize = 80;

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    Svg,
    Pptx,
    Png,
    Jpeg,
}

impl ExportTarget {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportTarget::Svg => "svg",
            ExportTarget::Pptx => "pptx",
            ExportTarget::Png => "png",
            ExportTarget::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportTarget::Svg => "image/svg+xml",
            ExportTarget::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            ExportTarget::Png => "image/png",
            ExportTarget::Jpeg => "image/jpeg",
        }
    }

    /// Parse a user-supplied format name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(ExportTarget::Svg),
            "pptx" => Some(ExportTarget::Pptx),
            "png" => Some(ExportTarget::Png),
            "jpg" | "jpeg" => Some(ExportTarget::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportTarget::Svg => "SVG",
            ExportTarget::Pptx => "PPTX",
            ExportTarget::Png => "PNG",
            ExportTarget::Jpeg => "JPEG",
        };
        f.write_str(name)
    }
}

/// Deterministic download name for a diagram export.
///
/// Characters that are unsafe in file names become `_`, runs of whitespace
/// and underscores collapse, and an empty result falls back to `diagram`.
pub fn export_file_name(title: &str, target: ExportTarget) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut pending_sep = false;
    for c in title.trim().chars() {
        let keep = c.is_alphanumeric() || matches!(c, '-' | '.' | '(' | ')');
        if keep {
            if pending_sep && !stem.is_empty() {
                stem.push('_');
            }
            pending_sep = false;
            stem.push(c);
        } else {
            pending_sep = true;
        }
    }

    let stem: String = stem.trim_matches('.').chars().take(MAX_STEM_CHARS).collect();
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };
    format!("{}.{}", stem, target.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_title() {
        assert_eq!(export_file_name("Network", ExportTarget::Svg), "Network.svg");
        assert_eq!(export_file_name("Network", ExportTarget::Jpeg), "Network.jpg");
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(
            export_file_name("  Q3 / Sales   Flow  ", ExportTarget::Pptx),
            "Q3_Sales_Flow.pptx"
        );
        assert_eq!(export_file_name("a:b*c?", ExportTarget::Png), "a_b_c.png");
    }

    #[test]
    fn test_empty_title_falls_back() {
        assert_eq!(export_file_name("", ExportTarget::Png), "diagram.png");
        assert_eq!(export_file_name("///", ExportTarget::Svg), "diagram.svg");
        assert_eq!(export_file_name("..", ExportTarget::Svg), "diagram.svg");
    }

    #[test]
    fn test_unicode_kept_and_length_capped() {
        assert_eq!(export_file_name("Übersicht", ExportTarget::Svg), "Übersicht.svg");
        let long = "x".repeat(200);
        let name = export_file_name(&long, ExportTarget::Svg);
        assert_eq!(name.len(), MAX_STEM_CHARS + 4);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ExportTarget::from_name("JPG"), Some(ExportTarget::Jpeg));
        assert_eq!(ExportTarget::from_name("svg"), Some(ExportTarget::Svg));
        assert_eq!(ExportTarget::from_name("gif"), None);
    }
}

//! PPTX package infrastructure
//!
//! Writes the ZIP container with the fixed parts a single-slide presentation
//! needs: content types, package and part relationships, presentation, one
//! slide master, one blank layout, and a theme. The slide XML itself comes
//! from `slide_writer`.

use crate::Result;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Relationship type URIs used in the package
pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// Content types of the package parts
pub mod content_types {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
}

pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";
pub const SLIDE_PATH: &str = "ppt/slides/slide1.xml";
pub const SLIDE_MASTER_PATH: &str = "ppt/slideMasters/slideMaster1.xml";
pub const SLIDE_LAYOUT_PATH: &str = "ppt/slideLayouts/slideLayout1.xml";
pub const THEME_PATH: &str = "ppt/theme/theme1.xml";

// =============================================================================
// Content Types and Relationships
// =============================================================================

/// `[Content_Types].xml` entries, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", content_types::RELATIONSHIPS);
        ct.add_default("xml", content_types::XML);
        ct
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults.push((extension.to_string(), content_type.to_string()));
    }

    /// Register a part; `part` is a package path without the leading slash
    pub fn add_override(&mut self, part: &str, content_type: &str) {
        self.overrides.push((format!("/{}", part), content_type.to_string()));
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(r#"<Default Extension="{}" ContentType="{}"/>"#, ext, ct));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// A `.rels` part
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<(String, String, String)>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its generated id
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries
            .push((id.clone(), rel_type.to_string(), target.to_string()));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, rel_type, target
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

// =============================================================================
// Package Writer
// =============================================================================

/// Slide size in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    pub cx: i64,
    pub cy: i64,
}

/// Writes a one-slide presentation package
pub struct PptxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    content_types: ContentTypes,
}

impl<W: Write + Seek> PptxWriter<W> {
    pub fn new(writer: W) -> Self {
        let mut types = ContentTypes::new();
        types.add_override(PRESENTATION_PATH, content_types::PRESENTATION);
        types.add_override(SLIDE_MASTER_PATH, content_types::SLIDE_MASTER);
        types.add_override(SLIDE_LAYOUT_PATH, content_types::SLIDE_LAYOUT);
        types.add_override(SLIDE_PATH, content_types::SLIDE);
        types.add_override(THEME_PATH, content_types::THEME);
        Self {
            zip: ZipWriter::new(writer),
            content_types: types,
        }
    }

    /// Write every part around the given slide XML and finish the archive
    pub fn write(mut self, slide_xml: &str, size: SlideSize) -> Result<W> {
        let mut root_rels = Relationships::new();
        root_rels.add(relationship_types::OFFICE_DOCUMENT, PRESENTATION_PATH);
        self.write_file("_rels/.rels", &root_rels.to_xml())?;

        let mut presentation_rels = Relationships::new();
        let master_rel = presentation_rels.add(relationship_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        let slide_rel = presentation_rels.add(relationship_types::SLIDE, "slides/slide1.xml");
        presentation_rels.add(relationship_types::THEME, "theme/theme1.xml");
        self.write_file(PRESENTATION_PATH, &presentation_xml(&master_rel, &slide_rel, size))?;
        self.write_file("ppt/_rels/presentation.xml.rels", &presentation_rels.to_xml())?;

        let mut master_rels = Relationships::new();
        let layout_rel = master_rels.add(relationship_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(relationship_types::THEME, "../theme/theme1.xml");
        self.write_file(SLIDE_MASTER_PATH, &slide_master_xml(&layout_rel))?;
        self.write_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", &master_rels.to_xml())?;

        let mut layout_rels = Relationships::new();
        layout_rels.add(relationship_types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
        self.write_file(SLIDE_LAYOUT_PATH, SLIDE_LAYOUT_XML)?;
        self.write_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", &layout_rels.to_xml())?;

        let mut slide_rels = Relationships::new();
        slide_rels.add(relationship_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        self.write_file(SLIDE_PATH, slide_xml)?;
        self.write_file("ppt/slides/_rels/slide1.xml.rels", &slide_rels.to_xml())?;

        self.write_file(THEME_PATH, THEME_XML)?;

        // Write [Content_Types].xml last
        let content_types_xml = self.content_types.to_xml();
        self.write_file("[Content_Types].xml", &content_types_xml)?;

        Ok(self.zip.finish()?)
    }

    /// Write a file to the ZIP archive
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;

        Ok(())
    }
}

// =============================================================================
// Fixed Parts
// =============================================================================

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

fn presentation_xml(master_rel: &str, slide_rel: &str, size: SlideSize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{master}"/></p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="{slide}"/></p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        master = master_rel,
        slide = slide_rel,
        cx = size.cx,
        cy = size.cy,
    )
}

fn slide_master_xml(layout_rel: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="{layout}"/></p:sldLayoutIdLst></p:sldMaster>"#,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        layout = layout_rel,
    )
}

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Diagram"><a:themeElements><a:clrScheme name="Diagram"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Diagram"><a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Diagram"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_ids_sequential() {
        let mut rels = Relationships::new();
        assert!(rels.is_empty());
        assert_eq!(rels.add(relationship_types::SLIDE, "slides/slide1.xml"), "rId1");
        assert_eq!(rels.add(relationship_types::THEME, "theme/theme1.xml"), "rId2");
        assert_eq!(rels.len(), 2);
        let xml = rels.to_xml();
        assert!(xml.contains(r#"Id="rId2""#));
        assert!(xml.contains(r#"Target="theme/theme1.xml""#));
    }

    #[test]
    fn test_content_types_overrides() {
        let mut ct = ContentTypes::new();
        ct.add_override(SLIDE_PATH, content_types::SLIDE);
        let xml = ct.to_xml();
        assert!(xml.contains(r#"<Default Extension="rels""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }

    #[test]
    fn test_presentation_slide_size() {
        let xml = presentation_xml("rId1", "rId2", SlideSize { cx: 12_192_000, cy: 6_858_000 });
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
        assert!(xml.contains(r#"r:id="rId2""#));
    }
}

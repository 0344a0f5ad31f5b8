//! Slide XML writer
//!
//! Serializes mapped slide objects into `ppt/slides/slide1.xml`.

use crate::pptx::presets::{Frame, Outline, SlideObject, SlideObjectKind, SolidColor, TextStyle};
use crate::{ExportError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Shape ids start after the slide's group shape, which is always id 1
const FIRST_SHAPE_ID: usize = 2;

/// Writer for a single slide part
#[derive(Debug, Clone, Default)]
pub struct SlideWriter {
    background: Option<SolidColor>,
}

impl SlideWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid slide background; `None` inherits the master's
    pub fn with_background(mut self, background: Option<SolidColor>) -> Self {
        self.background = background;
        self
    }

    /// Produce the slide XML for the given objects, in z-order
    pub fn write(&self, objects: &[SlideObject]) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;

        let mut root = BytesStart::new("p:sld");
        root.push_attribute(("xmlns:a", NS_A));
        root.push_attribute(("xmlns:r", NS_R));
        root.push_attribute(("xmlns:p", NS_P));
        writer.write_event(Event::Start(root)).map_err(xml_err)?;

        start(&mut writer, "p:cSld", &[])?;
        if let Some(color) = &self.background {
            start(&mut writer, "p:bg", &[])?;
            start(&mut writer, "p:bgPr", &[])?;
            write_solid_fill(&mut writer, color)?;
            empty(&mut writer, "a:effectLst", &[])?;
            end(&mut writer, "p:bgPr")?;
            end(&mut writer, "p:bg")?;
        }

        start(&mut writer, "p:spTree", &[])?;
        self.write_group_header(&mut writer)?;
        for (index, object) in objects.iter().enumerate() {
            let id = (FIRST_SHAPE_ID + index).to_string();
            match &object.kind {
                SlideObjectKind::Connector => self.write_connector(&mut writer, &id, object)?,
                _ => self.write_shape(&mut writer, &id, object)?,
            }
        }
        end(&mut writer, "p:spTree")?;
        end(&mut writer, "p:cSld")?;

        start(&mut writer, "p:clrMapOvr", &[])?;
        empty(&mut writer, "a:masterClrMapping", &[])?;
        end(&mut writer, "p:clrMapOvr")?;
        end(&mut writer, "p:sld")?;

        let xml = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| ExportError::Xml(e.to_string()))?;
        Ok(xml)
    }

    fn write_group_header<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        start(writer, "p:nvGrpSpPr", &[])?;
        empty(writer, "p:cNvPr", &[("id", "1"), ("name", "")])?;
        empty(writer, "p:cNvGrpSpPr", &[])?;
        empty(writer, "p:nvPr", &[])?;
        end(writer, "p:nvGrpSpPr")?;

        start(writer, "p:grpSpPr", &[])?;
        start(writer, "a:xfrm", &[])?;
        empty(writer, "a:off", &[("x", "0"), ("y", "0")])?;
        empty(writer, "a:ext", &[("cx", "0"), ("cy", "0")])?;
        empty(writer, "a:chOff", &[("x", "0"), ("y", "0")])?;
        empty(writer, "a:chExt", &[("cx", "0"), ("cy", "0")])?;
        end(writer, "a:xfrm")?;
        end(writer, "p:grpSpPr")?;
        Ok(())
    }

    /// `p:sp` for preset shapes and text boxes
    fn write_shape<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        id: &str,
        object: &SlideObject,
    ) -> Result<()> {
        start(writer, "p:sp", &[])?;

        start(writer, "p:nvSpPr", &[])?;
        empty(writer, "p:cNvPr", &[("id", id), ("name", &object.name)])?;
        if matches!(object.kind, SlideObjectKind::TextBox { .. }) {
            empty(writer, "p:cNvSpPr", &[("txBox", "1")])?;
        } else {
            empty(writer, "p:cNvSpPr", &[])?;
        }
        empty(writer, "p:nvPr", &[])?;
        end(writer, "p:nvSpPr")?;

        start(writer, "p:spPr", &[])?;
        write_xfrm(writer, &object.frame)?;
        match &object.kind {
            SlideObjectKind::Preset { preset, adjust } => write_preset(writer, preset, adjust)?,
            _ => write_preset(writer, "rect", &[])?,
        }
        match &object.fill {
            Some(color) => write_solid_fill(writer, color)?,
            None => empty(writer, "a:noFill", &[])?,
        }
        if let Some(outline) = &object.outline {
            write_outline(writer, outline)?;
        }
        end(writer, "p:spPr")?;

        if let SlideObjectKind::TextBox { paragraphs, style } = &object.kind {
            start(writer, "p:txBody", &[])?;
            empty(
                writer,
                "a:bodyPr",
                &[
                    ("wrap", "none"),
                    ("lIns", "0"),
                    ("tIns", "0"),
                    ("rIns", "0"),
                    ("bIns", "0"),
                ],
            )?;
            empty(writer, "a:lstStyle", &[])?;
            for paragraph in paragraphs {
                write_paragraph(writer, &paragraph.text, style)?;
            }
            end(writer, "p:txBody")?;
        }

        end(writer, "p:sp")?;
        Ok(())
    }

    /// `p:cxnSp` for arrows
    fn write_connector<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        id: &str,
        object: &SlideObject,
    ) -> Result<()> {
        start(writer, "p:cxnSp", &[])?;

        start(writer, "p:nvCxnSpPr", &[])?;
        empty(writer, "p:cNvPr", &[("id", id), ("name", &object.name)])?;
        empty(writer, "p:cNvCxnSpPr", &[])?;
        empty(writer, "p:nvPr", &[])?;
        end(writer, "p:nvCxnSpPr")?;

        start(writer, "p:spPr", &[])?;
        write_xfrm(writer, &object.frame)?;
        write_preset(writer, "line", &[])?;
        if let Some(outline) = &object.outline {
            write_outline(writer, outline)?;
        }
        end(writer, "p:spPr")?;

        end(writer, "p:cxnSp")?;
        Ok(())
    }
}

// =============================================================================
// DrawingML Elements
// =============================================================================

fn write_xfrm<W: std::io::Write>(writer: &mut Writer<W>, frame: &Frame) -> Result<()> {
    let rot = frame.rot.to_string();
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if frame.rot != 0 {
        attrs.push(("rot", &rot));
    }
    if frame.flip_h {
        attrs.push(("flipH", "1"));
    }
    if frame.flip_v {
        attrs.push(("flipV", "1"));
    }
    start(writer, "a:xfrm", &attrs)?;

    let (x, y) = (frame.rect.x.to_string(), frame.rect.y.to_string());
    let (cx, cy) = (frame.rect.cx.to_string(), frame.rect.cy.to_string());
    empty(writer, "a:off", &[("x", &x), ("y", &y)])?;
    empty(writer, "a:ext", &[("cx", &cx), ("cy", &cy)])?;
    end(writer, "a:xfrm")
}

fn write_preset<W: std::io::Write>(
    writer: &mut Writer<W>,
    preset: &str,
    adjust: &[(&str, i64)],
) -> Result<()> {
    start(writer, "a:prstGeom", &[("prst", preset)])?;
    if adjust.is_empty() {
        empty(writer, "a:avLst", &[])?;
    } else {
        start(writer, "a:avLst", &[])?;
        for (name, value) in adjust {
            let formula = format!("val {}", value);
            empty(writer, "a:gd", &[("name", name), ("fmla", &formula)])?;
        }
        end(writer, "a:avLst")?;
    }
    end(writer, "a:prstGeom")
}

fn write_solid_fill<W: std::io::Write>(writer: &mut Writer<W>, color: &SolidColor) -> Result<()> {
    start(writer, "a:solidFill", &[])?;
    match color.alpha {
        Some(alpha) => {
            start(writer, "a:srgbClr", &[("val", &color.rgb)])?;
            empty(writer, "a:alpha", &[("val", &alpha.to_string())])?;
            end(writer, "a:srgbClr")?;
        }
        None => empty(writer, "a:srgbClr", &[("val", &color.rgb)])?,
    }
    end(writer, "a:solidFill")
}

fn write_outline<W: std::io::Write>(writer: &mut Writer<W>, outline: &Outline) -> Result<()> {
    let width = outline.width.to_string();
    start(writer, "a:ln", &[("w", &width)])?;
    match &outline.color {
        Some(color) if outline.width > 0 => write_solid_fill(writer, color)?,
        _ => empty(writer, "a:noFill", &[])?,
    }
    if outline.tail_end {
        empty(writer, "a:tailEnd", &[("type", "triangle"), ("w", "med"), ("len", "med")])?;
    }
    end(writer, "a:ln")
}

fn write_paragraph<W: std::io::Write>(writer: &mut Writer<W>, text: &str, style: &TextStyle) -> Result<()> {
    let size = style.size.to_string();
    start(writer, "a:p", &[])?;
    empty(writer, "a:pPr", &[("algn", style.align)])?;
    if text.is_empty() {
        empty(writer, "a:endParaRPr", &[("lang", "en-US"), ("sz", &size)])?;
    } else {
        start(writer, "a:r", &[])?;
        start(writer, "a:rPr", &[("lang", "en-US"), ("sz", &size), ("dirty", "0")])?;
        if let Some(color) = &style.color {
            write_solid_fill(writer, color)?;
        }
        empty(writer, "a:latin", &[("typeface", &style.typeface)])?;
        end(writer, "a:rPr")?;
        start(writer, "a:t", &[])?;
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
        end(writer, "a:t")?;
        end(writer, "a:r")?;
    }
    end(writer, "a:p")
}

// =============================================================================
// Writer Helpers
// =============================================================================

fn xml_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Xml(e.to_string())
}

fn start<W: std::io::Write>(writer: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for (key, val) in attrs {
        element.push_attribute((*key, *val));
    }
    writer.write_event(Event::Start(element)).map_err(xml_err)?;
    Ok(())
}

fn empty<W: std::io::Write>(writer: &mut Writer<W>, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut element = BytesStart::new(name);
    for (key, val) in attrs {
        element.push_attribute((*key, *val));
    }
    writer.write_event(Event::Empty(element)).map_err(xml_err)?;
    Ok(())
}

fn end<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

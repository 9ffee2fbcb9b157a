//! Office Open XML presentation output.
//!
//! [`PptxWriter`] collects one slide per page while the deck renders and
//! packages them with a blank master, layout and theme on [`PptxWriter::finish`].
use std::{
    fmt::{self, Write as _},
    fs::File,
    io::{Seek, Write},
    path::Path,
};

use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{
    deck::{DeckConfig, DeckTarget, PlacedCard},
    error::Result,
    layout::{Length, PageGeometry, Rect},
    segment::{Rgb, RunFont, Segment},
};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const FRAME_PATTERN: &str = "dotDmnd";
const FRAME_FOREGROUND: Rgb = Rgb(150, 150, 150);
const FRAME_BACKGROUND: Rgb = Rgb(230, 215, 200);
const LEVEL_COLOR: Rgb = Rgb(175, 0, 0);
const TEXT_LANG: &str = "ru-RU";

fn outline_width() -> Length {
    Length::cm(0.05)
}

/// Escapes text for XML content and attribute values. Characters XML 1.0
/// cannot carry are dropped.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

enum Fill {
    None,
    Solid(Rgb),
    Pattern {
        preset: &'static str,
        foreground: Rgb,
        background: Rgb,
    },
}

struct ShapeStyle {
    geometry: &'static str,
    fill: Fill,
    line: Option<(Length, Rgb)>,
}

#[derive(Clone, Copy)]
enum Anchor {
    Top,
    Middle,
}

struct TextFrame {
    anchor: Anchor,
    wrap: bool,
    centered: bool,
    /// Inner `<a:r>`/`<a:br>` markup of the single paragraph.
    content: String,
}

fn write_solid_fill(out: &mut String, rgb: Rgb) -> fmt::Result {
    write!(out, r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, rgb.to_hex())
}

fn write_run_properties(
    out: &mut String,
    font: RunFont,
    base_size_pt: u32,
    family: &str,
) -> fmt::Result {
    let size = font.size_pt.unwrap_or(base_size_pt) * 100;
    write!(
        out,
        r#"<a:rPr lang="{TEXT_LANG}" sz="{size}" b="{}" i="{}" dirty="0">"#,
        u8::from(font.bold),
        u8::from(font.italic)
    )?;
    if let Some(color) = font.color {
        write_solid_fill(out, color)?;
    }
    write!(
        out,
        r#"<a:latin typeface="{0}"/><a:cs typeface="{0}"/></a:rPr>"#,
        escape_xml(family)
    )
}

fn write_run(
    out: &mut String,
    text: &str,
    font: RunFont,
    base_size_pt: u32,
    family: &str,
) -> fmt::Result {
    out.push_str("<a:r>");
    write_run_properties(out, font, base_size_pt, family)?;
    write!(out, "<a:t>{}</a:t></a:r>", escape_xml(text))
}

fn write_break(out: &mut String, base_size_pt: u32, family: &str) -> fmt::Result {
    out.push_str("<a:br>");
    write_run_properties(out, RunFont::default(), base_size_pt, family)?;
    out.push_str("</a:br>");
    Ok(())
}

fn write_shape(
    out: &mut String,
    id: u32,
    name: &str,
    rect: Rect,
    style: &ShapeStyle,
    text: Option<&TextFrame>,
) -> fmt::Result {
    write!(
        out,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{} {id}"/>"#,
        escape_xml(name)
    )?;
    if text.is_some() {
        out.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
    } else {
        out.push_str("<p:cNvSpPr/>");
    }
    write!(
        out,
        r#"<p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#,
        rect.left.emu(),
        rect.top.emu(),
        rect.width.emu(),
        rect.height.emu(),
        style.geometry
    )?;
    match style.fill {
        Fill::None => out.push_str("<a:noFill/>"),
        Fill::Solid(rgb) => write_solid_fill(out, rgb)?,
        Fill::Pattern {
            preset,
            foreground,
            background,
        } => write!(
            out,
            r#"<a:pattFill prst="{preset}"><a:fgClr><a:srgbClr val="{}"/></a:fgClr><a:bgClr><a:srgbClr val="{}"/></a:bgClr></a:pattFill>"#,
            foreground.to_hex(),
            background.to_hex()
        )?,
    }
    match style.line {
        Some((width, rgb)) => {
            write!(out, r#"<a:ln w="{}">"#, width.emu())?;
            write_solid_fill(out, rgb)?;
            out.push_str("</a:ln>");
        }
        None => out.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    out.push_str("</p:spPr>");
    if let Some(frame) = text {
        let anchor = match frame.anchor {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        };
        let wrap = if frame.wrap { "square" } else { "none" };
        write!(
            out,
            r#"<p:txBody><a:bodyPr wrap="{wrap}" anchor="{anchor}"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p>"#
        )?;
        if frame.centered {
            out.push_str(r#"<a:pPr algn="ctr"/>"#);
        }
        out.push_str(&frame.content);
        out.push_str("</a:p></p:txBody>");
    }
    out.push_str("</p:sp>");
    Ok(())
}

fn plain_text(
    text: &str,
    size_pt: u32,
    color: Option<Rgb>,
    family: &str,
) -> std::result::Result<String, fmt::Error> {
    let mut content = String::new();
    let font = RunFont {
        color,
        ..RunFont::default()
    };
    write_run(&mut content, text, font, size_pt, family)?;
    Ok(content)
}

fn body_text(
    card: &PlacedCard,
    config: &DeckConfig,
) -> std::result::Result<String, fmt::Error> {
    let mut content = String::new();
    for segment in &card.text.body.segments {
        match segment {
            Segment::Run(run) => write_run(
                &mut content,
                &run.text,
                run.style.font(),
                config.body_font_size_pt,
                &config.font_family,
            )?,
            Segment::Break => {
                write_break(&mut content, config.body_font_size_pt, &config.font_family)?
            }
        }
    }
    Ok(content)
}

/// Collects slides and writes the presentation package.
pub struct PptxWriter {
    page: PageGeometry,
    font_family: String,
    slides: Vec<String>,
    next_shape_id: u32,
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PptxWriter {
    pub fn new() -> Self {
        Self {
            page: PageGeometry::a4(),
            font_family: DeckConfig::default().font_family,
            slides: Vec::new(),
            next_shape_id: 2,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn write_card(&mut self, card: &PlacedCard, config: &DeckConfig) -> fmt::Result {
        let regions = card.regions;
        let family = config.font_family.as_str();
        let outline = Some((outline_width(), Rgb::BLACK));
        let mut xml = String::new();

        let id = self.shape_id();
        write_shape(
            &mut xml,
            id,
            "Card",
            regions.frame,
            &ShapeStyle {
                geometry: "rect",
                fill: Fill::Pattern {
                    preset: FRAME_PATTERN,
                    foreground: FRAME_FOREGROUND,
                    background: FRAME_BACKGROUND,
                },
                line: Some((config.card.border, Rgb::BLACK)),
            },
            None,
        )?;

        let id = self.shape_id();
        write_shape(
            &mut xml,
            id,
            "Title",
            regions.title,
            &ShapeStyle {
                geometry: "rect",
                fill: Fill::None,
                line: outline,
            },
            Some(&TextFrame {
                anchor: Anchor::Middle,
                wrap: true,
                centered: false,
                content: plain_text(&card.text.title, config.title_font_size_pt, None, family)?,
            }),
        )?;

        let id = self.shape_id();
        write_shape(
            &mut xml,
            id,
            "Level",
            regions.level,
            &ShapeStyle {
                geometry: "ellipse",
                fill: Fill::None,
                line: None,
            },
            Some(&TextFrame {
                anchor: Anchor::Middle,
                wrap: false,
                centered: true,
                content: plain_text(
                    &card.text.level.to_string(),
                    config.level_font_size_pt,
                    Some(LEVEL_COLOR),
                    family,
                )?,
            }),
        )?;

        let id = self.shape_id();
        write_shape(
            &mut xml,
            id,
            "Body",
            regions.body,
            &ShapeStyle {
                geometry: "rect",
                fill: Fill::Solid(Rgb::WHITE),
                line: outline,
            },
            Some(&TextFrame {
                anchor: Anchor::Top,
                wrap: true,
                centered: false,
                content: body_text(card, config)?,
            }),
        )?;

        let id = self.shape_id();
        write_shape(
            &mut xml,
            id,
            "Footer",
            regions.footer,
            &ShapeStyle {
                geometry: "rect",
                fill: Fill::None,
                line: outline,
            },
            Some(&TextFrame {
                anchor: Anchor::Middle,
                wrap: true,
                centered: false,
                content: plain_text(&card.text.footer, config.footer_font_size_pt, None, family)?,
            }),
        )?;

        let slide = self.slides.last_mut().ok_or(fmt::Error)?;
        slide.push_str(&xml);
        Ok(())
    }

    /// Writes the package to any `Write + Seek` destination.
    pub fn finish<W: Write + Seek>(self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types(self.slides.len()).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;

        zip.start_file("ppt/presentation.xml", options)?;
        zip.write_all(presentation(&self.page, self.slides.len()).as_bytes())?;

        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;
        zip.write_all(presentation_rels(self.slides.len()).as_bytes())?;

        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
        zip.write_all(slide_master().as_bytes())?;
        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
        zip.write_all(SLIDE_MASTER_RELS.as_bytes())?;

        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
        zip.write_all(slide_layout().as_bytes())?;
        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
        zip.write_all(SLIDE_LAYOUT_RELS.as_bytes())?;

        zip.start_file("ppt/theme/theme1.xml", options)?;
        zip.write_all(theme(&self.font_family).as_bytes())?;

        for (i, shapes) in self.slides.iter().enumerate() {
            let n = i + 1;
            zip.start_file(format!("ppt/slides/slide{n}.xml"), options)?;
            zip.write_all(slide(shapes).as_bytes())?;
            zip.start_file(format!("ppt/slides/_rels/slide{n}.xml.rels"), options)?;
            zip.write_all(SLIDE_RELS.as_bytes())?;
        }

        let writer = zip.finish()?;
        tracing::debug!(slides = self.slides.len(), "presentation package written");
        Ok(writer)
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.finish(file)?;
        Ok(())
    }
}

impl DeckTarget for PptxWriter {
    type Error = fmt::Error;

    fn begin_page(&mut self, _page_index: usize, config: &DeckConfig) -> fmt::Result {
        self.page = config.page;
        self.font_family.clone_from(&config.font_family);
        self.slides.push(String::new());
        self.next_shape_id = 2;
        Ok(())
    }

    fn draw_card(&mut self, card: &PlacedCard, config: &DeckConfig) -> fmt::Result {
        self.write_card(card, config)
    }
}

fn namespaces() -> String {
    format!(r#"xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}""#)
}

fn content_types(slides: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#
    );
    for n in 1..=slides {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#;

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

fn presentation(page: &PageGeometry, slides: usize) -> String {
    let mut ids = String::new();
    for i in 0..slides {
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3));
    }
    format!(
        r#"{XML_DECL}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        namespaces(),
        page.width.emu(),
        page.height.emu()
    )
}

fn presentation_rels(slides: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/theme" Target="theme/theme1.xml"/>"#
    );
    for i in 0..slides {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_BASE}/slide" Target="slides/slide{}.xml"/>"#,
            i + 3,
            i + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster {}><p:cSld><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        namespaces()
    )
}

fn slide_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout {} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_TREE}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        namespaces()
    )
}

fn slide(shapes: &str) -> String {
    format!(
        r#"{XML_DECL}<p:sld {}><p:cSld><p:spTree>{EMPTY_TREE}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        namespaces()
    )
}

fn theme(font_family: &str) -> String {
    let font = escape_xml(font_family);
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let fills = fill.repeat(3);
    let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);
    let lines: String = [6350, 12700, 19050]
        .iter()
        .map(|w| format!(r#"<a:ln w="{w}">{fill}</a:ln>"#))
        .collect();
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="Spellcards"><a:themeElements><a:clrScheme name="Spellcards"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E6D7C8"/></a:lt2><a:accent1><a:srgbClr val="AF0000"/></a:accent1><a:accent2><a:srgbClr val="3333FF"/></a:accent2><a:accent3><a:srgbClr val="00DD00"/></a:accent3><a:accent4><a:srgbClr val="DD0000"/></a:accent4><a:accent5><a:srgbClr val="FE5E00"/></a:accent5><a:accent6><a:srgbClr val="969696"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Spellcards"><a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Spellcards"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use cellmatch_core::{CellValue, Color, FillStyle, Highlight, HighlightPalette};

// === Writing ===

/// cellXfs index of header cells
pub(crate) const XF_HEADER: u32 = 3;

/// Custom numFmt id for full timestamps
const NUM_FMT_DATETIME: u32 = 164;
/// Built-in `h:mm:ss`
const NUM_FMT_TIME: u32 = 21;

const DATETIME_CODE: &str = "yyyy-mm-dd hh:mm:ss";

/// Number format a written value needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueFormat {
    General,
    DateTime,
    Time,
}

impl ValueFormat {
    pub(crate) fn of(value: &CellValue) -> Self {
        match value {
            CellValue::DateTime(_) if value.is_time_of_day() => ValueFormat::Time,
            CellValue::DateTime(_) => ValueFormat::DateTime,
            _ => ValueFormat::General,
        }
    }

    fn num_fmt_id(self) -> u32 {
        match self {
            ValueFormat::General => 0,
            ValueFormat::DateTime => NUM_FMT_DATETIME,
            ValueFormat::Time => NUM_FMT_TIME,
        }
    }

    /// cellXfs index of the unhighlighted entry; the generic and numeric
    /// entries follow it
    fn base_xf(self) -> u32 {
        match self {
            ValueFormat::General => 0,
            ValueFormat::DateTime => 4,
            ValueFormat::Time => 7,
        }
    }
}

/// Fixed style table for highlighted output.
///
/// Fills 0 and 1 are the `none` and `gray125` entries Excel requires; the
/// highlight fills follow. cellXfs holds one entry per (format, highlight)
/// pair plus the bold header at [`XF_HEADER`].
#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    palette: HighlightPalette,
}

impl XlsxStyleTable {
    pub(crate) fn new(palette: HighlightPalette) -> Self {
        Self { palette }
    }

    pub(crate) fn xf_id_for(&self, highlight: Highlight, format: ValueFormat) -> u32 {
        format.base_xf() + highlight_offset(highlight)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <numFmts count="1">
    <numFmt numFmtId="{}" formatCode="{}"/>
  </numFmts>
  <fonts count="2">
    <font><sz val="11"/><name val="Calibri"/><family val="2"/></font>
    <font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font>
  </fonts>
  <fills count="4">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>"#,
            NUM_FMT_DATETIME, DATETIME_CODE
        );

        for highlight in [Highlight::Generic, Highlight::Numeric] {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(&self.palette.fill_for(highlight)));
        }

        xml.push_str(
            r#"
  </fills>
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>
  <cellXfs count="10">"#,
        );

        for format in [ValueFormat::General, ValueFormat::DateTime, ValueFormat::Time] {
            if format == ValueFormat::DateTime {
                xml.push_str(
                    "\n    <xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\"/>",
                );
            }
            for highlight in [Highlight::None, Highlight::Generic, Highlight::Numeric] {
                xml.push_str("\n    ");
                xml.push_str(&write_xf(format, highlight));
            }
        }

        xml.push_str(
            r#"
  </cellXfs>
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

fn highlight_offset(highlight: Highlight) -> u32 {
    match highlight {
        Highlight::None => 0,
        Highlight::Generic => 1,
        Highlight::Numeric => 2,
    }
}

fn write_xf(format: ValueFormat, highlight: Highlight) -> String {
    let fill_id = match highlight {
        Highlight::None => 0,
        other => 1 + highlight_offset(other),
    };
    let mut xf = format!(
        "<xf numFmtId=\"{}\" fontId=\"0\" fillId=\"{}\" borderId=\"0\" xfId=\"0\"",
        format.num_fmt_id(),
        fill_id
    );
    if format != ValueFormat::General {
        xf.push_str(" applyNumberFormat=\"1\"");
    }
    if fill_id != 0 {
        xf.push_str(" applyFill=\"1\"");
    }
    xf.push_str("/>");
    xf
}

fn write_color(tag: &str, color: &Color) -> String {
    format!("<{tag} rgb=\"{}\"/>", color.to_argb_hex())
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => {
            format!(
                "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
                write_color("fgColor", color)
            )
        }
    }
}

// === Reading ===

/// What a cellXfs entry means for reading cells back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CellFormat {
    /// Solid fill color, if any
    pub fill: Option<Color>,
    /// Whether numbers in this style display as dates or times
    pub is_date: bool,
}

/// Whether a built-in numFmtId displays dates or times
fn is_builtin_date_format(id: u32) -> bool {
    matches!(id, 14..=22 | 45..=47)
}

/// Whether a custom format code displays dates or times.
///
/// Only the first section counts. Quoted literals, escaped characters and
/// bracketed modifiers such as `[Red]` or `[$-409]` are skipped, except
/// elapsed-time brackets like `[h]`.
pub(crate) fn is_date_format_code(code: &str) -> bool {
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            ';' => return false,
            '"' => {
                for quoted in chars.by_ref() {
                    if quoted == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&b| b != ']').collect();
                let elapsed = !inner.is_empty()
                    && inner.chars().all(|b| matches!(b.to_ascii_lowercase(), 'h' | 'm' | 's'));
                if elapsed {
                    return true;
                }
            }
            _ if matches!(c.to_ascii_lowercase(), 'y' | 'm' | 'd' | 'h' | 's') => return true,
            _ => {}
        }
    }
    false
}

/// Fill and date-ness of each cellXfs entry, indexed by style id
pub(crate) fn read_cell_formats<R: Read>(reader: R) -> XlsxResult<Vec<CellFormat>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut num_fmts: HashMap<u32, String> = HashMap::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut xfs: Vec<(usize, u32)> = Vec::new();

    let mut in_fills = false;
    let mut in_fill = false;
    let mut in_cell_xfs = false;
    let mut solid = false;
    let mut fg: Option<Color> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"fills" => in_fills = true,
                b"cellXfs" => in_cell_xfs = true,
                b"fill" if in_fills => {
                    in_fill = true;
                    solid = false;
                    fg = None;
                }
                b"patternFill" if in_fill => solid = is_solid_pattern(&e),
                b"fgColor" if in_fill => fg = parse_rgb_attr(&e),
                b"xf" if in_cell_xfs => xfs.push(parse_xf(&e)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"numFmt" => {
                    let id = parse_u32_attr(&e, b"numFmtId");
                    let code = attr_string(&e, b"formatCode");
                    if let (Some(id), Some(code)) = (id, code) {
                        num_fmts.insert(id, code);
                    }
                }
                b"patternFill" if in_fill => solid = is_solid_pattern(&e),
                b"fgColor" if in_fill => fg = parse_rgb_attr(&e),
                b"xf" if in_cell_xfs => xfs.push(parse_xf(&e)),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"fills" => in_fills = false,
                b"cellXfs" => in_cell_xfs = false,
                b"fill" if in_fill => {
                    fills.push(match (solid, fg) {
                        (true, Some(color)) => FillStyle::solid(color),
                        _ => FillStyle::None,
                    });
                    in_fill = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(xfs
        .into_iter()
        .map(|(fill_id, num_fmt_id)| CellFormat {
            fill: fills.get(fill_id).and_then(FillStyle::color),
            is_date: match num_fmts.get(&num_fmt_id) {
                Some(code) => is_date_format_code(code),
                None => is_builtin_date_format(num_fmt_id),
            },
        })
        .collect())
}

fn is_solid_pattern(e: &BytesStart<'_>) -> bool {
    attr_string(e, b"patternType").as_deref() == Some("solid")
}

fn parse_rgb_attr(e: &BytesStart<'_>) -> Option<Color> {
    attr_string(e, b"rgb").and_then(|v| Color::from_hex(&v))
}

/// `(fillId, numFmtId)` of an `<xf>`
fn parse_xf(e: &BytesStart<'_>) -> (usize, u32) {
    let fill_id = parse_u32_attr(e, b"fillId").unwrap_or(0) as usize;
    (fill_id, parse_u32_attr(e, b"numFmtId").unwrap_or(0))
}

fn parse_u32_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

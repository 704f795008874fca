//! XLSX reader

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{read_cell_formats, CellFormat};
use cellmatch_core::{CellAddress, CellError, CellValue, Color, DateSystem, Table, Workbook};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode characters XML cannot carry:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(ch) => {
                result.push(ch);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// One `<c>` element as found in `sheetData`
#[derive(Debug)]
struct RawCell {
    addr: CellAddress,
    value: CellValue,
    style: u32,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader.
    ///
    /// Every sheet becomes a [`Table`] whose header is the first sheet row.
    /// Numbers in date-formatted cells become [`CellValue::DateTime`].
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let formats = Self::read_styles(&mut archive)?;
        let (parts, date_system) = Self::sheet_parts(&mut archive)?;

        let mut workbook = Workbook::new();
        for (name, path) in parts {
            let mut cells = Self::read_worksheet(&mut archive, &path, &shared_strings)?;
            resolve_dates(&mut cells, &formats, date_system);
            let table = Self::cells_to_table(cells);
            tracing::debug!(
                sheet = %name,
                rows = table.row_count(),
                cols = table.width(),
                "loaded worksheet"
            );
            workbook.add_loaded_sheet(&name, table)?;
        }

        Ok(workbook)
    }

    /// Read the solid fill of every styled cell, per sheet.
    ///
    /// Addresses are sheet coordinates, so row 0 is the header row. Cells
    /// without a solid fill are omitted.
    pub fn read_fills<R: Read + Seek>(
        reader: R,
    ) -> XlsxResult<Vec<(String, BTreeMap<CellAddress, Color>)>> {
        let mut archive = Self::open_archive(reader)?;
        let shared_strings = Self::read_shared_strings(&mut archive)?;

        let formats = Self::read_styles(&mut archive)?;
        let (parts, _) = Self::sheet_parts(&mut archive)?;

        let mut sheets = Vec::new();
        for (name, path) in parts {
            let fills = Self::read_worksheet(&mut archive, &path, &shared_strings)?
                .into_iter()
                .filter_map(|cell| {
                    formats
                        .get(cell.style as usize)
                        .and_then(|format| format.fill)
                        .map(|color| (cell.addr, color))
                })
                .collect();
            sheets.push((name, fills));
        }

        Ok(sheets)
    }

    fn open_archive<R: Read + Seek>(reader: R) -> XlsxResult<zip::ZipArchive<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        Ok(archive)
    }

    /// Cell formats by style index; empty when the package has no styles part
    fn read_styles<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<CellFormat>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_cell_formats(file),
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Sheet names paired with their part paths in workbook order, and the
    /// workbook's date system
    fn sheet_parts<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, DateSystem)> {
        let (sheet_info, date_system) = Self::read_workbook_xml(archive)?;
        let sheet_paths = Self::read_workbook_rels(archive)?;

        let mut parts = Vec::with_capacity(sheet_info.len());
        for (name, r_id) in sheet_info {
            match sheet_paths.get(&r_id) {
                Some(path) if archive.by_name(path).is_ok() => parts.push((name, path.clone())),
                _ => tracing::warn!(sheet = %name, r_id = %r_id, "skipping sheet without a worksheet part"),
            }
        }
        Ok((parts, date_system))
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs carry reading hints, not cell text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        current.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => current.push_str(&e.unescape()?),
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names, rIds and the date system
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, DateSystem)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut date_system = DateSystem::Excel1900;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        let name = attr_value(&e, b"name");
                        let r_id = attr_value(&e, b"r:id");
                        if let (Some(name), Some(r_id)) = (name, r_id) {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookPr" => {
                        if matches!(attr_value(&e, b"date1904").as_deref(), Some("1" | "true")) {
                            date_system = DateSystem::Excel1904;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, date_system))
    }

    /// Read workbook.xml.rels to get worksheet part paths by relationship id
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Targets are relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Scan a worksheet's `sheetData` into raw cells
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<Vec<RawCell>> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut cells = Vec::new();

        // Rows and cells may omit their `r` attribute; positions then follow
        // document order.
        let mut next_row: u32 = 0;
        let mut current_row: u32 = 0;
        let mut next_col: u16 = 0;

        let mut cell: Option<PendingCell> = None;
        let mut text_target = TextTarget::None;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = row_index(&e, next_row)?;
                        next_row = current_row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let pending = PendingCell::start(&e, current_row, next_col)?;
                        next_col = pending.addr.col.saturating_add(1);
                        cell = Some(pending);
                    }
                    b"v" if cell.is_some() => text_target = TextTarget::Value,
                    b"f" if cell.is_some() => text_target = TextTarget::Formula,
                    b"t" if cell.is_some() => text_target = TextTarget::Inline,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = row_index(&e, next_row)?;
                        next_row = current_row + 1;
                        next_col = 0;
                    }
                    b"c" => {
                        let pending = PendingCell::start(&e, current_row, next_col)?;
                        next_col = pending.addr.col.saturating_add(1);
                        if pending.style != 0 {
                            cells.push(pending.finish(shared_strings)?);
                        }
                    }
                    b"f" => {
                        if let Some(c) = cell.as_mut() {
                            c.has_formula = true;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if let Some(c) = cell.as_mut() {
                        let text = e.unescape()?;
                        match text_target {
                            TextTarget::Value => c.value.push_str(&text),
                            TextTarget::Inline => c.inline.push_str(&text),
                            TextTarget::Formula | TextTarget::None => {}
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" | b"t" => text_target = TextTarget::None,
                    b"f" => {
                        text_target = TextTarget::None;
                        if let Some(c) = cell.as_mut() {
                            c.has_formula = true;
                        }
                    }
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            cells.push(pending.finish(shared_strings)?);
                        }
                    }
                    b"sheetData" => break,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(cells)
    }

    /// Lay sparse cells out as a table whose header is sheet row 0
    fn cells_to_table(cells: Vec<RawCell>) -> Table {
        let height = cells.iter().map(|c| c.addr.row as usize + 1).max().unwrap_or(0);
        let width = cells.iter().map(|c| c.addr.col as usize + 1).max().unwrap_or(0);

        let mut grid = vec![vec![CellValue::Empty; width]; height];
        for cell in cells {
            grid[cell.addr.row as usize][cell.addr.col as usize] = cell.value;
        }
        Table::from_grid(grid)
    }
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    None,
    Value,
    Formula,
    Inline,
}

/// A `<c>` element whose children are still being read
#[derive(Debug)]
struct PendingCell {
    addr: CellAddress,
    cell_type: Option<String>,
    style: u32,
    value: String,
    inline: String,
    has_formula: bool,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, row: u32, next_col: u16) -> XlsxResult<Self> {
        let addr = match attr_value(e, b"r") {
            Some(cell_ref) => CellAddress::parse(&cell_ref).map_err(|err| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, err))
            })?,
            None => CellAddress::new(row, next_col),
        };
        let style = match attr_value(e, b"s") {
            Some(s) => s
                .parse()
                .map_err(|_| XlsxError::Parse(format!("Invalid style index: {}", s)))?,
            None => 0,
        };

        Ok(Self {
            addr,
            cell_type: attr_value(e, b"t"),
            style,
            value: String::new(),
            inline: String::new(),
            has_formula: false,
        })
    }

    fn finish(self, shared_strings: &[String]) -> XlsxResult<RawCell> {
        let value = self.resolve(shared_strings)?;
        Ok(RawCell {
            addr: self.addr,
            value,
            style: self.style,
        })
    }

    fn resolve(&self, shared_strings: &[String]) -> XlsxResult<CellValue> {
        let ty = self.cell_type.as_deref();

        if ty == Some("inlineStr") {
            return Ok(CellValue::String(decode_excel_escapes(&self.inline)));
        }

        // Formula cells keep only their cached result
        if self.value.is_empty() {
            return Ok(CellValue::Empty);
        }
        let v = self.value.as_str();

        let value = match ty {
            Some("s") => {
                let idx: usize = v.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", v))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }
            Some("b") => CellValue::Boolean(v.trim() == "1" || v.trim().eq_ignore_ascii_case("true")),
            Some("e") => CellError::parse(v.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::String(v.to_string())),
            Some("str") => CellValue::String(decode_excel_escapes(v)),
            None | Some("n") => match v.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) if self.has_formula => CellValue::String(v.to_string()),
                Err(_) => {
                    return Err(XlsxError::Parse(format!(
                        "Invalid number '{}' in cell {}",
                        v, self.addr
                    )))
                }
            },
            Some(_) => CellValue::String(v.to_string()),
        };
        Ok(value)
    }
}

/// Turn numbers in date-formatted cells into timestamps.
///
/// Serials outside the calendar stay numbers.
fn resolve_dates(cells: &mut [RawCell], formats: &[CellFormat], system: DateSystem) {
    for cell in cells {
        let is_date = formats.get(cell.style as usize).is_some_and(|f| f.is_date);
        let serial = match cell.value {
            CellValue::Number(n) if is_date => n,
            _ => continue,
        };
        if let Some(dt) = system.to_datetime(serial) {
            cell.value = CellValue::DateTime(dt);
        }
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Zero-based row index of a `<row>` element
fn row_index(e: &BytesStart<'_>, fallback: u32) -> XlsxResult<u32> {
    match attr_value(e, b"r") {
        Some(r) => r
            .parse::<u32>()
            .ok()
            .and_then(|r| r.checked_sub(1))
            .ok_or_else(|| XlsxError::Parse(format!("Invalid row number: {}", r))),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes_control_chars() {
        assert_eq!(decode_excel_escapes("a_x000d_b"), "a\rb");
        assert_eq!(decode_excel_escapes("a_x000A_b"), "a\nb");
        assert_eq!(decode_excel_escapes("_x0009_"), "\t");
    }

    #[test]
    fn test_decode_excel_escapes_underscore() {
        assert_eq!(decode_excel_escapes("_x005f_x000d_"), "_x000d_");
    }

    #[test]
    fn test_decode_excel_escapes_leaves_plain_text() {
        assert_eq!(decode_excel_escapes("snake_case_x"), "snake_case_x");
        assert_eq!(decode_excel_escapes("_x12_"), "_x12_");
        assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
    }

    fn minimal_xlsx(sheet_xml: &str, shared_strings: Option<&str>) -> Vec<u8> {
        package(Package {
            sheet_xml,
            shared_strings,
            ..Package::default()
        })
    }

    #[derive(Default)]
    struct Package<'a> {
        sheet_xml: &'a str,
        shared_strings: Option<&'a str>,
        styles: Option<&'a str>,
        sheet_name: Option<&'a str>,
        date1904: bool,
    }

    fn package(parts: Package<'_>) -> Vec<u8> {
        let workbook_xml = format!(
            r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="{}"/><sheets><sheet name="{}" sheetId="1" r:id="rId1"/><sheet name="Ghost" sheetId="2" r:id="rId9"/></sheets></workbook>"#,
            if parts.date1904 { 1 } else { 0 },
            parts.sheet_name.unwrap_or("Data")
        );

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook_xml.as_bytes()).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            if let Some(sst) = parts.shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }

            if let Some(styles) = parts.styles {
                zip.start_file("xl/styles.xml", options).unwrap();
                zip.write_all(styles.as_bytes()).unwrap();
            }

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(parts.sheet_xml.as_bytes()).unwrap();

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_cell_types() {
        let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>City</t></si><si><r><t>Lon</t></r><r><t xml:space="preserve">don </t></r><rPh><t>ロンドン</t></rPh></si></sst>"#;
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
            <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>Flag</t></is></c><c r="C1" t="str"><v>Calc</v></c></row>
            <row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="b"><v>1</v></c><c r="C2"><f>1+1</f><v>2</v></c></row>
            <row r="4"><c r="A4" t="e"><v>#N/A</v></c><c r="C4"><f>A1</f></c></row>
        </sheetData></worksheet>"#;

        let wb = XlsxReader::read(Cursor::new(minimal_xlsx(sheet, Some(sst)))).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Data"]);

        let table = wb.table("Data").unwrap();
        assert_eq!(table.column_names(), vec!["City", "Flag", "Calc"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(0, 0), Some(&CellValue::from("London ")));
        assert_eq!(table.cell(0, 1), Some(&CellValue::Boolean(true)));
        assert_eq!(table.cell(0, 2), Some(&CellValue::Number(2.0)));
        assert_eq!(table.cell(1, 0), Some(&CellValue::Empty));
        assert_eq!(table.cell(2, 0), Some(&CellValue::Error(CellError::Na)));
        assert_eq!(table.cell(2, 2), Some(&CellValue::Empty));
    }

    const DATE_STYLES: &str = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
        <numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy hh:mm"/></numFmts>
        <cellXfs count="4"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/><xf numFmtId="164" applyNumberFormat="1"/><xf numFmtId="2"/></cellXfs>
    </styleSheet>"#;

    fn date_sheet() -> &'static str {
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
            <row r="1"><c r="A1" t="inlineStr"><is><t>When</t></is></c></row>
            <row r="2"><c r="A2" s="1"><v>45292</v></c></row>
            <row r="3"><c r="A3" s="2"><v>45292.75</v></c></row>
            <row r="4"><c r="A4" s="3"><v>45292</v></c></row>
            <row r="5"><c r="A5" s="1" t="inlineStr"><is><t>n/a</t></is></c></row>
            <row r="6"><c r="A6" s="1"><v>-5</v></c></row>
        </sheetData></worksheet>"#
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> CellValue {
        chrono::NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .map(CellValue::DateTime)
            .unwrap()
    }

    #[test]
    fn test_date_styled_cells_become_timestamps() {
        let bytes = package(Package {
            sheet_xml: date_sheet(),
            styles: Some(DATE_STYLES),
            ..Package::default()
        });
        let wb = XlsxReader::read(Cursor::new(bytes)).unwrap();
        let table = wb.table("Data").unwrap();

        assert_eq!(table.cell(0, 0), Some(&at(2024, 1, 1, 0)));
        assert_eq!(table.cell(1, 0), Some(&at(2024, 1, 1, 18)));
        assert_eq!(table.cell(2, 0), Some(&CellValue::Number(45292.0)));
        assert_eq!(table.cell(3, 0), Some(&CellValue::from("n/a")));
        assert_eq!(table.cell(4, 0), Some(&CellValue::Number(-5.0)));
    }

    #[test]
    fn test_date_cell_does_not_match_its_serial() {
        use cellmatch_core::{annotate, Highlight};

        let bytes = package(Package {
            sheet_xml: date_sheet(),
            styles: Some(DATE_STYLES),
            ..Package::default()
        });
        let left = XlsxReader::read(Cursor::new(bytes)).unwrap();
        let right = Workbook::new()
            .with_sheet("Qty", Table::from_columns(vec![("Qty", vec![45292.into()])]))
            .unwrap();

        let (l, r) = annotate(&left, &right);
        assert_eq!(l.highlight_at("Data", 0, 0), Highlight::None);
        // The plain-number copy of the serial still matches as a number
        assert_eq!(l.highlight_at("Data", 2, 0), Highlight::Numeric);
        assert_eq!(r.highlight_at("Qty", 0, 0), Highlight::Numeric);
    }

    #[test]
    fn test_1904_date_system() {
        let bytes = package(Package {
            sheet_xml: date_sheet(),
            styles: Some(DATE_STYLES),
            date1904: true,
            ..Package::default()
        });
        let wb = XlsxReader::read(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.table("Data").unwrap().cell(0, 0), Some(&at(2028, 1, 2, 0)));
    }

    #[test]
    fn test_long_sheet_names_are_read() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#;
        let name = "Quarterly revenue by region and product";
        let bytes = package(Package {
            sheet_xml: sheet,
            sheet_name: Some(name),
            ..Package::default()
        });

        let wb = XlsxReader::read(Cursor::new(bytes)).unwrap();
        assert_eq!(wb.sheet_names(), vec![name]);
    }

    #[test]
    fn test_read_cells_without_references() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
            <row><c t="inlineStr"><is><t>a</t></is></c><c t="inlineStr"><is><t>b</t></is></c></row>
            <row><c><v>1</v></c><c><v>2.5</v></c></row>
        </sheetData></worksheet>"#;

        let wb = XlsxReader::read(Cursor::new(minimal_xlsx(sheet, None))).unwrap();
        let table = wb.table("Data").unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Number(2.5)));
    }

    #[test]
    fn test_read_empty_sheet() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#;
        let wb = XlsxReader::read(Cursor::new(minimal_xlsx(sheet, None))).unwrap();
        assert_eq!(wb.sheet_count(), 1);
        assert!(wb.table("Data").unwrap().is_empty());
    }

    #[test]
    fn test_bad_shared_string_index() {
        let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>7</v></c></row></sheetData></worksheet>"#;
        let err = XlsxReader::read(Cursor::new(minimal_xlsx(sheet, None))).unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = XlsxReader::read(Cursor::new(b"ID,City\n1,NY\n".to_vec())).unwrap_err();
        assert!(matches!(err, XlsxError::Zip(_)));
    }
}

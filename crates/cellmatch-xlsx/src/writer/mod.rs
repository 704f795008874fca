//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{ValueFormat, XlsxStyleTable, XF_HEADER};
use cellmatch_core::{
    AnnotatedWorkbook, CellAddress, CellValue, DateSystem, HighlightPalette, SheetHighlights,
    Workbook,
};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write an annotated workbook to a file path
    pub fn write_file<P: AsRef<Path>>(
        annotated: &AnnotatedWorkbook,
        palette: &HighlightPalette,
        path: P,
    ) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(annotated, palette, file)
    }

    /// Write an annotated workbook to a writer.
    ///
    /// Each sheet's header lands in row 1 and data row `i` in row `i + 2`;
    /// highlighted data cells get the palette's solid fill. Sheets beyond
    /// Excel's row or column limits are rejected before anything is written.
    pub fn write<W: Write + Seek>(
        annotated: &AnnotatedWorkbook,
        palette: &HighlightPalette,
        writer: W,
    ) -> XlsxResult<()> {
        let workbook = annotated.workbook();
        for sheet in workbook.sheets() {
            let table = sheet.table();
            if table.width() > 0 {
                CellAddress::from_indices(table.row_count(), table.width() - 1)?;
            }
        }

        let mut zip = zip::ZipWriter::new(writer);
        let style_table = XlsxStyleTable::new(*palette);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for index in 0..workbook.sheet_count() {
            let highlights = annotated
                .highlights(index)
                .ok_or_else(|| XlsxError::InvalidFormat("Sheet highlights not found".into()))?;
            Self::write_worksheet(&mut zip, workbook, index, highlights, &style_table)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Write a workbook without highlights
    pub fn write_workbook<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let plain = AnnotatedWorkbook::unmarked(workbook.clone());
        Self::write(&plain, &HighlightPalette::default(), writer)
    }

    /// Write a workbook without highlights to a file path
    pub fn write_workbook_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write_workbook(workbook, file)
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, sheet) in workbook.sheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship follows the sheets
        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(style_table.to_styles_xml().as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        index: usize,
        highlights: &SheetHighlights,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let sheet = workbook
            .sheet(index)
            .ok_or_else(|| XlsxError::InvalidFormat("Sheet not found".into()))?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <sheetData>"#,
        );

        for (sheet_row, cells) in sheet.table().sheet_rows().enumerate() {
            let mut row_xml = String::new();
            for (col, value) in cells.iter().enumerate() {
                let addr = CellAddress::from_indices(sheet_row, col)?;
                if sheet_row == 0 {
                    write_header_cell(&mut row_xml, &addr, value);
                } else {
                    let highlight = highlights.get(sheet_row - 1, col);
                    let xf_id = style_table.xf_id_for(highlight, ValueFormat::of(value));
                    write_cell(&mut row_xml, &addr, value, xf_id);
                }
            }

            if !row_xml.is_empty() {
                content.push_str(&format!("\n        <row r=\"{}\">", sheet_row + 1));
                content.push_str(&row_xml);
                content.push_str("\n        </row>");
            }
        }

        content.push_str("\n    </sheetData>\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Header cells are bold; timestamps there are written as text
fn write_header_cell(content: &mut String, addr: &CellAddress, value: &CellValue) {
    match value {
        CellValue::DateTime(_) => write_inline_string(
            content,
            &addr.to_a1_string(),
            &format!(" s=\"{}\"", XF_HEADER),
            &value.to_string(),
        ),
        _ => write_cell(content, addr, value, XF_HEADER),
    }
}

fn write_cell(content: &mut String, addr: &CellAddress, value: &CellValue, xf_id: u32) {
    let cell_ref = addr.to_a1_string();
    let style_attr = if xf_id != 0 {
        format!(" s=\"{}\"", xf_id)
    } else {
        String::new()
    };

    match value {
        CellValue::Number(n) if n.is_finite() => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{}><v>{}</v></c>",
                cell_ref, style_attr, n
            ));
        }
        CellValue::Number(n) => write_inline_string(content, &cell_ref, &style_attr, &n.to_string()),
        CellValue::DateTime(dt) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{}><v>{}</v></c>",
                cell_ref,
                style_attr,
                DateSystem::Excel1900.to_serial(*dt)
            ));
        }
        CellValue::String(s) => write_inline_string(content, &cell_ref, &style_attr, s),
        CellValue::Boolean(b) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                if *b { 1 } else { 0 }
            ));
        }
        CellValue::Error(e) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"e\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                escape_xml(e.as_str())
            ));
        }
        CellValue::Empty => {}
    }
}

fn write_inline_string(content: &mut String, cell_ref: &str, style_attr: &str, s: &str) {
    let space = if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        " xml:space=\"preserve\""
    } else {
        ""
    };
    content.push_str(&format!(
        "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
        cell_ref,
        style_attr,
        space,
        escape_xml(&encode_excel_escapes(s))
    ));
}

/// Encode characters XML cannot carry as Excel `_xHHHH_` sequences.
///
/// Literal text that already looks like an escape has its underscore
/// encoded so it reads back unchanged.
fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, ch) in s.char_indices() {
        let looks_escaped = ch == '_'
            && s[i..].len() >= 7
            && s.as_bytes()[i + 1] == b'x'
            && s.as_bytes()[i + 6] == b'_'
            && s.as_bytes()[i + 2..i + 6].iter().all(u8::is_ascii_hexdigit);

        if looks_escaped {
            result.push_str("_x005F_");
        } else if (ch.is_control() && ch != '\t' && ch != '\n') || ch == '\u{FFFE}' || ch == '\u{FFFF}' {
            result.push_str(&format!("_x{:04X}_", ch as u32));
        } else {
            result.push(ch);
        }
    }
    result
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_excel_escapes() {
        assert_eq!(encode_excel_escapes("a\rb"), "a_x000D_b");
        assert_eq!(encode_excel_escapes("tab\there\n"), "tab\there\n");
        assert_eq!(encode_excel_escapes("_x000d_"), "_x005F_x000d_");
        assert_eq!(encode_excel_escapes("snake_x_case"), "snake_x_case");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("R&D <\"x\">"), "R&amp;D &lt;&quot;x&quot;&gt;");
    }

    #[test]
    fn test_write_cell_styles() {
        let mut out = String::new();
        write_cell(&mut out, &CellAddress::new(1, 0), &CellValue::Number(100.0), 2);
        write_cell(&mut out, &CellAddress::new(1, 1), &CellValue::Empty, 0);
        write_cell(&mut out, &CellAddress::new(1, 2), &CellValue::from(" pad"), 0);
        assert!(out.contains(r#"<c r="A2" s="2"><v>100</v></c>"#));
        assert!(!out.contains("B2"));
        assert!(out.contains(r#"<t xml:space="preserve"> pad</t>"#));
    }

    #[test]
    fn test_write_datetime_cells() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let mut out = String::new();
        write_cell(&mut out, &CellAddress::new(1, 0), &CellValue::DateTime(dt), 4);
        write_header_cell(&mut out, &CellAddress::new(0, 1), &CellValue::DateTime(dt));
        assert!(out.contains(r#"<c r="A2" s="4"><v>45292.5</v></c>"#));
        assert!(out.contains(r#"<c r="B1" s="3" t="inlineStr"><is><t>2024-01-01 12:00:00</t></is></c>"#));
    }

    #[test]
    fn test_oversize_sheets_are_rejected() {
        use cellmatch_core::{Error, Table};
        use std::io::Cursor;

        let wide = Workbook::new()
            .with_sheet("Wide", Table::new((0..16_385).map(|i| i.to_string())))
            .unwrap();
        let mut buf = Cursor::new(Vec::new());
        let err = XlsxWriter::write_workbook(&wide, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            XlsxError::Core(Error::ColumnOutOfBounds(16_384, 16_383))
        ));
        assert!(buf.get_ref().is_empty());

        let full = Workbook::new()
            .with_sheet("Full", Table::new((0..16_384).map(|i| i.to_string())))
            .unwrap();
        assert!(XlsxWriter::write_workbook(&full, Cursor::new(Vec::new())).is_ok());
    }

    #[test]
    fn test_header_and_marks_use_expected_styles() {
        use cellmatch_core::{annotate, Highlight, Table};
        use std::io::Cursor;

        let left = Workbook::new()
            .with_sheet("S", Table::from_columns(vec![("v", vec![7.into(), "k".into()])]))
            .unwrap();
        let right = left.clone();
        let (annotated, _) = annotate(&left, &right);
        assert_eq!(annotated.highlight_at("S", 0, 0), Highlight::Numeric);

        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(&annotated, &HighlightPalette::default(), &mut buf).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buf.into_inner())).unwrap();
        let mut sheet = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
            &mut sheet,
        )
        .unwrap();
        assert!(sheet.contains(r#"<c r="A1" s="3" t="inlineStr"><is><t>v</t></is></c>"#));
        assert!(sheet.contains(r#"<c r="A2" s="2"><v>7</v></c>"#));
        assert!(sheet.contains(r#"<c r="A3" s="1" t="inlineStr"><is><t>k</t></is></c>"#));
    }
}

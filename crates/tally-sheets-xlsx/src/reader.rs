//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use tally_sheets_core::{CellAddress, CellValue, Workbook, Worksheet};

/// XLSX file reader
///
/// Reads the parts [`crate::XlsxWriter`] produces, plus a shared-strings
/// table when one is present so files written by other producers load too.
/// Non-integral numerics truncate toward zero; cells this engine cannot
/// represent (unknown cell types, non-numeric `<v>` content) are skipped
/// with a warning rather than failing the whole load.
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            if let Some(path) = sheet_paths.get(r_id) {
                let sheet_idx = workbook.add_worksheet_with_name(name)?;
                if let Some(sheet) = workbook.worksheet_mut(sheet_idx) {
                    Self::read_worksheet(&mut archive, path, sheet, &shared_strings)?;
                }
            }
        }

        // Ensure at least one sheet exists
        if workbook.sheet_count() == 0 {
            workbook.add_worksheet_with_name("Sheet1")?;
        }

        Ok(workbook)
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

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"t" if in_si => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current_string));
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut r_id = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"r:id" => {
                                r_id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Target" => {
                                target = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"Type" => {
                                rel_type = attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ unless absolute
                            let full_path = match target.strip_prefix('/') {
                                Some(stripped) => stripped.to_string(),
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

    /// Read a worksheet part into the sheet's cell store
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();

        // Current cell state
        let mut current_cell_ref: Option<String> = None;
        let mut current_cell_type: Option<String> = None;
        let mut current_value: Option<String> = None;
        let mut current_formula: Option<String> = None;
        let mut in_cell = false;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_text = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"c" => {
                    in_cell = true;
                    current_cell_ref = None;
                    current_cell_type = None;
                    current_value = None;
                    current_formula = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"r" => {
                                current_cell_ref =
                                    attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            b"t" => {
                                current_cell_type =
                                    attr.unescape_value().ok().map(|s| s.to_string());
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::Start(e)) if in_cell => match e.name().as_ref() {
                    b"v" => in_value = true,
                    b"f" => in_formula = true,
                    b"t" => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_cell => {
                    if let Ok(text) = e.unescape() {
                        if in_value || in_inline_text {
                            current_value
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        } else if in_formula {
                            current_formula
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"t" => in_inline_text = false,
                    b"c" => {
                        Self::store_cell(
                            worksheet,
                            current_cell_ref.take(),
                            current_cell_type.take(),
                            current_value.take(),
                            current_formula.take(),
                            shared_strings,
                        );
                        in_cell = false;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }

    fn store_cell(
        worksheet: &mut Worksheet,
        cell_ref: Option<String>,
        cell_type: Option<String>,
        value: Option<String>,
        formula: Option<String>,
        shared_strings: &[String],
    ) {
        let Some(cell_ref) = cell_ref else {
            return;
        };

        let addr = match CellAddress::parse(&cell_ref) {
            Ok(addr) => addr,
            Err(_) => {
                log::warn!("skipping cell with unsupported reference '{}'", cell_ref);
                return;
            }
        };

        // A formula wins over any cached value the producer wrote next to it
        if let Some(text) = formula {
            worksheet.set_cell_formula_at(addr, &text);
            return;
        }

        let Some(raw) = value else {
            return;
        };

        let cell_value = match cell_type.as_deref() {
            Some("s") => match raw.parse::<usize>().ok().and_then(|i| shared_strings.get(i)) {
                Some(s) => CellValue::text(s.clone()),
                None => {
                    log::warn!("skipping cell {} with bad shared-string index", cell_ref);
                    return;
                }
            },
            Some("inlineStr") | Some("str") => CellValue::text(raw),
            // Non-integral numerics from other producers truncate toward zero
            None | Some("n") => match raw.parse::<i64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => match raw.parse::<f64>() {
                    Ok(f) if f.is_finite() => CellValue::Number(f.trunc() as i64),
                    _ => {
                        log::warn!(
                            "skipping cell {} with non-numeric value '{}'",
                            cell_ref,
                            raw
                        );
                        return;
                    }
                },
            },
            Some(other) => {
                log::warn!("skipping cell {} with unsupported type '{}'", cell_ref, other);
                return;
            }
        };

        worksheet.set_cell_value_at(addr, cell_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::XlsxWriter;
    use std::io::Cursor;

    fn roundtrip(workbook: &Workbook) -> Workbook {
        let mut buf = Cursor::new(Vec::new());
        XlsxWriter::write(workbook, &mut buf).unwrap();
        buf.set_position(0);
        XlsxReader::read(buf).unwrap()
    }

    #[test]
    fn test_rejects_non_xlsx_input() {
        let buf = Cursor::new(b"not a zip file".to_vec());
        assert!(XlsxReader::read(buf).is_err());
    }

    #[test]
    fn test_roundtrip_preserves_cells() {
        let mut workbook = Workbook::new();
        let sheet = workbook.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", 13).unwrap();
        sheet.set_cell_value("A2", 14).unwrap();
        sheet.set_cell_value("B1", "note <&>").unwrap();
        sheet.set_cell_formula_at(CellAddress::parse("A3").unwrap(), "A1+A2");

        let loaded = roundtrip(&workbook);
        let sheet = loaded.worksheet(0).unwrap();

        assert_eq!(sheet.cell("A1").unwrap(), Some(&CellValue::Number(13)));
        assert_eq!(sheet.cell("A2").unwrap(), Some(&CellValue::Number(14)));
        assert_eq!(sheet.cell("B1").unwrap(), Some(&CellValue::text("note <&>")));
        assert_eq!(
            sheet.cell("A3").unwrap().and_then(|v| v.formula_text()),
            Some("A1+A2")
        );
    }

    #[test]
    fn test_roundtrip_preserves_sheet_names() {
        let mut workbook = Workbook::empty();
        workbook.add_worksheet_with_name("Budget").unwrap();
        workbook.add_worksheet_with_name("Totals").unwrap();

        let loaded = roundtrip(&workbook);
        assert_eq!(loaded.sheet_count(), 2);
        assert_eq!(loaded.worksheet(0).unwrap().name(), "Budget");
        assert_eq!(loaded.worksheet(1).unwrap().name(), "Totals");
    }

    #[test]
    fn test_shared_strings_resolved() {
        // Hand-built package in the shared-strings shape other producers use
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#).unwrap();

            zip.start_file("_rels/.rels", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="1" uniqueCount="1"><si><t>hello</t></si></sst>"#).unwrap();

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData></worksheet>"#).unwrap();

            zip.finish().unwrap();
        }
        buf.set_position(0);

        let workbook = XlsxReader::read(buf).unwrap();
        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.cell("A1").unwrap(), Some(&CellValue::text("hello")));
    }

    #[test]
    fn test_foreign_numerics_truncate_and_unrepresentable_cells_skip() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            // A1/E1 are floats, B1 a boolean, C1 an integer, D1 not a number
            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            std::io::Write::write_all(&mut zip, br#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1"><v>1.5</v></c><c r="E1"><v>-2.7</v></c><c r="B1" t="b"><v>1</v></c><c r="C1"><v>7</v></c><c r="D1"><v>oops</v></c></row></sheetData></worksheet>"#).unwrap();

            zip.finish().unwrap();
        }
        buf.set_position(0);

        let workbook = XlsxReader::read(buf).unwrap();
        let sheet = workbook.worksheet(0).unwrap();
        // Non-integral numerics truncate toward zero
        assert_eq!(sheet.cell("A1").unwrap(), Some(&CellValue::Number(1)));
        assert_eq!(sheet.cell("E1").unwrap(), Some(&CellValue::Number(-2)));
        assert_eq!(sheet.cell("B1").unwrap(), None);
        assert_eq!(sheet.cell("C1").unwrap(), Some(&CellValue::Number(7)));
        assert_eq!(sheet.cell("D1").unwrap(), None);
    }
}

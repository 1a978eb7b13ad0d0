//! # XLSX Rendering
//!
//! Writes a minimal SpreadsheetML package: one "Test Cases" worksheet with
//! inline-string cells, fixed column widths and a wrap-text style for the
//! multi-line steps column.

use std::io::{Cursor, Write};

use storybridge_core::GenerateResponse;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::ExportError;

const SHEET_NAME: &str = "Test Cases";

const HEADERS: [&str; 8] = [
  "Test Case ID",
  "Title",
  "Category",
  "Expected Result",
  "Steps",
  "Test Data",
  "Prompt Tokens",
  "Completion Tokens",
];

const COLUMN_WIDTHS: [u32; 8] = [12, 25, 15, 30, 40, 20, 15, 18];

const STEPS_COLUMN: usize = 4;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment wrapText="1" vertical="top"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

const STYLE_HEADER: u8 = 1;
const STYLE_WRAP: u8 = 2;

enum Cell<'a> {
  Text(&'a str),
  Number(u64),
}

/// Render `response` as an XLSX workbook
pub fn to_xlsx(response: &GenerateResponse) -> Result<Vec<u8>, ExportError> {
  let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  let parts = [
    ("[Content_Types].xml", CONTENT_TYPES.to_string()),
    ("_rels/.rels", ROOT_RELS.to_string()),
    ("xl/workbook.xml", workbook_xml()),
    ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
    ("xl/styles.xml", STYLES.to_string()),
    ("xl/worksheets/sheet1.xml", sheet_xml(response)),
  ];

  for (name, content) in parts {
    zip.start_file(name, options)?;
    zip
      .write_all(content.as_bytes())
      .map_err(|e| ExportError::Zip(e.into()))?;
  }

  Ok(zip.finish()?.into_inner())
}

fn workbook_xml() -> String {
  format!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
    escape_xml(SHEET_NAME)
  )
}

fn sheet_xml(response: &GenerateResponse) -> String {
  let mut xml = String::from(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cols>"#,
  );
  for (index, width) in COLUMN_WIDTHS.iter().enumerate() {
    let col = index + 1;
    xml.push_str(&format!(r#"<col min="{col}" max="{col}" width="{width}" customWidth="1"/>"#));
  }
  xml.push_str("</cols><sheetData>");

  let header: Vec<Cell<'_>> = HEADERS.iter().map(|title| Cell::Text(title)).collect();
  push_row(&mut xml, 1, &header, |_| STYLE_HEADER);

  for (index, case) in response.cases.iter().enumerate() {
    let steps = case.steps.join("\n");
    let cells = [
      Cell::Text(&case.id),
      Cell::Text(&case.title),
      Cell::Text(&case.category),
      Cell::Text(&case.expected_result),
      Cell::Text(&steps),
      Cell::Text(case.test_data.as_deref().unwrap_or_default()),
      Cell::Number(response.prompt_tokens),
      Cell::Number(response.completion_tokens),
    ];
    push_row(&mut xml, index + 2, &cells, |col| {
      if col == STEPS_COLUMN { STYLE_WRAP } else { 0 }
    });
  }

  xml.push_str("</sheetData></worksheet>");
  xml
}

fn push_row(xml: &mut String, row: usize, cells: &[Cell<'_>], style: impl Fn(usize) -> u8) {
  xml.push_str(&format!(r#"<row r="{row}">"#));
  for (col, cell) in cells.iter().enumerate() {
    let reference = cell_ref(col, row);
    let style_attr = match style(col) {
      0 => String::new(),
      s => format!(r#" s="{s}""#),
    };
    match cell {
      Cell::Text(text) => xml.push_str(&format!(
        r#"<c r="{reference}"{style_attr} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        escape_xml(text)
      )),
      Cell::Number(value) => xml.push_str(&format!(r#"<c r="{reference}"{style_attr}><v>{value}</v></c>"#)),
    }
  }
  xml.push_str("</row>");
}

/// A1-style reference for a zero-based column and one-based row
fn cell_ref(col: usize, row: usize) -> String {
  let mut letters = Vec::new();
  let mut n = col + 1;
  while n > 0 {
    let rem = (n - 1) % 26;
    letters.push(char::from(b'A' + rem as u8));
    n = (n - 1) / 26;
  }
  letters.iter().rev().collect::<String>() + &row.to_string()
}

/// Escape markup characters and drop control characters XML 1.0 cannot carry
fn escape_xml(text: &str) -> String {
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

#[cfg(test)]
mod tests {
  use std::io::Read;

  use zip::ZipArchive;

  use super::*;
  use crate::fixtures;

  fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut content = String::new();
    part.read_to_string(&mut content).unwrap();
    content
  }

  #[test]
  fn test_package_parts() {
    let bytes = to_xlsx(&fixtures::response()).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();

    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
      names,
      vec![
        "[Content_Types].xml",
        "_rels/.rels",
        "xl/_rels/workbook.xml.rels",
        "xl/styles.xml",
        "xl/workbook.xml",
        "xl/worksheets/sheet1.xml",
      ]
    );
    assert!(read_part(&bytes, "xl/workbook.xml").contains(r#"<sheet name="Test Cases""#));
  }

  #[test]
  fn test_sheet_contents() {
    let bytes = to_xlsx(&fixtures::response()).unwrap();
    let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

    assert!(sheet.contains(r#"<col min="1" max="1" width="12" customWidth="1"/>"#));
    assert!(sheet.contains(r#"<col min="5" max="5" width="40" customWidth="1"/>"#));
    assert!(sheet.contains(r#"<col min="8" max="8" width="18" customWidth="1"/>"#));

    assert!(sheet.contains(
      r#"<c r="H1" s="1" t="inlineStr"><is><t xml:space="preserve">Completion Tokens</t></is></c>"#
    ));
    assert!(sheet.contains(
      r#"<c r="E2" s="2" t="inlineStr"><is><t xml:space="preserve">Open the login page
Submit valid credentials</t></is></c>"#
    ));
    assert!(sheet.contains(r#"<c r="G2"><v>120</v></c>"#));
    assert!(sheet.contains(r#"<c r="H3"><v>340</v></c>"#));
    assert!(sheet.contains("Enter a &lt;wrong&gt; password &amp; submit"));
    assert!(sheet.contains(r#"<c r="F3" t="inlineStr"><is><t xml:space="preserve"></t></is></c>"#));
  }

  #[test]
  fn test_cell_ref() {
    assert_eq!(cell_ref(0, 1), "A1");
    assert_eq!(cell_ref(7, 12), "H12");
    assert_eq!(cell_ref(25, 1), "Z1");
    assert_eq!(cell_ref(26, 3), "AA3");
  }

  #[test]
  fn test_escape_xml() {
    assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    assert_eq!(escape_xml("bell\u{7}\tok"), "bell\tok");
  }
}

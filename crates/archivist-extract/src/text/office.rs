//! Office Open XML extraction tier: xlsx/xls, pptx/ppt, docx/doc (spec
//! §4.4). Office documents are zip archives of XML parts; this module
//! walks the relevant parts with `zip` + `quick-xml` rather than pulling
//! in a full office-document crate, since only linear text extraction is
//! required (no formatting/formula fidelity).

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::{Cursor, Read};

/// Concatenate paragraph text in document order (spec §4.4 docx/doc row).
pub fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = open_zip(bytes)?;
    let xml = read_part(&mut archive, "word/document.xml")?;
    Ok(extract_text_elements(&xml, "w:t"))
}

/// Concatenate every shape's text on every slide, in slide order (spec
/// §4.4 pptx/ppt row).
pub fn extract_pptx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = open_zip(bytes)?;
    let mut slide_names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(|n| n.to_string())
        .collect();
    slide_names.sort_by_key(|n| slide_index(n));

    let mut out = Vec::new();
    for name in slide_names {
        let xml = read_part(&mut archive, &name)?;
        let text = extract_text_elements(&xml, "a:t");
        if !text.trim().is_empty() {
            out.push(text);
        }
    }
    Ok(out.join("\n"))
}

fn slide_index(name: &str) -> u32 {
    name.trim_start_matches("ppt/slides/slide")
        .trim_end_matches(".xml")
        .parse()
        .unwrap_or(0)
}

/// Per sheet, emit "Sheet: <name>" then "v1 | v2 | ..." per non-empty
/// row (spec §4.4 xlsx/xls row).
pub fn extract_xlsx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = open_zip(bytes)?;

    let shared_strings = read_part(&mut archive, "xl/sharedStrings.xml")
        .ok()
        .map(|xml| parse_shared_strings(&xml))
        .unwrap_or_default();

    let workbook_xml = read_part(&mut archive, "xl/workbook.xml").unwrap_or_default();
    let sheet_names = parse_sheet_names(&workbook_xml);

    let mut sheet_files: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/sheet") && n.ends_with(".xml"))
        .map(|n| n.to_string())
        .collect();
    sheet_files.sort_by_key(|n| slide_index(&n.replace("xl/worksheets/sheet", "ppt/slides/slide")));

    let mut sections = Vec::new();
    for (i, file) in sheet_files.iter().enumerate() {
        let xml = read_part(&mut archive, file)?;
        let name = sheet_names.get(i).cloned().unwrap_or_else(|| format!("Sheet{}", i + 1));
        let rows = parse_sheet_rows(&xml, &shared_strings);
        let mut section = format!("Sheet: {name}");
        for row in rows {
            if row.iter().any(|c| !c.trim().is_empty()) {
                section.push('\n');
                section.push_str(&row.join(" | "));
            }
        }
        sections.push(section);
    }
    Ok(sections.join("\n\n"))
}

fn open_zip(bytes: &[u8]) -> Result<zip::ZipArchive<Cursor<&[u8]>>, String> {
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())
}

fn read_part(archive: &mut zip::ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, String> {
    let mut file = archive.by_name(name).map_err(|e| e.to_string())?;
    let mut buf = String::new();
    file.read_to_string(&mut buf).map_err(|e| e.to_string())?;
    Ok(buf)
}

/// Extract the text content of every `<local_name>` element, in document
/// order, joined by single spaces.
fn extract_text_elements(xml: &str, local_name: &str) -> String {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut inside = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if tag_matches(e.name().as_ref(), local_name) => inside = true,
            Ok(Event::End(e)) if tag_matches(e.name().as_ref(), local_name) => inside = false,
            Ok(Event::Text(t)) if inside => {
                if let Ok(text) = t.decode() {
                    out.push(text.into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    out.join(" ")
}

fn tag_matches(name: &[u8], local_name: &str) -> bool {
    let name = String::from_utf8_lossy(name);
    name == local_name || name.ends_with(&format!(":{local_name}"))
}

fn parse_shared_strings(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"si" => {
                in_si = true;
                current.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"si" => {
                in_si = false;
                strings.push(current.clone());
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => in_t = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"t" => in_t = false,
            Ok(Event::Text(t)) if in_si && in_t => {
                if let Ok(text) = t.decode() {
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    strings
}

fn parse_sheet_names(workbook_xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(workbook_xml);
    let mut buf = Vec::new();
    let mut names = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"name" {
                        if let Ok(v) = attr.decode_and_unescape_value(reader.decoder()) {
                            names.push(v.into_owned());
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    names
}

fn parse_sheet_rows(xml: &str, shared: &[String]) -> Vec<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_cell_is_shared = false;
    let mut current_text = String::new();
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"row" => current_row.clear(),
            Ok(Event::End(e)) if e.name().as_ref() == b"row" => {
                rows.push(std::mem::take(&mut current_row));
            }
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"c" => {
                current_cell_is_shared = e
                    .attributes()
                    .flatten()
                    .any(|a| a.key.as_ref() == b"t" && a.value.as_ref() == b"s");
                current_text.clear();
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"v" => in_value = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"v" => {
                in_value = false;
                let resolved = if current_cell_is_shared {
                    current_text
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| shared.get(i).cloned())
                        .unwrap_or_default()
                } else {
                    current_text.clone()
                };
                current_row.push(resolved);
                current_text.clear();
            }
            Ok(Event::Text(t)) if in_value => {
                if let Ok(text) = t.decode() {
                    current_text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_handles_namespaces() {
        assert!(tag_matches(b"w:t", "w:t"));
        assert!(tag_matches(b"t", "t"));
        assert!(!tag_matches(b"w:p", "w:t"));
    }
}

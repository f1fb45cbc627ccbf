//! `text/plain`, `csv`, `json` extraction tier (spec §4.4).

pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Emit "Row N: v1 | v2 | ..." lines (spec §4.4).
pub fn extract_csv(bytes: &[u8]) -> String {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut lines = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let Ok(record) = record else { continue };
        let row: Vec<&str> = record.iter().collect();
        lines.push(format!("Row {}: {}", i + 1, row.join(" | ")));
    }
    lines.join("\n")
}

pub fn extract_json(bytes: &[u8]) -> String {
    decode_lossy(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_numbered_and_pipe_joined() {
        let csv = b"a,b,c\n1,2,3\n";
        let text = extract_csv(csv);
        assert_eq!(text, "Row 1: a | b | c\nRow 2: 1 | 2 | 3");
    }
}

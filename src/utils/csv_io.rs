//! CSV reader/writer
//!
//! RFC 4180 subset: comma delimiter, double-quote quoting with `""` escapes,
//! quoted fields may span lines, header row required. UTF-8 only.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::BaseRecord;

/// Quote a field when it contains a delimiter, quote or line break
pub fn escape_field(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One CSV line (without terminator)
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split CSV text into rows of fields
pub fn parse_rows(text: &str) -> AppResult<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                line += 1;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::malformed_csv(line, "unterminated quoted field"));
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    // Blank lines carry no record
    rows.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(rows)
}

/// Parse CSV text with a header into keyed records
pub fn parse_records(text: &str) -> AppResult<Vec<BaseRecord>> {
    let mut rows = parse_rows(text)?.into_iter();
    let header = match rows.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };

    rows.enumerate()
        .map(|(i, row)| {
            if row.len() != header.len() {
                return Err(AppError::malformed_csv(
                    i + 2,
                    format!("expected {} fields, found {}", header.len(), row.len()),
                ));
            }
            Ok(header.iter().cloned().zip(row).collect::<BaseRecord>())
        })
        .collect()
}

/// Read a CSV file. `Ok(None)` when the file does not exist.
pub fn read_records(path: &Path) -> AppResult<Option<Vec<BaseRecord>>> {
    match fs::read_to_string(path) {
        Ok(text) => parse_records(&text).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::with_source(
            ErrorCode::IoFailure,
            format!("cannot read {}", path.display()),
            e,
        )),
    }
}

/// Write a header plus rows, creating parent directories as needed
pub fn write_rows<H, R>(path: &Path, header: &[H], rows: R) -> AppResult<usize>
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<String>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", format_row(header))?;

    let mut written = 0;
    for row in rows {
        writeln!(out, "{}", format_row(row.as_slice()))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let text = "full_name,phone_number\n\"Hasan, S.Pd\",0812\n\"multi\nline\",\"+62 \"\"x\"\"\"\n";
        let rows = parse_rows(text).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["Hasan, S.Pd", "0812"]);
        assert_eq!(rows[2], vec!["multi\nline", "+62 \"x\""]);
    }

    #[test]
    fn test_parse_records_crlf_and_bom() {
        let text = "\u{feff}full_name,phone_number\r\nAyu Lestari,081234\r\n\r\n";
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("full_name"), Some("Ayu Lestari"));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let err = parse_records("a,b\n1\n").unwrap_err();
        assert_eq!(err.code_str(), "DATA_MALFORMED_CSV");
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_rows("a\n\"open").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(&dir.path().join("absent.csv")).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let n = write_rows(
            &path,
            &["full_name", "note"],
            vec![vec!["Budi".to_string(), "a, \"b\"".to_string()]],
        )
        .unwrap();
        assert_eq!(n, 1);
        let records = read_records(&path).unwrap().unwrap();
        assert_eq!(records[0].get("note"), Some("a, \"b\""));
    }
}

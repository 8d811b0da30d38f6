use crate::error::ImportError;
use common::model::import::{ParseIssue, RawRow};

/// An uploaded CSV split into its header and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// A data row and the row it occupies when the file is opened in a
/// spreadsheet editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub number: usize,
    pub cells: RawRow,
}

/// Parses CSV text with a header row.
///
/// Blank lines are skipped and empty cells become `None`. Every row must have
/// as many fields as the header; all offending rows are reported together and
/// nothing is returned for a file with any structural problem.
///
/// Row numbers count skipped blank lines, while a quoted cell spanning several
/// lines stays a single row.
pub fn parse_table(bytes: &[u8]) -> Result<ParsedTable, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ImportError::MalformedInput(vec![ParseIssue {
            line: None,
            message: format!("file is not valid UTF-8: {e}"),
        }])
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::MalformedInput(vec![issue(&e)]))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut folded_lines = embedded_line_breaks(headers.iter().map(String::as_str));
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::MalformedInput(vec![ParseIssue {
            line: Some(1),
            message: "missing header row".to_string(),
        }]));
    }

    let mut rows: Vec<TableRow> = Vec::new();
    let mut issues = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                let number = match record.position() {
                    Some(pos) => (pos.line() as usize).saturating_sub(folded_lines),
                    None => rows.last().map_or(2, |r| r.number + 1),
                };
                folded_lines += embedded_line_breaks(record.iter());
                let cells = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, value)| {
                        let value = (!value.is_empty()).then(|| value.to_string());
                        (header.as_str(), value)
                    })
                    .collect();
                rows.push(TableRow { number, cells });
            }
            Err(e) => issues.push(issue(&e)),
        }
    }

    if issues.is_empty() {
        Ok(ParsedTable { headers, rows })
    } else {
        Err(ImportError::MalformedInput(issues))
    }
}

/// Line breaks inside quoted cells, which a spreadsheet folds into one row.
fn embedded_line_breaks<'a>(fields: impl Iterator<Item = &'a str>) -> usize {
    fields.map(|f| f.matches('\n').count()).sum()
}

fn issue(err: &csv::Error) -> ParseIssue {
    let line = match err.kind() {
        csv::ErrorKind::UnequalLengths { pos, .. } => pos.as_ref().map(|p| p.line()),
        _ => err.position().map(|p| p.line()),
    };
    ParseIssue {
        line,
        message: err.to_string(),
    }
}

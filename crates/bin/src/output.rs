//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use treepack::backend::Payload;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Short human-readable rendering of a leaf payload.
pub fn describe_payload(payload: &Payload) -> String {
    match payload {
        Payload::Empty => "(empty)".to_string(),
        Payload::Bool(b) => b.to_string(),
        Payload::Int(n) => n.to_string(),
        Payload::Float(x) => x.to_string(),
        Payload::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => format!("{text:?}"),
            Err(_) => format!("<{} bytes>", bytes.len()),
        },
        Payload::Array(buffer) => format!("{}{:?}", buffer.dtype, buffer.shape),
    }
}

//! Output formatting utilities for CLI commands

use std::io::{self, Write};

/// Print a status message on stderr unless `quiet`.
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write command output to stdout.
pub fn write_output(content: &str) -> Result<(), String> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| format!("Failed to write to stdout: {}", e))
}

/// Left-align `cells` into columns of the given widths.
pub fn table_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(0);
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{:<width$}  ", cell, width = width));
        }
    }
    line.push('\n');
    line
}

//! CSV and markdown transcript exports.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use runtime::{Part, Session, Table, Turn};
use std::fmt::Write;
use std::path::Path;

/// Write `table` as CSV to `path`.
pub fn csv(table: &Table, path: &Path) -> Result<()> {
    write_file(path, &table.to_csv())
}

/// Write the session's committed conversation as markdown to `path`.
pub fn transcript(session: &Session, path: &Path) -> Result<()> {
    write_file(path, &render_transcript(session, Local::now()))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })
}

pub fn render_transcript(session: &Session, at: DateTime<Local>) -> String {
    let mut out = format!(
        "# Beacon session {}\n\nExported {}\n",
        session.id,
        at.format("%Y-%m-%d %H:%M")
    );
    for turn in session.conversation().turns() {
        match turn {
            Turn::User { text } => {
                let _ = write!(out, "\n## {text}\n");
            }
            Turn::Assistant { parts } => {
                for part in parts {
                    match part {
                        Part::Text { text } if !text.trim().is_empty() => {
                            let _ = write!(out, "\n{text}\n");
                        }
                        Part::Text { .. } => {}
                        Part::ToolCall(call) => {
                            let _ = write!(out, "\n> `{}` {}\n", call.name, call.input);
                        }
                    }
                }
            }
            Turn::ToolResults { results } => {
                for result in results {
                    if let Some(message) = result.message() {
                        let _ = write!(out, "\n> error: {message}\n");
                    }
                }
            }
        }
    }
    let stats = session.stats();
    let _ = write!(
        out,
        "\n---\n\n{} questions, {} tools used\n",
        stats.queries,
        stats.tools_used.len()
    );
    out
}

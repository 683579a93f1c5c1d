//! Tabular view of a tool's `data` rows.

use serde::Serialize;
use serde_json::Value;

/// Uniform rows with a shared column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from object rows that all share one key set.
    ///
    /// Columns follow the first row's key order. Returns `None` for empty
    /// input, rows without keys, non-object rows or rows with differing keys.
    pub fn from_rows(data: &Value) -> Option<Self> {
        let items = match data {
            Value::Array(items) if !items.is_empty() => items.as_slice(),
            Value::Object(_) => std::slice::from_ref(data),
            _ => return None,
        };
        let first = items.first()?.as_object()?;
        if first.is_empty() {
            return None;
        }
        let columns: Vec<String> = first.keys().cloned().collect();

        let rows = items
            .iter()
            .map(|item| {
                let row = item.as_object()?;
                if row.len() != columns.len() {
                    return None;
                }
                columns.iter().map(|c| row.get(c).cloned()).collect()
            })
            .collect::<Option<Vec<Vec<Value>>>>()?;

        Some(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Delimited text with a header line, quoting fields that contain the
    /// separator, a quote or a line break.
    pub fn to_delimited(&self, separator: char) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| quote(c, separator)).collect();
        push_line(&mut out, &header, separator);
        for row in &self.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|v| quote(&cell_text(v), separator))
                .collect();
            push_line(&mut out, &fields, separator);
        }
        out
    }

    pub fn to_csv(&self) -> String {
        self.to_delimited(',')
    }
}

/// Display text of a cell; strings are unquoted, null is empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote(field: &str, separator: char) -> String {
    if field.contains([separator, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_line(out: &mut String, fields: &[String], separator: char) {
    let mut buf = [0u8; 4];
    let sep: &str = separator.encode_utf8(&mut buf);
    out.push_str(&fields.join(sep));
    out.push('\n');
}

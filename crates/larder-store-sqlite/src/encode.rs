//! Helpers between raw CSV cells, SQLite values and the core value types.
//!
//! Column types are never declared up front: each table is created with
//! per-column affinities inferred from the batch being written, the same
//! way a dataframe bulk-insert infers them. Cells bind dynamically; SQLite
//! column affinity does the final coercion.

use larder_core::CellValue;
use rusqlite::types::{Value, ValueRef};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Double-quote an identifier, doubling any embedded quotes. Table and
/// column names come from user CSVs, so they are never interpolated bare.
pub fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

// ─── Affinity inference ──────────────────────────────────────────────────────

/// Column affinity inferred from one batch of raw cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
  Integer,
  Real,
  Text,
}

impl Affinity {
  pub fn sql_type(self) -> &'static str {
    match self {
      Affinity::Integer => "INTEGER",
      Affinity::Real => "REAL",
      Affinity::Text => "TEXT",
    }
  }
}

/// Infer the affinity of column `idx` across the batch: INTEGER if every
/// non-empty cell parses as `i64`, REAL if every non-empty cell parses as
/// `f64`, otherwise TEXT. A column with no non-empty cells is TEXT.
pub fn infer_affinity(rows: &[Vec<String>], idx: usize) -> Affinity {
  let mut seen = false;
  let mut integer = true;
  let mut real = true;

  for row in rows {
    let Some(cell) = row.get(idx) else { continue };
    if cell.is_empty() {
      continue;
    }
    seen = true;
    if integer && cell.parse::<i64>().is_err() {
      integer = false;
    }
    if real && cell.parse::<f64>().is_err() {
      real = false;
    }
    if !real {
      break;
    }
  }

  match (seen, integer, real) {
    (false, _, _) => Affinity::Text,
    (true, true, _) => Affinity::Integer,
    (true, false, true) => Affinity::Real,
    (true, false, false) => Affinity::Text,
  }
}

// ─── Cell binding ────────────────────────────────────────────────────────────

/// Bind one raw CSV cell: empty means NULL, numeric strings bind as
/// numbers, everything else as text.
pub fn bind_cell(cell: &str) -> Value {
  if cell.is_empty() {
    return Value::Null;
  }
  if let Ok(i) = cell.parse::<i64>() {
    return Value::Integer(i);
  }
  if let Ok(f) = cell.parse::<f64>() {
    return Value::Real(f);
  }
  Value::Text(cell.to_owned())
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub fn decode_cell(value: ValueRef<'_>) -> CellValue {
  match value {
    ValueRef::Null => CellValue::Null,
    ValueRef::Integer(i) => CellValue::Integer(i),
    ValueRef::Real(r) => CellValue::Real(r),
    ValueRef::Text(t) => CellValue::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => CellValue::Text(String::from_utf8_lossy(b).into_owned()),
  }
}

pub fn decode_json(value: ValueRef<'_>) -> serde_json::Value {
  match value {
    ValueRef::Null => serde_json::Value::Null,
    ValueRef::Integer(i) => serde_json::Value::from(i),
    ValueRef::Real(r) => serde_json::Number::from_f64(r)
      .map(serde_json::Value::Number)
      .unwrap_or(serde_json::Value::Null),
    ValueRef::Text(t) => {
      serde_json::Value::String(String::from_utf8_lossy(t).into_owned())
    }
    ValueRef::Blob(b) => {
      serde_json::Value::String(String::from_utf8_lossy(b).into_owned())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rows(cells: &[&str]) -> Vec<Vec<String>> {
    cells.iter().map(|c| vec![c.to_string()]).collect()
  }

  #[test]
  fn integer_column() {
    assert_eq!(infer_affinity(&rows(&["1", "2", "", "-3"]), 0), Affinity::Integer);
  }

  #[test]
  fn real_column() {
    assert_eq!(infer_affinity(&rows(&["1", "2.5"]), 0), Affinity::Real);
  }

  #[test]
  fn text_column() {
    assert_eq!(infer_affinity(&rows(&["1", "x"]), 0), Affinity::Text);
  }

  #[test]
  fn all_empty_is_text() {
    assert_eq!(infer_affinity(&rows(&["", ""]), 0), Affinity::Text);
  }

  #[test]
  fn empty_cell_binds_null() {
    assert_eq!(bind_cell(""), Value::Null);
    assert_eq!(bind_cell("12"), Value::Integer(12));
    assert_eq!(bind_cell("1.5"), Value::Real(1.5));
    assert_eq!(bind_cell("LOW"), Value::Text("LOW".into()));
  }

  #[test]
  fn quoting_doubles_embedded_quotes() {
    assert_eq!(quote_ident("plain"), "\"plain\"");
    assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
  }
}

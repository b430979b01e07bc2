//! Tabular value types exchanged between the loader, the store, and the
//! presentation layer.

use std::fmt;

use serde::Serialize;

// ─── RowBatch ────────────────────────────────────────────────────────────────

/// One batch of CSV rows headed for a table write.
///
/// `columns` are the header cells, already whitespace-trimmed by the loader.
/// `rows` hold the raw string cells exactly as they appeared in the source;
/// type inference happens at write time in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<String>>,
}

impl RowBatch {
  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── CellValue ───────────────────────────────────────────────────────────────

/// A single value read back from the store.
///
/// Serialises untagged, so JSON output carries plain numbers, strings and
/// nulls rather than enum wrappers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl fmt::Display for CellValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CellValue::Null => Ok(()),
      CellValue::Integer(i) => write!(f, "{i}"),
      CellValue::Real(r) => write!(f, "{r}"),
      CellValue::Text(t) => f.write_str(t),
    }
  }
}

// ─── Query results ───────────────────────────────────────────────────────────

/// An ordered, column-labelled query result for row-level display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableResult {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<CellValue>>,
}

/// One named dashboard aggregate: a category key plus one JSON mapping per
/// result row.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSection {
  pub category: &'static str,
  pub rows:     Vec<serde_json::Map<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cell_values_serialize_untagged() {
    let cells = vec![
      CellValue::Null,
      CellValue::Integer(42),
      CellValue::Real(1.5),
      CellValue::Text("ok".into()),
    ];
    let json = serde_json::to_string(&cells).unwrap();
    assert_eq!(json, r#"[null,42,1.5,"ok"]"#);
  }

  #[test]
  fn null_displays_empty() {
    assert_eq!(CellValue::Null.to_string(), "");
    assert_eq!(CellValue::Integer(7).to_string(), "7");
  }
}

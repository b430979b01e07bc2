//! The three ingested datasets and their load parameters.
//!
//! Every table in the store corresponds to exactly one [`DatasetKind`].
//! Tables have no declared schema; their shape is whatever the last loaded
//! CSV carried.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// One of the three tabular datasets the dashboard is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
  Households,
  Products,
  Transactions,
}

impl DatasetKind {
  /// All datasets, in bulk-reload order.
  pub const ALL: [DatasetKind; 3] = [
    DatasetKind::Households,
    DatasetKind::Products,
    DatasetKind::Transactions,
  ];

  /// Name of the backing table.
  pub fn table_name(self) -> &'static str {
    match self {
      DatasetKind::Households => "households",
      DatasetKind::Products => "products",
      DatasetKind::Transactions => "transactions",
    }
  }

  /// File name of the bundled CSV used by the bulk reload.
  pub fn bundled_file(self) -> &'static str {
    match self {
      DatasetKind::Households => "400_households.csv",
      DatasetKind::Products => "400_products.csv",
      DatasetKind::Transactions => "400_transactions.csv",
    }
  }

  /// Chunk size for the bulk reload. `None` means the dataset is small
  /// enough to load in a single replace write.
  pub fn chunk_size(self) -> Option<usize> {
    match self {
      DatasetKind::Households => None,
      DatasetKind::Products => Some(1_000),
      DatasetKind::Transactions => Some(5_000),
    }
  }
}

impl fmt::Display for DatasetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table_name())
  }
}

impl FromStr for DatasetKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "households" => Ok(DatasetKind::Households),
      "products" => Ok(DatasetKind::Products),
      "transactions" => Ok(DatasetKind::Transactions),
      other => Err(Error::UnknownDataset(other.to_owned())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_roundtrip() {
    for kind in DatasetKind::ALL {
      assert_eq!(kind.table_name().parse::<DatasetKind>().unwrap(), kind);
    }
  }

  #[test]
  fn parse_rejects_unknown() {
    assert!(matches!(
      "basket".parse::<DatasetKind>(),
      Err(Error::UnknownDataset(_))
    ));
  }

  #[test]
  fn only_households_load_unchunked() {
    assert!(DatasetKind::Households.chunk_size().is_none());
    assert!(DatasetKind::Products.chunk_size().is_some());
    assert!(DatasetKind::Transactions.chunk_size().is_some());
  }
}

/// Data layer: records, labels, loading, and row selection.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset | BatchResult
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────────────────┐
///   │ Dataset / ClassificationOutcome │  rows + labels
///   └─────────────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table   │  LabeledTable: numeric cells + label lookup per row
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  label predicates → row indices
///   └──────────┘
/// ```

pub mod filter;
pub mod label;
pub mod loader;
pub mod model;
pub mod outcome;
pub mod table;

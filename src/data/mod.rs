/// Data layer: table model, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv (UTF-8 or Shift_JIS)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode → parse → check required columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Table + parsed page cells + checklist options
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categories ∧ page ranges → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  BOM-prefixed CSV, generated file name
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod page;

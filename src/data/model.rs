use std::collections::BTreeSet;

use super::page::PageSpec;

// ---------------------------------------------------------------------------
// Table – headers plus rows of raw string cells
// ---------------------------------------------------------------------------

/// A CSV table as read from disk: one header row and string cells.
///
/// Cells are kept exactly as they appear in the file so an export writes
/// back the same text. An empty cell is treated as missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Position of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, `None` when the cell is empty or the row is short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Sorted distinct non-empty values of a column.
    ///
    /// Unknown columns and all-empty columns both yield an empty list.
    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        let Some(col) = self.column_index(column) else {
            return Vec::new();
        };
        let values: BTreeSet<&str> = (0..self.rows.len())
            .filter_map(|row| self.cell(row, col))
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    /// New table containing only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// The first `n` rows, used for previews of rejected files.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Required column names
// ---------------------------------------------------------------------------

/// Header names of the three columns the filter works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub major: String,
    pub minor: String,
    pub page: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            major: "大項目".to_string(),
            minor: "中項目".to_string(),
            page: "ページ".to_string(),
        }
    }
}

impl ColumnNames {
    /// Names in display order.
    pub fn all(&self) -> [&str; 3] {
        [&self.major, &self.minor, &self.page]
    }

    /// Required names absent from `table`, in display order.
    pub fn missing_from(&self, table: &Table) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|name| table.column_index(name).is_none())
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – a validated table with pre-computed filter columns
// ---------------------------------------------------------------------------

/// A table known to carry the required columns, with the checklist options
/// and parsed page cells computed once at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub major_col: usize,
    pub minor_col: usize,
    /// Parsed page cell per row. Derived; never exported.
    pub pages: Vec<PageSpec>,
    /// Sorted distinct major-category values.
    pub major_values: Vec<String>,
    /// Sorted distinct minor-category values.
    pub minor_values: Vec<String>,
}

impl Dataset {
    /// Validate `table` against `columns`.
    ///
    /// On failure the missing names are returned together with the table so
    /// the caller can still show it.
    pub fn from_table(table: Table, columns: &ColumnNames) -> Result<Self, (Vec<String>, Table)> {
        let (Some(major_col), Some(minor_col), Some(page_col)) = (
            table.column_index(&columns.major),
            table.column_index(&columns.minor),
            table.column_index(&columns.page),
        ) else {
            return Err((columns.missing_from(&table), table));
        };

        let pages = (0..table.len())
            .map(|row| PageSpec::parse(table.cell(row, page_col)))
            .collect();
        let major_values = table.distinct_values(&columns.major);
        let minor_values = table.distinct_values(&columns.minor);

        Ok(Dataset {
            table,
            major_col,
            minor_col,
            pages,
            major_values,
            minor_values,
        })
    }

    pub fn major(&self, row: usize) -> Option<&str> {
        self.table.cell(row, self.major_col)
    }

    pub fn minor(&self, row: usize) -> Option<&str> {
        self.table.cell(row, self.minor_col)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

use std::collections::BTreeSet;

use super::model::{Dataset, Table};
use super::page::{PageRange, RangeInput};

// ---------------------------------------------------------------------------
// CategorySelection – checked values of one category column
// ---------------------------------------------------------------------------

/// Checked values of one category column, in the order the user picked them.
///
/// The order only matters for export naming; membership is what filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    values: Vec<String>,
}

impl CategorySelection {
    /// Selection with every option checked (the initial state).
    pub fn all(options: &[String]) -> Self {
        CategorySelection {
            values: options.to_vec(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Check or uncheck `value`. Newly checked values go to the end.
    pub fn set(&mut self, value: &str, checked: bool) {
        if checked {
            if !self.contains(value) {
                self.values.push(value.to_string());
            }
        } else {
            self.values.retain(|v| v != value);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterInput – everything the row filter depends on
// ---------------------------------------------------------------------------

/// The complete set of user inputs driving the row filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub major: CategorySelection,
    pub minor: CategorySelection,
    pub ranges: [RangeInput; 2],
}

impl FilterInput {
    /// Initial input for a freshly loaded dataset: every category checked,
    /// both range slots disabled.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        FilterInput {
            major: CategorySelection::all(&dataset.major_values),
            minor: CategorySelection::all(&dataset.minor_values),
            ranges: Default::default(),
        }
    }

    /// Ranges of the enabled slots, ends normalized.
    pub fn active_ranges(&self) -> Vec<PageRange> {
        self.ranges.iter().filter_map(RangeInput::active).collect()
    }
}

/// Return indices of rows passing the category and page filters.
///
/// A row passes when:
/// * its major value is checked, and
/// * its minor value is checked, and
/// * no range slot is enabled, or one of its pages lies in an enabled range.
///
/// An empty selection checks nothing, so it hides every row. Rows with an
/// empty category cell can never be checked and are always hidden.
pub fn filtered_indices(dataset: &Dataset, input: &FilterInput) -> Vec<usize> {
    let major: BTreeSet<&str> = input.major.values().iter().map(String::as_str).collect();
    let minor: BTreeSet<&str> = input.minor.values().iter().map(String::as_str).collect();
    let ranges = input.active_ranges();

    (0..dataset.len())
        .filter(|&row| {
            let major_ok = dataset.major(row).is_some_and(|v| major.contains(v));
            let minor_ok = dataset.minor(row).is_some_and(|v| minor.contains(v));
            major_ok && minor_ok && dataset.pages[row].matches_any(&ranges)
        })
        .collect()
}

/// Filter `dataset` into a new table with the same headers.
///
/// The parsed page column is not part of the result.
pub fn compute_filtered_table(dataset: &Dataset, input: &FilterInput) -> Table {
    dataset.table.select_rows(&filtered_indices(dataset, input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnNames;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn dataset() -> Dataset {
        let table = Table::new(
            row(&["大項目", "中項目", "ページ"]),
            vec![
                row(&["A", "x", "1"]),
                row(&["A", "y", "6-11"]),
                row(&["B", "x", "p7"]),
                row(&["B", "y", "none"]),
                row(&["", "x", "2"]),
                row(&["A", "x", "10〜12"]),
            ],
        );
        Dataset::from_table(table, &ColumnNames::default()).unwrap()
    }

    fn enable(input: &mut FilterInput, slot: usize, start: u32, end: u32) {
        input.ranges[slot] = RangeInput {
            start,
            end,
            enabled: true,
        };
    }

    #[test]
    fn defaults_keep_rows_with_both_categories() {
        let ds = dataset();
        let input = FilterInput::for_dataset(&ds);
        assert_eq!(filtered_indices(&ds, &input), vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn category_membership_filters() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        input.major.set("B", false);
        assert_eq!(filtered_indices(&ds, &input), vec![0, 1, 5]);
        input.minor.set("x", false);
        assert_eq!(filtered_indices(&ds, &input), vec![1]);
    }

    #[test]
    fn empty_selection_selects_nothing() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        input.minor.clear();
        assert!(filtered_indices(&ds, &input).is_empty());
    }

    #[test]
    fn page_ranges_combine_with_or() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        enable(&mut input, 0, 5, 1);
        assert_eq!(filtered_indices(&ds, &input), vec![0]);
        enable(&mut input, 1, 7, 7);
        assert_eq!(filtered_indices(&ds, &input), vec![0, 1, 2]);
    }

    #[test]
    fn disabled_slot_is_ignored() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        input.ranges[1] = RangeInput {
            start: 100,
            end: 200,
            enabled: false,
        };
        assert_eq!(filtered_indices(&ds, &input).len(), 5);
    }

    #[test]
    fn unparsable_pages_drop_out_under_a_range() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        enable(&mut input, 0, 0, u32::MAX);
        assert_eq!(filtered_indices(&ds, &input), vec![0, 1, 2, 5]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let mut input = FilterInput::for_dataset(&ds);
        input.major.set("B", false);
        enable(&mut input, 0, 10, 12);

        let once = compute_filtered_table(&ds, &input);
        let again = Dataset::from_table(once.clone(), &ColumnNames::default()).unwrap();
        assert_eq!(compute_filtered_table(&again, &input), once);
    }

    #[test]
    fn selection_keeps_pick_order() {
        let mut sel = CategorySelection::default();
        sel.set("b", true);
        sel.set("a", true);
        sel.set("b", true);
        assert_eq!(sel.values(), &row(&["b", "a"])[..]);
        sel.set("b", false);
        assert_eq!(sel.values(), &row(&["a"])[..]);
        sel.set("a", false);
        assert!(sel.is_empty());
    }
}

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// PageSpec – parsed contents of one page cell
// ---------------------------------------------------------------------------

/// The page numbers a page cell refers to.
///
/// A single page is stored as a span whose ends are equal, so matching never
/// has to expand `"1-100000"` into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSpec {
    /// Inclusive span, `first <= last`.
    Span { first: u32, last: u32 },
    /// Missing cell or no digits found.
    Unparsable,
}

impl PageSpec {
    /// Parse a page cell.
    ///
    /// Accepted forms, tried in order:
    /// * `10-12`, `p10~12`, `10〜12`, `10～12` → pages 10 through 12
    /// * anything else containing digits → the first run of digits
    ///
    /// `None`, empty cells and cells without digits are [`PageSpec::Unparsable`],
    /// as are numbers that do not fit in a `u32`.
    pub fn parse(cell: Option<&str>) -> PageSpec {
        static RANGE_RE: OnceLock<Regex> = OnceLock::new();
        static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

        let Some(cell) = cell else {
            return PageSpec::Unparsable;
        };

        let range_re = RANGE_RE.get_or_init(|| {
            Regex::new(r"[pP]?\s*([0-9]+)\s*[-~〜～]\s*[pP]?\s*([0-9]+)")
                .expect("page range regex is valid")
        });
        if let Some(caps) = range_re.captures(cell) {
            let first = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let last = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            return match (first, last) {
                (Some(a), Some(b)) => PageSpec::Span {
                    first: a.min(b),
                    last: a.max(b),
                },
                _ => PageSpec::Unparsable,
            };
        }

        let number_re =
            NUMBER_RE.get_or_init(|| Regex::new(r"[0-9]+").expect("page number regex is valid"));
        number_re
            .find(cell)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map_or(PageSpec::Unparsable, PageSpec::single)
    }

    pub fn single(page: u32) -> PageSpec {
        PageSpec::Span {
            first: page,
            last: page,
        }
    }

    /// Every page number the cell refers to, ascending.
    pub fn page_numbers(&self) -> Vec<u32> {
        match *self {
            PageSpec::Span { first, last } => (first..=last).collect(),
            PageSpec::Unparsable => Vec::new(),
        }
    }

    /// Whether any page of this cell lies inside `range`.
    pub fn overlaps(&self, range: &PageRange) -> bool {
        match *self {
            PageSpec::Span { first, last } => first <= range.end && range.start <= last,
            PageSpec::Unparsable => false,
        }
    }

    /// Row-level page test: vacuously true with no enabled range, otherwise
    /// true when some page falls inside some range.
    pub fn matches_any(&self, ranges: &[PageRange]) -> bool {
        ranges.is_empty() || ranges.iter().any(|r| self.overlaps(r))
    }
}

// ---------------------------------------------------------------------------
// PageRange – an inclusive filter interval
// ---------------------------------------------------------------------------

/// Inclusive page interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Build a range, swapping the ends when they are given inverted.
    pub fn new(start: u32, end: u32) -> Self {
        if start > end {
            PageRange {
                start: end,
                end: start,
            }
        } else {
            PageRange { start, end }
        }
    }
}

/// One of the two range slots in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeInput {
    pub start: u32,
    pub end: u32,
    pub enabled: bool,
}

impl Default for RangeInput {
    fn default() -> Self {
        RangeInput {
            start: 1,
            end: 1,
            enabled: false,
        }
    }
}

impl RangeInput {
    /// The effective range, or `None` while the slot is disabled.
    pub fn active(&self) -> Option<PageRange> {
        self.enabled.then(|| PageRange::new(self.start, self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pages(cell: &str) -> Vec<u32> {
        PageSpec::parse(Some(cell)).page_numbers()
    }

    #[test]
    fn separated_ranges_expand_inclusively() {
        assert_eq!(pages("10-12"), vec![10, 11, 12]);
        assert_eq!(pages("10〜12"), vec![10, 11, 12]);
        assert_eq!(pages("10~12"), vec![10, 11, 12]);
        assert_eq!(pages("10～12"), vec![10, 11, 12]);
        assert_eq!(pages("p3-5"), vec![3, 4, 5]);
        assert_eq!(pages("P 3 - 4"), vec![3, 4]);
    }

    #[test]
    fn inverted_cell_range_is_normalized() {
        assert_eq!(pages("12-10"), vec![10, 11, 12]);
    }

    #[test]
    fn single_numbers_take_first_run_of_digits() {
        assert_eq!(pages("42"), vec![42]);
        assert_eq!(pages("p34"), vec![34]);
        assert_eq!(pages("第7章 12"), vec![7]);
        assert_eq!(pages("007"), vec![7]);
    }

    #[test]
    fn cells_without_digits_are_unparsable() {
        assert_eq!(PageSpec::parse(Some("abc")), PageSpec::Unparsable);
        assert_eq!(PageSpec::parse(Some("")), PageSpec::Unparsable);
        assert_eq!(PageSpec::parse(None), PageSpec::Unparsable);
        assert!(pages("ー").is_empty());
    }

    #[test]
    fn overflowing_numbers_are_unparsable() {
        assert_eq!(PageSpec::parse(Some("99999999999")), PageSpec::Unparsable);
        assert_eq!(PageSpec::parse(Some("1-99999999999")), PageSpec::Unparsable);
    }

    #[test]
    fn matches_any_enabled_range() {
        let ranges = [PageRange::new(1, 5), PageRange::new(10, 12)];
        assert!(PageSpec::Span { first: 6, last: 11 }.matches_any(&ranges));
        assert!(!PageSpec::Span { first: 6, last: 9 }.matches_any(&ranges));
        assert!(PageSpec::single(5).matches_any(&ranges));
        assert!(PageSpec::single(10).matches_any(&ranges));
    }

    #[test]
    fn no_ranges_matches_everything() {
        assert!(PageSpec::Unparsable.matches_any(&[]));
        assert!(PageSpec::single(999).matches_any(&[]));
    }

    #[test]
    fn unparsable_never_matches_a_range() {
        let ranges = [PageRange::new(0, u32::MAX)];
        assert!(!PageSpec::Unparsable.matches_any(&ranges));
    }

    #[test]
    fn inverted_range_is_swapped() {
        assert_eq!(PageRange::new(10, 2), PageRange { start: 2, end: 10 });
        assert!(PageSpec::single(2).overlaps(&PageRange::new(10, 2)));
        assert!(PageSpec::single(10).overlaps(&PageRange::new(10, 2)));
    }

    #[test]
    fn disabled_slot_yields_no_range() {
        let mut slot = RangeInput::default();
        assert_eq!(slot.active(), None);
        slot.enabled = true;
        slot.start = 9;
        slot.end = 3;
        assert_eq!(slot.active(), Some(PageRange::new(3, 9)));
    }
}

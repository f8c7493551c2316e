//! Page range selection
//!
//! Resolves a user-supplied range string like `"1-3,5"` into zero-based page
//! indices. The selection is an explicit ordered-unique sequence: indices
//! appear in first-occurrence order across tokens (not sorted), duplicates
//! collapse to their first occurrence, and anything unparsable or out of
//! bounds contributes nothing. Rejecting a whole request over a stray token
//! is deliberately avoided; the policy is documented tolerance, not an error.

/// Ordered, duplicate-free sequence of zero-based page indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
}

impl PageSelection {
    /// Resolve `spec` against a document with `total_pages` pages.
    ///
    /// An absent (or blank) spec selects the first page only. Tokens are
    /// comma-separated and either a 1-based page number `N` or an inclusive
    /// 1-based range `A-B` (expanded ascending; `A > B` yields nothing).
    /// Pure function: no I/O, deterministic.
    pub fn resolve(spec: Option<&str>, total_pages: usize) -> Self {
        let mut selection = PageSelection::default();

        let spec = spec.map(str::trim).filter(|s| !s.is_empty());
        let Some(spec) = spec else {
            if total_pages > 0 {
                selection.push(0);
            }
            return selection;
        };

        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            if let Some((start, end)) = token.split_once('-') {
                let (Ok(start), Ok(end)) =
                    (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                else {
                    continue;
                };
                for page in start..=end {
                    selection.push_page(page, total_pages);
                }
            } else if let Ok(page) = token.parse::<usize>() {
                selection.push_page(page, total_pages);
            }
        }

        selection
    }

    /// Append a 1-based page number, dropping it silently when out of bounds.
    fn push_page(&mut self, page: usize, total_pages: usize) {
        if page >= 1 && page <= total_pages {
            self.push(page - 1);
        }
    }

    fn push(&mut self, index: usize) {
        if !self.indices.contains(&index) {
            self.indices.push(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(spec: Option<&str>, total: usize) -> Vec<usize> {
        PageSelection::resolve(spec, total).as_slice().to_vec()
    }

    #[test]
    fn absent_spec_selects_first_page() {
        assert_eq!(resolve(None, 5), vec![0]);
        assert_eq!(resolve(None, 1), vec![0]);
    }

    #[test]
    fn absent_spec_on_empty_document_selects_nothing() {
        assert_eq!(resolve(None, 0), Vec::<usize>::new());
    }

    #[test]
    fn blank_spec_is_treated_as_absent() {
        assert_eq!(resolve(Some(""), 5), vec![0]);
        assert_eq!(resolve(Some("   "), 5), vec![0]);
    }

    #[test]
    fn single_page_number() {
        assert_eq!(resolve(Some("2"), 5), vec![1]);
    }

    #[test]
    fn ranges_and_singles_combine_in_order() {
        assert_eq!(resolve(Some("1-3,5"), 5), vec![0, 1, 2, 4]);
        assert_eq!(resolve(Some("1-2,4"), 5), vec![0, 1, 3]);
    }

    #[test]
    fn selection_order_is_first_occurrence_not_ascending() {
        assert_eq!(resolve(Some("3,1-2"), 5), vec![2, 0, 1]);
        assert_eq!(resolve(Some("5,1"), 5), vec![4, 0]);
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        assert_eq!(resolve(Some("2,1-3"), 5), vec![1, 0, 2]);
        assert_eq!(resolve(Some("1,1,1"), 5), vec![0]);
    }

    #[test]
    fn reversed_range_contributes_nothing() {
        assert_eq!(resolve(Some("5-3"), 5), Vec::<usize>::new());
        assert_eq!(resolve(Some("5-3,2"), 5), vec![1]);
    }

    #[test]
    fn out_of_bounds_pages_are_dropped_silently() {
        assert_eq!(resolve(Some("9"), 3), Vec::<usize>::new());
        assert_eq!(resolve(Some("7,2"), 5), vec![1]);
        assert_eq!(resolve(Some("2-9"), 3), vec![1, 2]);
    }

    #[test]
    fn zero_is_out_of_bounds_for_one_based_numbering() {
        assert_eq!(resolve(Some("0"), 3), Vec::<usize>::new());
        assert_eq!(resolve(Some("0-2"), 3), vec![0, 1]);
    }

    #[test]
    fn malformed_tokens_are_ignored() {
        assert_eq!(resolve(Some("a,2,!!"), 5), vec![1]);
        assert_eq!(resolve(Some("1-x"), 5), Vec::<usize>::new());
        assert_eq!(resolve(Some("1-2-3"), 5), Vec::<usize>::new());
        assert_eq!(resolve(Some(",,3"), 5), vec![2]);
    }

    #[test]
    fn tokens_tolerate_whitespace() {
        assert_eq!(resolve(Some(" 1 - 2 , 4 "), 5), vec![0, 1, 3]);
    }
}

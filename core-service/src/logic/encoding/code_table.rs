//! Categorical code table

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Injective mapping from distinct string values to integer codes.
///
/// Values are kept sorted; a value's code is its position, so codes run
/// `0..len()` in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTable {
    values: Vec<String>,
}

impl CodeTable {
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        Self {
            values: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    /// Code for a value seen during fitting
    pub fn code(&self, value: &str) -> Option<u32> {
        self.values
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .ok()
            .map(|i| i as u32)
    }

    /// Value for a code
    pub fn value(&self, code: u32) -> Option<&str> {
        self.values.get(code as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sorted_order() {
        let table = CodeTable::fit(["Urban", "Rural", "Urban", "Suburban"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.code("Rural"), Some(0));
        assert_eq!(table.code("Suburban"), Some(1));
        assert_eq!(table.code("Urban"), Some(2));
        assert_eq!(table.value(2), Some("Urban"));
    }

    #[test]
    fn test_unseen_value_has_no_code() {
        let table = CodeTable::fit(["Yes", "No"]);
        assert_eq!(table.code("Maybe"), None);
        assert_eq!(table.value(5), None);
    }

    #[test]
    fn test_codes_are_injective() {
        let table = CodeTable::fit(["a", "b", "c", "d"]);
        let mut codes: Vec<_> = ["a", "b", "c", "d"].iter().filter_map(|v| table.code(v)).collect();
        codes.dedup();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }
}

use serde::Serialize;

use crate::model::matches_query;

/// Search-as-you-type list behind a dropdown.
///
/// Filtering keeps the original positions so a pick in the filtered list is
/// always reported as an index into `items`.
#[derive(Default)]
pub struct SearchableSelector {
    items: Vec<String>,
    /// Original indexes of the items matching the current query
    filtered: Vec<usize>,
    query: String,
    selected_index: Option<usize>,
    on_selection: Option<Box<dyn FnMut(usize) + Send>>,
}

/// A visible entry together with its position in the full list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredItem {
    pub index: usize,
    pub label: String,
}

impl std::fmt::Debug for SearchableSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchableSelector")
            .field("items", &self.items)
            .field("filtered", &self.filtered)
            .field("query", &self.query)
            .field("selected_index", &self.selected_index)
            .finish()
    }
}

impl SearchableSelector {
    pub fn new(items: Vec<String>) -> Self {
        let mut selector = Self::default();
        selector.set_items(items);
        selector
    }

    /// Called with the original index whenever an item is selected
    pub fn on_selection(mut self, callback: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_selection = Some(Box::new(callback));
        self
    }

    /// Replace the candidates. The filter is reset and a selection that no
    /// longer fits is cleared.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.query.clear();
        self.filtered = (0..self.items.len()).collect();
        if self.selected_index.is_some_and(|i| i >= self.items.len()) {
            self.selected_index = None;
        }
    }

    pub fn filter(&mut self, query: &str) -> Vec<FilteredItem> {
        self.query = query.to_string();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches_query(item, query))
            .map(|(index, _)| index)
            .collect();
        self.filtered_items()
    }

    pub fn filtered_items(&self) -> Vec<FilteredItem> {
        self.filtered
            .iter()
            .map(|&index| FilteredItem {
                index,
                label: self.items[index].clone(),
            })
            .collect()
    }

    /// Pick the `filtered_index`-th visible entry; returns its original index
    pub fn select(&mut self, filtered_index: usize) -> Option<usize> {
        let original = *self.filtered.get(filtered_index)?;
        self.selected_index = Some(original);
        if let Some(callback) = self.on_selection.as_mut() {
            callback(original);
        }
        Some(original)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected_index
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

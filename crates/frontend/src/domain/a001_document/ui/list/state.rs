use contracts::domain::a001_document::aggregate::{DocumentListItem, DocumentListQuery, DocumentStatusFilter};
use leptos::prelude::*;

#[derive(Clone, Debug)]
pub struct DocumentListState {
    pub items: Vec<DocumentListItem>,
    pub status: DocumentStatusFilter,
    pub search: String,
    pub is_loaded: bool,
    // Серверная пагинация
    pub page: u64,
    pub page_size: u64,
    pub total_count: u64,
}

impl Default for DocumentListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: DocumentStatusFilter::Active,
            search: String::new(),
            is_loaded: false,
            page: 1,
            page_size: 50,
            total_count: 0,
        }
    }
}

impl DocumentListState {
    pub fn query(&self) -> DocumentListQuery {
        DocumentListQuery {
            status: self.status,
            search: Some(self.search.clone()).filter(|s| !s.trim().is_empty()),
            page: Some(self.page),
            page_size: Some(self.page_size),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

pub fn create_state() -> RwSignal<DocumentListState> {
    RwSignal::new(DocumentListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_skips_blank_search() {
        let mut state = DocumentListState {
            search: "   ".into(),
            ..Default::default()
        };
        assert_eq!(state.query().search, None);
        state.search = "estimate".into();
        assert_eq!(state.query().search.as_deref(), Some("estimate"));
        assert_eq!(state.query().page, Some(1));
    }

    #[test]
    fn test_pages() {
        let state = DocumentListState {
            total_count: 101,
            page_size: 50,
            ..Default::default()
        };
        assert_eq!(state.total_pages(), 3);
        assert!(state.has_next());
        let last = DocumentListState { page: 3, ..state };
        assert!(!last.has_next());
    }
}

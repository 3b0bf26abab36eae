//! Product query specification.
//!
//! [`ProductQuery`] describes what to fetch (category filter, text predicate
//! tree, relevance term, page window) without saying how. Repositories
//! translate it: the in-memory one evaluates [`Predicate::matches`] directly,
//! the Postgres one builds a SeaORM `Condition` from the same tree.
//!
//! The base predicate "status = active AND deleted_at IS NULL" is implied and
//! always applied by the repository.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Zero values are raised to 1.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Pagination metadata returned alongside a page of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    /// Matching rows before windowing
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit);
        Self {
            page: request.page,
            limit: request.limit,
            total_items,
            total_pages,
            has_next_page: request.page < total_pages,
            has_previous_page: request.page > 1,
        }
    }

    /// Page info for a short-circuited search: zero totals, no navigation.
    pub fn empty(request: PageRequest) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total_items: 0,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

/// A page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

/// Text column a predicate can test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    ProductName,
    /// Product name with every space removed
    CompactProductName,
    MerchandiseCode,
    CategoryName,
}

/// Case-insensitive substring predicate tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field` contains `needle`; needles are stored upper-cased
    Contains { field: TextField, needle: String },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn contains(field: TextField, needle: &str) -> Self {
        Predicate::Contains {
            field,
            needle: needle.to_uppercase(),
        }
    }

    /// Evaluates the tree against a row, resolving fields through `value_of`.
    pub fn matches<'a>(&self, value_of: &impl Fn(TextField) -> &'a str) -> bool {
        match self {
            Predicate::Contains { field, needle } => {
                value_of(*field).to_uppercase().contains(needle.as_str())
            }
            Predicate::All(children) => children.iter().all(|p| p.matches(value_of)),
            Predicate::Any(children) => children.iter().any(|p| p.matches(value_of)),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordering {
    /// Newest id first
    Newest,
    /// Exact name match, then prefix match, then the rest; newest first within a tier
    RelevanceThenNewest { term: String },
}

/// Relevance tier of `name` for `term` (1 = exact, 2 = prefix, 3 = other)
pub fn relevance_rank(name: &str, term: &str) -> u8 {
    let name = name.to_uppercase();
    let term = term.to_uppercase();
    if name == term {
        1
    } else if name.starts_with(&term) {
        2
    } else {
        3
    }
}

/// Everything a repository needs to run a product listing or search
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub category_id: Option<i32>,
    pub predicate: Option<Predicate>,
    pub ordering: Ordering,
    pub page: PageRequest,
}

impl ProductQuery {
    /// Newest-first listing, optionally narrowed to one category.
    pub fn list(category_id: Option<i32>, page: PageRequest) -> Self {
        Self {
            category_id,
            predicate: None,
            ordering: Ordering::Newest,
            page,
        }
    }

    /// Relevance-ranked text search. Returns `None` for a blank term.
    ///
    /// A multi-word term requires every word in the product name (literal
    /// or with spaces removed); alternatively the merchandise code or the
    /// category name may contain the whole term. A single word may also
    /// match the compacted name against the compacted term.
    pub fn search(term: &str, category_id: Option<i32>, page: PageRequest) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let compact: String = term
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let tokens: Vec<&str> = term.split_whitespace().collect();

        let name_match = if tokens.len() >= 2 {
            Predicate::All(
                tokens
                    .iter()
                    .map(|token| {
                        Predicate::Any(vec![
                            Predicate::contains(TextField::ProductName, token),
                            Predicate::contains(TextField::CompactProductName, token),
                        ])
                    })
                    .collect(),
            )
        } else {
            Predicate::Any(vec![
                Predicate::contains(TextField::ProductName, term),
                Predicate::contains(TextField::CompactProductName, &compact),
            ])
        };

        let predicate = Predicate::Any(vec![
            name_match,
            Predicate::contains(TextField::MerchandiseCode, term),
            Predicate::contains(TextField::CategoryName, term),
        ]);

        Some(Self {
            category_id,
            predicate: Some(predicate),
            ordering: Ordering::RelevanceThenNewest {
                term: term.to_string(),
            },
            page,
        })
    }
}

/// Escapes `%`, `_` and `\` so user input is matched literally by `LIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(name: &'a str, code: &'a str, category: &'a str, compact: &'a str) -> impl Fn(TextField) -> &'a str {
        move |field| match field {
            TextField::ProductName => name,
            TextField::CompactProductName => compact,
            TextField::MerchandiseCode => code,
            TextField::CategoryName => category,
        }
    }

    fn matches(query: &ProductQuery, name: &str, code: &str, category: &str) -> bool {
        let compact: String = name.chars().filter(|c| *c != ' ').collect();
        query
            .predicate
            .as_ref()
            .unwrap()
            .matches(&row(name, code, category, &compact))
    }

    #[test]
    fn test_page_info_math() {
        for (page, limit, total) in [(1, 10, 0), (1, 10, 10), (1, 10, 11), (2, 5, 11), (3, 5, 11), (9, 5, 11)] {
            let info = PageInfo::new(PageRequest::new(page, limit), total);
            assert_eq!(info.total_pages, total.div_ceil(limit));
            assert_eq!(info.has_next_page, page * limit < total, "{page}/{limit}/{total}");
            assert_eq!(info.has_previous_page, page > 1);
        }
    }

    #[test]
    fn test_page_info_empty() {
        let info = PageInfo::empty(PageRequest::new(3, 20));
        assert_eq!(info.total_items, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
        assert!(!info.has_previous_page);
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
        assert_eq!(PageRequest::new(u64::MAX, 100).offset(), u64::MAX);
    }

    #[test]
    fn test_page_info_past_last_page() {
        let info = PageInfo::new(PageRequest::new(u64::MAX / 10, 100), 3);
        assert_eq!(info.total_items, 3);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }

    #[test]
    fn test_blank_search_has_no_query() {
        assert!(ProductQuery::search("", None, PageRequest::default()).is_none());
        assert!(ProductQuery::search("   ", None, PageRequest::default()).is_none());
    }

    #[test]
    fn test_multi_token_requires_every_token() {
        let query = ProductQuery::search("red chair", None, PageRequest::default()).unwrap();
        assert!(matches(&query, "Red Folding Chair", "C-1", "Furniture"));
        assert!(!matches(&query, "Red Table", "T-1", "Furniture"));
    }

    #[test]
    fn test_code_and_category_match_full_term() {
        let query = ProductQuery::search("prod-2024", None, PageRequest::default()).unwrap();
        assert!(matches(&query, "Hammer", "PROD-20240101-12345", "Tools"));

        let query = ProductQuery::search("hand tools", None, PageRequest::default()).unwrap();
        assert!(matches(&query, "Hammer", "H-1", "Hand Tools"));
    }

    #[test]
    fn test_single_token_matches_compacted_name() {
        let query = ProductQuery::search("toolbox", None, PageRequest::default()).unwrap();
        assert!(matches(&query, "Tool Box", "TB-1", "Storage"));
    }

    #[test]
    fn test_search_orders_by_relevance() {
        let query = ProductQuery::search("  Pump ", Some(4), PageRequest::default()).unwrap();
        assert_eq!(query.category_id, Some(4));
        assert_eq!(
            query.ordering,
            Ordering::RelevanceThenNewest { term: "Pump".into() }
        );
    }

    #[test]
    fn test_relevance_rank() {
        assert_eq!(relevance_rank("pump", "Pump"), 1);
        assert_eq!(relevance_rank("Pump X", "pump"), 2);
        assert_eq!(relevance_rank("Water Pump", "Pump"), 3);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}

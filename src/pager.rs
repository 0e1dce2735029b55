use crate::error::{CompanyInsightError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parameters of one `GET /api/search` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchDescriptor {
    #[serde(rename = "q")]
    pub query: String,
    pub limit: u32,
    pub offset: u64,
}

pub fn describe_request(query: &str, page_index: u32, page_size: u32) -> Result<FetchDescriptor> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CompanyInsightError::EmptyQuery);
    }

    Ok(FetchDescriptor {
        query: query.to_string(),
        limit: page_size,
        offset: u64::from(page_index) * u64::from(page_size),
    })
}

pub fn has_next(total_count: u64, page_index: u32, page_size: u32) -> bool {
    total_count > (u64::from(page_index) + 1) * u64::from(page_size)
}

pub fn has_previous(page_index: u32) -> bool {
    page_index > 0
}

/// Pagination state of a search result listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub query: String,
    pub page_index: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl SearchPage {
    pub fn new(query: impl Into<String>, page_size: u32) -> Self {
        Self {
            query: query.into(),
            page_index: 0,
            page_size,
            total_count: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        has_next(self.total_count, self.page_index, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        has_previous(self.page_index)
    }

    pub fn request(&self) -> Result<FetchDescriptor> {
        describe_request(&self.query, self.page_index, self.page_size)
    }

    /// Records the total reported by the last response.
    pub fn update_total(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    /// Moves to the next page. Returns `false` and leaves the state
    /// untouched when there is no next page.
    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            debug!("Ignoring advance past last page {}", self.page_index);
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Moves to the previous page; a no-op on the first page.
    pub fn retreat(&mut self) -> bool {
        if !self.has_previous() {
            debug!("Ignoring retreat before first page");
            return false;
        }
        self.page_index -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_request() {
        let descriptor = describe_request("  Latvijas Gāze ", 2, 10).unwrap();
        assert_eq!(
            descriptor,
            FetchDescriptor {
                query: "Latvijas Gāze".to_string(),
                limit: 10,
                offset: 20,
            }
        );
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(matches!(describe_request("", 0, 10), Err(CompanyInsightError::EmptyQuery)));
        assert!(matches!(describe_request(" \t\n", 0, 10), Err(CompanyInsightError::EmptyQuery)));
    }

    #[test]
    fn test_flags() {
        assert!(has_next(25, 1, 10));
        assert!(!has_next(25, 2, 10));
        assert!(!has_next(20, 1, 10));
        assert!(!has_previous(0));
        assert!(has_previous(1));
    }

    #[test]
    fn test_advance_guarded() {
        let mut page = SearchPage::new("bank", DEFAULT_PAGE_SIZE);
        page.update_total(25);

        assert!(page.advance());
        assert!(page.advance());
        assert_eq!(page.page_index, 2);

        assert!(!page.advance());
        assert_eq!(page.page_index, 2);
        assert_eq!(page.request().unwrap().offset, 20);
    }

    #[test]
    fn test_retreat_guarded() {
        let mut page = SearchPage::new("bank", DEFAULT_PAGE_SIZE);
        assert!(!page.retreat());
        assert_eq!(page.page_index, 0);

        page.update_total(15);
        page.advance();
        assert!(page.retreat());
        assert_eq!(page.page_index, 0);
    }

    #[test]
    fn test_descriptor_serializes_as_query_params() {
        let json = serde_json::to_value(describe_request("sia", 0, 10).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "q": "sia", "limit": 10, "offset": 0 }));
    }
}

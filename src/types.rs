//! Common types used throughout listing-pager
//!
//! This module contains the page request/response model, the `Item`
//! abstraction and the bundled `Product` record.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

// ============================================================================
// Items
// ============================================================================

/// A record that can be listed
///
/// The id is the stable key a renderer uses to track rows.
pub trait Item: Clone + Send + Sync + 'static {
    /// Key type
    type Id: Eq + Hash + Clone + Debug;

    /// Stable identifier of this item
    fn id(&self) -> Self::Id;
}

/// A product from the default listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
}

impl Item for Product {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// Page Request / Result
// ============================================================================

/// Parameters for fetching a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page size
    pub limit: u32,
    /// Number of items to skip
    pub offset: u64,
    /// Search term; `None` targets the plain listing endpoint
    pub query: Option<String>,
}

impl PageRequest {
    /// Create a request for the plain listing
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit,
            offset,
            query: None,
        }
    }

    /// Attach a search query (blank queries are dropped)
    #[must_use]
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = normalize_query(query);
        self
    }

    /// Whether this request targets the search endpoint
    pub fn is_search(&self) -> bool {
        self.query.is_some()
    }
}

/// Normalize a raw search term: trimmed, and `None` when blank
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(ToString::to_string)
}

/// A normalized page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Items of this page, never more than `limit`
    pub items: Vec<T>,
    /// Total number of items available for the query
    pub total_count: u64,
    /// Offset the page starts at
    pub offset: u64,
    /// Requested page size
    pub limit: u32,
}

impl<T> PageResult<T> {
    /// Create a page result
    pub fn new(items: Vec<T>, total_count: u64, offset: u64, limit: u32) -> Self {
        Self {
            items,
            total_count,
            offset,
            limit,
        }
    }

    /// Number of items returned
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Wire format of the listing and search endpoints
///
/// `products` is accepted as an alias so the public demo API works unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse<T> {
    #[serde(alias = "products")]
    pub items: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u32,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    #[default]
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(None), None);
        assert_eq!(normalize_query(Some("")), None);
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(Some(" phone ")), Some("phone".to_string()));
    }

    #[test]
    fn test_page_request_with_query() {
        let req = PageRequest::new(10, 20).with_query(Some("laptop"));
        assert!(req.is_search());
        assert_eq!(req.query.as_deref(), Some("laptop"));

        let req = PageRequest::new(10, 0).with_query(Some(" "));
        assert!(!req.is_search());
    }

    #[test]
    fn test_listing_response_accepts_products_alias() {
        let body = r#"{"products":[{"id":1,"title":"Phone","price":9.5}],"total":30,"skip":0,"limit":10}"#;
        let parsed: ListingResponse<Product> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].id(), 1);
        assert_eq!(parsed.items[0].thumbnail, "");
        assert_eq!(parsed.total, 30);
    }

    #[test]
    fn test_listing_response_items_field() {
        let body = r#"{"items":[],"total":0}"#;
        let parsed: ListingResponse<Product> = serde_json::from_str(body).unwrap();
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.skip, 0);
    }

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Constant);
    }
}

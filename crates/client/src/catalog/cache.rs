//! Cache types for catalog API responses.

use super::types::{Product, ProductListPage};

/// Cache key for products and listing pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products {
        limit: Option<u32>,
        offset: Option<u32>,
        query: Option<String>,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductListPage),
}

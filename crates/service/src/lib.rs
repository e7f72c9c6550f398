//! Service layer owning the product catalog.
//! - `products::ProductStore` is the single authority over product records.
//! - `storage` holds the JSON file helpers the store persists through.
//! - Errors are reported as `errors::ServiceError`, never by panicking.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod products;

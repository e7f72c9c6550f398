use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::products::domain::{NewProduct, Product, ProductPatch};

/// Trait abstraction over catalog storage so adapters do not depend on the
/// file-backed implementation.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn add_product(&self, candidate: NewProduct) -> Result<Product, ServiceError>;
    async fn get_products(&self, limit: Option<usize>) -> Result<Vec<Product>, ServiceError>;
    async fn get_product_by_id(&self, id: u64) -> Result<Product, ServiceError>;
    async fn update_product(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError>;
    async fn delete_product(&self, id: u64) -> Result<Product, ServiceError>;
}

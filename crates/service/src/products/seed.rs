//! Sample products for demo runs.

use tracing::info;

use crate::errors::ServiceError;
use crate::products::domain::NewProduct;
use crate::products::repository::ProductRepository;

pub fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            title: Some("Producto 1".into()),
            description: Some("Descripción del producto 1".into()),
            price: Some(10.99),
            thumbnail: Some("ruta-imagen-1".into()),
            code: Some("P1".into()),
            stock: Some(5),
        },
        NewProduct {
            title: Some("Producto 2".into()),
            description: Some("Descripción del producto 2".into()),
            price: Some(19.99),
            thumbnail: Some("ruta-imagen-2".into()),
            code: Some("P2".into()),
            stock: Some(8),
        },
    ]
}

/// Add the demo products when the catalog is empty. Returns how many were added.
pub async fn seed_if_empty(repo: &dyn ProductRepository) -> Result<usize, ServiceError> {
    if !repo.get_products(Some(1)).await?.is_empty() {
        return Ok(0);
    }
    let mut added = 0;
    for candidate in demo_products() {
        repo.add_product(candidate).await?;
        added += 1;
    }
    info!(added, "seeded demo products");
    Ok(added)
}

use std::{path::PathBuf, sync::Arc};

use tokio::{fs, sync::RwLock};
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;
use crate::products::domain::{NewProduct, Product, ProductPatch};
use crate::products::repository::ProductRepository;
use crate::storage::json_file;

struct Catalog {
    products: Vec<Product>,
    last_product_id: u64,
}

/// File-backed product catalog.
///
/// Holds the ordered product list in memory and rewrites the whole JSON file
/// after every successful mutation. Mutations hold the write lock across the
/// rewrite, so they never interleave and the file always reflects the latest
/// mutation that reached disk.
pub struct ProductStore {
    inner: RwLock<Catalog>,
    file_path: PathBuf,
}

impl ProductStore {
    /// Build the store and load the backing file.
    ///
    /// A missing, unreadable or malformed file is logged and the store starts
    /// empty with no ids assigned yet.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let catalog = match json_file::read_json_vec::<Product>(&file_path).await {
            Ok(products) => {
                let last_product_id = products.last().map(|p| p.id).unwrap_or(0);
                info!(path = %file_path.display(), count = products.len(), last_product_id, "products loaded");
                Catalog { products, last_product_id }
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "could not load products; starting empty");
                Catalog { products: Vec::new(), last_product_id: 0 }
            }
        };

        Arc::new(Self { inner: RwLock::new(catalog), file_path })
    }

    pub fn file_path(&self) -> &std::path::Path {
        &self.file_path
    }

    async fn save(&self, catalog: &Catalog) -> Result<(), ServiceError> {
        match json_file::write_json(&self.file_path, &catalog.products).await {
            Ok(()) => {
                debug!(path = %self.file_path.display(), count = catalog.products.len(), "products saved");
                Ok(())
            }
            Err(e) => {
                // memory keeps the mutation; disk is behind until the next successful save
                error!(path = %self.file_path.display(), error = %e, "failed to save products");
                Err(e)
            }
        }
    }

    /// Validate and append a new product, assigning the next id.
    pub async fn add_product(&self, candidate: NewProduct) -> Result<Product, ServiceError> {
        let draft = candidate.validate().map_err(|e| {
            warn!(error = %e, "rejected product");
            e
        })?;

        let mut catalog = self.inner.write().await;
        if catalog.products.iter().any(|p| p.code == draft.code()) {
            warn!(code = draft.code(), "rejected product with duplicate code");
            return Err(ServiceError::DuplicateCode(draft.code().to_string()));
        }

        let Some(id) = catalog.last_product_id.checked_add(1) else {
            error!(last_product_id = catalog.last_product_id, "product id space exhausted");
            return Err(ServiceError::IdsExhausted(catalog.last_product_id));
        };
        catalog.last_product_id = id;
        let product = draft.with_id(id);
        catalog.products.push(product.clone());
        info!(id = product.id, code = %product.code, "product added");
        self.save(&catalog).await?;
        Ok(product)
    }

    /// All products in creation order; `Some(n)` with `n > 0` keeps the first `n`.
    pub async fn get_products(&self, limit: Option<usize>) -> Vec<Product> {
        let catalog = self.inner.read().await;
        match limit {
            Some(n) if n > 0 => catalog.products.iter().take(n).cloned().collect(),
            _ => catalog.products.clone(),
        }
    }

    pub async fn get_product_by_id(&self, id: u64) -> Result<Product, ServiceError> {
        let catalog = self.inner.read().await;
        catalog.products.iter().find(|p| p.id == id).cloned().ok_or_else(|| {
            warn!(id, "product not found");
            ServiceError::not_found("product", id)
        })
    }

    /// Merge `patch` over the product with `id` and persist. Returns the merged record.
    pub async fn update_product(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError> {
        let mut catalog = self.inner.write().await;
        let Some(product) = catalog.products.iter_mut().find(|p| p.id == id) else {
            warn!(id, "update of unknown product");
            return Err(ServiceError::not_found("product", id));
        };
        patch.apply_to(product);
        let updated = product.clone();
        info!(id, "product updated");
        self.save(&catalog).await?;
        Ok(updated)
    }

    /// Remove the product with `id`, keeping the order of the rest. Returns the removed record.
    pub async fn delete_product(&self, id: u64) -> Result<Product, ServiceError> {
        let mut catalog = self.inner.write().await;
        let Some(index) = catalog.products.iter().position(|p| p.id == id) else {
            warn!(id, "delete of unknown product");
            return Err(ServiceError::not_found("product", id));
        };
        let removed = catalog.products.remove(index);
        info!(id, code = %removed.code, "product deleted");
        self.save(&catalog).await?;
        Ok(removed)
    }

    /// Id the next successful `add_product` will assign; `None` once ids run out.
    pub async fn next_id(&self) -> Option<u64> {
        self.inner.read().await.last_product_id.checked_add(1)
    }
}

#[async_trait::async_trait]
impl ProductRepository for ProductStore {
    async fn add_product(&self, candidate: NewProduct) -> Result<Product, ServiceError> { self.add_product(candidate).await }
    async fn get_products(&self, limit: Option<usize>) -> Result<Vec<Product>, ServiceError> { Ok(self.get_products(limit).await) }
    async fn get_product_by_id(&self, id: u64) -> Result<Product, ServiceError> { self.get_product_by_id(id).await }
    async fn update_product(&self, id: u64, patch: ProductPatch) -> Result<Product, ServiceError> { self.update_product(id, patch).await }
    async fn delete_product(&self, id: u64) -> Result<Product, ServiceError> { self.delete_product(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("product_store_{}.json", uuid::Uuid::new_v4()))
    }

    fn candidate(code: &str) -> NewProduct {
        NewProduct {
            title: Some(format!("title {code}")),
            description: Some(format!("description {code}")),
            price: Some(10.99),
            thumbnail: Some(format!("thumb-{code}")),
            code: Some(code.to_string()),
            stock: Some(5),
        }
    }

    async fn on_disk(path: &std::path::Path) -> Vec<Product> {
        json_file::read_json_vec(path).await.expect("backing file readable")
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        assert!(store.get_products(None).await.is_empty());
        assert_eq!(store.next_id().await, Some(1));
    }

    #[tokio::test]
    async fn malformed_file_starts_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"this is not json").await?;
        let store = ProductStore::new(&tmp).await;
        assert!(store.get_products(None).await.is_empty());

        // first mutation replaces the garbage
        store.add_product(candidate("A")).await?;
        assert_eq!(on_disk(&tmp).await.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn catalog_scenario() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;

        let first = store
            .add_product(NewProduct {
                title: Some("P1".into()),
                description: Some("d1".into()),
                price: Some(10.99),
                thumbnail: Some("t1".into()),
                code: Some("P1".into()),
                stock: Some(5),
            })
            .await?;
        assert_eq!(first.id, 1);

        let dup = store.add_product(candidate("P1")).await;
        assert!(matches!(dup, Err(ServiceError::DuplicateCode(code)) if code == "P1"));
        assert_eq!(store.get_products(None).await.len(), 1);

        assert_eq!(store.get_product_by_id(1).await?, first);
        assert!(matches!(store.get_product_by_id(99).await, Err(ServiceError::NotFound(_))));

        let updated = store
            .update_product(1, ProductPatch { price: Some(300.0), ..Default::default() })
            .await?;
        assert_eq!(updated.price, 300.0);
        assert_eq!(updated.code, "P1");
        assert_eq!(on_disk(&tmp).await[0].price, 300.0);

        store.delete_product(1).await?;
        assert!(store.get_products(None).await.is_empty());
        assert!(on_disk(&tmp).await.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn ids_increase_and_are_retrievable() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        for (i, code) in ["A", "B", "C"].iter().enumerate() {
            let p = store.add_product(candidate(code)).await?;
            assert_eq!(p.id, i as u64 + 1);
            assert_eq!(store.get_product_by_id(p.id).await?, p);
        }
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_candidate_changes_nothing() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        store.add_product(candidate("A")).await?;

        let res = store.add_product(NewProduct { stock: None, ..candidate("B") }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(store.get_products(None).await.len(), 1);
        assert_eq!(store.next_id().await, Some(2));
        assert_eq!(on_disk(&tmp).await.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_ids_reject_add() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let last = candidate("MAX").validate()?.with_id(u64::MAX);
        json_file::write_json(&tmp, &vec![last.clone()]).await?;
        let store = ProductStore::new(&tmp).await;

        let res = store.add_product(candidate("A")).await;
        assert!(matches!(res, Err(ServiceError::IdsExhausted(u64::MAX))));
        assert_eq!(store.next_id().await, None);
        assert_eq!(store.get_products(None).await, vec![last.clone()]);
        assert_eq!(on_disk(&tmp).await, vec![last]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn unknown_id_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        store.add_product(candidate("A")).await?;
        store.add_product(candidate("B")).await?;
        let before = tokio::fs::read(&tmp).await?;
        let modified = tokio::fs::metadata(&tmp).await?.modified()?;

        let res = store.update_product(9, ProductPatch { title: Some("x".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(matches!(store.delete_product(9).await, Err(ServiceError::NotFound(_))));

        assert_eq!(tokio::fs::read(&tmp).await?, before);
        assert_eq!(tokio::fs::metadata(&tmp).await?.modified()?, modified);
        assert_eq!(store.get_products(None).await.len(), 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn limit_takes_prefix() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        for code in ["A", "B", "C"] {
            store.add_product(candidate(code)).await?;
        }
        let codes = |v: Vec<Product>| v.into_iter().map(|p| p.code).collect::<Vec<_>>();
        assert_eq!(codes(store.get_products(Some(2)).await), vec!["A", "B"]);
        assert_eq!(codes(store.get_products(Some(10)).await).len(), 3);
        assert_eq!(codes(store.get_products(Some(0)).await).len(), 3);
        assert_eq!(codes(store.get_products(None).await), vec!["A", "B", "C"]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_leaves_other_records_alone() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        let a = store.add_product(candidate("A")).await?;
        let b = store.add_product(candidate("B")).await?;

        let updated = store
            .update_product(b.id, ProductPatch { title: Some("renamed".into()), ..Default::default() })
            .await?;
        assert_eq!(updated, Product { title: "renamed".into(), ..b.clone() });
        assert_eq!(store.get_product_by_id(a.id).await?, a);

        let missing = store.update_product(42, ProductPatch { stock: Some(1), ..Default::default() }).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_is_not_revalidated() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        store.add_product(candidate("A")).await?;
        let b = store.add_product(candidate("B")).await?;

        let updated = store
            .update_product(b.id, ProductPatch { code: Some("A".into()), stock: Some(0), ..Default::default() })
            .await?;
        assert_eq!(updated.code, "A");
        assert_eq!(updated.stock, 0);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_keeps_order_and_never_reuses_ids() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        for code in ["A", "B", "C"] {
            store.add_product(candidate(code)).await?;
        }

        let removed = store.delete_product(2).await?;
        assert_eq!(removed.code, "B");
        let ids: Vec<u64> = store.get_products(None).await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(matches!(store.delete_product(2).await, Err(ServiceError::NotFound(_))));

        store.delete_product(3).await?;
        let d = store.add_product(candidate("D")).await?;
        assert_eq!(d.id, 4);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn reload_reproduces_sequence_and_next_id() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;
        for code in ["A", "B", "C"] {
            store.add_product(candidate(code)).await?;
        }
        store.delete_product(1).await?;
        let before = store.get_products(None).await;

        let reloaded = ProductStore::new(&tmp).await;
        assert_eq!(reloaded.get_products(None).await, before);
        assert_eq!(reloaded.next_id().await, Some(4));
        assert_eq!(reloaded.add_product(candidate("D")).await?.id, 4);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_save_keeps_memory_state() -> Result<(), anyhow::Error> {
        // the backing path is a directory, so every write fails
        let dir = std::env::temp_dir().join(format!("product_store_dir_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let store = ProductStore::new(&dir).await;

        let res = store.add_product(candidate("A")).await;
        assert!(matches!(res, Err(ServiceError::Persistence(_))));
        assert_eq!(store.get_products(None).await.len(), 1);
        assert_eq!(store.next_id().await, Some(2));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_get_distinct_ids() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = ProductStore::new(&tmp).await;

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.add_product(candidate(&format!("C{i}"))).await }));
        }
        for h in handles {
            h.await??;
        }

        let mut ids: Vec<u64> = store.get_products(None).await.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
        assert_eq!(on_disk(&tmp).await.len(), 16);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
